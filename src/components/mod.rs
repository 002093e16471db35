// Export components
pub mod gmail;
pub mod google_api;
pub mod google_calendar;

// Re-export the calendar handle and meeting manager
pub use google_calendar::{GoogleCalendarHandle, MeetingManager};

mod actor;
pub mod classify;
mod handle;
pub mod manager;
pub mod models;
pub mod time;

pub use handle::GoogleCalendarHandle;
pub use manager::{CancellationLog, DateWindow, MeetingManager, SelectionCriteria, TracingLog};
pub use models::{CancellationResult, CancellationStatus, MeetingRecord, MeetingType, RawEvent};
pub use time::{week_range, WeekWindow};

use crate::error::AppResult;
use async_trait::async_trait;

/// Calendar backend the meeting manager reads from and deletes through
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Single events inside the window, ordered by start time
    async fn list_events(&self, calendar_id: &str, window: &WeekWindow) -> AppResult<Vec<RawEvent>>;

    /// Delete one event by id
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()>;
}

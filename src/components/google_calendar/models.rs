use crate::error::{invalid_input, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summary used when an event has no title
pub const NO_TITLE: &str = "(No Title)";

/// Summary used for requested ids that were never fetched
pub const UNKNOWN_SUMMARY: &str = "(Unknown)";

/// Start or end of an event as returned by the Calendar API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventTime {
    /// The date-time when present, otherwise the all-day date
    pub fn value(&self) -> Option<String> {
        self.date_time.clone().or_else(|| self.date.clone())
    }
}

/// One entry of an event's attendee list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAttendee {
    Entry { email: Option<String> },
    Malformed(serde_json::Value),
}

impl RawAttendee {
    /// Non-empty email address of the attendee, if any
    pub fn email(&self) -> Option<&str> {
        match self {
            RawAttendee::Entry { email: Some(email) } if !email.is_empty() => Some(email.as_str()),
            _ => None,
        }
    }
}

/// Calendar event as listed by the Calendar API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub recurring_event_id: Option<String>,
    pub recurrence: Option<Vec<String>>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub attendees: Vec<RawAttendee>,
}

/// One page of an events listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventsPage {
    pub items: Vec<RawEvent>,
    pub next_page_token: Option<String>,
}

/// Whether a meeting belongs to a recurring series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingType {
    #[serde(rename = "recurring")]
    Recurring,
    #[serde(rename = "one-off")]
    OneOff,
    #[serde(rename = "unknown")]
    Unknown,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Recurring => "recurring",
            MeetingType::OneOff => "one-off",
            MeetingType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MeetingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recurring" => Ok(MeetingType::Recurring),
            "one-off" | "oneoff" | "one_off" => Ok(MeetingType::OneOff),
            "unknown" => Ok(MeetingType::Unknown),
            other => Err(invalid_input(&format!(
                "Unknown meeting type '{}', expected 'recurring' or 'one-off'",
                other
            ))),
        }
    }
}

/// Normalized meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: String,
    pub summary: String,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub attendees: Vec<String>,
}

impl MeetingRecord {
    /// Stand-in for an id that was requested but not fetched
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            summary: UNKNOWN_SUMMARY.to_string(),
            start: None,
            end: None,
            meeting_type: MeetingType::Unknown,
            attendees: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationStatus {
    Cancelled,
    Error,
}

/// Outcome of one cancellation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationResult {
    pub id: String,
    pub summary: String,
    pub status: CancellationStatus,
    pub error: Option<String>,
}

impl CancellationResult {
    pub fn cancelled(meeting: &MeetingRecord) -> Self {
        Self {
            id: meeting.id.clone(),
            summary: meeting.summary.clone(),
            status: CancellationStatus::Cancelled,
            error: None,
        }
    }

    pub fn failed(meeting: &MeetingRecord, error: String) -> Self {
        Self {
            id: meeting.id.clone(),
            summary: meeting.summary.clone(),
            status: CancellationStatus::Error,
            error: Some(error),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == CancellationStatus::Cancelled
    }
}

use super::models::{EventTime, MeetingRecord, MeetingType, RawEvent, NO_TITLE};
use super::time::WeekWindow;
use tracing::debug;

/// Recurring when the event is an instance of a series or defines one
pub fn meeting_type(event: &RawEvent) -> MeetingType {
    if event.recurring_event_id.is_some() || event.recurrence.is_some() {
        MeetingType::Recurring
    } else {
        MeetingType::OneOff
    }
}

/// Normalize a raw event. Events without an id cannot be selected or deleted.
pub fn classify(event: &RawEvent) -> Option<MeetingRecord> {
    let id = event.id.as_deref().filter(|id| !id.is_empty())?;

    let attendees = event
        .attendees
        .iter()
        .filter_map(|attendee| attendee.email())
        .map(str::to_string)
        .collect();

    Some(MeetingRecord {
        id: id.to_string(),
        summary: event.summary.clone().unwrap_or_else(|| NO_TITLE.to_string()),
        start: event.start.as_ref().and_then(EventTime::value),
        end: event.end.as_ref().and_then(EventTime::value),
        meeting_type: meeting_type(event),
        attendees,
    })
}

/// Classify every event listed for one week, in listing order
pub fn classify_week(events: &[RawEvent], window: &WeekWindow) -> Vec<MeetingRecord> {
    events
        .iter()
        .filter_map(|event| {
            let record = classify(event);
            if record.is_none() {
                debug!(
                    "Skipping event without id in week {}: {:?}",
                    window, event.summary
                );
            }
            record
        })
        .collect()
}

use super::classify::classify_week;
use super::models::{CancellationResult, MeetingRecord, MeetingType};
use super::time::{range_steps, week_range};
use super::CalendarService;
use crate::error::AppResult;
use crate::utils::time::today_in;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::HashSet;
use tracing::{debug, error, info};

/// Which weeks to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    /// The week containing today
    #[default]
    CurrentWeek,
    /// The week containing the date
    Week(NaiveDate),
    /// Weeks of `start`, `start + 7d`, ... up to and including `end`
    Range { start: NaiveDate, end: NaiveDate },
}

/// Caller-supplied filter. Empty `ids` or `keywords` mean no filtering on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub ids: Vec<String>,
    pub window: DateWindow,
    pub meeting_type: Option<MeetingType>,
    pub keywords: Vec<String>,
}

impl SelectionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_week_of(mut self, date: NaiveDate) -> Self {
        self.window = DateWindow::Week(date);
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.window = DateWindow::Range { start, end };
        self
    }

    pub fn of_type(mut self, meeting_type: MeetingType) -> Self {
        self.meeting_type = Some(meeting_type);
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a fetched meeting passes the id, type and keyword filters
    pub fn matches(&self, meeting: &MeetingRecord) -> bool {
        if !self.ids.is_empty() && !self.ids.iter().any(|id| *id == meeting.id) {
            return false;
        }

        if let Some(meeting_type) = self.meeting_type {
            if meeting.meeting_type != meeting_type {
                return false;
            }
        }

        if !self.keywords.is_empty() {
            let summary = meeting.summary.to_lowercase();
            if !self
                .keywords
                .iter()
                .any(|kw| summary.contains(&kw.to_lowercase()))
            {
                return false;
            }
        }

        true
    }
}

/// Receives one line per cancellation outcome
pub trait CancellationLog: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards cancellation outcomes to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl CancellationLog for TracingLog {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Resolves and cancels meetings of one calendar
pub struct MeetingManager<S> {
    service: S,
    calendar_id: String,
    timezone: Tz,
}

impl<S: CalendarService> MeetingManager<S> {
    pub fn new(service: S, calendar_id: impl Into<String>, timezone: Tz) -> Self {
        Self {
            service,
            calendar_id: calendar_id.into(),
            timezone,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Today in the configured timezone
    pub fn today(&self) -> NaiveDate {
        today_in(&self.timezone)
    }

    /// List and classify the meetings of the week containing `date`
    pub async fn fetch_week(&self, date: NaiveDate) -> AppResult<Vec<MeetingRecord>> {
        let window = week_range(date, self.timezone);
        let events = self.service.list_events(&self.calendar_id, &window).await?;
        Ok(classify_week(&events, &window))
    }

    /// Fetch the meetings of every week the window covers. An event spanning
    /// two fetched weeks is kept once.
    async fn fetch_window(&self, window: &DateWindow) -> AppResult<Vec<MeetingRecord>> {
        match *window {
            DateWindow::CurrentWeek => self.fetch_week(self.today()).await,
            DateWindow::Week(date) => self.fetch_week(date).await,
            DateWindow::Range { start, end } => {
                let mut meetings = Vec::new();
                let mut seen = HashSet::new();
                for date in range_steps(start, end) {
                    for meeting in self.fetch_week(date).await? {
                        if seen.insert(meeting.id.clone()) {
                            meetings.push(meeting);
                        }
                    }
                }
                Ok(meetings)
            }
        }
    }

    /// Meetings selected by the criteria, in fetch order, followed by
    /// placeholders for requested ids that did not survive filtering
    pub async fn resolve_meetings(&self, criteria: &SelectionCriteria) -> AppResult<Vec<MeetingRecord>> {
        let fetched = self.fetch_window(&criteria.window).await?;

        let mut selected: Vec<MeetingRecord> = fetched
            .into_iter()
            .filter(|meeting| criteria.matches(meeting))
            .collect();

        let mut seen: HashSet<String> = selected.iter().map(|m| m.id.clone()).collect();
        for id in &criteria.ids {
            if id.is_empty() {
                continue;
            }
            if seen.insert(id.clone()) {
                debug!("Meeting {} not found in fetched window, adding placeholder", id);
                selected.push(MeetingRecord::placeholder(id));
            }
        }

        Ok(selected)
    }

    /// Delete every selected meeting, one at a time. A failed delete is
    /// recorded and the batch continues; fetch errors abort before any delete.
    pub async fn cancel(
        &self,
        criteria: &SelectionCriteria,
        log: Option<&dyn CancellationLog>,
    ) -> AppResult<Vec<CancellationResult>> {
        let meetings = self.resolve_meetings(criteria).await?;
        let mut results = Vec::with_capacity(meetings.len());

        for meeting in &meetings {
            let result = match self.service.delete_event(&self.calendar_id, &meeting.id).await {
                Ok(()) => {
                    if let Some(log) = log {
                        log.info(&format!(
                            "Cancelled meeting: {} ({})",
                            meeting.summary, meeting.id
                        ));
                    }
                    CancellationResult::cancelled(meeting)
                }
                Err(e) => {
                    let message = e.to_string();
                    if let Some(log) = log {
                        log.error(&format!(
                            "Error cancelling meeting {} ({}): {}",
                            meeting.summary, meeting.id, message
                        ));
                    }
                    CancellationResult::failed(meeting, message)
                }
            };
            results.push(result);
        }

        Ok(results)
    }

    /// Cancel all recurring meetings in the week containing `date`
    pub async fn cancel_recurring_for_week(
        &self,
        date: NaiveDate,
        log: Option<&dyn CancellationLog>,
    ) -> AppResult<Vec<CancellationResult>> {
        let criteria = SelectionCriteria::new()
            .on_week_of(date)
            .of_type(MeetingType::Recurring);
        self.cancel(&criteria, log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(id: &str, summary: &str, meeting_type: MeetingType) -> MeetingRecord {
        MeetingRecord {
            id: id.to_string(),
            summary: summary.to_string(),
            start: Some("2024-03-04T10:00:00Z".to_string()),
            end: Some("2024-03-04T11:00:00Z".to_string()),
            meeting_type,
            attendees: Vec::new(),
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = SelectionCriteria::new();
        assert!(criteria.matches(&meeting("a", "Anything", MeetingType::OneOff)));
        assert_eq!(criteria.window, DateWindow::CurrentWeek);
    }

    #[test]
    fn test_keyword_matching() {
        let criteria = SelectionCriteria::new().with_keywords(["standup", "RETRO"]);
        assert!(criteria.matches(&meeting("a", "Daily Standup", MeetingType::Recurring)));
        assert!(criteria.matches(&meeting("b", "Sprint retro", MeetingType::OneOff)));
        assert!(!criteria.matches(&meeting("c", "Budget Review", MeetingType::OneOff)));
    }

    #[test]
    fn test_type_and_id_filters_combine() {
        let criteria = SelectionCriteria::new()
            .with_ids(["a", "b"])
            .of_type(MeetingType::Recurring);
        assert!(criteria.matches(&meeting("a", "Sync", MeetingType::Recurring)));
        assert!(!criteria.matches(&meeting("b", "Sync", MeetingType::OneOff)));
        assert!(!criteria.matches(&meeting("c", "Sync", MeetingType::Recurring)));
    }
}

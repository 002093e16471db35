use super::models::{EventsPage, RawEvent};
use super::time::WeekWindow;
use crate::components::google_api::{send_checked, GoogleApiClient};
use crate::error::{google_calendar_error, AppResult};
use reqwest::Method;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The Google Calendar actor that processes messages
pub struct GoogleCalendarActor {
    api: GoogleApiClient,
    command_rx: mpsc::Receiver<GoogleCalendarCommand>,
}

/// Commands that can be sent to the Google Calendar actor
pub enum GoogleCalendarCommand {
    ListEvents {
        calendar_id: String,
        window: WeekWindow,
        respond_to: mpsc::Sender<AppResult<Vec<RawEvent>>>,
    },
    DeleteEvent {
        calendar_id: String,
        event_id: String,
        respond_to: mpsc::Sender<AppResult<()>>,
    },
    Shutdown,
}

/// Handle for communicating with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarActorHandle {
    command_tx: mpsc::Sender<GoogleCalendarCommand>,
}

impl GoogleCalendarActorHandle {
    /// List the single events of a calendar inside a week
    pub async fn list_events(&self, calendar_id: &str, window: &WeekWindow) -> AppResult<Vec<RawEvent>> {
        let (respond_to, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::ListEvents {
                calendar_id: calendar_id.to_string(),
                window: *window,
                respond_to,
            })
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Delete one event
    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()> {
        let (respond_to, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::DeleteEvent {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                respond_to,
            })
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(GoogleCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(api: GoogleApiClient) -> (Self, GoogleCalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self { api, command_rx };
        let handle = GoogleCalendarActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop. Commands are handled one at a time.
    pub async fn run(&mut self) {
        info!("Google Calendar actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoogleCalendarCommand::ListEvents {
                    calendar_id,
                    window,
                    respond_to,
                } => {
                    let result = list_events(&self.api, &calendar_id, &window).await;
                    let _ = respond_to.send(result).await;
                }
                GoogleCalendarCommand::DeleteEvent {
                    calendar_id,
                    event_id,
                    respond_to,
                } => {
                    let result = delete_event(&self.api, &calendar_id, &event_id).await;
                    let _ = respond_to.send(result).await;
                }
                GoogleCalendarCommand::Shutdown => {
                    info!("Google Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Google Calendar actor shut down");
    }
}

/// Fetch every page of single events inside the window, ordered by start time
async fn list_events(
    api: &GoogleApiClient,
    calendar_id: &str,
    window: &WeekWindow,
) -> AppResult<Vec<RawEvent>> {
    let mut events = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut url = api.url(&["calendar", "v3", "calendars", calendar_id, "events"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &window.time_min())
                .append_pair("timeMax", &window.time_max())
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");
            if let Some(token) = &page_token {
                query.append_pair("pageToken", token);
            }
        }

        let response = send_checked(
            api.request(Method::GET, url),
            "fetch events",
            google_calendar_error,
        )
        .await?;

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        debug!(
            "Fetched {} events for week {} from calendar {}",
            page.items.len(),
            window,
            calendar_id
        );
        events.extend(page.items);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(events)
}

async fn delete_event(api: &GoogleApiClient, calendar_id: &str, event_id: &str) -> AppResult<()> {
    let url = api.url(&["calendar", "v3", "calendars", calendar_id, "events", event_id]);
    send_checked(
        api.request(Method::DELETE, url),
        &format!("delete event {}", event_id),
        google_calendar_error,
    )
    .await?;

    debug!("Deleted event {} from calendar {}", event_id, calendar_id);
    Ok(())
}

use super::actor::{GoogleCalendarActor, GoogleCalendarActorHandle};
use super::models::RawEvent;
use super::time::WeekWindow;
use super::CalendarService;
use crate::components::google_api::GoogleApiClient;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(api: GoogleApiClient) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = GoogleCalendarActor::new(api);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarHandle {
    async fn list_events(&self, calendar_id: &str, window: &WeekWindow) -> AppResult<Vec<RawEvent>> {
        self.actor_handle.list_events(calendar_id, window).await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()> {
        self.actor_handle.delete_event(calendar_id, event_id).await
    }
}

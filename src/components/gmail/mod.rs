mod message;

pub use message::DraftMessage;

use crate::components::google_api::{send_checked, GoogleApiClient};
use crate::error::{gmail_error, invalid_input, AppResult};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
struct DraftResponse {
    id: Option<String>,
}

/// Creates drafts in a Gmail mailbox. Drafts are never sent.
#[derive(Clone)]
pub struct GmailClient {
    api: GoogleApiClient,
    user_id: String,
}

impl GmailClient {
    pub fn new(api: GoogleApiClient, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
        }
    }

    /// Store a draft and return its id
    pub async fn create_draft(&self, message: &DraftMessage) -> AppResult<String> {
        let recipients: Vec<String> = message
            .to
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(invalid_input("A draft needs at least one recipient"));
        }
        let message = DraftMessage {
            to: recipients,
            ..message.clone()
        };

        let url = self.api.url(&["gmail", "v1", "users", self.user_id.as_str(), "drafts"]);
        let body = json!({ "message": { "raw": message.to_raw() } });

        let response = send_checked(
            self.api.request(Method::POST, url).json(&body),
            "create draft",
            gmail_error,
        )
        .await?;

        let draft: DraftResponse = response
            .json()
            .await
            .map_err(|e| gmail_error(&format!("Failed to parse draft response: {}", e)))?;

        let id = draft
            .id
            .ok_or_else(|| gmail_error("Draft response did not contain an id"))?;

        info!("Created Gmail draft {} for {}", id, message.to.join(", "));
        Ok(id)
    }
}

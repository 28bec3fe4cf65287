//! Push notifications through the LINE Messaging API.

mod format;

use serde::Serialize;

use crate::config::{Config, Credentials, MAX_ERROR_BODY_PREVIEW_CHARS};
use crate::error_handling::NotifyError;
use crate::utils::preview;

pub use format::{format_record, truncate_message};

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

/// Sends text messages to one LINE user, group or room.
#[derive(Debug, Clone)]
pub struct LinePusher {
    client: reqwest::Client,
    api_url: String,
    channel_token: Option<String>,
    target_id: Option<String>,
}

impl LinePusher {
    /// Creates a pusher from the run config and credentials.
    pub fn new(client: reqwest::Client, config: &Config, credentials: &Credentials) -> Self {
        Self {
            client,
            api_url: config.push_api_url.clone(),
            channel_token: credentials.line_channel_token.clone(),
            target_id: credentials.line_target_id.clone(),
        }
    }

    /// True if both the channel token and the target are set.
    pub fn is_configured(&self) -> bool {
        self.channel_token.is_some() && self.target_id.is_some()
    }

    /// Pushes one text message, truncated to the API limit.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if the token or target is missing
    /// - `Rejected` unless the API answers 200
    /// - `Http` for transport failures
    pub async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(target)) = (self.channel_token.as_deref(), self.target_id.as_deref())
        else {
            return Err(NotifyError::NotConfigured);
        };

        let text = truncate_message(message);
        let request = PushRequest {
            to: target,
            messages: [TextMessage {
                kind: "text",
                text: &text,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::OK {
            log::info!("LINE push succeeded");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Rejected {
                status,
                body: preview(&body, MAX_ERROR_BODY_PREVIEW_CHARS),
            })
        }
    }
}

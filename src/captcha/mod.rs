//! CAPTCHA reading through a vision-capable chat completions API.
//!
//! The image is sent as-is in a `data:` URL together with a fixed
//! instruction, and the answer is filtered out of whatever text comes back.
//! Any OpenAI-compatible endpoint works.

mod answer;
mod image;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Config, CAPTCHA_PROMPT, MAX_ERROR_BODY_PREVIEW_CHARS};
use crate::error_handling::CaptchaError;
use crate::utils::preview;

pub use answer::extract_answer;
pub use image::{image_mime, to_data_url};

#[derive(Serialize)]
struct ContentBlock<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<ImageUrlBlock>,
}

#[derive(Serialize)]
struct ImageUrlBlock {
    url: String,
    detail: &'static str,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

/// Reads SiteGuard CAPTCHAs with a remote vision model.
#[derive(Debug, Clone)]
pub struct CaptchaSolver {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    dump_path: Option<PathBuf>,
}

impl CaptchaSolver {
    /// Creates a solver from the run config.
    pub fn new(client: reqwest::Client, config: &Config, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: config.vision_api_url.clone(),
            model: config.vision_model.clone(),
            api_key,
            dump_path: config.captcha_dump.clone(),
        }
    }

    /// Returns the four-character answer for a CAPTCHA image.
    ///
    /// # Errors
    ///
    /// - `MissingApiKey` if no key is configured
    /// - `Api` for non-200 responses
    /// - `MissingContent` / `Unreadable` if the model output has no usable answer
    /// - `Http` for transport or JSON decoding failures
    pub async fn solve(&self, image: &[u8]) -> Result<String, CaptchaError> {
        let api_key = self.api_key.as_deref().ok_or(CaptchaError::MissingApiKey)?;

        if let Some(path) = &self.dump_path {
            match tokio::fs::write(path, image).await {
                Ok(()) => log::info!("Saved CAPTCHA image to {}", path.display()),
                Err(e) => log::warn!("Could not save CAPTCHA image to {}: {}", path.display(), e),
            }
        }

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock {
                        content_type: "text",
                        text: Some(CAPTCHA_PROMPT),
                        image_url: None,
                    },
                    ContentBlock {
                        content_type: "image_url",
                        text: None,
                        image_url: Some(ImageUrlBlock {
                            url: to_data_url(image),
                            detail: "high",
                        }),
                    },
                ],
            }],
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        log::debug!(
            "Vision API: status={} latency={:?} image_bytes={}",
            status,
            start.elapsed(),
            image.len()
        );

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptchaError::Api {
                status,
                body: preview(&body, MAX_ERROR_BODY_PREVIEW_CHARS),
            });
        }

        let root: serde_json::Value = response.json().await?;
        let content = root
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .ok_or(CaptchaError::MissingContent)?;

        extract_answer(content).ok_or_else(|| CaptchaError::Unreadable {
            expected: crate::config::CAPTCHA_LENGTH,
            output: content.to_string(),
        })
    }
}

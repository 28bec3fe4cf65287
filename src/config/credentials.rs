//! Credential loading.
//!
//! Secrets come from environment variables first. Anything left unset is
//! filled from two plain-text files in the config directory:
//!
//! - `id_pass.txt`: free-form notes with a `ユーザー名` (username) line and a
//!   `パスワード` (password) line; the last whitespace-separated token of each is
//!   the value.
//! - `line_config.txt`: `KEY=VALUE` lines with `#` comments, providing
//!   `CHANNEL_ACCESS_TOKEN`, `TARGET_ID` and `OPENAI_API_KEY`.

use std::fs;
use std::path::Path;

use crate::config::constants::{ID_PASS_FILE, LINE_CONFIG_FILE};

const USERNAME_LABEL: &str = "ユーザー名";
const PASSWORD_LABEL: &str = "パスワード";

/// Secrets needed by the pipeline. Any of them may be missing; each stage
/// reports the ones it needs.
#[derive(Clone, Default)]
pub struct Credentials {
    /// WordPress username
    pub wp_username: Option<String>,
    /// WordPress password
    pub wp_password: Option<String>,
    /// Vision API key
    pub openai_api_key: Option<String>,
    /// LINE channel access token
    pub line_channel_token: Option<String>,
    /// LINE user, group or room ID that receives the messages
    pub line_target_id: Option<String>,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("wp_username", &self.wp_username)
            .field("wp_password", &mask(&self.wp_password))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("line_channel_token", &mask(&self.line_channel_token))
            .field("line_target_id", &self.line_target_id)
            .finish()
    }
}

impl Credentials {
    /// Loads credentials from the process environment and the fallback files
    /// in `config_dir`.
    pub fn load(config_dir: &Path) -> Self {
        Self::from_sources(|key| std::env::var(key).ok(), config_dir)
    }

    /// Loads credentials using `env` to look up variables.
    ///
    /// Empty values are treated as unset. Missing or unreadable fallback
    /// files are skipped.
    pub fn from_sources<F>(env: F, config_dir: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut creds = Self {
            wp_username: lookup("WP_USERNAME"),
            wp_password: lookup("WP_PASSWORD"),
            openai_api_key: lookup("OPENAI_API_KEY"),
            line_channel_token: lookup("LINE_CHANNEL_TOKEN"),
            line_target_id: lookup("LINE_TARGET_ID"),
        };

        if creds.wp_username.is_none() || creds.wp_password.is_none() {
            if let Some(contents) = read_optional(&config_dir.join(ID_PASS_FILE)) {
                creds.apply_id_pass(&contents);
            }
        }

        if let Some(contents) = read_optional(&config_dir.join(LINE_CONFIG_FILE)) {
            creds.apply_line_config(&contents);
        }

        creds
    }

    /// Applies `id_pass.txt`. Both values are taken from the file, matching
    /// how the file is consulted only when one of them is missing.
    fn apply_id_pass(&mut self, contents: &str) {
        for line in contents.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                continue;
            }
            let value = tokens[tokens.len() - 1].to_string();
            if line.contains(USERNAME_LABEL) {
                self.wp_username = Some(value);
            } else if line.contains(PASSWORD_LABEL) {
                self.wp_password = Some(value);
            }
        }
    }

    fn apply_line_config(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            let slot = match key.trim() {
                "CHANNEL_ACCESS_TOKEN" => &mut self.line_channel_token,
                "TARGET_ID" => &mut self.line_target_id,
                "OPENAI_API_KEY" => &mut self.openai_api_key,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            log::debug!("Read fallback credentials from {}", path.display());
            Some(contents)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

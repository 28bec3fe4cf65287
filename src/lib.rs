//! form_notifier library: MW WP Form entry polling
//!
//! This library logs into a WordPress admin panel guarded by a SiteGuard
//! CAPTCHA, downloads the CSV export of an MW WP Form, and pushes entries that
//! are newer than the last run to LINE.
//!
//! # Example
//!
//! ```no_run
//! use form_notifier::{run_check, Config, Credentials};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     site_url: Some("https://example.com/_wp".to_string()),
//!     form_post_type: Some("mwf_285".to_string()),
//!     ..Default::default()
//! };
//! let credentials = Credentials::load(Path::new("."));
//!
//! let report = run_check(&config, &credentials).await?;
//! println!("{} new entries, {} pushed", report.new_records, report.notified);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod auth;
pub mod captcha;
pub mod checkpoint;
pub mod config;
pub mod diff;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod models;
pub mod notify;
pub mod parse;
pub mod site;
mod utils;

// Re-export public API
pub use config::{Config, Credentials, LogFormat, LogLevel};
pub use error_handling::CheckError;
pub use models::{Record, Submissions};
pub use run::{run_check, CheckReport};

// Internal run module (contains the pipeline)
mod run {
    use log::{info, warn};

    use crate::auth::login;
    use crate::captcha::CaptchaSolver;
    use crate::checkpoint::CheckpointStore;
    use crate::config::{Config, Credentials};
    use crate::diff::diff;
    use crate::error_handling::{CheckError, InitializationError};
    use crate::export::fetch_export;
    use crate::initialization::init_api_client;
    use crate::notify::{format_record, LinePusher};
    use crate::parse::parse_export;
    use crate::site::Site;

    /// Results of one polling run.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CheckReport {
        /// Entries in the export (with a non-empty ID)
        pub total_records: usize,
        /// Entries newer than the checkpoint
        pub new_records: usize,
        /// Entries successfully pushed to LINE
        pub notified: usize,
        /// Checkpoint at the start of the run (`None` if the export was empty)
        pub previous_max_id: Option<u64>,
        /// Checkpoint written by this run, if any
        pub saved_max_id: Option<u64>,
        /// True if nothing was pushed or saved on purpose
        pub dry_run: bool,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs one poll: login, export, diff, notify, save the checkpoint.
    ///
    /// A failed push is logged and does not stop the run; the checkpoint still
    /// advances past it so the same entry is not pushed again next time.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] if a required setting is missing, the login
    /// fails after every attempt, the export cannot be downloaded, or the
    /// checkpoint cannot be written. None of these leave partial state behind.
    pub async fn run_check(
        config: &Config,
        credentials: &Credentials,
    ) -> Result<CheckReport, CheckError> {
        let start_time = std::time::Instant::now();

        let site_url = config
            .site_url
            .as_deref()
            .ok_or(CheckError::MissingSetting("WP_SITE_URL"))?;
        let post_type = config
            .form_post_type
            .as_deref()
            .ok_or(CheckError::MissingSetting("MWF_POST_TYPE"))?;
        let site = Site::new(site_url, &config.login_path, post_type).map_err(|source| {
            CheckError::InvalidSiteUrl {
                url: site_url.to_string(),
                source,
            }
        })?;

        let api_client = init_api_client(config).map_err(InitializationError::from)?;
        let solver = CaptchaSolver::new(
            api_client.clone(),
            config,
            credentials.openai_api_key.clone(),
        );
        let pusher = LinePusher::new(api_client, config, credentials);
        if !pusher.is_configured() && !config.dry_run {
            warn!("LINE settings incomplete, new entries will not be pushed");
        }

        let session = login(&site, config, credentials, &solver).await?;
        let export = fetch_export(&session, &site, config).await?;

        let submissions = parse_export(&export);
        info!("Total records: {}", submissions.len());

        let mut report = CheckReport {
            total_records: submissions.len(),
            dry_run: config.dry_run,
            ..Default::default()
        };

        if submissions.is_empty() {
            report.elapsed_seconds = start_time.elapsed().as_secs_f64();
            return Ok(report);
        }

        let store = CheckpointStore::new(&config.state_file);
        let last_max_id = store.load().await;
        let changes = diff(&submissions, last_max_id);
        report.previous_max_id = Some(last_max_id);
        report.new_records = changes.new_records.len();

        info!("Previous max ID: {}", last_max_id);
        info!(
            "Current max ID: {}",
            changes
                .new_max_id
                .map_or_else(|| "-".to_string(), |id| id.to_string())
        );
        info!("New entries: {}", changes.new_records.len());

        if changes.new_records.is_empty() {
            info!("No new entries");
            report.elapsed_seconds = start_time.elapsed().as_secs_f64();
            return Ok(report);
        }

        for (id, record) in &changes.new_records {
            let message = format_record(record);
            info!("Entry {}:\n{}", id, message);
            if config.dry_run {
                continue;
            }
            match pusher.send(&message).await {
                Ok(()) => report.notified += 1,
                Err(e) => warn!("LINE push failed for entry {}: {}", id, e),
            }
        }

        if config.dry_run {
            info!("Dry run, checkpoint stays at {}", last_max_id);
        } else if let Some(max_id) = changes.new_max_id {
            store.save(max_id).await?;
            report.saved_max_id = Some(max_id);
        }

        report.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(report)
    }
}

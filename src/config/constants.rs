//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including remote endpoints, CAPTCHA rules, and notification layout limits.

/// Default User-Agent string for HTTP requests.
///
/// The admin panel is visited like a regular browser session, so a
/// Chrome-like string is used. Override with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Remote services
/// OpenAI-compatible chat completions endpoint used for CAPTCHA reading
pub const DEFAULT_VISION_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Vision model used for CAPTCHA reading
pub const DEFAULT_VISION_MODEL: &str = "gpt-5";
/// LINE Messaging API push endpoint
pub const DEFAULT_PUSH_API_URL: &str = "https://api.line.me/v2/bot/message/push";

// Site layout
/// Default login page path, relative to the site URL
pub const DEFAULT_LOGIN_PATH: &str = "wp-login.php";
/// Marker that identifies the stock WordPress login page in a URL
pub const WP_LOGIN_MARKER: &str = "wp-login";
/// Marker that identifies the admin area in a URL
pub const WP_ADMIN_MARKER: &str = "wp-admin";
/// Every CSV export starts with this header cell
pub const EXPORT_HEADER_MARKER: &[u8] = b"\"ID\"";

// Local files
/// Default checkpoint file
pub const DEFAULT_STATE_FILE: &str = "last_max_id.txt";
/// Fallback file holding the WordPress username and password
pub const ID_PASS_FILE: &str = "id_pass.txt";
/// Fallback file holding LINE and OpenAI settings as KEY=VALUE lines
pub const LINE_CONFIG_FILE: &str = "line_config.txt";
/// File name used when saving the export page for debugging
pub const DEBUG_PAGE_FILE: &str = "debug_page.html";

// Login retry strategy
/// Maximum number of login attempts (including the first)
pub const LOGIN_MAX_ATTEMPTS: u32 = 3;
/// Delay before the first login retry in milliseconds
pub const LOGIN_RETRY_INITIAL_DELAY_MS: u64 = 1000;
/// Factor by which the login retry delay grows per attempt
pub const LOGIN_RETRY_FACTOR: u64 = 2;
/// Maximum delay between login retries in seconds
pub const LOGIN_RETRY_MAX_DELAY_SECS: u64 = 10;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// CAPTCHA
/// Number of characters in a SiteGuard CAPTCHA
pub const CAPTCHA_LENGTH: usize = 4;
/// First character of the accepted answer range (ぁ)
pub const CAPTCHA_CHAR_FIRST: char = '\u{3041}';
/// Last character of the accepted answer range (ゖ)
pub const CAPTCHA_CHAR_LAST: char = '\u{3096}';
/// Instruction sent with the CAPTCHA image.
///
/// "This image shows four hiragana characters. It contains no dakuten,
/// handakuten or small kana, only plain syllables. Output only those four
/// characters."
pub const CAPTCHA_PROMPT: &str = "この画像にはひらがな4文字が書かれています。濁点や半濁点、小文字は含まれません。清音のみです。その4文字だけを出力してください。";
/// Maximum characters of an API error body kept in diagnostics
pub const MAX_ERROR_BODY_PREVIEW_CHARS: usize = 200;

// Notification layout
/// First line of every notification ("new inquiry")
pub const MESSAGE_HEADER: &str = "【新規お問い合わせ】";
/// Fields rendered first, in this order
pub const PRIORITY_FIELDS: &[&str] = &[
    "ID",
    "post_date",
    "お名前",
    "名前",
    "メールアドレス",
    "電話番号",
];
/// Fields never rendered (in addition to the priority fields)
pub const SKIPPED_FIELDS: &[&str] = &["管理者メール送信先", "post_modified", "post_title", "対応状況"];
/// Maximum characters of a priority field value
pub const MAX_PRIORITY_VALUE_CHARS: usize = 100;
/// Maximum characters of any other field value
pub const MAX_FIELD_VALUE_CHARS: usize = 200;
/// Maximum characters of a LINE text message
pub const MAX_MESSAGE_CHARS: usize = 5000;
/// Characters kept when a message exceeds `MAX_MESSAGE_CHARS`
pub const TRUNCATED_MESSAGE_CHARS: usize = 4990;
/// Appended to a truncated message
pub const TRUNCATION_MARKER: &str = "...";

/// Name of the CSV column holding the record identifier
pub const ID_COLUMN: &str = "ID";

//! Integration tests for run_check
//!
//! A single mock server plays the WordPress site, the vision API and the
//! LINE push API. These tests verify the orchestration:
//! - Login with CAPTCHA, retries and give-up conditions
//! - CSV export download and its failure modes
//! - Diff against the checkpoint, notification and checkpoint update

use form_notifier::auth::login;
use form_notifier::captcha::CaptchaSolver;
use form_notifier::config::DEBUG_PAGE_FILE;
use form_notifier::error_handling::{ExportError, LoginError};
use form_notifier::site::Site;
use form_notifier::{run_check, CheckError, Config, Credentials, LogLevel};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>ログイン</title></head><body>
<form name="loginform" id="loginform" action="/_wp/wp-login.php" method="post">
  <input type="text" name="log" id="user_login">
  <input type="password" name="pwd" id="user_pass">
  <img src="/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png" alt="CAPTCHA">
  <input type="text" name="siteguard_captcha" id="siteguard_captcha">
  <input type="hidden" name="siteguard_captcha_prefix" id="siteguard_captcha_prefix" value="123456">
  <input type="submit" name="wp-submit" value="ログイン">
</form></body></html>"#;

const LOGIN_PAGE_NO_CAPTCHA: &str = r#"<!DOCTYPE html>
<html><body><form id="loginform" method="post">
  <input type="text" name="log"><input type="password" name="pwd">
</form></body></html>"#;

const EXPORT_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>お問い合わせ ‹ Example — WordPress</title></head><body>
<form method="post">
  <input type="hidden" id="_wpnonce" name="_wpnonce" value="abc123">
  <input type="hidden" name="_wp_http_referer" value="/_wp/wp-admin/edit.php?post_type=mwf_285">
  <input type="submit" name="mwf-csv-download" value="CSV Download">
</form></body></html>"#;

const EXPORT_PAGE_NO_NONCE: &str = r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body><p>Sorry, you are not allowed to access this page.</p></body></html>"#;

const CSV_EXPORT: &str = "\"ID\",\"post_date\",\"お名前\",\"メールアドレス\",\"お問い合わせ内容\",\"対応状況\"\r\n\
\"7\",\"2024-05-03 09:00:00\",\"佐藤花子\",\"hanako@example.com\",\"見積もりをお願いします\",\"未対応\"\r\n\
\"6\",\"2024-05-02 09:00:00\",\"鈴木一郎\",\"ichiro@example.com\",\"資料請求\",\"未対応\"\r\n\
\"3\",\"2024-04-01 09:00:00\",\"山田太郎\",\"taro@example.com\",\"過去の問い合わせ\",\"対応済み\"\r\n";

const PUSH_PATH: &str = "/v2/bot/message/push";
const VISION_PATH: &str = "/v1/chat/completions";

/// Helper function to create a Config pointing every endpoint at the mock server
fn create_test_config(server: &MockServer, state_file: PathBuf) -> Config {
    Config {
        site_url: Some(format!("{}/_wp", server.uri())),
        form_post_type: Some("mwf_285".to_string()),
        state_file,
        vision_api_url: format!("{}{}", server.uri(), VISION_PATH),
        push_api_url: format!("{}{}", server.uri(), PUSH_PATH),
        login_retry_delay_ms: 0,
        timeout_seconds: 5,
        log_level: LogLevel::Error, // Reduce noise in tests
        ..Config::default()
    }
}

fn test_credentials() -> Credentials {
    Credentials {
        wp_username: Some("admin".to_string()),
        wp_password: Some("secret".to_string()),
        openai_api_key: Some("sk-test".to_string()),
        line_channel_token: Some("line-token".to_string()),
        line_target_id: Some("U0123456789".to_string()),
    }
}

fn csv_with_bom(csv: &str) -> Vec<u8> {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(csv.as_bytes());
    bytes
}

fn vision_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_login_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n\x1a\nfake".to_vec()))
        .mount(server)
        .await;
}

async fn mount_successful_login(server: &MockServer) {
    mount_login_page(server, LOGIN_PAGE).await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(vision_reply("あいうえ"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-login.php"))
        .and(body_string_contains("log=admin"))
        .and(body_string_contains("siteguard_captcha_prefix=123456"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/_wp/wp-admin/"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Dashboard</html>"))
        .mount(server)
        .await;
}

async fn mount_export(server: &MockServer, csv: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/edit.php"))
        .and(query_param("post_type", "mwf_285"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_PAGE))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-admin/edit.php"))
        .and(body_string_contains("_wpnonce=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(csv))
        .mount(server)
        .await;
}

async fn push_messages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == PUSH_PATH)
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            assert_eq!(body["to"], "U0123456789");
            assert_eq!(body["messages"][0]["type"], "text");
            body["messages"][0]["text"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_run_check_notifies_new_entries_and_advances_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");
    std::fs::write(&state_file, "5\n").unwrap();

    mount_successful_login(&server).await;
    mount_export(&server, csv_with_bom(CSV_EXPORT)).await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(header("authorization", "Bearer line-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, state_file.clone());
    let report = run_check(&config, &test_credentials()).await.unwrap();

    assert_eq!(report.total_records, 3);
    assert_eq!(report.new_records, 2);
    assert_eq!(report.notified, 2);
    assert_eq!(report.previous_max_id, Some(5));
    assert_eq!(report.saved_max_id, Some(7));
    assert_eq!(std::fs::read_to_string(&state_file).unwrap(), "7");

    let messages = push_messages(&server).await;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("【新規お問い合わせ】\nID: 7\n"));
    assert!(messages[0].contains("お名前: 佐藤花子"));
    assert!(messages[0].contains("お問い合わせ内容: 見積もりをお願いします"));
    assert!(!messages[0].contains("対応状況"));
    assert!(messages[1].contains("ID: 6"));
}

#[tokio::test]
async fn test_run_check_first_run_notifies_everything() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");

    mount_successful_login(&server).await;
    mount_export(&server, CSV_EXPORT.as_bytes().to_vec()).await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server, state_file.clone());
    let report = run_check(&config, &test_credentials()).await.unwrap();

    assert_eq!(report.previous_max_id, Some(0));
    assert_eq!(report.notified, 3);
    assert_eq!(std::fs::read_to_string(&state_file).unwrap(), "7");
}

#[tokio::test]
async fn test_run_check_without_new_entries_leaves_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");
    std::fs::write(&state_file, "7").unwrap();

    mount_successful_login(&server).await;
    mount_export(&server, csv_with_bom(CSV_EXPORT)).await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, state_file.clone());
    let report = run_check(&config, &test_credentials()).await.unwrap();

    assert_eq!(report.new_records, 0);
    assert_eq!(report.saved_max_id, None);
    assert_eq!(std::fs::read_to_string(&state_file).unwrap(), "7");
}

#[tokio::test]
async fn test_run_check_dry_run_pushes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");
    std::fs::write(&state_file, "5").unwrap();

    mount_successful_login(&server).await;
    mount_export(&server, csv_with_bom(CSV_EXPORT)).await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        dry_run: true,
        ..create_test_config(&server, state_file.clone())
    };
    let report = run_check(&config, &test_credentials()).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.new_records, 2);
    assert_eq!(report.notified, 0);
    assert_eq!(report.saved_max_id, None);
    assert_eq!(std::fs::read_to_string(&state_file).unwrap(), "5");
}

#[tokio::test]
async fn test_run_check_push_failure_still_saves_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");
    std::fs::write(&state_file, "5").unwrap();

    mount_successful_login(&server).await;
    mount_export(&server, csv_with_bom(CSV_EXPORT)).await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, state_file.clone());
    let report = run_check(&config, &test_credentials()).await.unwrap();

    assert_eq!(report.new_records, 2);
    assert_eq!(report.notified, 0);
    assert_eq!(report.saved_max_id, Some(7));
    assert_eq!(std::fs::read_to_string(&state_file).unwrap(), "7");
}

#[tokio::test]
async fn test_run_check_missing_site_url() {
    let config = Config {
        form_post_type: Some("mwf_285".to_string()),
        ..Config::default()
    };
    let result = run_check(&config, &test_credentials()).await;
    assert!(matches!(result, Err(CheckError::MissingSetting("WP_SITE_URL"))));
}

#[tokio::test]
async fn test_run_check_missing_credentials() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path().join("last_max_id.txt"));

    let credentials = Credentials {
        wp_password: None,
        ..test_credentials()
    };
    let result = run_check(&config, &credentials).await;
    assert!(matches!(
        result,
        Err(CheckError::Login(LoginError::MissingCredentials))
    ));
}

#[tokio::test]
async fn test_login_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("last_max_id.txt");

    Mock::given(method("GET"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n\x1a\n".to_vec()))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .respond_with(vision_reply("unreadable"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, state_file.clone());
    let result = run_check(&config, &test_credentials()).await;

    assert!(matches!(
        result,
        Err(CheckError::Login(LoginError::CaptchaUnsolved(_)))
    ));
    assert!(!state_file.exists());
}

#[tokio::test]
async fn test_login_retries_after_rejection() {
    let server = MockServer::start().await;
    let config = create_test_config(&server, PathBuf::from("unused"));

    mount_login_page(&server, LOGIN_PAGE).await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .respond_with(vision_reply("「あいうえ」"))
        .expect(2)
        .mount(&server)
        .await;
    // First submission stays on the login page (wrong CAPTCHA)
    Mock::given(method("POST"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/_wp/wp-admin/"))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let site = Site::new(
        config.site_url.as_deref().unwrap(),
        &config.login_path,
        "mwf_285",
    )
    .unwrap();
    let solver = CaptchaSolver::new(reqwest::Client::new(), &config, Some("sk-test".into()));

    let result = login(&site, &config, &test_credentials(), &solver).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_login_without_captcha_is_not_retried() {
    let server = MockServer::start().await;
    let config = create_test_config(&server, PathBuf::from("unused"));

    Mock::given(method("GET"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE_NO_CAPTCHA))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_check(&config, &test_credentials()).await;
    assert!(matches!(
        result,
        Err(CheckError::Login(LoginError::CaptchaNotFound(_)))
    ));
}

#[tokio::test]
async fn test_export_redirected_to_login_is_session_expired() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_successful_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/edit.php"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/_wp/wp-login.php?reauth=1"),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server, dir.path().join("last_max_id.txt"));
    let result = run_check(&config, &test_credentials()).await;

    assert!(matches!(
        result,
        Err(CheckError::Export(ExportError::SessionExpired(_)))
    ));
}

#[tokio::test]
async fn test_export_without_nonce_saves_debug_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_successful_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/edit.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_PAGE_NO_NONCE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-admin/edit.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        debug_dir: Some(dir.path().to_path_buf()),
        ..create_test_config(&server, dir.path().join("last_max_id.txt"))
    };
    let result = run_check(&config, &test_credentials()).await;

    assert!(matches!(
        result,
        Err(CheckError::Export(ExportError::NonceNotFound(_)))
    ));
    let saved = std::fs::read_to_string(dir.path().join(DEBUG_PAGE_FILE)).unwrap();
    assert!(saved.contains("not allowed"));
}

#[tokio::test]
async fn test_export_html_instead_of_csv() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_successful_login(&server).await;
    mount_export(&server, b"<!DOCTYPE html><html></html>".to_vec()).await;

    let config = create_test_config(&server, dir.path().join("last_max_id.txt"));
    let result = run_check(&config, &test_credentials()).await;

    assert!(matches!(
        result,
        Err(CheckError::Export(ExportError::NotCsv(_)))
    ));
}

#[tokio::test]
async fn test_login_retries_when_captcha_image_expired() {
    let server = MockServer::start().await;
    let config = create_test_config(&server, PathBuf::from("unused"));

    Mock::given(method("GET"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(2)
        .mount(&server)
        .await;
    // The first image has already been cleaned up by the time it is fetched
    Mock::given(method("GET"))
        .and(path(
            "/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png",
        ))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n\x1a\n".to_vec()))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .respond_with(vision_reply("あいうえ"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/_wp/wp-admin/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_wp/wp-admin/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let site = Site::new(
        config.site_url.as_deref().unwrap(),
        &config.login_path,
        "mwf_285",
    )
    .unwrap();
    let solver = CaptchaSolver::new(reqwest::Client::new(), &config, Some("sk-test".into()));

    let result = login(&site, &config, &test_credentials(), &solver).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_login_gives_up_when_captcha_image_keeps_failing() {
    let server = MockServer::start().await;
    let config = create_test_config(&server, PathBuf::from("unused"));

    Mock::given(method("GET"))
        .and(path("/_wp/wp-login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/_wp/wp-content/plugins/siteguard/really-simple-captcha/tmp/123456.png",
        ))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .respond_with(vision_reply("あいうえ"))
        .expect(0)
        .mount(&server)
        .await;

    let result = run_check(&config, &test_credentials()).await;
    assert!(matches!(
        result,
        Err(CheckError::Login(LoginError::CaptchaImage(status))) if status == 404
    ));
}

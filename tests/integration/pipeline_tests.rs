//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for the target site and run the
//! whole seed-file-to-machines.json cycle end-to-end.

use jihanki_scraper::config::{parse_config, Config};
use jihanki_scraper::crawler::{run_scrape, scrape_file, Coordinator};
use jihanki_scraper::output::RunSummary;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MACHINE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head><title>Test Machine | 自販機さがせ</title></head>
<body>
<h1>「Test Machine」の詳細</h1>
<table class="has-fixed-layout">
  <tr><td>自販機名</td><td>Test Machine</td></tr>
  <tr><td>所在地</td><td>東京都千代田区1-1</td></tr>
  <tr><td>商品</td><td>ラーメン、うどん</td></tr>
</table>
<img src="/wp-content/uploads/jihanki/photo.jpg">
<script>var map = { lat: 35.681, lng: 139.767 };</script>
</body>
</html>"#;

/// Creates a test configuration pointed at the mock server, with no delays
fn create_test_config(server: &MockServer) -> Config {
    let toml = format!(
        r#"
[site]
host = "{}"

[politeness]
request-delay-ms = 0
page-jitter-ms = 0
max-attempts = 2
request-timeout-ms = 500
"#,
        server.address()
    );
    parse_config(&toml).expect("test config should be valid")
}

async fn mount_machine_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/jihanki/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MACHINE_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-content/uploads/jihanki/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(server)
        .await;
}

fn write_seeds(dir: &Path, body: &str) -> std::path::PathBuf {
    let input = dir.join("seeds.md");
    std::fs::write(&input, body).unwrap();
    input
}

#[tokio::test]
async fn test_full_scrape_with_one_timeout() {
    let server = MockServer::start().await;
    mount_machine_page(&server).await;
    Mock::given(method("GET"))
        .and(path("/jihanki/2/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(MACHINE_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_seeds(
        dir.path(),
        &format!(
            "# Machines\n\n- {base}/jihanki/1/\n- ({base}/jihanki/2/)\n- {base}/jihanki/1/.\n",
            base = server.uri()
        ),
    );
    let output_dir = dir.path().join("output");

    let config = create_test_config(&server);
    let (result, json_path) = scrape_file(&input, &config, &output_dir).await.unwrap();

    assert_eq!(result.machines.len(), 1);
    assert_eq!(result.errors.len(), 1);

    let machine = &result.machines[0];
    assert_eq!(machine.source_id, "1");
    assert_eq!(machine.name.as_deref(), Some("Test Machine"));
    assert_eq!(machine.location.address.as_deref(), Some("東京都千代田区1-1"));
    assert_eq!(machine.location.coordinates(), Some((35.681, 139.767)));
    assert_eq!(machine.merchandise, vec!["ラーメン", "うどん"]);
    assert_eq!(machine.images.len(), 1);
    assert_eq!(machine.images[0].local_path.as_deref(), Some("images/1/1.jpg"));
    assert_eq!(
        std::fs::read(output_dir.join("images/1/1.jpg")).unwrap(),
        b"jpeg"
    );

    let error = &result.errors[0];
    assert_eq!(error.url, format!("{}/jihanki/2/", server.uri()));
    assert!(error.reason.starts_with("Failed to fetch page: "));

    assert_eq!(json_path, output_dir.join("machines.json"));
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(written["source"], server.address().to_string());
    assert_eq!(written["machines"][0]["name"], "Test Machine");
    assert_eq!(written["machines"][0]["images"][0]["local_path"], "images/1/1.jpg");
    assert_eq!(written["errors"][0]["url"], format!("{}/jihanki/2/", server.uri()));

    let summary = RunSummary::from_result(&result);
    assert_eq!(summary.total_urls, 2);
    assert_eq!(summary.images_downloaded, 1);
}

#[tokio::test]
async fn test_every_seed_url_is_accounted_for() {
    let server = MockServer::start().await;
    mount_machine_page(&server).await;
    Mock::given(method("GET"))
        .and(path("/jihanki/3/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let text = format!(
        "{base}/jihanki/1/ {base}/jihanki/3/ {base}/category/ramen/ https://elsewhere.example/jihanki/9/",
        base = server.uri()
    );

    let dir = TempDir::new().unwrap();
    let result = run_scrape(&text, &create_test_config(&server), dir.path())
        .await
        .unwrap();

    assert_eq!(result.processed(), 3);
    assert_eq!(result.machines.len(), 1);
    let reasons: Vec<&str> = result.errors.iter().map(|e| e.reason.as_str()).collect();
    assert!(reasons.contains(&"Could not extract machine ID"));
    assert!(reasons.iter().any(|r| r.starts_with("Failed to fetch page: ")));
}

#[tokio::test]
async fn test_rescraping_gives_same_records() {
    let server = MockServer::start().await;
    mount_machine_page(&server).await;

    let config = create_test_config(&server);
    let urls = vec![format!("{}/jihanki/1/", server.uri())];

    let first_dir = TempDir::new().unwrap();
    let first = Coordinator::new(&config, first_dir.path())
        .unwrap()
        .run(&urls)
        .await;

    let second_dir = TempDir::new().unwrap();
    let second = Coordinator::new(&config, second_dir.path())
        .unwrap()
        .run(&urls)
        .await;

    assert_eq!(first.machines, second.machines);
    assert_eq!(first.errors, second.errors);
}

#[tokio::test]
async fn test_seed_file_without_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_seeds(dir.path(), "Nothing here but https://elsewhere.example/jihanki/1/\n");
    let output_dir = dir.path().join("output");

    let (result, json_path) = scrape_file(&input, &create_test_config(&server), &output_dir)
        .await
        .unwrap();

    assert!(result.machines.is_empty());
    assert!(result.errors.is_empty());
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(written["machines"].as_array().unwrap().len(), 0);
}

//! The GitHub REST client against a mock server.

use crate::common::{MockGithub, OWNER, REPO};
use std::time::Duration;
use updraft::core::ResultKind;
use updraft::github::{GithubClient, ReleaseSource, Repository};
use updraft::test_utils::ReleaseFixture;
use updraft::version::{Qualifier, VersionTag};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn repository() -> Repository {
    Repository::new(OWNER, REPO).unwrap()
}

#[tokio::test]
async fn test_latest_release_is_decoded() {
    let github = MockGithub::start().await;
    github
        .mount_latest(&ReleaseFixture::new("v3.2.0").asset("app-win-x64.zip", "https://cdn.example/app.zip"))
        .await;

    let client = GithubClient::from_settings(&github.settings()).unwrap();
    let release = client.latest_release(&repository()).await.unwrap();

    assert_eq!(release.tag_name, "v3.2.0");
    assert_eq!(release.version_tag().unwrap(), VersionTag::new(3, 2, 0));
    assert_eq!(release.archive_url(Some("win-x64")), Some("https://cdn.example/app.zip"));
    assert!(release.published_at.is_some());
}

#[tokio::test]
async fn test_required_headers_are_sent() {
    let github = MockGithub::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/releases/latest")))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ReleaseFixture::new("v1.0.0").to_json()))
        .expect(1)
        .mount(&github.server)
        .await;

    let mut settings = github.settings();
    settings.github_token = Some("secret-token".to_string());
    let client = GithubClient::from_settings(&settings).unwrap();

    client.latest_release(&repository()).await.unwrap();
}

#[tokio::test]
async fn test_release_by_tag() {
    let github = MockGithub::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/releases/tags/v2.0.0")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ReleaseFixture::new("v2.0.0").to_json()))
        .mount(&github.server)
        .await;

    let client = GithubClient::from_settings(&github.settings()).unwrap();
    let release = client.release_by_tag(&repository(), "v2.0.0").await.unwrap();
    assert_eq!(release.tag_name, "v2.0.0");
}

#[tokio::test]
async fn test_latest_including_prereleases_skips_drafts() {
    let github = MockGithub::start().await;
    github
        .mount_releases(&[
            ReleaseFixture::new("v5.0.0").draft(true),
            ReleaseFixture::new("nightly"),
            ReleaseFixture::new("v4.0.0").prerelease(true),
            ReleaseFixture::new("v3.2.0"),
        ])
        .await;

    let client = GithubClient::from_settings(&github.settings()).unwrap();
    let release = client.latest_release_including_prereleases(&repository()).await.unwrap();

    assert_eq!(release.tag_name, "v4.0.0");
    assert_eq!(release.version_tag().unwrap().qualifier, Qualifier::Preview);
}

#[tokio::test]
async fn test_not_found_is_http_status() {
    let github = MockGithub::start().await;
    github.mount_status(&format!("/repos/{OWNER}/{REPO}/releases/latest"), 404).await;

    let client = GithubClient::from_settings(&github.settings()).unwrap();
    let err = client.latest_release(&repository()).await.unwrap_err();

    assert_eq!(err.kind(), ResultKind::HttpStatus);
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_malformed_body() {
    let github = MockGithub::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/releases/latest")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&github.server)
        .await;

    let client = GithubClient::from_settings(&github.settings()).unwrap();
    let err = client.latest_release(&repository()).await.unwrap_err();
    assert_eq!(err.kind(), ResultKind::MalformedResponse);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let github = MockGithub::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/releases/latest")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ReleaseFixture::new("v1.0.0").to_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&github.server)
        .await;

    let mut settings = github.settings();
    settings.timeout = Duration::from_millis(200);
    let client = GithubClient::from_settings(&settings).unwrap();

    let err = client.latest_release(&repository()).await.unwrap_err();
    assert_eq!(err.kind(), ResultKind::ServerTimeout);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = GithubClient::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client.latest_release(&repository()).await.unwrap_err();
    assert!(matches!(err.kind(), ResultKind::NetworkError | ResultKind::ServerTimeout), "{err}");
}

use std::cmp::Ordering;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::errors::{LaunchError, Result};

pub const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/jun-eau/Slipstream/releases/latest";
pub const RELEASES_PAGE_URL: &str = "https://github.com/jun-eau/Slipstream/releases/latest";

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

/// Compare `v1.5.1`-style versions component by component.
///
/// Components are compared numerically; a missing component counts as 0, so
/// `v1.5` equals `v1.5.0`.
pub fn is_newer_version(current: &str, latest: &str) -> bool {
    fn parts(version: &str) -> Vec<u64> {
        version
            .trim()
            .trim_start_matches(['v', 'V'])
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    }

    let (current, latest) = (parts(current), parts(latest));
    let len = current.len().max(latest.len());
    for i in 0..len {
        let c = current.get(i).copied().unwrap_or(0);
        let l = latest.get(i).copied().unwrap_or(0);
        match l.cmp(&c) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }
    false
}

/// Asks the release feed whether a newer launcher build exists
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    current_version: String,
    feed_url: String,
    http: Client,
}

impl UpdateChecker {
    pub fn new(current_version: impl Into<String>, feed_url: impl Into<String>) -> Result<Self> {
        let current_version = current_version.into();
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(format!("Slipstream/{}", current_version))
            .build()?;

        Ok(Self {
            current_version,
            feed_url: feed_url.into(),
            http,
        })
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    #[instrument(skip(self))]
    pub async fn latest_version(&self) -> Result<String> {
        let response = self.http.get(&self.feed_url).send().await?;
        if !response.status().is_success() {
            return Err(LaunchError::UpdateStatus(response.status()));
        }

        let release: GitHubRelease = response.json().await?;
        Ok(release.tag_name)
    }

    /// The version the user should be told about, if any.
    ///
    /// Returns `None` when up to date or when `last_notified` already names the latest
    /// release, so each release is announced once.
    #[instrument(skip(self))]
    pub async fn check(&self, last_notified: Option<&str>) -> Result<Option<String>> {
        info!("Checking for application updates");
        let latest = self.latest_version().await?;
        info!(
            "Current version: {}, Latest version: {}",
            self.current_version, latest
        );

        if !is_newer_version(&self.current_version, &latest) {
            info!("Application is up to date");
            return Ok(None);
        }

        if last_notified == Some(latest.as_str()) {
            debug!("Already notified user about version {}", latest);
            return Ok(None);
        }

        info!("A new version is available: {}", latest);
        Ok(Some(latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_version_comparison() {
        assert!(is_newer_version("v1.5.1", "v1.6.0"));
        assert!(is_newer_version("v1.5.1", "v1.5.2"));
        assert!(is_newer_version("v1.9.0", "v1.10.0"));
        assert!(is_newer_version("1.5", "v1.5.1"));
        assert!(!is_newer_version("v1.5.1", "v1.5.1"));
        assert!(!is_newer_version("v1.5.1", "v1.5"));
        assert!(!is_newer_version("v1.10.0", "v1.9.9"));
    }

    async fn feed(tag: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tag_name": tag })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_newer_release_is_reported_once() {
        let server = feed("v1.6.0").await;
        let checker =
            UpdateChecker::new("v1.5.1", format!("{}/releases/latest", server.uri())).unwrap();

        assert_eq!(checker.check(None).await.unwrap().as_deref(), Some("v1.6.0"));
        assert_eq!(checker.check(Some("v1.6.0")).await.unwrap(), None);
        assert_eq!(
            checker.check(Some("v1.5.9")).await.unwrap().as_deref(),
            Some("v1.6.0")
        );
    }

    #[tokio::test]
    async fn test_up_to_date() {
        let server = feed("v1.5.1").await;
        let checker =
            UpdateChecker::new("v1.5.1", format!("{}/releases/latest", server.uri())).unwrap();

        assert_eq!(checker.check(None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_feed_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let checker =
            UpdateChecker::new("v1.5.1", format!("{}/releases/latest", server.uri())).unwrap();

        let err = checker.check(None).await.unwrap_err();

        assert!(matches!(err, LaunchError::UpdateStatus(status) if status.as_u16() == 403));
    }
}

use octocrab::{Octocrab, Page};
use serde::Serialize;
use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::pager::find_previous_release;
use crate::registry::{Release, ReleasePage, ReleasePages, ReleaseRegistry};

pub const DEFAULT_OWNER: &str = "gohugoio";
pub const DEFAULT_REPO: &str = "hugo";

/// GitHub caps `per_page` at 100.
pub const MAX_PER_PAGE: u8 = 100;

/// Release registry backed by the GitHub REST API of one repository.
pub struct GitHubRegistry {
    octocrab: Octocrab,
    owner: String,
    repo: String,
    per_page: u8,
}

#[derive(Serialize)]
struct ListParams {
    page: u32,
    per_page: u8,
}

impl GitHubRegistry {
    pub fn new(owner: &str, repo: &str) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .build()
            .map_err(|source| ResolveError::RegistryUnavailable {
                operation: "building the GitHub client".to_string(),
                source,
            })?;
        Ok(Self::with_client(octocrab, owner, repo))
    }

    /// Create a registry talking to another API root, e.g. a local test server.
    pub fn with_base_uri(base_uri: &str, owner: &str, repo: &str) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .base_uri(base_uri)
            .and_then(|builder| builder.build())
            .map_err(|source| ResolveError::RegistryUnavailable {
                operation: format!("building a GitHub client for {base_uri}"),
                source,
            })?;
        Ok(Self::with_client(octocrab, owner, repo))
    }

    pub fn with_client(octocrab: Octocrab, owner: &str, repo: &str) -> Self {
        Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
            per_page: MAX_PER_PAGE,
        }
    }

    /// Number of releases requested per page, clamped to `1..=100`.
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    fn route(&self, suffix: &str) -> String {
        format!("/repos/{}/{}/releases{}", self.owner, self.repo, suffix)
    }

    /// A 404 means the release does not exist; anything else is a registry failure.
    fn lookup_error(&self, tag: &str, source: octocrab::Error) -> ResolveError {
        let missing = matches!(
            &source,
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
        );
        if missing {
            ResolveError::ReleaseNotFound {
                tag: tag.to_string(),
            }
        } else {
            ResolveError::RegistryUnavailable {
                operation: format!("fetching release {tag} of {}/{}", self.owner, self.repo),
                source,
            }
        }
    }
}

/// The `page` parameter of a `Link: rel="next"` target's query string.
fn page_param(query: Option<&str>) -> Option<u32> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[async_trait::async_trait]
impl ReleasePages for GitHubRegistry {
    async fn list_releases(&self, page: u32) -> Result<ReleasePage> {
        debug!("Listing releases page {} for {}/{}", page, self.owner, self.repo);
        let params = ListParams {
            page,
            per_page: self.per_page,
        };
        let listed: Page<Release> = self
            .octocrab
            .get(self.route(""), Some(&params))
            .await
            .map_err(|source| ResolveError::RegistryUnavailable {
                operation: format!(
                    "listing releases page {page} of {}/{}",
                    self.owner, self.repo
                ),
                source,
            })?;

        let next_page = listed
            .next
            .as_ref()
            .map(|uri| page_param(uri.query()).unwrap_or(page + 1));
        Ok(ReleasePage::new(listed.items, next_page))
    }
}

#[async_trait::async_trait]
impl ReleaseRegistry for GitHubRegistry {
    async fn latest_release(&self) -> Result<Release> {
        debug!("Fetching latest release for {}/{}", self.owner, self.repo);
        self.octocrab
            .get(self.route("/latest"), None::<&()>)
            .await
            .map_err(|source| ResolveError::RegistryUnavailable {
                operation: format!("fetching the latest release of {}/{}", self.owner, self.repo),
                source,
            })
    }

    async fn release_by_tag(&self, tag: &str) -> Result<Release> {
        debug!("Fetching release '{}' for {}/{}", tag, self.owner, self.repo);
        self.octocrab
            .get(self.route(&format!("/tags/{tag}")), None::<&()>)
            .await
            .map_err(|source| self.lookup_error(tag, source))
    }

    async fn previous_release(&self, tag: &str) -> Result<Release> {
        let pointer = self.release_by_tag(tag).await?;
        find_previous_release(self, &pointer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Platform;
    use crate::resolver::Resolver;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn release_json(tag: &str, created_at: &str) -> serde_json::Value {
        json!({
            "name": tag,
            "tag_name": tag,
            "created_at": created_at,
            "assets": [{
                "name": format!("hugo_{}_Linux-64bit.tar.gz", tag.trim_start_matches('v')),
                "browser_download_url": format!(
                    "https://github.com/gohugoio/hugo/releases/download/{tag}/hugo_{}_Linux-64bit.tar.gz",
                    tag.trim_start_matches('v')
                ),
                "size": 1024
            }]
        })
    }

    fn page_query(page: u32) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), page.to_string()),
            Matcher::UrlEncoded("per_page".into(), "2".into()),
        ])
    }

    #[tokio::test]
    async fn test_latest_release() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/gohugoio/hugo/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_json("v0.80.0", "2020-12-31T12:00:00Z").to_string())
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let release = registry.latest_release().await.unwrap();

        mock.assert_async().await;
        assert_eq!(release.name(), "v0.80.0");
        assert_eq!(release.assets().len(), 1);
        assert_eq!(release.assets()[0].size, 1024);
    }

    fn github_error(message: &str) -> String {
        json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        })
        .to_string()
    }

    #[test]
    fn test_page_param() {
        assert_eq!(page_param(Some("page=2&per_page=100")), Some(2));
        assert_eq!(page_param(Some("per_page=100&page=17")), Some(17));
        assert_eq!(page_param(Some("per_page=100")), None);
        assert_eq!(page_param(Some("page=next")), None);
        assert_eq!(page_param(None), None);
    }

    #[tokio::test]
    async fn test_latest_release_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/gohugoio/hugo/releases/latest")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(github_error("Server Error"))
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let error = registry.latest_release().await.unwrap_err();

        assert!(matches!(error, ResolveError::RegistryUnavailable { .. }));
        let message = error.to_string();
        assert!(message.contains("500"), "{message}");
        assert!(message.contains("Server Error"), "{message}");
    }

    #[tokio::test]
    async fn test_missing_latest_release_is_a_registry_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/gohugoio/hugo/releases/latest")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(github_error("Not Found"))
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let result = registry.latest_release().await;

        assert!(matches!(result, Err(ResolveError::RegistryUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_list_releases_bad_gateway() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/gohugoio/hugo/releases")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_header("content-type", "application/json")
            .with_body(github_error("Bad Gateway"))
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let result = registry.list_releases(1).await;

        assert!(matches!(
            result,
            Err(ResolveError::RegistryUnavailable { ref operation, .. }) if operation.contains("page 1")
        ));
    }

    #[tokio::test]
    async fn test_failing_page_fails_resolution() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/gohugoio/hugo/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_json("v0.80.0", "2020-12-31T12:00:00Z").to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/repos/gohugoio/hugo/releases")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_header("content-type", "application/json")
            .with_body(github_error("Bad Gateway"))
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let mut resolver = Resolver::new(registry, Platform::new("linux", "amd64"));
        let result = resolver.resolve("0.79").await;

        assert!(matches!(result, Err(ResolveError::RegistryUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_release_by_tag_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/gohugoio/hugo/releases/tags/v9.9.9")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found", "documentation_url": "https://docs.github.com/rest"}"#)
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo").unwrap();
        let result = registry.release_by_tag("v9.9.9").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ResolveError::ReleaseNotFound { ref tag }) if tag == "v9.9.9"
        ));
    }

    #[tokio::test]
    async fn test_list_releases_follows_link_header() {
        let mut server = Server::new_async().await;
        let next = format!(
            "<{}/repos/gohugoio/hugo/releases?page=2&per_page=2>; rel=\"next\"",
            server.url()
        );
        let first = server
            .mock("GET", "/repos/gohugoio/hugo/releases")
            .match_query(page_query(1))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("link", next.as_str())
            .with_body(
                json!([
                    release_json("v0.80.0", "2020-12-31T12:00:00Z"),
                    release_json("v0.79.1", "2020-12-19T12:00:00Z"),
                ])
                .to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repos/gohugoio/hugo/releases")
            .match_query(page_query(2))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([release_json("v0.79.0", "2020-11-27T12:00:00Z")]).to_string())
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo")
            .unwrap()
            .with_per_page(2);

        let page = registry.list_releases(1).await.unwrap();
        assert_eq!(page.releases.len(), 2);
        assert_eq!(page.next_page, Some(2));

        let page = registry.list_releases(2).await.unwrap();
        assert_eq!(page.oldest().map(Release::name), Some("v0.79.0"));
        assert_eq!(page.next_page, None);

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_previous_release_uses_listing() {
        let mut server = Server::new_async().await;
        let by_tag = server
            .mock("GET", "/repos/gohugoio/hugo/releases/tags/v0.79.1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_json("v0.79.1", "2020-12-19T12:00:00Z").to_string())
            .create_async()
            .await;
        let listing = server
            .mock("GET", "/repos/gohugoio/hugo/releases")
            .match_query(page_query(1))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    release_json("v0.80.0", "2020-12-31T12:00:00Z"),
                    release_json("v0.79.1", "2020-12-19T12:00:00Z"),
                    release_json("v0.79.0", "2020-11-27T12:00:00Z"),
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let registry = GitHubRegistry::with_base_uri(&server.url(), "gohugoio", "hugo")
            .unwrap()
            .with_per_page(2);
        let previous = registry.previous_release("v0.79.1").await.unwrap();

        by_tag.assert_async().await;
        listing.assert_async().await;
        assert_eq!(previous.name(), "v0.79.0");
    }
}

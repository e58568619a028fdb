//! Best-effort retrieval of the catalog search index.
//!
//! The load runs once, in the background, and never blocks input handling.
//! Whatever happens, the caller gets a `Result` it hands to the widget.

use std::path::PathBuf;

use tokio::task::JoinHandle;
use tracing::info;
use url::Url;

use crate::error::IndexLoadError;
use crate::proto::SearchIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexSource {
    Url(Url),
    File(PathBuf),
}

impl IndexSource {
    /// Resolves an index location. Absolute `http(s)` URLs are used as-is,
    /// relative locations are joined onto `page` when one is given, and
    /// anything else is treated as a file path.
    pub fn resolve(location: &str, page: Option<&Url>) -> Result<Self, IndexLoadError> {
        let invalid = |source| IndexLoadError::InvalidLocation {
            location: location.to_string(),
            source,
        };
        if let Ok(url) = Url::parse(location) {
            return Ok(Self::from_url(url));
        }
        match page {
            Some(page) => page.join(location).map(Self::from_url).map_err(invalid),
            None => Ok(Self::File(PathBuf::from(location))),
        }
    }

    fn from_url(url: Url) -> Self {
        if url.scheme() == "file"
            && let Ok(path) = url.to_file_path()
        {
            return Self::File(path);
        }
        Self::Url(url)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Fetches and decodes the index from `source`.
pub async fn load_index(
    source: &IndexSource,
    http: &reqwest::Client,
) -> Result<SearchIndex, IndexLoadError> {
    let origin = source.describe();
    let bytes = match source {
        IndexSource::Url(url) => {
            let network = |source| IndexLoadError::Network {
                url: origin.clone(),
                source,
            };
            let resp = http.get(url.clone()).send().await.map_err(network)?;
            if !resp.status().is_success() {
                return Err(IndexLoadError::Status {
                    url: origin,
                    status: resp.status().as_u16(),
                });
            }
            resp.bytes().await.map_err(network)?.to_vec()
        }
        IndexSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| IndexLoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };
    let index: SearchIndex =
        serde_json::from_slice(&bytes).map_err(|source| IndexLoadError::Malformed {
            origin: origin.clone(),
            source,
        })?;
    info!("loaded search index with {} records from {origin}", index.len());
    Ok(index)
}

/// One-shot loader. Consuming `spawn` makes a second attempt impossible.
pub struct IndexLoader {
    source: IndexSource,
    http: reqwest::Client,
}

impl IndexLoader {
    pub fn new(source: IndexSource, http: reqwest::Client) -> Self {
        Self { source, http }
    }

    /// Starts the load on the runtime and returns immediately.
    pub fn spawn(self) -> JoinHandle<Result<SearchIndex, IndexLoadError>> {
        tokio::spawn(async move { load_index(&self.source, &self.http).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    const INDEX: &str = r#"{
        "items": [
            {
                "name": "Manipulative Maiden",
                "qualities": ["cunning", "charming"],
                "group": "Manipulators",
                "groupSlug": "manipulators",
                "slug": "maiden"
            }
        ]
    }"#;

    #[test]
    fn relative_location_joins_page_url() {
        let page = Url::parse("https://example.org/archetypes/manipulators/maiden/").unwrap();
        let source = IndexSource::resolve("search.json", Some(&page)).unwrap();
        assert_eq!(
            source,
            IndexSource::Url(
                Url::parse("https://example.org/archetypes/manipulators/maiden/search.json")
                    .unwrap()
            )
        );
    }

    #[test]
    fn plain_location_without_page_is_a_file() {
        let source = IndexSource::resolve("docs/search.json", None).unwrap();
        assert_eq!(source, IndexSource::File(PathBuf::from("docs/search.json")));
    }

    #[test]
    fn absolute_url_ignores_page() {
        let page = Url::parse("https://example.org/a/").unwrap();
        let source = IndexSource::resolve("http://cdn.test/search.json", Some(&page)).unwrap();
        assert_eq!(source.describe(), "http://cdn.test/search.json");
    }

    #[tokio::test]
    async fn loads_index_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("search.json");
        std::fs::write(&file, INDEX).unwrap();

        let index = load_index(&IndexSource::File(file), &reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.items[0].slug, "maiden");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = IndexSource::File(dir.path().join("search.json"));
        let err = load_index(&source, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexLoadError::Io { .. }));
    }

    #[tokio::test]
    async fn loads_index_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/site/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
            .expect(1)
            .mount(&server)
            .await;

        let page = Url::parse(&format!("{}/site/", server.uri())).unwrap();
        let source = IndexSource::resolve("search.json", Some(&page)).unwrap();
        let index = IndexLoader::new(source, reqwest::Client::new())
            .spawn()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.items[0].name, "Manipulative Maiden");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = IndexSource::resolve(&format!("{}/search.json", server.uri()), None).unwrap();
        let err = load_index(&source, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexLoadError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = IndexSource::resolve(&format!("{}/search.json", server.uri()), None).unwrap();
        let err = load_index(&source, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexLoadError::Malformed { .. }));
    }
}

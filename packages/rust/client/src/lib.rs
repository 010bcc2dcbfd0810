//! Help Center retrieval operations: keyword search and single-article fetch.
//!
//! Each operation builds one request ([`request::RequestBuilder`]), issues it
//! with `reqwest`, and projects the returned records
//! ([`projection::project`]). Search results never carry article bodies; a
//! single-article fetch carries the normalized body.
//!
//! Transport failures (connection errors, timeouts, non-2xx statuses,
//! undecodable bodies) surface as [`HelpCenterError::Request`] and are never
//! retried here.

pub mod projection;
pub mod request;

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use helpcenter_shared::{
    AppConfig, ArticleParams, ArticleResult, Credentials, HelpCenterError, RawArticle, Result,
    RetrievalDefaults, SearchParams, SearchResult,
};

pub use projection::{ARTICLE_FIELDS, BODY_FIELD, project};
pub use request::{ApiRequest, BasicAuth, Operation, RequestBuilder};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("helpcenter/", env!("CARGO_PKG_VERSION"));

/// Default timeout in seconds for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Client options
// ---------------------------------------------------------------------------

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// `GET /articles/search.json` response. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<RawArticle>>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    next_page: Option<String>,
    #[serde(default)]
    previous_page: Option<String>,
}

/// `GET /articles/{id}.json` response.
#[derive(Debug, Default, Deserialize)]
struct ArticleResponse {
    #[serde(default)]
    article: Option<RawArticle>,
}

// ---------------------------------------------------------------------------
// HelpCenterClient
// ---------------------------------------------------------------------------

/// Read-only client for one Help Center account.
///
/// Configuration is fixed at construction; the client holds no mutable state
/// and issues exactly one request per operation.
#[derive(Debug, Clone)]
pub struct HelpCenterClient {
    http: Client,
    requests: RequestBuilder,
}

impl HelpCenterClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(
        base_url: Url,
        credentials: &Credentials,
        defaults: RetrievalDefaults,
        opts: &ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            http: build_client(opts)?,
            requests: RequestBuilder::new(base_url, credentials, defaults),
        })
    }

    /// Create a client from loaded config and resolved credentials.
    pub fn from_config(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let opts = ClientOptions {
            timeout_secs: config.http.timeout_secs,
        };
        Self::new(
            config.base_url()?,
            credentials,
            config.retrieval_defaults(),
            &opts,
        )
    }

    /// Request builder used by this client.
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Keyword search. Results keep the remote ordering and carry no body.
    #[instrument(skip_all, fields(query = %params.query))]
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        let request = self.requests.search(params)?;
        info!(
            locale = request.query_value("locale").unwrap_or_default(),
            page = request.query_value("page").unwrap_or_default(),
            per_page = request.query_value("per_page").unwrap_or_default(),
            "searching help center articles"
        );

        let response: SearchResponse = self.execute(&request).await?;
        let results: Vec<_> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|raw| project(raw, false))
            .collect();

        info!(returned = results.len(), count = ?response.count, "search complete");

        Ok(SearchResult {
            results,
            count: response.count.unwrap_or_default(),
            next_page: response.next_page,
            previous_page: response.previous_page,
        })
    }

    /// Fetch one article, including its normalized body.
    #[instrument(skip_all, fields(id = params.id))]
    pub async fn get_article(&self, params: &ArticleParams) -> Result<ArticleResult> {
        let request = self.requests.article(params)?;
        info!(
            locale = request.query_value("locale").unwrap_or_default(),
            "fetching help center article"
        );

        let response: ArticleResponse = self.execute(&request).await?;
        let raw = response.article.unwrap_or_default();
        if raw.is_empty() {
            debug!("response carried no article record");
        }

        Ok(ArticleResult {
            article: project(raw, true),
        })
    }

    /// Issue `request` once and decode the JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        debug!(operation = %request.operation, url = %request.url, "sending request");

        let response = self
            .http
            .get(request.url.clone())
            .query(&request.query)
            .basic_auth(&request.auth.username, Some(&request.auth.password))
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %response.status(), "response received");
        Ok(response.json::<T>().await?)
    }
}

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &ClientOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| HelpCenterError::config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpcenter_shared::LenientNumber;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/api/v2/help_center/articles/search.json";

    fn client_for(server: &MockServer) -> HelpCenterClient {
        let base = Url::parse(&format!("{}/api/v2/help_center/", server.uri())).unwrap();
        let creds = Credentials::new("acme", "agent@acme.test", "tok");
        HelpCenterClient::new(
            base,
            &creds,
            RetrievalDefaults::default(),
            &ClientOptions::default(),
        )
        .unwrap()
    }

    fn article_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "url": format!("https://acme.zendesk.com/api/v2/help_center/en-us/articles/{id}.json"),
            "html_url": format!("https://acme.zendesk.com/hc/en-us/articles/{id}"),
            "author_id": 9001,
            "created_at": "2023-01-05T10:00:00Z",
            "updated_at": "2024-03-01T08:30:00Z",
            "title": title,
            "label_names": ["billing"],
            "section_id": 42,
            "vote_sum": 3,
            "body": "<p style=\"margin:0\">Long body</p>"
        })
    }

    #[tokio::test]
    async fn search_sends_defaults_and_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("query", "billing"))
            .and(query_param("locale", "en-us"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "20"))
            .and(basic_auth("agent@acme.test/token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [article_json(2, "Second"), article_json(1, "First")],
                "count": 2,
                "next_page": null,
                "previous_page": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search(&SearchParams::new("billing"))
            .await
            .unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.results.len(), 2);
        // Remote order is kept.
        assert_eq!(result.results[0].id(), Some(2));
        assert_eq!(result.results[1].title(), Some("First"));
        for article in &result.results {
            assert!(!article.contains("body"));
            assert!(!article.contains("section_id"));
            assert_eq!(article.len(), ARTICLE_FIELDS.len());
        }
    }

    #[tokio::test]
    async fn search_non_numeric_page_falls_back_to_first_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "count": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let params = SearchParams {
            query: "billing".into(),
            page: Some(LenientNumber::from("abc")),
            ..Default::default()
        };
        let result = client_for(&server).search(&params).await.unwrap();
        assert!(result.results.is_empty());
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn search_passes_cursors_through() {
        let server = MockServer::start().await;
        let next = "https://acme.zendesk.com/api/v2/help_center/articles/search.json?page=3&query=billing";
        let prev = "https://acme.zendesk.com/api/v2/help_center/articles/search.json?page=1&query=billing";

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("page", "2"))
            .and(query_param("locale", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [article_json(7, "Factures")],
                "count": 41,
                "next_page": next,
                "previous_page": prev
            })))
            .mount(&server)
            .await;

        let params = SearchParams {
            query: "billing".into(),
            locale: Some("fr".into()),
            page: Some(LenientNumber::from(2)),
            per_page: None,
        };
        let result = client_for(&server).search(&params).await.unwrap();
        assert_eq!(result.count, 41);
        assert_eq!(result.next_page.as_deref(), Some(next));
        assert_eq!(result.previous_page.as_deref(), Some(prev));
    }

    #[tokio::test]
    async fn search_tolerates_missing_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search(&SearchParams::new("billing"))
            .await
            .unwrap();
        assert_eq!(result, SearchResult::default());
    }

    #[tokio::test]
    async fn get_article_includes_normalized_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/42.json"))
            .and(query_param("locale", "en-us"))
            .and(basic_auth("agent@acme.test/token", "tok"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "article": article_json(42, "Billing FAQ") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .get_article(&ArticleParams::new(42))
            .await
            .unwrap();

        assert_eq!(result.article.id(), Some(42));
        assert_eq!(result.article.body(), Some("<p>Long body</p>"));
        assert!(!result.article.contains("vote_sum"));
        assert_eq!(result.article.len(), ARTICLE_FIELDS.len() + 1);
    }

    #[tokio::test]
    async fn get_article_missing_record_is_empty_projection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/5.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "article": null })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .get_article(&ArticleParams::new(5))
            .await
            .unwrap();
        assert!(result.article.is_empty());
    }

    #[tokio::test]
    async fn get_article_failure_propagates_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/999.json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_article(&ArticleParams::new(999))
            .await
            .unwrap_err();

        match err {
            HelpCenterError::Request(source) => {
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("expected Request error, got {other:?}"),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn server_error_is_request_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&SearchParams::new("billing"))
            .await
            .unwrap_err();
        assert!(err.is_request_failure());
    }

    #[tokio::test]
    async fn malformed_body_is_request_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_article(&ArticleParams::new(1))
            .await
            .unwrap_err();
        assert!(err.is_request_failure());
    }

    #[tokio::test]
    async fn connection_error_is_request_failure() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client
            .search(&SearchParams::new("billing"))
            .await
            .unwrap_err();
        assert!(err.is_request_failure());
    }
}

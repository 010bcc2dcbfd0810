//! MCP tool server exposing Help Center search and article fetch.
//!
//! Logging goes to stderr only; stdout carries the MCP protocol.

use helpcenter_client::HelpCenterClient;
use helpcenter_shared::{ArticleParams, LenientNumber, SearchParams};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Tool arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchArticlesRequest {
    /// Search keywords
    #[schemars(description = "Keywords to search Help Center articles for")]
    pub query: String,

    #[schemars(description = "Locale code such as en-us (defaults to the configured locale)")]
    pub locale: Option<String>,

    #[schemars(description = "Result page, starting at 1 (default: 1)")]
    pub page: Option<LenientNumber>,

    #[schemars(description = "Results per page (default: 20)")]
    pub per_page: Option<LenientNumber>,
}

impl From<SearchArticlesRequest> for SearchParams {
    fn from(request: SearchArticlesRequest) -> Self {
        Self {
            query: request.query,
            locale: request.locale,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetArticleRequest {
    #[schemars(description = "Numeric article id")]
    pub id: u64,

    #[schemars(description = "Locale code such as en-us (defaults to the configured locale)")]
    pub locale: Option<String>,
}

impl From<GetArticleRequest> for ArticleParams {
    fn from(request: GetArticleRequest) -> Self {
        Self {
            id: request.id,
            locale: request.locale,
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Help Center MCP service.
#[derive(Clone)]
pub struct HelpCenterService {
    client: HelpCenterClient,
    tool_router: ToolRouter<Self>,
}

impl HelpCenterService {
    pub fn new(client: HelpCenterClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    async fn run_search(&self, params: SearchParams) -> helpcenter_shared::Result<String> {
        params.validate()?;
        let result = self.client.search(&params).await?;
        Ok(to_json_text(&result))
    }

    async fn run_get_article(&self, params: ArticleParams) -> helpcenter_shared::Result<String> {
        let result = self.client.get_article(&params).await?;
        Ok(to_json_text(&result))
    }
}

#[tool_handler]
impl ServerHandler for HelpCenterService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Help Center lookup. Use 'search_articles' to find articles by keyword (results omit bodies), then 'get_article' with an id to read the cleaned article body.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

#[tool_router]
impl HelpCenterService {
    /// Keyword search over Help Center articles
    #[tool(description = "Search Help Center articles by keyword. Returns id, urls, author, timestamps, title and labels for each hit, plus total count and paging cursors. Bodies are not included.")]
    pub async fn search_articles(
        &self,
        Parameters(request): Parameters<SearchArticlesRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.run_search(request.into()).await))
    }

    /// Single article fetch
    #[tool(description = "Fetch one Help Center article by id, including its body HTML with editor styling and empty markup removed.")]
    pub async fn get_article(
        &self,
        Parameters(request): Parameters<GetArticleRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.run_get_article(request.into()).await))
    }
}

fn to_json_text<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn tool_result(outcome: helpcenter_shared::Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            warn!(error = %e, "tool call failed");
            CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
        }
    }
}

/// Serve the tools over stdio until the client disconnects.
pub(crate) async fn serve(client: HelpCenterClient) -> color_eyre::eyre::Result<()> {
    info!("starting Help Center MCP server");

    let server = HelpCenterService::new(client).serve(stdio()).await?;
    server.waiting().await?;

    info!("Help Center MCP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpcenter_client::ClientOptions;
    use helpcenter_shared::{Credentials, RetrievalDefaults};
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> HelpCenterService {
        let base = Url::parse(&format!("{}/api/v2/help_center/", server.uri())).unwrap();
        let creds = Credentials::new("acme", "agent@acme.test", "tok");
        let client = HelpCenterClient::new(
            base,
            &creds,
            RetrievalDefaults::default(),
            &ClientOptions::default(),
        )
        .unwrap();
        HelpCenterService::new(client)
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn search_request_accepts_text_paging() {
        let request: SearchArticlesRequest =
            serde_json::from_value(json!({ "query": "billing", "page": "abc", "per_page": 5 }))
                .unwrap();
        let params = SearchParams::from(request);
        assert_eq!(params.page, Some(LenientNumber::Text("abc".into())));
        assert_eq!(params.per_page, Some(LenientNumber::Integer(5)));
    }

    #[tokio::test]
    async fn search_tool_returns_projected_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/search.json"))
            .and(query_param("query", "billing"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": 3, "title": "Invoices", "body": "<p>long</p>", "draft": false }],
                "count": 1,
                "next_page": null,
                "previous_page": null
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let request = SearchArticlesRequest {
            query: "billing".into(),
            locale: None,
            page: Some(LenientNumber::from("abc")),
            per_page: None,
        };
        let result = service.search_articles(Parameters(request)).await.unwrap();

        assert!(!result.is_error.unwrap_or(false));
        let value: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0], json!({ "id": 3, "title": "Invoices" }));
    }

    #[tokio::test]
    async fn empty_query_is_a_tool_error() {
        let server = MockServer::start().await;
        let service = service_for(&server);

        let request = SearchArticlesRequest {
            query: "  ".into(),
            locale: None,
            page: None,
            per_page: None,
        };
        let result = service.search_articles(Parameters(request)).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("must not be empty"));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn article_failure_is_a_tool_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/999.json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server);
        let request = GetArticleRequest {
            id: 999,
            locale: None,
        };
        let result = service.get_article(Parameters(request)).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("request failed"));
    }

    #[tokio::test]
    async fn article_tool_returns_cleaned_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/help_center/articles/8.json"))
            .and(query_param("locale", "de"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "article": { "id": 8, "title": "Rechnung", "body": "<span class=\"a\">Hallo</span>" }
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let request = GetArticleRequest {
            id: 8,
            locale: Some("de".into()),
        };
        let result = service.get_article(Parameters(request)).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["article"]["body"], "Hallo");
        assert_eq!(value["article"]["id"], 8);
    }
}

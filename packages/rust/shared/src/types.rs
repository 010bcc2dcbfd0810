//! Core domain types for Help Center retrieval.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HelpCenterError, Result};

/// Default locale used when neither config nor caller names one.
pub const DEFAULT_LOCALE: &str = "en-us";

/// Default result page.
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of results per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// API credentials for one Help Center account. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    subdomain: String,
    email: String,
    api_token: String,
}

impl Credentials {
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    /// Account subdomain, e.g. `acme` for `acme.zendesk.com`.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Account identifier (agent email).
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Basic-auth username for API-token authentication: `{email}/token`.
    pub fn auth_username(&self) -> String {
        format!("{}/token", self.email)
    }

    /// Basic-auth password.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RetrievalDefaults
// ---------------------------------------------------------------------------

/// Per-call defaults applied when a caller omits locale or paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalDefaults {
    pub locale: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for RetrievalDefaults {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.into(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

// ---------------------------------------------------------------------------
// Caller parameters
// ---------------------------------------------------------------------------

/// A paging value as supplied by a caller: a JSON number or free text.
///
/// Anything that is not a positive whole number resolves to the default
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum LenientNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    /// Resolve to a positive integer, or `default` when that is not possible.
    pub fn resolve(&self, default: u32) -> u32 {
        let parsed = match self {
            Self::Integer(n) => u32::try_from(*n).ok(),
            Self::Float(f) if f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX) => {
                Some(*f as u32)
            }
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse::<u32>().ok(),
        };

        match parsed {
            Some(n) if n > 0 => n,
            _ => {
                tracing::debug!(value = ?self, default, "non-numeric paging value, using default");
                default
            }
        }
    }
}

impl From<u32> for LenientNumber {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<&str> for LenientNumber {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for LenientNumber {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parameters of a keyword search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub page: Option<LenientNumber>,
    #[serde(default)]
    pub per_page: Option<LenientNumber>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Reject a missing or blank query. Adapters call this before searching.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(HelpCenterError::validation("search query must not be empty"));
        }
        Ok(())
    }
}

/// Parameters of a single-article fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleParams {
    pub id: u64,
    #[serde(default)]
    pub locale: Option<String>,
}

impl ArticleParams {
    pub fn new(id: u64) -> Self {
        Self { id, locale: None }
    }
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

/// One article exactly as the remote service returned it.
pub type RawArticle = Map<String, Value>;

/// An article reduced to the allow-listed fields.
///
/// Fields missing from the source record are absent here too, never `null`
/// placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectedArticle(Map<String, Value>);

impl ProjectedArticle {
    /// Wrap an already-projected field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.0.get("body").and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One page of keyword-search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub results: Vec<ProjectedArticle>,
    pub count: u64,
    pub next_page: Option<String>,
    pub previous_page: Option<String>,
}

/// Result of a single-article fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub article: ProjectedArticle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_token() {
        let creds = Credentials::new("acme", "agent@acme.test", "s3cret");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("acme"));
        assert!(!dbg.contains("s3cret"));
        assert_eq!(creds.auth_username(), "agent@acme.test/token");
    }

    #[test]
    fn lenient_number_resolves_numbers_and_text() {
        assert_eq!(LenientNumber::from(3).resolve(1), 3);
        assert_eq!(LenientNumber::from("7").resolve(1), 7);
        assert_eq!(LenientNumber::from(" 12 ").resolve(1), 12);
        assert_eq!(LenientNumber::Float(4.0).resolve(1), 4);
    }

    #[test]
    fn lenient_number_falls_back_on_garbage() {
        assert_eq!(LenientNumber::from("abc").resolve(1), 1);
        assert_eq!(LenientNumber::from("").resolve(20), 20);
        assert_eq!(LenientNumber::Integer(0).resolve(1), 1);
        assert_eq!(LenientNumber::Integer(-5).resolve(20), 20);
        assert_eq!(LenientNumber::Float(2.5).resolve(1), 1);
    }

    #[test]
    fn lenient_number_deserializes_untagged() {
        let n: LenientNumber = serde_json::from_str("2").expect("int");
        assert_eq!(n, LenientNumber::Integer(2));
        let t: LenientNumber = serde_json::from_str("\"abc\"").expect("text");
        assert_eq!(t, LenientNumber::Text("abc".into()));
    }

    #[test]
    fn search_params_validation() {
        assert!(SearchParams::new("billing").validate().is_ok());
        assert!(SearchParams::new("").validate().is_err());
        assert!(SearchParams::new("   ").validate().is_err());
    }

    #[test]
    fn search_params_from_json_with_text_page() {
        let params: SearchParams =
            serde_json::from_str(r#"{"query":"billing","page":"abc"}"#).expect("parse");
        assert_eq!(params.page, Some(LenientNumber::Text("abc".into())));
        assert!(params.locale.is_none());
        assert!(params.per_page.is_none());
    }

    #[test]
    fn search_result_serializes_cursors_as_null() {
        let result = SearchResult::default();
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["count"], 0);
        assert!(json["next_page"].is_null());
        assert!(json["results"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn projected_article_is_transparent() {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(42));
        fields.insert("title".into(), Value::from("Billing FAQ"));
        let article = ProjectedArticle::from_fields(fields);

        let json = serde_json::to_string(&article).expect("serialize");
        assert_eq!(json, r#"{"id":42,"title":"Billing FAQ"}"#);
        assert_eq!(article.id(), Some(42));
        assert_eq!(article.title(), Some("Billing FAQ"));
        assert!(article.body().is_none());
    }
}

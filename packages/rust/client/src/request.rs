//! Outbound request descriptors for the Help Center articles API.
//!
//! Building a request performs no I/O: it resolves the endpoint URL, merges
//! caller parameters over the configured defaults, and attaches basic-auth
//! credentials.

use helpcenter_shared::{
    ArticleParams, Credentials, HelpCenterError, Result, RetrievalDefaults, SearchParams,
};
use url::Url;

/// Which endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Article,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Article => write!(f, "article"),
        }
    }
}

/// HTTP basic-auth pair. `Debug` never shows the password.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl From<&Credentials> for BasicAuth {
    fn from(creds: &Credentials) -> Self {
        Self {
            username: creds.auth_username(),
            password: creds.api_token().to_string(),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fully resolved GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub operation: Operation,
    pub url: Url,
    pub query: Vec<(&'static str, String)>,
    pub auth: BasicAuth,
}

impl ApiRequest {
    /// Look up a query parameter by name.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Turns caller parameters into [`ApiRequest`]s.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    auth: BasicAuth,
    defaults: RetrievalDefaults,
}

impl RequestBuilder {
    /// `base_url` is the Help Center API root and should end with `/`.
    pub fn new(base_url: Url, credentials: &Credentials, defaults: RetrievalDefaults) -> Self {
        Self {
            base_url,
            auth: BasicAuth::from(credentials),
            defaults,
        }
    }

    pub fn defaults(&self) -> &RetrievalDefaults {
        &self.defaults
    }

    /// `GET {base}/articles/search.json?query=&locale=&page=&per_page=`
    ///
    /// The query is passed through as given; rejecting a blank query is the
    /// caller's job.
    pub fn search(&self, params: &SearchParams) -> Result<ApiRequest> {
        let page = params
            .page
            .as_ref()
            .map_or(self.defaults.page, |p| p.resolve(self.defaults.page));
        let per_page = params
            .per_page
            .as_ref()
            .map_or(self.defaults.per_page, |p| p.resolve(self.defaults.per_page));

        Ok(ApiRequest {
            operation: Operation::Search,
            url: self.endpoint("articles/search.json")?,
            query: vec![
                ("query", params.query.clone()),
                ("locale", self.locale(params.locale.as_deref())),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
            auth: self.auth.clone(),
        })
    }

    /// `GET {base}/articles/{id}.json?locale=`
    pub fn article(&self, params: &ArticleParams) -> Result<ApiRequest> {
        Ok(ApiRequest {
            operation: Operation::Article,
            url: self.endpoint(&format!("articles/{}.json", params.id))?,
            query: vec![("locale", self.locale(params.locale.as_deref()))],
            auth: self.auth.clone(),
        })
    }

    fn locale(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.defaults.locale.as_str())
            .to_string()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| {
            HelpCenterError::config(format!("invalid endpoint '{path}' on {}: {e}", self.base_url))
        })
    }
}

//! Shared types, error model, and configuration for the Help Center tools.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`HelpCenterError`]: the unified error type
//! - Domain types ([`Credentials`], [`RetrievalDefaults`], [`ProjectedArticle`], [`SearchResult`])
//! - Configuration ([`AppConfig`], overrides, credential resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConfigOverrides, DefaultsConfig, HttpConfig, ZendeskConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_credentials,
};
pub use error::{HelpCenterError, Result};
pub use types::{
    ArticleParams, ArticleResult, Credentials, DEFAULT_LOCALE, DEFAULT_PAGE, DEFAULT_PER_PAGE,
    LenientNumber, ProjectedArticle, RawArticle, RetrievalDefaults, SearchParams, SearchResult,
};

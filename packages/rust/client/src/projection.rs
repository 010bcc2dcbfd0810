//! Allow-list projection of raw article records.

use helpcenter_shared::{ProjectedArticle, RawArticle};
use serde_json::{Map, Value};

/// Fields copied verbatim from every raw article.
pub const ARTICLE_FIELDS: [&str; 8] = [
    "id",
    "url",
    "html_url",
    "author_id",
    "created_at",
    "updated_at",
    "title",
    "label_names",
];

/// Field carrying the article HTML, only kept for single-article fetches.
pub const BODY_FIELD: &str = "body";

/// Reduce `raw` to [`ARTICLE_FIELDS`], plus the normalized body when `include_body` is set.
///
/// Missing fields stay missing. With `include_body == false` the body key is
/// absent from the output altogether. A string body goes through
/// [`helpcenter_html::normalize_html`]; any other JSON value is copied as-is.
pub fn project(mut raw: RawArticle, include_body: bool) -> ProjectedArticle {
    let mut fields = Map::new();

    for name in ARTICLE_FIELDS {
        if let Some(value) = raw.remove(name) {
            fields.insert(name.to_string(), value);
        }
    }

    if include_body {
        match raw.remove(BODY_FIELD) {
            Some(Value::String(html)) => {
                fields.insert(
                    BODY_FIELD.to_string(),
                    Value::String(helpcenter_html::normalize_html(&html)),
                );
            }
            Some(other) => {
                fields.insert(BODY_FIELD.to_string(), other);
            }
            None => {}
        }
    }

    ProjectedArticle::from_fields(fields)
}

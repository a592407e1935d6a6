//! Typed clients for the backend resources.
//!
//! Each client borrows an [`ApiClient`](crate::ApiClient), so every call goes
//! through the interceptor and shares its session.

mod books;
mod users;

pub use books::BooksApi;
pub use users::UsersApi;

/// Appends `pairs` to `path` as a percent-encoded query string.
fn with_query(path: &str, pairs: &[(&'static str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }

    let query = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Percent-encodes a single path segment.
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#![forbid(unsafe_code)]

//! Data source seam.
//!
//! The board only needs "fetch this view's JSON or fail". A
//! [`DataSource`] answers [`FetchRequest`]s; the `http` feature adds a
//! blocking HTTP implementation for the summary and entries endpoints.

use flipboard_core::entries::EntryQuery;
use serde_json::Value;
use thiserror::Error;

/// Which view's data to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// Identity to score mapping.
    Summary,
    /// Historical entries.
    Entries(EntryQuery),
}

impl FetchRequest {
    /// Full URL for this request against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        match self {
            Self::Summary => base_url.to_owned(),
            Self::Entries(query) => format!("{base_url}{}", query.query_string()),
        }
    }

    /// Short name for logs.
    pub fn view(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Entries(_) => "entries",
        }
    }
}

/// A failed fetch. Terminal for the refresh that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("unexpected response status {0}")]
    Status(u16),
    /// The body was not the expected JSON shape.
    #[error("malformed payload: {0}")]
    Decode(String),
}

/// Provider of view payloads.
pub trait DataSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<Value, FetchError>;
}

/// Adapts a closure into a [`DataSource`].
pub struct FnSource<F>(pub F);

impl<F> DataSource for FnSource<F>
where
    F: FnMut(&FetchRequest) -> Result<Value, FetchError>,
{
    fn fetch(&mut self, request: &FetchRequest) -> Result<Value, FetchError> {
        (self.0)(request)
    }
}

#[cfg(feature = "http")]
pub use http::HttpSource;

#[cfg(feature = "http")]
mod http {
    use super::{DataSource, FetchError, FetchRequest};
    use serde_json::Value;

    /// Blocking HTTP GET against a single endpoint.
    #[derive(Debug, Clone)]
    pub struct HttpSource {
        base_url: String,
        client: reqwest::blocking::Client,
    }

    impl HttpSource {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
                client: reqwest::blocking::Client::new(),
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }
    }

    impl DataSource for HttpSource {
        fn fetch(&mut self, request: &FetchRequest) -> Result<Value, FetchError> {
            let url = request.url(&self.base_url);
            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            response.json::<Value>().map_err(|e| {
                if e.is_decode() {
                    FetchError::Decode(e.to_string())
                } else {
                    FetchError::Transport(e.to_string())
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_carry_view_query() {
        let base = "https://example.test/exec";
        assert_eq!(FetchRequest::Summary.url(base), base);
        assert_eq!(
            FetchRequest::Entries(EntryQuery::Recent { count: 8 }).url(base),
            "https://example.test/exec?x=8"
        );
        assert_eq!(
            FetchRequest::Entries(EntryQuery::All).url(base),
            "https://example.test/exec?all=true"
        );
    }

    #[test]
    fn closures_are_sources() {
        let mut calls = 0;
        let mut source = FnSource(|req: &FetchRequest| {
            calls += 1;
            match req {
                FetchRequest::Summary => Ok(json!({"pax": 1})),
                FetchRequest::Entries(_) => Err(FetchError::Status(503)),
            }
        });
        assert!(source.fetch(&FetchRequest::Summary).is_ok());
        assert_eq!(
            source.fetch(&FetchRequest::Entries(EntryQuery::All)),
            Err(FetchError::Status(503))
        );
        drop(source);
        assert_eq!(calls, 2);
    }

    #[test]
    fn errors_display() {
        assert_eq!(FetchError::Status(404).to_string(), "unexpected response status 404");
    }
}

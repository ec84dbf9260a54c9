//! Request targets
//!
//! A `RequestTarget` is a parsed, absolute URL whose scheme is one of the two
//! supported transports. Anything else is rejected before a request is ever built.

use crate::TargetError;
use std::fmt;
use url::Url;

/// Transport selected by the URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    fn from_url(url: &Url) -> Option<Self> {
        match url.scheme() {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// A validated URL to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTarget {
    url: Url,
    scheme: Scheme,
}

impl RequestTarget {
    /// Parses a raw string into a request target
    ///
    /// # Returns
    ///
    /// * `Ok(RequestTarget)` - The URL parsed and uses `http` or `https`
    /// * `Err(TargetError)` - The URL is malformed or uses another scheme
    ///
    /// # Examples
    ///
    /// ```
    /// use calling_codes::target::{RequestTarget, Scheme};
    ///
    /// let target = RequestTarget::parse("https://example.com/codes").unwrap();
    /// assert_eq!(target.scheme(), Scheme::Https);
    /// assert!(RequestTarget::parse("ftp://example.com/x").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw).map_err(|source| TargetError::Parse {
            url: raw.to_string(),
            source,
        })?;

        let scheme = Scheme::from_url(&url).ok_or_else(|| TargetError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        })?;

        Ok(Self { url, scheme })
    }

    /// Canonical string form, used for cache keys
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

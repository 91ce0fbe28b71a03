// ── Endpoint value type ──
//
// A resolved (or candidate) reporting server address. Identity is purely
// value-based: two endpoints with the same scheme/host/port are the same
// endpoint, which is what lets discovery dedup candidates across
// strategies and cache the winner as a plain value.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// URL scheme for a reporting endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    pub fn is_https(self) -> bool {
        matches!(self, Self::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reporting server address. Immutable once resolved for a session;
/// at most one endpoint is resolved at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// Shorthand for a plain-HTTP endpoint.
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self::new(Scheme::Http, host, port)
    }

    /// The endpoint root as a parsed [`Url`].
    pub fn url(&self) -> Result<Url, Error> {
        Ok(self.to_string().parse()?)
    }

    /// Build a full URL for an absolute path under this endpoint.
    ///
    /// `path` must start with `/` (all reporting routes do).
    pub fn with_path(&self, path: &str) -> Result<Url, Error> {
        Ok(format!("{self}{path}").parse()?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_url() {
        let ep = Endpoint::http("192.168.1.35", 5000);
        assert_eq!(ep.to_string(), "http://192.168.1.35:5000");
        assert_eq!(ep.url().unwrap().as_str(), "http://192.168.1.35:5000/");
    }

    #[test]
    fn with_path_appends_absolute_path() {
        let ep = Endpoint::new(Scheme::Https, "example.net", 8443);
        let url = ep.with_path("/api/health").unwrap();
        assert_eq!(url.as_str(), "https://example.net:8443/api/health");
    }

    #[test]
    fn equality_is_value_based() {
        let a = Endpoint::http("10.0.0.1", 5000);
        let b = Endpoint::http("10.0.0.1", 5000);
        assert_eq!(a, b);
        assert_ne!(a, Endpoint::http("10.0.0.1", 5001));
        assert_ne!(a, Endpoint::new(Scheme::Https, "10.0.0.1", 5000));
    }
}

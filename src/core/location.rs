//! Page location: where the page was loaded from, and where its live reload
//! socket lives.
//!
//! ```text
//! http://localhost:3000/index.html   ->  ws://localhost:3000/ws
//! https://127.0.0.1:8443/            ->  wss://127.0.0.1:8443/ws
//! ```

use std::fmt;

use url::Url;

/// Hostnames treated as local development by default.
pub const DEFAULT_ALLOW_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Default live reload endpoint path.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Errors from parsing a page URL
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("invalid page URL `{0}`")]
    Parse(String, #[source] url::ParseError),

    #[error("page URL `{0}` has no host")]
    NoHost(String),
}

/// Location of the page the client is embedded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    /// Parse a page URL such as `http://localhost:3000/`.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let url = Url::parse(input).map_err(|e| LocationError::Parse(input.to_owned(), e))?;
        if url.host_str().is_none() {
            return Err(LocationError::NoHost(input.to_owned()));
        }
        Ok(Self { url })
    }

    /// Hostname without port (`localhost`).
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Host with port when one is set (`localhost:3000`).
    pub fn host(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{}", self.hostname(), port),
            None => self.hostname().to_owned(),
        }
    }

    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Socket scheme matching the page scheme.
    pub fn ws_scheme(&self) -> &'static str {
        if self.is_secure() { "wss" } else { "ws" }
    }

    /// Whether the hostname exactly matches an allow-listed host.
    pub fn is_allowed<S: AsRef<str>>(&self, allow_hosts: &[S]) -> bool {
        let hostname = self.hostname();
        allow_hosts.iter().any(|h| h.as_ref() == hostname)
    }

    /// Live reload endpoint for this page.
    pub fn socket_url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        format!("{}://{}{}", self.ws_scheme(), self.host(), path)
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_url_plain() {
        let page = PageLocation::parse("http://localhost:3000/index.html").unwrap();
        assert_eq!(page.socket_url(DEFAULT_WS_PATH), "ws://localhost:3000/ws");
    }

    #[test]
    fn test_socket_url_secure() {
        let page = PageLocation::parse("https://127.0.0.1:8443/docs/").unwrap();
        assert_eq!(page.socket_url("/ws"), "wss://127.0.0.1:8443/ws");
    }

    #[test]
    fn test_socket_url_default_port() {
        // Default ports are not part of `host`
        let page = PageLocation::parse("http://localhost/").unwrap();
        assert_eq!(page.host(), "localhost");
        assert_eq!(page.socket_url("ws"), "ws://localhost/ws");
    }

    #[test]
    fn test_allow_list_exact_match() {
        let allow = DEFAULT_ALLOW_HOSTS;

        for url in ["http://localhost:3000/", "http://127.0.0.1:8080/a"] {
            assert!(PageLocation::parse(url).unwrap().is_allowed(allow), "{url}");
        }
        for url in [
            "http://example.com/",
            "http://localhost.example.com/",
            "http://192.168.1.10:3000/",
            "http://[::1]:3000/",
        ] {
            assert!(!PageLocation::parse(url).unwrap().is_allowed(allow), "{url}");
        }
    }

    #[test]
    fn test_custom_allow_list() {
        let page = PageLocation::parse("http://dev.local:5173/").unwrap();
        assert!(page.is_allowed(&["dev.local".to_string()]));
        assert!(!page.is_allowed(&Vec::<String>::new()));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            PageLocation::parse("not a url"),
            Err(LocationError::Parse(..))
        ));
        assert!(matches!(
            PageLocation::parse("file:///tmp/index.html"),
            Err(LocationError::NoHost(_))
        ));
    }
}

//! Bearer token attachment for allow-listed resource servers.
//!
//! Only requests whose URL starts with one of the configured `allowed_urls`
//! (case-insensitive) carry the access token. Everything else is sent without
//! credentials, so following a HAL link to a foreign origin never leaks the token.

use secrecy::{ExposeSecret, SecretString};

/// Resource servers that receive the access token.
#[derive(Clone, Debug, Default)]
pub struct ResourceServer {
    allowed_urls: Vec<String>,
    send_access_token: bool,
}

impl ResourceServer {
    #[must_use]
    pub fn new<I, S>(allowed_urls: I, send_access_token: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_urls = allowed_urls
            .into_iter()
            .filter_map(|url| {
                let trimmed = url.as_ref().trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_lowercase())
                }
            })
            .collect();

        Self {
            allowed_urls,
            send_access_token,
        }
    }

    #[must_use]
    pub fn allowed_urls(&self) -> &[String] {
        &self.allowed_urls
    }

    /// Returns true if a request to `url` should carry the access token.
    #[must_use]
    pub fn allows(&self, url: &str) -> bool {
        if !self.send_access_token {
            return false;
        }
        let url = url.to_lowercase();
        self.allowed_urls
            .iter()
            .any(|allowed| url.starts_with(allowed.as_str()))
    }

    /// Picks the token to attach to a request for `url`, if any.
    pub(crate) fn token_for<'a>(
        &self,
        url: &str,
        token: Option<&'a SecretString>,
    ) -> Option<&'a str> {
        let token = token?.expose_secret();
        if token.is_empty() || !self.allows(url) {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_urls_with_allowed_prefix() {
        let server = ResourceServer::new(["http://127.0.0.1:8080/api"], true);
        assert!(server.allows("http://127.0.0.1:8080/api/busPoints"));
        assert!(server.allows("HTTP://127.0.0.1:8080/API/busPoints/1"));
        assert!(!server.allows("http://127.0.0.1:8181/userinfo"));
        assert!(!server.allows("https://example.com/api"));
    }

    #[test]
    fn never_allows_when_sending_is_disabled() {
        let server = ResourceServer::new(["http://127.0.0.1:8080/api"], false);
        assert!(!server.allows("http://127.0.0.1:8080/api/busPoints"));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let server = ResourceServer::new(["", "  ", "http://api.local"], true);
        assert_eq!(server.allowed_urls(), ["http://api.local".to_string()]);
        assert!(!server.allows("http://other.local"));
    }

    #[test]
    fn token_for_skips_empty_tokens() {
        let server = ResourceServer::new(["http://api.local"], true);
        let empty = SecretString::default();
        let token = SecretString::from("abc".to_string());

        assert_eq!(server.token_for("http://api.local/x", None), None);
        assert_eq!(server.token_for("http://api.local/x", Some(&empty)), None);
        assert_eq!(
            server.token_for("http://api.local/x", Some(&token)),
            Some("abc")
        );
        assert_eq!(server.token_for("http://other/x", Some(&token)), None);
    }
}

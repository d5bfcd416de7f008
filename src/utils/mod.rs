//! Utility functions and helpers.

pub mod http;
pub mod time;

use url::Url;

use crate::error::{AppError, Result};

/// Reduce a URL to its site root, `scheme://host[:port]`.
///
/// Every path segment, the query and the fragment are discarded.
pub fn get_root(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str)?;
    if url.host_str().is_none() {
        return Err(AppError::config(format!("URL has no host: {url_str}")));
    }
    Ok(url.origin().ascii_serialization())
}

/// Resolve a detail-page href against the site root.
///
/// Absolute hrefs are returned unchanged.
pub fn resolve_against_root(root: &str, href: &str) -> Result<String> {
    let base = Url::parse(root)?;
    Ok(base.join(href.trim())?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_root() {
        assert_eq!(get_root("https://site.org/a/b/c").unwrap(), "https://site.org");
        assert_eq!(
            get_root("https://simons.berkeley.edu/programs-events/public-lectures#nav-upcoming")
                .unwrap(),
            "https://simons.berkeley.edu"
        );
        assert_eq!(
            get_root("http://127.0.0.1:8080/listing?page=2").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_get_root_rejects_hostless() {
        assert!(get_root("mailto:someone@example.org").is_err());
        assert!(get_root("not a url").is_err());
    }

    #[test]
    fn test_resolve_against_root() {
        assert_eq!(
            resolve_against_root("https://site.org", "/events/talk-1").unwrap(),
            "https://site.org/events/talk-1"
        );
        assert_eq!(
            resolve_against_root("https://site.org", "https://other.org/x").unwrap(),
            "https://other.org/x"
        );
    }
}

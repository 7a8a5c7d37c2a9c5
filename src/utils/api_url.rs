use crate::constants::api::{API_SUBDOMAIN, DEFAULT_SCHEME};
use crate::errors::NodeError;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme prefix regex"));

/// Maps the front-end host a user types in (`kega.keephub.io`) onto the API
/// host (`https://kega.api.keephub.io`).
///
/// Hosts that already carry the `api` label come back unchanged apart from a
/// trailing slash. Hosts with a single label (`localhost`) are returned
/// exactly as entered, without scheme normalization.
pub fn derive_api_host(client_url: &str) -> Result<String, NodeError> {
    let raw = if SCHEME_PREFIX.is_match(client_url) {
        client_url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, client_url)
    };
    let mut url = Url::parse(&raw).map_err(|_| NodeError::invalid_host(client_url))?;
    let hostname = url
        .host_str()
        .map(|h| h.to_string())
        .ok_or_else(|| NodeError::invalid_host(client_url))?;

    if hostname.contains(&format!(".{}.", API_SUBDOMAIN)) {
        return Ok(strip_trailing_slash(url.as_str()));
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() < 2 {
        return Ok(client_url.to_string());
    }

    let api_hostname = format!("{}.{}.{}", labels[0], API_SUBDOMAIN, labels[1..].join("."));
    url.set_host(Some(&api_hostname))
        .map_err(|_| NodeError::invalid_host(client_url))?;
    Ok(strip_trailing_slash(url.as_str()))
}

fn strip_trailing_slash(value: &str) -> String {
    value.strip_suffix('/').unwrap_or(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeErrorKind;

    #[test]
    fn inserts_api_label() {
        assert_eq!(
            derive_api_host("https://acme.example.io").unwrap(),
            "https://acme.api.example.io"
        );
    }

    #[test]
    fn adds_missing_scheme_and_strips_slash() {
        assert_eq!(
            derive_api_host("kega.keephub.io/").unwrap(),
            "https://kega.api.keephub.io"
        );
    }

    #[test]
    fn keeps_port_and_scheme() {
        assert_eq!(
            derive_api_host("HTTP://dev.keephub.io:8080").unwrap(),
            "http://dev.api.keephub.io:8080"
        );
    }

    #[test]
    fn existing_api_host_is_unchanged() {
        assert_eq!(
            derive_api_host("https://kega.api.keephub.io/").unwrap(),
            "https://kega.api.keephub.io"
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        for input in [
            "https://acme.example.io",
            "acme.example.io",
            "https://a.b.c.example.io/",
            "localhost",
            "http://localhost:3030",
        ] {
            let once = derive_api_host(input).unwrap();
            let twice = derive_api_host(&once).unwrap();
            assert_eq!(once, twice, "input {}", input);
        }
    }

    // Single-label hosts skip the rewrite entirely; kept as a local escape hatch.
    #[test]
    fn single_label_host_is_returned_verbatim() {
        assert_eq!(derive_api_host("localhost").unwrap(), "localhost");
        assert_eq!(
            derive_api_host("http://localhost:3030/").unwrap(),
            "http://localhost:3030/"
        );
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let err = derive_api_host("https://exa mple.io").unwrap_err();
        assert_eq!(err.kind, NodeErrorKind::InvalidHost);
        assert_eq!(err.message, "Invalid client URL: https://exa mple.io");
    }
}

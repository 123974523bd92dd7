use super::Error;
use crate::outcome::{Code, Outcome};
use crate::promise::Promise;
use log::{debug, info};
use serde_json::Value;
use std::time::Instant;
use surf::{http::headers::USER_AGENT, http::Method, Client, RequestBuilder, Url};

pub const INVALID_URI: Code = Code::new("invalid_uri");
pub const CANNOT_FETCH_URI: Code = Code::new("cannot_fetch_uri");
pub const INVALID_JSON: Code = Code::new("invalid_json");

/// Characters allowed to appear unescaped in a URI as of RFC 3986.
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

/// Reject what RFC 3986 forbids but `Url::parse` silently repairs.
fn check_uri(url: &str) -> Result<(), String> {
    if let Some(c) = url.chars().find(|c| !is_uri_char(*c)) {
        return Err(format!("URI contains {:?}, which must be escaped: {:?}", c, url));
    }
    let bytes = url.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let is_hex = |at: usize| bytes.get(at).map_or(false, u8::is_ascii_hexdigit);
        if !(is_hex(i + 1) && is_hex(i + 2)) {
            return Err(format!("Invalid percent-encoding at {}: {:?}", i, url));
        }
    }

    let rest = url.splitn(2, "://").nth(1).unwrap_or(url);
    let (authority, tail) = match rest.find(|c: char| c == '/' || c == '?' || c == '#') {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    };
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let is_bracket = |c: char| c == '[' || c == ']';
    let ip_literal =
        host.starts_with('[') && host.matches('[').count() == 1 && host.matches(']').count() == 1;
    if tail.contains(is_bracket) || (host.contains(is_bracket) && !ip_literal) {
        return Err(format!("Brackets are only valid around an IP literal host: {:?}", url));
    }
    Ok(())
}

pub fn parse_url(url: &str) -> Outcome<Value> {
    if let Err(message) = check_uri(url) {
        return Outcome::error_with(INVALID_URI, message.into());
    }
    match Url::parse(url) {
        Ok(uri) => Outcome::success(String::from(uri).into()),
        Err(err) => Outcome::error_with(INVALID_URI, err.to_string().into()),
    }
}

/// Fetch `uri`, the string form produced by `parse_url`.
pub fn fetch_uri(
    uri: Value,
    fetch: impl FnOnce(&Url) -> Result<String, Error>,
) -> Outcome<Value> {
    let body = uri
        .as_str()
        .ok_or_else(|| Error::from(uri.to_string()))
        .and_then(|uri| Url::parse(uri).map_err(Error::from))
        .and_then(|uri| {
            debug!("GET {}", uri);
            fetch(&uri)
        });
    match body {
        Ok(body) => Outcome::success(body.into()),
        Err(err) => Outcome::error_with(CANNOT_FETCH_URI, err.to_string().into()),
    }
}

pub fn parse_json(body: Value) -> Outcome<Value> {
    let text = match body.as_str() {
        Some(text) => text,
        None => return Outcome::error_with(INVALID_JSON, body),
    };
    match serde_json::from_str(text) {
        Ok(json) => Outcome::success(json),
        Err(err) => Outcome::error_with(INVALID_JSON, err.to_string().into()),
    }
}

/// A promise parsing `url`, fetching it with `fetch` and parsing the body as JSON.
pub fn get_json_from_url<'a>(
    url: &str,
    fetch: impl FnOnce(&Url) -> Result<String, Error> + 'a,
) -> Promise<'a, Value> {
    Promise::new(Value::from(url))
        .then(|url: Value| {
            let parsed = url.as_str().map(parse_url);
            parsed.unwrap_or_else(|| Outcome::error_with(INVALID_URI, url))
        })
        .then(move |uri| fetch_uri(uri, fetch))
        .then(parse_json)
}

/// Perform a blocking GET request and return the body, whatever the response status.
///
/// GitHub describes failures in a JSON body, so the status is only logged.
pub fn get(uri: &Url, user_agent: &str) -> Result<String, Error> {
    let start = Instant::now();
    let client = Client::new();
    let req = RequestBuilder::new(Method::Get, uri.clone())
        .header(USER_AGENT, user_agent)
        .build();

    let body = futures::executor::block_on(async {
        let mut res = client.send(req).await?;
        debug!("{} answered with status {}", uri, res.status());
        let body = res.body_string().await?;
        Ok::<_, surf::Error>(body)
    })
    .map_err(|err| Error::from(err.to_string()))?;

    info!("Fetched {} in {:?}", uri, start.elapsed());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn parse_url_accepts_api_urls() {
        assert_eq!(
            parse_url("https://api.github.com/repos/acme/widget"),
            Outcome::success(json!("https://api.github.com/repos/acme/widget"))
        );
    }

    #[test]
    fn parse_url_accepts_escapes_and_ip_literals() {
        assert!(parse_url("https://api.github.com/repos/acme/wid%2Fget").is_success());
        assert!(parse_url("http://[::1]:8080/repos/acme/widget").is_success());
        assert!(parse_url("http://user@[::1]/repos/acme/widget").is_success());
    }

    #[test]
    fn parse_url_rejects_malformed_input() {
        for url in &[
            "https://api.github.com/repos/acme widget",
            "https://api.github.com/repos/<acme>",
            "not a url",
            "no-scheme/acme/widget",
            "https://api.github.com/repos/acme/%zz",
            "https://api.github.com/repos/acme/%",
            "https://api.github.com/repos/acme/%4",
            "https://api.github.com/repos/acme/wid[get]",
            "https://api.github.com/repos/acme/widget?q=[1]",
            "https://api[.github.com/repos/acme/widget",
        ] {
            let outcome = parse_url(url);
            assert!(outcome.is_error(), "{} should not parse", url);
            assert_eq!(outcome.code(), INVALID_URI);
        }
    }

    #[test]
    fn fetch_errors_become_cannot_fetch_uri() {
        let outcome = fetch_uri(json!("https://example.com/"), |_| {
            Err("connection refused".into())
        });
        assert_eq!(
            outcome,
            Outcome::error_with(CANNOT_FETCH_URI, json!("connection refused"))
        );
    }

    #[test]
    fn parse_json_reports_invalid_bodies() {
        assert_eq!(parse_json(json!("[1, 2]")), Outcome::success(json!([1, 2])));
        let outcome = parse_json(json!("<html>"));
        assert_eq!(outcome.code(), INVALID_JSON);
        assert!(outcome.data().is_string());
    }

    #[test]
    fn pipeline_passes_the_parsed_uri_to_fetch() {
        let outcome = get_json_from_url("https://api.github.com/repos/acme/widget", |uri| {
            assert_eq!(uri.path(), "/repos/acme/widget");
            Ok(r#"{"id": 1}"#.into())
        })
        .resolve();
        assert_eq!(outcome, Outcome::success(json!({"id": 1})));
    }

    #[test]
    fn pipeline_does_not_fetch_invalid_urls() {
        let fetches = Cell::new(0);
        let outcome = get_json_from_url("https://api.github.com/repos/a b", |_| {
            fetches.set(fetches.get() + 1);
            Ok("{}".into())
        })
        .resolve();
        assert_eq!(outcome.code(), INVALID_URI);
        assert_eq!(fetches.get(), 0);
    }
}

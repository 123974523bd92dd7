use super::Error;
use crate::outcome::{Code, Outcome};
use crate::request;
use log::debug;
use serde_json::Value;
use surf::Url;

pub const REPOSITORY_NOT_FOUND: Code = Code::new("repository_not_found");
pub const MISSING_FIELD: Code = Code::new("missing_field");

pub struct Options {
    /// The API root, like `https://api.github.com`
    pub api_url: String,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".into(),
            user_agent: "GitHub Stargazers.rs".into(),
        }
    }
}

impl Options {
    pub fn repository_url(&self, repository: &str) -> String {
        format!(
            "{}/repos/{}",
            self.api_url.trim_end_matches('/'),
            repository
        )
    }
}

/// Turn the repository document into its stargazer count.
pub fn extract_count(data: Value) -> Outcome<Value> {
    if data.get("message").and_then(Value::as_str) == Some("Not Found") {
        return Outcome::error(REPOSITORY_NOT_FOUND);
    }
    match data.get("stargazers_count") {
        Some(count) => Outcome::success(count.clone()),
        None => Outcome::error_with(MISSING_FIELD, data),
    }
}

pub fn fetch_with(
    repository: &str,
    options: &Options,
    fetch: impl FnOnce(&Url) -> Result<String, Error>,
) -> Outcome<Value> {
    let url = options.repository_url(repository);
    debug!("Fetching stargazers of {} from {}", repository, url);
    request::get_json_from_url(&url, fetch)
        .then(extract_count)
        .resolve()
}

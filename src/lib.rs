#[macro_use]
#[cfg(test)]
extern crate lazy_static;

use serde_json::Value;
use std::io;

mod api;
mod outcome;
mod promise;
mod request;

pub use api::{extract_count, fetch_with, Options, MISSING_FIELD, REPOSITORY_NOT_FOUND};
pub use outcome::{Code, Outcome};
pub use promise::Promise;
pub use request::{
    fetch_uri, get, get_json_from_url, parse_json, parse_url, CANNOT_FETCH_URI, INVALID_JSON,
    INVALID_URI,
};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Fetch the stargazer count of `repository`, like "rails/rails", from the GitHub API.
pub fn fetch_stargazers(repository: &str, options: &Options) -> Outcome<Value> {
    fetch_with(repository, options, |uri| get(uri, &options.user_agent))
}

/// The process exit code matching `outcome`.
pub fn exit_code(outcome: &Outcome<Value>) -> i32 {
    if outcome.is_success() {
        0
    } else {
        1
    }
}

pub fn output(
    repository: &str,
    outcome: &Outcome<Value>,
    mut out: impl io::Write,
) -> Result<(), Error> {
    if outcome.is_success() {
        writeln!(
            out,
            "Repository {} has {} stargazers",
            repository,
            outcome.data()
        )?;
        return Ok(());
    }
    match outcome.code() {
        REPOSITORY_NOT_FOUND => writeln!(out, "Repository {} not found.", repository)?,
        code => writeln!(
            out,
            "Cannot fetch github stargazers for {}: {} [data:{}]",
            repository,
            code,
            outcome.data()
        )?,
    }
    Ok(())
}

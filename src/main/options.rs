use github_stargazers::Options;
use std::ffi::OsString;
use std::io;
use structopt::{clap::ErrorKind, StructOpt};

#[derive(Debug, StructOpt)]
#[structopt(
    about = "Show how many stargazers a GitHub repository has",
    after_help = "For example: count-github-stargazers rails/rails"
)]
pub struct Args {
    /// The desired log level. 'INFO' provides timing information, 'DEBUG' traces each request.
    #[structopt(short = "l", long = "log-level", default_value = "ERROR")]
    #[structopt(possible_values = &["INFO", "ERROR", "DEBUG"])]
    pub log_level: log::Level,
    /// The root of the GitHub API to query
    #[structopt(long = "api-url", default_value = "https://api.github.com")]
    pub api_url: String,
    /// The repository to inspect, like "rails/rails"
    pub repository: String,
}

impl Args {
    /// Parse `args`, or write usage, help or version to `out` and return the exit code.
    pub fn parse<I>(args: I, mut out: impl io::Write) -> Result<Args, i32>
    where
        I: IntoIterator,
        I::Item: Into<OsString> + Clone,
    {
        Args::from_iter_safe(args).map_err(|err| {
            writeln!(out, "{}", err.message).ok();
            match err.kind {
                ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => 0,
                _ => 1,
            }
        })
    }
}

impl From<Args> for Options {
    fn from(Args { api_url, .. }: Args) -> Self {
        Options {
            api_url,
            ..Options::default()
        }
    }
}

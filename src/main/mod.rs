mod options;

use github_stargazers::{exit_code, fetch_stargazers, output, Error, Options};
use options::Args;
use std::io::stdout;
use std::process;

fn main() -> Result<(), Error> {
    let args = match Args::parse(std::env::args(), stdout()) {
        Ok(args) => args,
        Err(code) => process::exit(code),
    };
    simple_logger::init_with_level(args.log_level).ok();

    let repository = args.repository.clone();
    let options = Options::from(args);
    let outcome = fetch_stargazers(&repository, &options);
    output(&repository, &outcome, stdout())?;

    process::exit(exit_code(&outcome))
}

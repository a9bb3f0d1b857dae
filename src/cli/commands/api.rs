use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_ACCESS_TOKEN: &str = "access-token";
pub const ARG_ALLOWED_URL: &str = "allowed-url";
pub const ARG_NO_SEND_ACCESS_TOKEN: &str = "no-send-access-token";
pub const ARG_RETRY_ATTEMPTS: &str = "retry-attempts";
pub const ARG_RETRY_BACKOFF_MS: &str = "retry-backoff-ms";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the transit-management API")
                .env("BUSPOINTS_API_URL")
                .default_value(DEFAULT_API_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN)
                .long(ARG_ACCESS_TOKEN)
                .help("OAuth access token sent as a bearer token")
                .env("BUSPOINTS_ACCESS_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ALLOWED_URL)
                .long(ARG_ALLOWED_URL)
                .help("URL prefix allowed to receive the access token (default: the API URL)")
                .long_help(
                    "URL prefix allowed to receive the access token. Repeat the flag or separate values with commas. Matching is case-insensitive. Defaults to the API URL.",
                )
                .env("BUSPOINTS_ALLOWED_URLS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new(ARG_NO_SEND_ACCESS_TOKEN)
                .long(ARG_NO_SEND_ACCESS_TOKEN)
                .help("Never attach the access token")
                .env("BUSPOINTS_NO_SEND_ACCESS_TOKEN")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new(ARG_RETRY_ATTEMPTS)
                .long(ARG_RETRY_ATTEMPTS)
                .help("Total attempts per request, including the first")
                .env("BUSPOINTS_RETRY_ATTEMPTS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ARG_RETRY_BACKOFF_MS)
                .long(ARG_RETRY_BACKOFF_MS)
                .help("Base delay between attempts in milliseconds, doubled on each retry")
                .env("BUSPOINTS_RETRY_BACKOFF_MS")
                .default_value("250")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("Request timeout in seconds")
                .env("BUSPOINTS_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}

/// Build the runtime configuration from the global options.
///
/// # Errors
/// Returns an error if the API URL or an allowed URL is not a valid URL.
pub fn parse(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;
    Url::parse(&api_url).context("invalid BUSPOINTS_API_URL")?;

    let allowed_urls: Vec<String> = matches
        .get_many::<String>(ARG_ALLOWED_URL)
        .map(|urls| urls.cloned().collect())
        .unwrap_or_default();
    for url in &allowed_urls {
        Url::parse(url).with_context(|| format!("invalid allowed URL: {url}"))?;
    }

    let mut globals = GlobalArgs::new(api_url);
    if let Some(token) = matches.get_one::<String>(ARG_ACCESS_TOKEN) {
        globals.set_token(SecretString::from(token.clone()));
    }
    globals.allowed_urls = allowed_urls;
    globals.send_access_token = !matches.get_flag(ARG_NO_SEND_ACCESS_TOKEN);
    globals.retry_attempts = matches
        .get_one::<u32>(ARG_RETRY_ATTEMPTS)
        .copied()
        .unwrap_or(crate::store::retry::DEFAULT_MAX_ATTEMPTS);
    if let Some(ms) = matches.get_one::<u64>(ARG_RETRY_BACKOFF_MS) {
        globals.retry_backoff = Duration::from_millis(*ms);
    }
    if let Some(secs) = matches.get_one::<u64>(ARG_TIMEOUT_SECONDS) {
        globals.timeout = Duration::from_secs(*secs);
    }

    Ok(globals)
}

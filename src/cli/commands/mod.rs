pub mod api;
pub mod logging;
pub mod resources;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("buspoints")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(resources::bus_points())
        .subcommand(resources::named_collection(
            resources::CMD_TYPES,
            "Manage bus point types",
        ))
        .subcommand(resources::named_collection(
            resources::CMD_CARRIERS,
            "Manage carriers",
        ));

    let command = api::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 8] = [
        "BUSPOINTS_API_URL",
        "BUSPOINTS_ACCESS_TOKEN",
        "BUSPOINTS_ALLOWED_URLS",
        "BUSPOINTS_NO_SEND_ACCESS_TOKEN",
        "BUSPOINTS_RETRY_ATTEMPTS",
        "BUSPOINTS_RETRY_BACKOFF_MS",
        "BUSPOINTS_TIMEOUT_SECONDS",
        "BUSPOINTS_LOG_LEVEL",
    ];

    fn clean_env() -> Vec<(&'static str, Option<&'static str>)> {
        ENV_VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_new() {
        let command = new();
        assert_eq!(command.get_name(), "buspoints");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            env!("CARGO_PKG_DESCRIPTION")
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(clean_env(), || {
            let matches = new().get_matches_from(vec!["buspoints", "carriers", "list"]);
            assert_eq!(
                matches.get_one::<String>(api::ARG_API_URL).cloned(),
                Some(api::DEFAULT_API_URL.to_string())
            );
            assert_eq!(
                matches.get_one::<u32>(api::ARG_RETRY_ATTEMPTS).copied(),
                Some(3)
            );
            assert_eq!(
                matches.get_one::<u64>(api::ARG_RETRY_BACKOFF_MS).copied(),
                Some(250)
            );
            assert!(!matches.get_flag(api::ARG_NO_SEND_ACCESS_TOKEN));
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("BUSPOINTS_API_URL", Some("https://transit.tld/api")),
                ("BUSPOINTS_ACCESS_TOKEN", Some("token")),
                (
                    "BUSPOINTS_ALLOWED_URLS",
                    Some("https://transit.tld/api,https://media.transit.tld"),
                ),
                ("BUSPOINTS_RETRY_ATTEMPTS", Some("5")),
                ("BUSPOINTS_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["buspoints", "types", "list"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_URL).cloned(),
                    Some("https://transit.tld/api".to_string())
                );
                assert_eq!(
                    matches
                        .get_many::<String>(api::ARG_ALLOWED_URL)
                        .unwrap()
                        .cloned()
                        .collect::<Vec<_>>(),
                    vec![
                        "https://transit.tld/api".to_string(),
                        "https://media.transit.tld".to_string()
                    ]
                );
                assert_eq!(
                    matches.get_one::<u32>(api::ARG_RETRY_ATTEMPTS).copied(),
                    Some(5)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("BUSPOINTS_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["buspoints", "carriers", "list"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("BUSPOINTS_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["buspoints".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }
                args.push("carriers".to_string());
                args.push("list".to_string());

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_bus_point_create_requires_type() {
        temp_env::with_vars(clean_env(), || {
            let result = new().try_get_matches_from(vec![
                "buspoints",
                "bus-points",
                "create",
                "--name",
                "Central",
                "--address",
                "Main St 1",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_global_options_after_subcommand() {
        temp_env::with_vars(clean_env(), || {
            let matches = new().get_matches_from(vec![
                "buspoints",
                "bus-points",
                "show",
                "7",
                "--api-url",
                "http://localhost:9000/api",
            ]);
            let (_, bus_points) = matches.subcommand().unwrap();
            let (_, show) = bus_points.subcommand().unwrap();
            assert_eq!(show.get_one::<i64>(resources::ARG_ID).copied(), Some(7));
            assert_eq!(
                matches.get_one::<String>(api::ARG_API_URL).cloned(),
                Some("http://localhost:9000/api".to_string())
            );
        });
    }

    #[test]
    fn test_retry_attempts_must_be_positive() {
        temp_env::with_vars(clean_env(), || {
            let result = new().try_get_matches_from(vec![
                "buspoints",
                "--retry-attempts",
                "0",
                "carriers",
                "list",
            ]);
            assert!(result.is_err());
        });
    }
}

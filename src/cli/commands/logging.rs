use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

/// Level names in `-v` count order; `-vvvv` and above all mean trace.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its `-v` count, so `BUSPOINTS_LOG_LEVEL=debug` and
/// `-vvv` select the same level.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        let level = level.trim().to_lowercase();

        if let Ok(count) = level.parse::<u8>() {
            return if usize::from(count) < LEVELS.len() {
                Ok(count)
            } else {
                Err(format!("log level {count} is out of range (0-4)"))
            };
        }

        LEVELS
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("unknown log level '{level}' (use {})", LEVELS.join(", ")))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more to stderr; repeat for more detail (-v warn ... -vvvv trace)")
            .long_help(
                "Log more to stderr; repeat for more detail: -v warn, -vv info, -vvv debug, -vvvv trace. Only errors are logged by default. RUST_LOG directives take precedence for the targets they name, e.g. RUST_LOG=buspoints::store=debug.",
            )
            .env("BUSPOINTS_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
    .arg(
        Arg::new(ARG_LOG_FORMAT)
            .long(ARG_LOG_FORMAT)
            .help("Log line format on stderr")
            .env("BUSPOINTS_LOG_FORMAT")
            .value_parser(["compact", "json"])
            .default_value("compact")
            .global(true),
    )
}

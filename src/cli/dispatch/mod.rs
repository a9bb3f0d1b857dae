//! Maps validated CLI matches to the action to run.

use crate::cli::actions::{bus_points, collection, Action};
use crate::cli::commands::{api, resources};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;

fn required_id(matches: &ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>(resources::ARG_ID)
        .copied()
        .context("missing required argument: <id>")
}

fn required_string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn bus_point_command(matches: &ArgMatches) -> Result<bus_points::Command> {
    let command = match matches.subcommand() {
        Some((resources::CMD_LIST, sub)) => bus_points::Command::List {
            page: sub.get_one::<u64>(resources::ARG_PAGE).copied(),
        },
        Some((resources::CMD_SHOW, sub)) => bus_points::Command::Show {
            id: required_id(sub)?,
        },
        Some((resources::CMD_CREATE, sub)) => bus_points::Command::Create {
            name: required_string(sub, resources::ARG_NAME)?,
            address: required_string(sub, resources::ARG_ADDRESS)?,
            type_id: sub
                .get_one::<i64>(resources::ARG_TYPE_ID)
                .copied()
                .context("missing required argument: --type-id")?,
        },
        Some((resources::CMD_EDIT, sub)) => bus_points::Command::Edit {
            id: required_id(sub)?,
            name: sub.get_one::<String>(resources::ARG_NAME).cloned(),
            address: sub.get_one::<String>(resources::ARG_ADDRESS).cloned(),
            type_id: sub.get_one::<i64>(resources::ARG_TYPE_ID).copied(),
        },
        Some((resources::CMD_DELETE, sub)) => bus_points::Command::Delete {
            id: required_id(sub)?,
        },
        _ => bail!("missing bus-points command"),
    };

    Ok(command)
}

fn collection_command(matches: &ArgMatches) -> Result<collection::Command> {
    let command = match matches.subcommand() {
        Some((resources::CMD_LIST, sub)) => collection::Command::List {
            page: sub.get_one::<u64>(resources::ARG_PAGE).copied(),
        },
        Some((resources::CMD_SHOW, sub)) => collection::Command::Show {
            id: required_id(sub)?,
        },
        Some((resources::CMD_CREATE, sub)) => collection::Command::Create {
            name: required_string(sub, resources::ARG_NAME)?,
        },
        Some((resources::CMD_EDIT, sub)) => collection::Command::Edit {
            id: required_id(sub)?,
            name: required_string(sub, resources::ARG_NAME)?,
        },
        Some((resources::CMD_DELETE, sub)) => collection::Command::Delete {
            id: required_id(sub)?,
        },
        _ => bail!("missing command"),
    };

    Ok(command)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = api::parse(matches)?;

    match matches.subcommand() {
        Some((resources::CMD_BUS_POINTS, sub)) => Ok(Action::BusPoints(bus_points::Args {
            globals,
            command: bus_point_command(sub)?,
        })),
        Some((resources::CMD_TYPES, sub)) => Ok(Action::BusPointTypes(collection::Args {
            globals,
            command: collection_command(sub)?,
        })),
        Some((resources::CMD_CARRIERS, sub)) => Ok(Action::Carriers(collection::Args {
            globals,
            command: collection_command(sub)?,
        })),
        _ => bail!("missing command"),
    }
}

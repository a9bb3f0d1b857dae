use clap::{Arg, Command};

pub const CMD_BUS_POINTS: &str = "bus-points";
pub const CMD_TYPES: &str = "types";
pub const CMD_CARRIERS: &str = "carriers";

pub const CMD_LIST: &str = "list";
pub const CMD_SHOW: &str = "show";
pub const CMD_CREATE: &str = "create";
pub const CMD_EDIT: &str = "edit";
pub const CMD_DELETE: &str = "delete";

pub const ARG_ID: &str = "id";
pub const ARG_PAGE: &str = "page";
pub const ARG_NAME: &str = "name";
pub const ARG_ADDRESS: &str = "address";
pub const ARG_TYPE_ID: &str = "type-id";

fn id_arg() -> Arg {
    Arg::new(ARG_ID)
        .help("Record id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn name_arg(required: bool) -> Arg {
    Arg::new(ARG_NAME)
        .long(ARG_NAME)
        .help("Display name")
        .required(required)
}

fn list() -> Command {
    Command::new(CMD_LIST).about("List records").arg(
        Arg::new(ARG_PAGE)
            .long(ARG_PAGE)
            .help("Page to fetch (0-based, default: first page)")
            .value_parser(clap::value_parser!(u64)),
    )
}

fn show() -> Command {
    Command::new(CMD_SHOW).about("Show one record").arg(id_arg())
}

fn delete() -> Command {
    Command::new(CMD_DELETE).about("Delete a record").arg(id_arg())
}

#[must_use]
pub fn bus_points() -> Command {
    Command::new(CMD_BUS_POINTS)
        .about("Manage bus points")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(list())
        .subcommand(show())
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Create a bus point")
                .arg(name_arg(true))
                .arg(
                    Arg::new(ARG_ADDRESS)
                        .long(ARG_ADDRESS)
                        .help("Street address")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_TYPE_ID)
                        .long(ARG_TYPE_ID)
                        .help("Id of the bus point type")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new(CMD_EDIT)
                .about("Edit a bus point; omitted fields keep their value")
                .arg(id_arg())
                .arg(name_arg(false))
                .arg(
                    Arg::new(ARG_ADDRESS)
                        .long(ARG_ADDRESS)
                        .help("Street address"),
                )
                .arg(
                    Arg::new(ARG_TYPE_ID)
                        .long(ARG_TYPE_ID)
                        .help("Id of the bus point type")
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(delete())
}

/// Commands for a collection whose records only carry a name.
#[must_use]
pub fn named_collection(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(list())
        .subcommand(show())
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Create a record")
                .arg(name_arg(true)),
        )
        .subcommand(
            Command::new(CMD_EDIT)
                .about("Rename a record")
                .arg(id_arg())
                .arg(name_arg(true)),
        )
        .subcommand(delete())
}

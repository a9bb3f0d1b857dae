use crate::api::BusPointRequest;
use crate::cli::actions::{locate, print_page, report, CliErrorHandler};
use crate::cli::globals::GlobalArgs;
use crate::model::{BusPoint, BusPointType};
use crate::store::{BusPointStore, BusPointTypeStore, ErrorHandler};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub enum Command {
    List {
        page: Option<u64>,
    },
    Show {
        id: i64,
    },
    Create {
        name: String,
        address: String,
        type_id: i64,
    },
    Edit {
        id: i64,
        name: Option<String>,
        address: Option<String>,
        type_id: Option<i64>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

fn print_row(bus_point: &BusPoint) {
    let type_name = if bus_point.bus_point_type.is_resolved() {
        bus_point.bus_point_type.name.as_str()
    } else {
        "-"
    };
    println!(
        "{}\t{}\t{}\t{}",
        bus_point.id, bus_point.name, bus_point.address, type_name
    );
}

async fn find(store: &BusPointStore, id: i64) -> Result<BusPoint> {
    store.fetch().await.map_err(|e| report(&e))?;
    locate(
        id,
        |id| store.get_one(id),
        || store.page(),
        |n| store.fetch_page(n),
    )
    .await?
    .ok_or_else(|| anyhow!("bus point {id} not found"))
}

async fn find_type(store: &BusPointTypeStore, id: i64) -> Result<BusPointType> {
    store.fetch().await.map_err(|e| report(&e))?;
    locate(
        id,
        |id| store.get_one(id),
        || store.page(),
        |n| store.fetch_page(n),
    )
    .await?
    .ok_or_else(|| anyhow!("bus point type {id} not found"))
}

/// Execute a bus point command.
/// # Errors
/// Returns an error if the API client cannot be built, a referenced record
/// does not exist or the request fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!(?args, "executing");

    let api = args.globals.api_client().context("invalid API configuration")?;
    let errors: Arc<dyn ErrorHandler> = Arc::new(CliErrorHandler);
    let retry = args.globals.retry_policy();
    let store = BusPointStore::new(api.clone(), errors.clone(), retry);
    let types = BusPointTypeStore::new(api, errors, retry);

    match args.command {
        Command::List { page } => {
            match page {
                Some(n) => store.fetch_page(n).await,
                None => store.fetch().await,
            }
            .map_err(|e| report(&e))?;

            for bus_point in store.items() {
                print_row(&bus_point);
            }
            print_page(&store.page());
        }
        Command::Show { id } => {
            let bus_point = find(&store, id).await?;
            print_row(&bus_point);
        }
        Command::Create {
            name,
            address,
            type_id,
        } => {
            let bus_point_type = find_type(&types, type_id).await?;
            let request = BusPointRequest::new(name, address, &bus_point_type);
            let created = store
                .create(&request, &bus_point_type)
                .await
                .map_err(|e| report(&e))?;
            print_row(&created);
        }
        Command::Edit {
            id,
            name,
            address,
            type_id,
        } => {
            let current = find(&store, id).await?;
            let link = current
                .href
                .clone()
                .with_context(|| format!("bus point {id} has no link"))?;
            let bus_point_type = match type_id {
                Some(type_id) => find_type(&types, type_id).await?,
                None => current.bus_point_type.clone(),
            };
            let request = BusPointRequest::new(
                name.unwrap_or(current.name),
                address.unwrap_or(current.address),
                &bus_point_type,
            );
            let updated = store
                .edit(&request, &link, &bus_point_type)
                .await
                .map_err(|e| report(&e))?;
            print_row(&updated);
        }
        Command::Delete { id } => {
            let current = find(&store, id).await?;
            store.delete_one(&current).await.map_err(|e| report(&e))?;
            println!("deleted bus point {id}");
        }
    }

    Ok(())
}

use crate::api::{BusPointTypeRequest, CarrierRequest};
use crate::cli::actions::{locate, print_page, report, CliErrorHandler};
use crate::cli::globals::GlobalArgs;
use crate::model::{BusPointType, Carrier, HalResource};
use crate::store::CollectionStore;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub enum Command {
    List { page: Option<u64> },
    Show { id: i64 },
    Create { name: String },
    Edit { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Records that are identified to users by name alone.
pub trait Named: HalResource {
    fn name(&self) -> &str;
    fn request(name: String) -> Self::Request;
}

impl Named for BusPointType {
    fn name(&self) -> &str {
        &self.name
    }

    fn request(name: String) -> BusPointTypeRequest {
        BusPointTypeRequest { name }
    }
}

impl Named for Carrier {
    fn name(&self) -> &str {
        &self.name
    }

    fn request(name: String) -> CarrierRequest {
        CarrierRequest { name }
    }
}

fn print_row<R: Named>(item: &R) {
    println!("{}\t{}", item.id(), item.name());
}

async fn find<R: Named>(store: &CollectionStore<R>, id: i64) -> Result<R> {
    store.fetch().await.map_err(|e| report(&e))?;
    locate(
        id,
        |id| store.get_one(id),
        || store.page(),
        |n| store.fetch_page(n),
    )
    .await?
    .ok_or_else(|| anyhow!("{} {id} not found", R::KIND))
}

/// Execute a command against a named collection.
/// # Errors
/// Returns an error if the API client cannot be built or the request fails.
pub async fn execute<R: Named>(args: Args) -> Result<()> {
    debug!(?args, kind = R::KIND, "executing");

    let api = args.globals.api_client().context("invalid API configuration")?;
    let store: CollectionStore<R> = CollectionStore::new(
        api,
        Arc::new(CliErrorHandler),
        args.globals.retry_policy(),
    );

    match args.command {
        Command::List { page } => {
            match page {
                Some(n) => store.fetch_page(n).await,
                None => store.fetch().await,
            }
            .map_err(|e| report(&e))?;

            for item in store.items() {
                print_row(&item);
            }
            print_page(&store.page());
        }
        Command::Show { id } => {
            let item = find(&store, id).await?;
            print_row(&item);
        }
        Command::Create { name } => {
            let created = store
                .create(&R::request(name))
                .await
                .map_err(|e| report(&e))?;
            print_row(&created);
        }
        Command::Edit { id, name } => {
            let current = find(&store, id).await?;
            let link = current
                .href()
                .with_context(|| format!("{} {id} has no link", R::KIND))?
                .to_string();
            let updated = store
                .edit(&R::request(name), &link)
                .await
                .map_err(|e| report(&e))?;
            print_row(&updated);
        }
        Command::Delete { id } => {
            let current = find(&store, id).await?;
            store.delete_one(&current).await.map_err(|e| report(&e))?;
            println!("deleted {} {id}", R::KIND);
        }
    }

    Ok(())
}

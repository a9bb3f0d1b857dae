use crate::cli::actions::{bus_points, collection, Action};
use crate::model::{BusPointType, Carrier};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::BusPoints(args) => bus_points::execute(args).await,
        Action::BusPointTypes(args) => collection::execute::<BusPointType>(args).await,
        Action::Carriers(args) => collection::execute::<Carrier>(args).await,
    }
}

pub mod bus_points;
pub mod collection;

// Internal "interpreter" for `Action`.
mod run;

use crate::api::PageData;
use crate::store::{user_message, ErrorHandler, StoreError};
use anyhow::{anyhow, Result};
use std::future::Future;
use tracing::debug;

#[derive(Debug)]
pub enum Action {
    BusPoints(bus_points::Args),
    BusPointTypes(collection::Args),
    Carriers(collection::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Error handler for CLI runs.
///
/// The user sees a failure once, as the error returned from the command (see
/// [`report`]); the handler only keeps the raw error for `-vvv` output.
#[derive(Clone, Copy, Debug, Default)]
pub struct CliErrorHandler;

impl ErrorHandler for CliErrorHandler {
    fn handle(&self, failure: &StoreError) {
        debug!(error = ?failure, "store operation failed");
    }
}

/// Turns a store failure into the message shown to the user.
pub(crate) fn report(failure: &StoreError) -> anyhow::Error {
    anyhow!(user_message(failure))
}

/// Looks `id` up in a store that already holds its first page, fetching the
/// following pages until the record shows up or the pages run out.
pub(crate) async fn locate<T, Fut>(
    id: i64,
    get_one: impl Fn(i64) -> Option<T>,
    page: impl Fn() -> PageData,
    mut fetch_page: impl FnMut(u64) -> Fut,
) -> Result<Option<T>>
where
    Fut: Future<Output = Result<(), StoreError>>,
{
    let mut next = page().number + 1;

    loop {
        if let Some(found) = get_one(id) {
            return Ok(Some(found));
        }
        if next >= page().total_pages {
            return Ok(None);
        }
        fetch_page(next).await.map_err(|e| report(&e))?;
        next += 1;
    }
}

pub(crate) fn print_page(page: &PageData) {
    if page.total_pages > 0 {
        println!(
            "page {} of {}, {} total",
            page.number + 1,
            page.total_pages,
            page.total_elements
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(level: Level, f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn cli_failures_are_shown_once() {
        let failure = StoreError::Api(ApiError::Http {
            status: 404,
            message: "gone".to_string(),
        });

        let logged = captured(Level::ERROR, || CliErrorHandler.handle(&failure));
        assert!(logged.is_empty(), "unexpected log output: {logged}");

        let shown = report(&failure).to_string();
        assert_eq!(shown, "The requested item was not found.");
    }

    #[test]
    fn cli_failures_stay_visible_in_debug_logs() {
        let failure = StoreError::MissingLink("carrier");
        let logged = captured(Level::DEBUG, || CliErrorHandler.handle(&failure));
        assert!(logged.contains("store operation failed"));
        assert!(logged.contains("MissingLink"));
    }
}

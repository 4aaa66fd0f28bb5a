//! Connection health probe.

use std::time::Duration;

use streamfair_core::{Error, Result};

use crate::SqliteStore;

/// Run `SELECT 1` as a unit of work and require it to return `1` within
/// `timeout`.
///
/// A timeout yields `Timeout`, a dead connection `Connectivity`, and any other
/// value `UnexpectedResult`.
pub(crate) async fn ping(store: &SqliteStore, timeout: Duration) -> Result<()> {
  let probe = store.execute(|q| {
    let value = q.select_one()?;
    if value != 1 {
      return Err(Error::UnexpectedResult(format!("SELECT 1 returned {value}")));
    }
    Ok(())
  });

  let outcome = match tokio::time::timeout(timeout, probe).await {
    Ok(outcome) => outcome,
    Err(_) => Err(Error::Timeout(timeout)),
  };
  if let Err(err) = &outcome {
    tracing::warn!(error = %err, "database ping failed");
  }
  outcome
}

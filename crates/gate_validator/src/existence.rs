//! Table existence lookups.

use gate_core::{GateError, Platform, TableRef};
use tracing::{error, info};

/// Resolves whether a table exists through a metadata lookup.
///
/// Lookup failures are never fatal: anything other than a successful lookup
/// counts as "not found".
pub struct TableExistenceChecker<'a> {
    platform: &'a dyn Platform,
}

impl<'a> TableExistenceChecker<'a> {
    /// Creates a checker over `platform`.
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self { platform }
    }

    /// Returns true if `table` exists. Logs exactly one line per call.
    pub async fn exists(&self, table: &TableRef) -> bool {
        match self.platform.get_table(table).await {
            Ok(()) => {
                info!("Table exists: {}", table);
                true
            }
            Err(GateError::NotFound(_)) => {
                info!("Table not found: {}", table);
                false
            }
            Err(e) => {
                error!("Error checking table existence via API: {} ({})", table, e);
                false
            }
        }
    }
}

//! Driver trait for the external execution boundary.

use crate::backend::DriverKind;
use crate::error::OrmResult;
use crate::row::RawResult;

/// The opaque database driver this core delegates execution to.
///
/// A driver owns whatever connection, pool, or transport it needs; the core
/// only ever hands it finished statement text and awaits exactly one
/// outcome. No retries, no batching, no cancellation.
///
/// Driver failures must surface as [`crate::OrmError::Driver`] and are
/// propagated to the caller unmodified.
pub trait Driver: Send + Sync {
    /// Which backend this driver speaks. Fixed for the driver's lifetime;
    /// used to select the backend adapter.
    fn kind(&self) -> DriverKind;

    /// Execute one statement and return the driver's raw result.
    fn execute(
        &self,
        statement: &str,
    ) -> impl std::future::Future<Output = OrmResult<RawResult>> + Send;
}

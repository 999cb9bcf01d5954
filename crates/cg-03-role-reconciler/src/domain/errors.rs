use cg_01_store::StoreError;
use thiserror::Error;

/// The store could not be consulted; configured ids were used alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{role}' unavailable, using configured ids only: {source}")]
pub struct ReconciliationWarning {
    pub role: String,
    #[source]
    pub source: StoreError,
}

//! # Gateway Telemetry
//!
//! Logging bootstrap shared by the gateway binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gateway_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GW_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `GW_JSON_LOGS` | `false` | One JSON object per line |
//! | `GW_LOG_TARGETS` | `false` | Print the module path of each event |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_telemetry;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Keeps logging active for the lifetime of the process.
pub struct TelemetryGuard {
    pub(crate) service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Structured event tagged with the emitting component.
///
/// ```rust,ignore
/// log_event!(info, "runtime", "Store ready", path = %db_path.display());
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

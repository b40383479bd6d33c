//! Node liveness and version endpoints.

mod model;

pub use model::{DebugInfo, Health};

use crate::core::{QueryParams, TsClient, TsError};

const HEALTH_PATH: &str = "/health";
const DEBUG_PATH: &str = "/debug";

impl TsClient {
    /// Fetches `GET /health` from whichever node the selector picks.
    ///
    /// # Errors
    ///
    /// Returns any error from the dispatcher.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn health(&self) -> Result<Health, TsError> {
        self.get(HEALTH_PATH, &QueryParams::new(), None).await
    }

    /// Fetches `GET /debug`.
    ///
    /// # Errors
    ///
    /// Returns any error from the dispatcher.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn debug(&self) -> Result<DebugInfo, TsError> {
        self.get(DEBUG_PATH, &QueryParams::new(), None).await
    }
}

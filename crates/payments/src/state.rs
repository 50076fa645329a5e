//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PaymentsConfig;
use crate::paydunya::{PaydunyaClient, PaydunyaError};

/// Shared state, cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PaymentsConfig,
    paydunya: PaydunyaClient,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the PayDunya client cannot be built.
    pub fn new(config: PaymentsConfig) -> Result<Self, PaydunyaError> {
        let paydunya = PaydunyaClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, paydunya }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PaymentsConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn paydunya(&self) -> &PaydunyaClient {
        &self.inner.paydunya
    }
}

use std::sync::Arc;

use lx_config::LxConfig;
use lx_db::service::LxService;

use crate::views::Views;

/// Shared handler state. Cloned per request; all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LxService>,
    pub config: Arc<LxConfig>,
    pub views: Arc<Views>,
}

impl AppState {
    /// Build state around an opened service.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to compile.
    pub fn new(service: LxService, config: LxConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(config),
            views: Arc::new(Views::new()?),
        })
    }
}

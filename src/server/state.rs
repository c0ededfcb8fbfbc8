use crate::config::ServiceConfig;
use crate::converter::ConverterHandle;
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub converter: ConverterHandle,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(converter: ConverterHandle, config: ServiceConfig) -> Self {
        Self {
            converter,
            config: Arc::new(config),
        }
    }
}

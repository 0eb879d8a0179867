use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::Store;

/// Shared per-process handles injected into every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let tokens = TokenKeys::from_config(&config.security);
        Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
        }
    }
}

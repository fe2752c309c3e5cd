use std::sync::Arc;

use quayhook_core::{
    CoreContext,
    Dispatcher,
};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub webhook_route: Arc<str>,
}

impl AppState {
    pub fn new(core: &CoreContext) -> Self {
        Self {
            dispatcher: core.dispatcher.clone(),
            webhook_route: Arc::from(core.config.webhook_route()),
        }
    }

    pub fn service_count(&self) -> usize {
        self.dispatcher.rules().len()
    }
}

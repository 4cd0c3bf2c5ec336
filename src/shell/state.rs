use crate::modules::dashboard::use_cases::viewers::ViewerRegistry;
use crate::shell::context::AppContext;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub context: AppContext,
    pub viewers: Arc<ViewerRegistry>,
    pub poll_timeout: Duration,
}

impl AppState {
    pub fn new(context: AppContext, poll_timeout: Duration) -> Self {
        Self {
            viewers: Arc::new(ViewerRegistry::new(context.clone())),
            context,
            poll_timeout,
        }
    }
}

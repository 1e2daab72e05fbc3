use std::sync::Arc;

use courtside_core::{
    CoreContext,
    DataService,
};

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<CoreContext>,
}

impl AppState {
    pub fn new(core: CoreContext) -> Self {
        Self {
            core: Arc::new(core),
        }
    }

    pub fn data_service(&self) -> &DataService {
        &self.core.data_service
    }
}

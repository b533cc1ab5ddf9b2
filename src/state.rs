use crate::controller::RefreshController;
use crate::range::RangeId;
use std::sync::Arc;

pub struct AppState<S> {
    pub controller: Arc<RefreshController<S>>,
    pub default_range: RangeId,
}

impl<S> AppState<S> {
    pub fn new(controller: RefreshController<S>, default_range: RangeId) -> Self {
        Self {
            controller: Arc::new(controller),
            default_range,
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            default_range: self.default_range,
        }
    }
}

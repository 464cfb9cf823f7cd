use std::sync::Arc;

use crate::predictor::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(predictor: impl Predictor + 'static) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

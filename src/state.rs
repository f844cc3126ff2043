// src/state.rs
use std::sync::Arc;

use crate::{
    config::Config,
    services::inference::{HfInferenceClient, InferenceProvider},
};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub provider: Arc<dyn InferenceProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(HfInferenceClient::new(config.hf_token.clone())))
    }
}

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod pager;
pub mod recipe;
pub mod scale;
pub mod store;
pub mod upload;

use std::sync::Arc;
use model::Model;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct ServerState {
    pub model: Arc<Model>,
}

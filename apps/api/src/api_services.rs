mod sessions;
mod state_builder;
mod stores;

pub use sessions::build_session_layer;
pub use state_builder::build_app_state;
pub use stores::{Stores, build_stores};

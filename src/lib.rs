pub mod api;
pub mod error;
pub mod proxy;
pub mod state;

pub use error::ProxyError;
pub use state::AppState;

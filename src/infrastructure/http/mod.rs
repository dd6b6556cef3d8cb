pub mod api_client;
pub mod wire;

pub use api_client::*;

pub mod dispatch_api;
pub mod geocoder;
pub mod time_service;

pub use dispatch_api::*;
pub use geocoder::*;
pub use time_service::*;

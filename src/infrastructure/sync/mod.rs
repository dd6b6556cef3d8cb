pub mod cache;
pub mod poll_controller;

pub use cache::*;
pub use poll_controller::*;

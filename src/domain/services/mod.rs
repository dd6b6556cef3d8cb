pub mod queues;

pub use queues::*;

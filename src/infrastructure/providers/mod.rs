pub mod geocoder;
pub mod system_time;

pub use geocoder::*;
pub use system_time::*;

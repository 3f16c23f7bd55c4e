pub mod channels;
pub mod dashboard;

pub use channels::*;
pub use dashboard::*;

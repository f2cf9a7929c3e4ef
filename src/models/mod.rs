pub mod config;
pub mod contract;

pub use config::*;
pub use contract::*;

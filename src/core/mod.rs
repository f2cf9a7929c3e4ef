pub mod config;
pub mod gemini;
pub mod generation;
pub mod prompt;
pub mod registry;

pub use config::*;
pub use gemini::*;
pub use generation::*;
pub use prompt::*;
pub use registry::*;

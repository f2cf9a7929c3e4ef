pub mod draft;
pub mod form;
pub mod init;
pub mod list;
pub mod validate;

pub use draft::*;
pub use init::*;
pub use list::*;
pub use validate::*;

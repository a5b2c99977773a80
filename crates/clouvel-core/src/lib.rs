pub mod config;
pub mod docs;
pub mod error;
pub mod gate;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod planning;
pub mod scaffold;
pub mod session;

pub use error::{ClouvelError, Result};

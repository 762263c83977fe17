//! Core type definitions shared by the loader, the engine and the server

mod error;
mod result;

pub use error::*;
pub use result::*;

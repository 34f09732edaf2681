//! Converts SDVX plays stored by the Asphyxia plugin (a NeDB JSON-lines file)
//! into a Kamaitachi batch-manual import document.

pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{run, Report};

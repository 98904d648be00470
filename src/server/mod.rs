//! Server module for Autodiag
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `init`: Router construction and the serve loop

pub mod config;
mod init;
mod loader;

pub use init::run;
pub use loader::load_config;

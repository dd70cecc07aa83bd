pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, ProcessRunner};
pub use config::ProgramConfig;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use core::{engine::ProgramEngine, pipeline::ProgramPipeline};
pub use utils::error::{ProgramError, Result};

pub mod engine;
pub mod output;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{OutputReport, RawWorkbook, Schedule};
pub use crate::domain::ports::{CommandRunner, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

// Adapters layer: concrete implementations for external systems (spreadsheets, filesystem, subprocesses).

pub mod storage;
pub mod tools;
pub mod workbook;

pub use storage::LocalStorage;
pub use tools::ProcessRunner;

use crate::domain::model::{
    ArchiveFormat, OutputReport, PdfOptions, RawWorkbook, Schedule, SheetLayout, ToolCommands,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File access relative to the output root.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn create_dir(
        &self,
        path: &str,
        parents: bool,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn rename(&self, from: &str, to: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Copies a file from outside the root into it.
    fn import_file(
        &self,
        source: &Path,
        to: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn resolve(&self, path: &str) -> PathBuf;
}

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Short role name used in logs and errors.
    pub tool: String,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

pub trait CommandRunner: Send + Sync {
    /// Runs to completion; a non-zero exit is an error.
    fn run(&self, invocation: &ToolInvocation) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn workbook_path(&self) -> &str;
    fn output_root(&self) -> &str;
    fn document_name(&self) -> &str;
    fn create_parents(&self) -> bool;
    fn pdf_enabled(&self) -> bool;
    fn copies(&self) -> usize;
    fn archive_format(&self) -> ArchiveFormat;
    fn sheet_layout(&self) -> &SheetLayout;
    fn pdf_options(&self) -> &PdfOptions;
    fn tools(&self) -> &ToolCommands;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawWorkbook>;
    async fn transform(&self, data: RawWorkbook) -> Result<Schedule>;
    async fn load(&self, schedule: Schedule) -> Result<OutputReport>;
}

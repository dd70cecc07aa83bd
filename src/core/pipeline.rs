use crate::adapters::tools::{
    archiver_invocation, converter_invocation, duplicator_invocation, zip_single_file,
};
use crate::adapters::workbook::read_workbook;
use crate::core::output::OutputPlan;
use crate::core::render::render_program;
use crate::core::{CommandRunner, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ArchiveFormat, OutputReport, RawWorkbook, Schedule};
use crate::domain::services::{load_schedule, quarter_of};
use crate::utils::error::{ProgramError, Result};
use std::path::{Path, PathBuf};

pub struct ProgramPipeline<S: Storage, C: ConfigProvider, R: CommandRunner> {
    storage: S,
    config: C,
    runner: R,
}

impl<S: Storage, C: ConfigProvider, R: CommandRunner> ProgramPipeline<S, C, R> {
    pub fn new(storage: S, config: C, runner: R) -> Self {
        Self {
            storage,
            config,
            runner,
        }
    }

    async fn print_to_pdf(&self, plan: &OutputPlan) -> Result<()> {
        tracing::info!("🖨️ Printing {} to PDF", plan.html);
        let invocation = converter_invocation(
            self.config.tools(),
            self.config.pdf_options(),
            &plan.html,
            &plan.pdf,
            &self.storage.resolve(""),
        );
        self.runner.run(&invocation).await?;
        self.expect_output(&invocation.tool, &plan.pdf).await
    }

    /// Concatenates the copies, archives them and drops the uncompressed file.
    async fn create_copies(&self, plan: &OutputPlan) -> Result<String> {
        let copies = self.config.copies();
        let working_dir = self.storage.resolve(&plan.directory);

        tracing::info!("📑 Duplicating {} ({} copies)", plan.pdf, copies);
        let invocation = duplicator_invocation(
            self.config.tools(),
            &plan.pdf,
            copies,
            &plan.copies_pdf,
            &working_dir,
        );
        self.runner.run(&invocation).await?;
        let copies_pdf = plan.in_directory(&plan.copies_pdf);
        self.expect_output(&invocation.tool, &copies_pdf).await?;

        let archive = plan.in_directory(&plan.copies_archive);
        match self.config.archive_format() {
            ArchiveFormat::SevenZip => {
                tracing::info!("🗜️ Compressing to 7zip");
                let invocation = archiver_invocation(
                    self.config.tools(),
                    &plan.copies_archive,
                    &plan.copies_pdf,
                    &working_dir,
                );
                self.runner.run(&invocation).await?;
                self.expect_output(&invocation.tool, &archive).await?;
            }
            ArchiveFormat::Zip => {
                tracing::info!("🗜️ Compressing to zip");
                let data = self.storage.read_file(&copies_pdf).await?;
                let zipped = zip_single_file(&plan.copies_pdf, &data)?;
                self.storage.write_file(&archive, &zipped).await?;
            }
        }

        self.storage.remove_file(&copies_pdf).await?;
        Ok(archive)
    }

    async fn expect_output(&self, tool: &str, path: &str) -> Result<()> {
        if self.storage.exists(path).await {
            Ok(())
        } else {
            Err(ProgramError::external_tool(
                tool,
                format!("finished without producing '{}'", path),
            ))
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: CommandRunner> Pipeline for ProgramPipeline<S, C, R> {
    async fn extract(&self) -> Result<RawWorkbook> {
        let path = PathBuf::from(self.config.workbook_path());
        let layout = self.config.sheet_layout().clone();
        tracing::debug!("Reading workbook {}", path.display());

        tokio::task::spawn_blocking(move || read_workbook(&path, &layout))
            .await
            .map_err(|e| ProgramError::ProcessingError {
                message: format!("workbook reader task failed: {}", e),
            })?
    }

    async fn transform(&self, data: RawWorkbook) -> Result<Schedule> {
        let schedule = load_schedule(&data, self.config.sheet_layout());

        if schedule.dated_entries() == 0 {
            tracing::warn!("Program sheet has no dated rows");
        }
        tracing::debug!(
            "Schedule: {} entries ({} dated), {} units, year {:?}",
            schedule.entries.len(),
            schedule.dated_entries(),
            schedule.units.len(),
            schedule.year
        );
        Ok(schedule)
    }

    async fn load(&self, schedule: Schedule) -> Result<OutputReport> {
        let quarter = quarter_of(&schedule)?;
        tracing::info!("📅 Quarter: {}", quarter);

        let plan = OutputPlan::new(
            &quarter,
            self.config.document_name(),
            Path::new(self.config.workbook_path()),
            self.config.copies(),
            self.config.archive_format(),
        );
        self.storage
            .create_dir(&plan.directory, self.config.create_parents())
            .await?;

        let html = render_program(
            &schedule,
            self.config.document_name(),
            chrono::Local::now().naive_local(),
        )?;
        self.storage.write_file(&plan.html, html.as_bytes()).await?;

        let mut report = OutputReport {
            quarter: plan.quarter.clone(),
            directory: plan.directory.clone(),
            html: plan.in_directory(&plan.html),
            pdf: None,
            archive: None,
            workbook_copy: plan.in_directory(&plan.workbook_copy),
        };

        if self.config.pdf_enabled() {
            self.print_to_pdf(&plan).await?;
            let pdf = plan.in_directory(&plan.pdf);
            self.storage.rename(&plan.pdf, &pdf).await?;
            report.pdf = Some(pdf);
        }

        self.storage.rename(&plan.html, &report.html).await?;
        self.storage
            .import_file(Path::new(self.config.workbook_path()), &report.workbook_copy)
            .await?;

        if self.config.pdf_enabled() {
            report.archive = Some(self.create_copies(&plan).await?);
        }

        Ok(report)
    }
}

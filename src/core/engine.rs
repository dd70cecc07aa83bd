use crate::core::Pipeline;
use crate::domain::model::{OutputReport, Schedule};
use crate::utils::error::Result;

pub struct ProgramEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ProgramEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<OutputReport> {
        tracing::info!("Starting program generation...");

        // Extract
        tracing::info!("Reading workbook...");
        let raw = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} type rows and {} program rows",
            raw.types.len(),
            raw.program.len()
        );

        // Transform
        tracing::info!("Building schedule...");
        let schedule = self.pipeline.transform(raw).await?;
        tracing::info!(
            "Built {} entries for {} units",
            schedule.entries.len(),
            schedule.units.len()
        );

        // Load
        tracing::info!("Writing outputs...");
        let report = self.pipeline.load(schedule).await?;
        tracing::info!("Outputs saved to: {}", report.directory);

        Ok(report)
    }

    /// Extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<Schedule> {
        let raw = self.pipeline.extract().await?;
        self.pipeline.transform(raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CellValue, RawWorkbook};
    use crate::utils::error::ProgramError;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubPipeline {
        loaded: AtomicBool,
        fail_extract: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<RawWorkbook> {
            if self.fail_extract {
                return Err(ProgramError::MissingSheetError {
                    name: "Programma".into(),
                });
            }
            Ok(RawWorkbook {
                types: vec![vec![CellValue::Text("Codice".into())]],
                program: vec![],
            })
        }

        async fn transform(&self, data: RawWorkbook) -> Result<Schedule> {
            assert_eq!(data.types.len(), 1);
            Ok(Schedule::default())
        }

        async fn load(&self, _schedule: Schedule) -> Result<OutputReport> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok(OutputReport {
                quarter: "2024-Q1".into(),
                directory: "2024-Q1".into(),
                html: "2024-Q1/program-2024-Q1.html".into(),
                pdf: None,
                archive: None,
                workbook_copy: "2024-Q1/Template-2024-Q1.xlsx".into(),
            })
        }
    }

    fn stub(fail_extract: bool) -> StubPipeline {
        StubPipeline {
            loaded: AtomicBool::new(false),
            fail_extract,
        }
    }

    #[tokio::test]
    async fn test_run_goes_through_every_phase() {
        let engine = ProgramEngine::new(stub(false));
        let report = engine.run().await.unwrap();
        assert_eq!(report.directory, "2024-Q1");
        assert!(engine.pipeline.loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_preview_does_not_load() {
        let engine = ProgramEngine::new(stub(false));
        engine.preview().await.unwrap();
        assert!(!engine.pipeline.loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_extract_error_stops_the_run() {
        let engine = ProgramEngine::new(stub(true));
        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, ProgramError::MissingSheetError { .. }));
        assert!(!engine.pipeline.loaded.load(Ordering::SeqCst));
    }
}

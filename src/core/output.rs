use crate::domain::model::{ArchiveFormat, Quarter};
use std::path::Path;

/// File names for one run. Paths are relative to the output root; names
/// inside the quarter directory are joined with [`OutputPlan::in_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub quarter: String,
    pub directory: String,
    pub html: String,
    pub pdf: String,
    pub workbook_copy: String,
    pub copies_pdf: String,
    pub copies_archive: String,
}

impl OutputPlan {
    pub fn new(
        quarter: &Quarter,
        document_name: &str,
        workbook: &Path,
        copies: usize,
        archive: ArchiveFormat,
    ) -> Self {
        let label = quarter.label();
        let stem = format!("{}-{}", document_name, label);
        let copies_stem = format!("{} x{}", stem, copies);

        let workbook_stem = workbook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string());
        let workbook_copy = match workbook.extension() {
            Some(ext) => format!("{}-{}.{}", workbook_stem, label, ext.to_string_lossy()),
            None => format!("{}-{}", workbook_stem, label),
        };

        Self {
            directory: label.clone(),
            quarter: label,
            html: format!("{}.html", stem),
            pdf: format!("{}.pdf", stem),
            workbook_copy,
            copies_pdf: format!("{}.pdf", copies_stem),
            copies_archive: format!("{}.{}", copies_stem, archive.extension()),
        }
    }

    pub fn in_directory(&self, name: &str) -> String {
        format!("{}/{}", self.directory, name)
    }
}

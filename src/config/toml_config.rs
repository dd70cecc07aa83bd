use crate::core::ConfigProvider;
use crate::domain::model::{ArchiveFormat, PdfOptions, SheetLayout, ToolCommands};
use crate::utils::error::{ProgramError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "quarter-program.toml";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramConfig {
    #[serde(default)]
    pub workbook: WorkbookConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub copies: CopiesConfig,
    #[serde(default)]
    pub tools: ToolCommands,
}

fn default_workbook_path() -> String {
    "Template.xlsx".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookConfig {
    #[serde(default = "default_workbook_path")]
    pub path: String,
    #[serde(flatten)]
    pub layout: SheetLayout,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            path: default_workbook_path(),
            layout: SheetLayout::default(),
        }
    }
}

fn default_output_root() -> String {
    ".".to_string()
}

fn default_document_name() -> String {
    "program".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_root")]
    pub root: String,
    /// Stem of the generated HTML/PDF files.
    #[serde(default = "default_document_name")]
    pub document_name: String,
    #[serde(default)]
    pub create_parents: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            document_name: default_document_name(),
            create_parents: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub options: PdfOptions,
}

fn default_copy_count() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopiesConfig {
    #[serde(default = "default_copy_count")]
    pub count: usize,
    #[serde(default)]
    pub archive: ArchiveFormat,
}

impl Default for CopiesConfig {
    fn default() -> Self {
        Self {
            count: default_copy_count(),
            archive: ArchiveFormat::default(),
        }
    }
}

impl ProgramConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProgramError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProgramError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROGRAM_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProgramError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ProgramConfig {
    fn validate(&self) -> Result<()> {
        validate_path("workbook.path", &self.workbook.path)?;
        validate_file_extension("workbook.path", &self.workbook.path, &WORKBOOK_EXTENSIONS)?;
        validate_non_empty_string("workbook.types_sheet", &self.workbook.layout.types_sheet)?;
        validate_non_empty_string("workbook.program_sheet", &self.workbook.layout.program_sheet)?;
        validate_non_empty_string("workbook.notes_header", &self.workbook.layout.notes_header)?;

        if self.workbook.layout.weekday_names.len() != 7 {
            return Err(ProgramError::InvalidConfigValueError {
                field: "workbook.weekday_names".to_string(),
                value: self.workbook.layout.weekday_names.join(","),
                reason: "Exactly seven names are required, Monday first".to_string(),
            });
        }

        validate_path("output.root", &self.output.root)?;
        validate_non_empty_string("output.document_name", &self.output.document_name)?;
        if self.output.document_name.contains(['/', '\\']) {
            return Err(ProgramError::InvalidConfigValueError {
                field: "output.document_name".to_string(),
                value: self.output.document_name.clone(),
                reason: "Document name must not contain path separators".to_string(),
            });
        }

        validate_range("pdf.scale", self.pdf.options.scale, 0.1, 2.0)?;
        validate_non_empty_string("pdf.paper_format", &self.pdf.options.paper_format)?;
        validate_positive_number("copies.count", self.copies.count, 1)?;

        validate_non_empty_string("tools.converter", &self.tools.converter)?;
        validate_non_empty_string("tools.duplicator", &self.tools.duplicator)?;
        validate_non_empty_string("tools.archiver", &self.tools.archiver)?;

        Ok(())
    }
}

impl ConfigProvider for ProgramConfig {
    fn workbook_path(&self) -> &str {
        &self.workbook.path
    }

    fn output_root(&self) -> &str {
        &self.output.root
    }

    fn document_name(&self) -> &str {
        &self.output.document_name
    }

    fn create_parents(&self) -> bool {
        self.output.create_parents
    }

    fn pdf_enabled(&self) -> bool {
        self.pdf.enabled
    }

    fn copies(&self) -> usize {
        self.copies.count
    }

    fn archive_format(&self) -> ArchiveFormat {
        self.copies.archive
    }

    fn sheet_layout(&self) -> &SheetLayout {
        &self.workbook.layout
    }

    fn pdf_options(&self) -> &PdfOptions {
        &self.pdf.options
    }

    fn tools(&self) -> &ToolCommands {
        &self.tools
    }
}

pub mod toml_config;

pub use toml_config::{ProgramConfig, DEFAULT_CONFIG_FILE};

#[cfg(feature = "cli")]
use crate::domain::model::ArchiveFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "quarter-program")]
#[command(about = "Builds the printable quarterly program from the planning workbook")]
pub struct CliArgs {
    /// Also produce the PDF, the multi-copy PDF and its archive
    #[arg(long)]
    pub pdf: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Planning workbook (overrides [workbook].path)
    #[arg(short, long)]
    pub workbook: Option<String>,

    /// Directory that receives the quarter folder (overrides [output].root)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Number of copies in the multi-copy PDF
    #[arg(long)]
    pub copies: Option<usize>,

    /// Archive format for the copies: sevenzip or zip
    #[arg(long)]
    pub archive: Option<ArchiveFormat>,

    /// Load and check the workbook without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// Command line flags win over the configuration file.
    pub fn apply_to(&self, config: &mut ProgramConfig) {
        if self.pdf {
            config.pdf.enabled = true;
        }
        if let Some(workbook) = &self.workbook {
            config.workbook.path = workbook.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.root = output_dir.clone();
        }
        if let Some(copies) = self.copies {
            config.copies.count = copies;
        }
        if let Some(archive) = self.archive {
            config.copies.archive = archive;
        }
    }
}

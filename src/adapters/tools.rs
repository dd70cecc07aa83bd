//! External collaborators: the HTML to PDF converter, the PDF duplicator and
//! the archiver. Each is spawned as a subprocess and its exit status checked.

use crate::domain::model::{PdfOptions, ToolCommands};
use crate::domain::ports::{CommandRunner, ToolInvocation};
use crate::utils::error::{ProgramError, Result};
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use zip::write::{SimpleFileOptions, ZipWriter};

const STDERR_TAIL: usize = 400;

#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        tracing::debug!(
            "Running {}: {} {:?} (in {})",
            invocation.tool,
            invocation.program,
            invocation.args,
            invocation.working_dir.display()
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .output()
            .await
            .map_err(|e| {
                ProgramError::external_tool(
                    &invocation.tool,
                    format!("could not start '{}': {}", invocation.program, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let tail = match stderr.char_indices().rev().nth(STDERR_TAIL) {
                Some((idx, _)) => &stderr[idx..],
                None => stderr,
            };
            return Err(ProgramError::external_tool(
                &invocation.tool,
                format!("'{}' exited with {}: {}", invocation.program, output.status, tail),
            ));
        }

        Ok(())
    }
}

/// `puppeteer-pdf <html> --path <pdf> -s <scale> -f <format> [--printBackground]`
pub fn converter_invocation(
    tools: &ToolCommands,
    options: &PdfOptions,
    html: &str,
    pdf: &str,
    working_dir: &Path,
) -> ToolInvocation {
    let mut args = vec![
        html.to_string(),
        "--path".to_string(),
        pdf.to_string(),
        "-s".to_string(),
        options.scale.to_string(),
        "-f".to_string(),
        options.paper_format.clone(),
    ];
    if options.print_background {
        args.push("--printBackground".to_string());
    }

    ToolInvocation {
        tool: "pdf-converter".to_string(),
        program: tools.converter.clone(),
        args,
        working_dir: working_dir.to_path_buf(),
    }
}

/// `pdftk A=<pdf> cat A A … output <target>`
pub fn duplicator_invocation(
    tools: &ToolCommands,
    pdf: &str,
    copies: usize,
    target: &str,
    working_dir: &Path,
) -> ToolInvocation {
    let mut args = vec![format!("A={}", pdf), "cat".to_string()];
    args.extend(std::iter::repeat("A".to_string()).take(copies));
    args.push("output".to_string());
    args.push(target.to_string());

    ToolInvocation {
        tool: "pdf-duplicator".to_string(),
        program: tools.duplicator.clone(),
        args,
        working_dir: working_dir.to_path_buf(),
    }
}

/// `7z a <archive> <file>`
pub fn archiver_invocation(
    tools: &ToolCommands,
    archive: &str,
    file: &str,
    working_dir: &Path,
) -> ToolInvocation {
    ToolInvocation {
        tool: "archiver".to_string(),
        program: tools.archiver.clone(),
        args: vec!["a".to_string(), archive.to_string(), file.to_string()],
        working_dir: working_dir.to_path_buf(),
    }
}

/// Packs a single file into an in-memory zip archive.
pub fn zip_single_file(name: &str, contents: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(name, options)?;
    zip.write_all(contents)?;
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

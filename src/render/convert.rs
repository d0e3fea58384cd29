//! Derived-format conversion via external tools.
//!
//! PDF output shells out to LibreOffice (`soffice --headless`); page
//! images continue PDF to PNG through `pdftoppm`. Every step runs under
//! an overall timeout, and a failed or timed-out conversion leaves no
//! partial artifact behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::common::{Error, Result};

/// Overall budget for one external conversion step.
pub const CONVERT_TIMEOUT: Duration = Duration::from_secs(60);

/// Raster resolution for page images.
const IMAGE_DPI: u32 = 150;

/// Convert a PPTX file to PDF, writing to `output_path`.
pub async fn pptx_to_pdf(pptx_path: &Path, output_path: &Path) -> Result<()> {
    let outdir = output_path
        .parent()
        .ok_or_else(|| Error::Conversion("output path has no parent directory".to_string()))?;

    let mut command = Command::new("soffice");
    command
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(outdir)
        .arg(pptx_path)
        .kill_on_drop(true);

    run_bounded(command, "soffice").await?;

    // LibreOffice names the output after the input stem
    let generated = outdir
        .join(pptx_path.file_stem().unwrap_or_default())
        .with_extension("pdf");
    if !generated.exists() {
        return Err(Error::Conversion(format!(
            "soffice produced no output for {}",
            pptx_path.display()
        )));
    }
    if generated != output_path {
        tokio::fs::rename(&generated, output_path).await?;
    }
    Ok(())
}

/// Convert a PDF to one PNG per page under `output_dir`, returning the
/// page image paths in page order.
pub async fn pdf_to_images(pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(output_dir).await?;
    let prefix = output_dir.join("page");

    let mut command = Command::new("pdftoppm");
    command
        .arg("-png")
        .arg("-r")
        .arg(IMAGE_DPI.to_string())
        .arg(pdf_path)
        .arg(&prefix)
        .kill_on_drop(true);

    if let Err(err) = run_bounded(command, "pdftoppm").await {
        // No partial artifacts on failure
        let _ = tokio::fs::remove_dir_all(output_dir).await;
        return Err(err);
    }

    let mut pages = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "png") {
            pages.push(path);
        }
    }
    // pdftoppm zero-pads page numbers, so lexical order is page order
    pages.sort();

    if pages.is_empty() {
        return Err(Error::Conversion(format!(
            "pdftoppm produced no pages for {}",
            pdf_path.display()
        )));
    }
    Ok(pages)
}

async fn run_bounded(mut command: Command, tool: &str) -> Result<()> {
    let output = timeout(CONVERT_TIMEOUT, command.output())
        .await
        .map_err(|_| Error::Conversion(format!("{tool} timed out after {CONVERT_TIMEOUT:?}")))?
        .map_err(|e| Error::Conversion(format!("failed to launch {tool}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Conversion(format!(
            "{tool} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

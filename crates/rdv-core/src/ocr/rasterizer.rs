//! Page rasterization through poppler's `pdftoppm`.

use std::path::Path;
use std::process::Command;

use tracing::{debug, trace, warn};

use super::{PageRasterizer, RenderedPage, Result};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const PREFIX: &str = "page";

/// Rasterizer invoking `pdftoppm -png -r <dpi> -f 1 -l <max_pages>`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(command: impl Into<String>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.rasterizer_command.clone(), config.render_dpi)
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path, out_dir: &Path, max_pages: u32) -> Result<Vec<RenderedPage>> {
        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg(max_pages.to_string())
            .arg(pdf)
            .arg(out_dir.join(PREFIX))
            .output()
            .map_err(|e| OcrError::Rasterize(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Rasterize(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let pages = collect_rendered_pages(out_dir, max_pages)?;
        if pages.is_empty() {
            return Err(OcrError::Rasterize("no pages were rendered".to_string()));
        }

        debug!("Rasterized {} pages at {} DPI", pages.len(), self.dpi);
        Ok(pages)
    }
}

/// Find `page-N.png` files in `dir`, decode their headers, and sort by page.
///
/// pdftoppm zero-pads the page number depending on the document's page
/// count, so the number is parsed rather than formatted.
pub(crate) fn collect_rendered_pages(dir: &Path, max_pages: u32) -> Result<Vec<RenderedPage>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| OcrError::Rasterize(format!("cannot read {}: {}", dir.display(), e)))?;

    let mut pages = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }

        let Some(number) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.rsplit_once('-'))
            .and_then(|(_, n)| n.parse::<u32>().ok())
        else {
            trace!("Ignoring unexpected file {}", path.display());
            continue;
        };

        if number == 0 || number > max_pages {
            continue;
        }

        match image::image_dimensions(&path) {
            Ok((width, height)) if width > 0 && height > 0 => {
                trace!("Page {} rendered at {}x{}", number, width, height);
                pages.push(RenderedPage {
                    number,
                    path,
                    width,
                    height,
                });
            }
            Ok(_) => warn!("Page {} rendered as an empty image, skipping", number),
            Err(e) => warn!("Page {} render is not a readable image: {}", number, e),
        }
    }

    pages.sort_by_key(|p| p.number);
    Ok(pages)
}

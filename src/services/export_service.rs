use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ExportFormat, Site};
use crate::errors::{RapiError, RapiResult};
use crate::feed::FeedDocument;

/// What happened to each export format of one site.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(ExportFormat, RapiError)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes the feeds of a site into the destination folder.
pub struct ExportService {
    destination: PathBuf,
    dry_run: bool,
}

impl ExportService {
    pub fn new(destination: &Path) -> Self {
        Self {
            destination: destination.to_path_buf(),
            dry_run: false,
        }
    }

    /// Render without touching the filesystem.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn ensure_destination(&self) -> RapiResult<()> {
        if !self.destination.exists() {
            tracing::info!(path = %self.destination.display(), "Creating destination folder");
            fs::create_dir_all(&self.destination)?;
        }
        Ok(())
    }

    /// Write one file per export format of the site.
    ///
    /// The document is built once and rendered per format. A format that
    /// cannot be rendered or written is reported without affecting the
    /// site's other formats.
    pub fn export(&self, site: &Site) -> RapiResult<ExportReport> {
        let domain = site.config.domain()?;
        if !self.dry_run {
            self.ensure_destination()?;
        }

        let document = FeedDocument::build(site);
        let mut report = ExportReport::default();

        for &format in site.export_formats() {
            let path = self.destination.join(format.file_name(&domain));

            match self.write_feed(&document, format, &path) {
                Ok(()) => report.written.push(path),
                Err(e) => {
                    tracing::error!(
                        site = %site.url(),
                        format = %format,
                        error = %e,
                        "Unable to export feed"
                    );
                    report.failed.push((format, e));
                }
            }
        }

        Ok(report)
    }

    fn write_feed(&self, document: &FeedDocument, format: ExportFormat, path: &Path) -> RapiResult<()> {
        let content = document.render(format)?;

        if self.dry_run {
            tracing::info!(path = %path.display(), bytes = content.len(), "Would write feed");
            return Ok(());
        }

        tracing::info!(path = %path.display(), "Writing feed");
        fs::write(path, content)?;
        Ok(())
    }
}

pub mod raster;
pub mod pdf;
pub mod png;

use std::fmt;
use image::RgbImage;
use serde::Deserialize;
use tracing::{debug, info};
use crate::schedule::{Day, DayView};

pub use raster::BitmapRasterizer;
pub use pdf::PdfWriter;
pub use png::PngWriter;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to capture the schedule: {0}")]
    Capture(String),

    #[error("failed to generate the {format} document: {reason}")]
    Document { format: &'static str, reason: String },
}

/// Turns a day view into a pixel snapshot
pub trait Rasterizer {
    fn rasterize(&self, view: &DayView) -> Result<RgbImage, ExportError>;
}

/// Wraps a snapshot into a downloadable document
pub trait DocumentWriter {
    fn extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
    fn write(&self, title: &str, snapshot: &RgbImage) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Pdf => f.write_str("pdf"),
            ExportFormat::Png => f.write_str("png"),
        }
    }
}

/// A finished export, ready to be downloaded or written to disk
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `<Day>_schedule.<ext>`
pub fn export_file_name(day: Day, extension: &str) -> String {
    format!("{}_schedule.{}", day, extension)
}

/// Capture-then-generate pipeline over a rasterizer and a document writer
pub struct Exporter<R, W> {
    rasterizer: R,
    writer: W,
}

impl<R: Rasterizer, W: DocumentWriter> Exporter<R, W> {
    pub fn new(rasterizer: R, writer: W) -> Self {
        Exporter { rasterizer, writer }
    }

    pub fn export(&self, view: &DayView) -> Result<ExportedDocument, ExportError> {
        let snapshot = self.rasterizer.rasterize(view)?;
        debug!(width = snapshot.width(), height = snapshot.height(), "captured schedule");

        let title = format!("{} schedule", view.day);
        let bytes = self.writer.write(&title, &snapshot)?;
        let file_name = export_file_name(view.day, self.writer.extension());
        info!(file = %file_name, size = bytes.len(), "exported schedule");

        Ok(ExportedDocument {
            file_name,
            content_type: self.writer.content_type(),
            bytes,
        })
    }
}

/// Exports with the built-in rasterizer in the requested format
pub fn export_day(view: &DayView, format: ExportFormat) -> Result<ExportedDocument, ExportError> {
    match format {
        ExportFormat::Pdf => Exporter::new(BitmapRasterizer::default(), PdfWriter::default()).export(view),
        ExportFormat::Png => Exporter::new(BitmapRasterizer::default(), PngWriter).export(view),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use image::{Rgb, RgbImage};
    use super::*;

    /// Rasterizer that hands back a blank image, or fails on demand
    #[derive(Clone, Default)]
    pub struct FakeRasterizer {
        pub fail: bool,
        pub calls: Arc<AtomicUsize>,
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&self, _view: &DayView) -> Result<RgbImage, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExportError::Capture("render target missing".to_string()));
            }
            Ok(RgbImage::from_pixel(4, 2, Rgb([255, 255, 255])))
        }
    }

    /// Writer that records each title it is asked to write
    #[derive(Clone, Default)]
    pub struct FakeWriter {
        pub fail: bool,
        pub titles: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl DocumentWriter for FakeWriter {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn content_type(&self) -> &'static str {
            "application/pdf"
        }

        fn write(&self, title: &str, _snapshot: &RgbImage) -> Result<Vec<u8>, ExportError> {
            self.titles.lock().unwrap().push(title.to_string());
            if self.fail {
                return Err(ExportError::Document { format: "pdf", reason: "disk full".to_string() });
            }
            Ok(b"%PDF-fake".to_vec())
        }
    }
}

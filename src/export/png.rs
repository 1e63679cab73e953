use std::io::Cursor;
use image::{ImageFormat, RgbImage};
use super::{DocumentWriter, ExportError};

/// Writes the snapshot as-is, encoded as PNG
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter;

impl DocumentWriter for PngWriter {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn write(&self, _title: &str, snapshot: &RgbImage) -> Result<Vec<u8>, ExportError> {
        let mut cursor = Cursor::new(Vec::new());
        snapshot
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ExportError::Document { format: "png", reason: e.to_string() })?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use super::*;

    #[test]
    fn encodes_png_that_decodes_to_the_same_size() {
        let snapshot = RgbImage::from_pixel(12, 7, Rgb([10, 20, 30]));
        let bytes = PngWriter.write("ignored", &snapshot).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }
}

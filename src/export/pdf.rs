use chrono::Utc;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use super::{DocumentWriter, ExportError};

/// A4 portrait in PDF points
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Single page PDF with the snapshot spanning the full page width from the top-left corner.
/// Pages stretch vertically when the scaled snapshot is taller than A4.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    pub page_width: f32,
    pub min_page_height: f32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        PdfWriter {
            page_width: A4_WIDTH_PT,
            min_page_height: A4_HEIGHT_PT,
        }
    }
}

impl PdfWriter {
    /// (image width, image height, page height) in points
    pub fn layout(&self, pixel_width: u32, pixel_height: u32) -> (f32, f32, f32) {
        let image_height = pixel_height as f32 * self.page_width / pixel_width as f32;
        (self.page_width, image_height, image_height.max(self.min_page_height))
    }

    fn build(&self, title: &str, snapshot: &RgbImage) -> Result<Vec<u8>, lopdf::Error> {
        let (image_w, image_h, page_h) = self.layout(snapshot.width(), snapshot.height());

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(snapshot.width()),
                "Height" => i64::from(snapshot.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            snapshot.as_raw().clone(),
        ));

        // PDF origin is bottom-left; shift the image up so it hangs from the top edge
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        image_w.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        image_h.into(),
                        Object::Integer(0),
                        (page_h - image_h).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Snapshot".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Snapshot" => image_id },
            },
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), self.page_width.into(), page_h.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("shift-scheduler ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

impl DocumentWriter for PdfWriter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn write(&self, title: &str, snapshot: &RgbImage) -> Result<Vec<u8>, ExportError> {
        if snapshot.width() == 0 || snapshot.height() == 0 {
            return Err(ExportError::Document {
                format: "pdf",
                reason: "snapshot is empty".to_string(),
            });
        }
        self.build(title, snapshot).map_err(|e| ExportError::Document {
            format: "pdf",
            reason: e.to_string(),
        })
    }
}

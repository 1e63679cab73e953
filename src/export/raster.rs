use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS, MISC_FONTS};
use image::{Rgb, RgbImage};
use crate::schedule::{DayView, LocationView};
use super::{ExportError, Rasterizer};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([31, 41, 55]);
const MUTED: Rgb<u8> = Rgb([107, 114, 128]);
const BORDER: Rgb<u8> = Rgb([209, 213, 219]);
const WARNING: Rgb<u8> = Rgb([239, 68, 68]);

const GLYPH: u32 = 8;

/// Bitmap for `ch` from the first font8x8 set that covers it, '?' otherwise
fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| HIRAGANA_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draws the day as a two-column grid of location cards, like the page does
#[derive(Debug, Clone)]
pub struct BitmapRasterizer {
    pub width: u32,
    pub scale: u32,
    pub padding: u32,
    pub columns: u32,
}

impl Default for BitmapRasterizer {
    fn default() -> Self {
        BitmapRasterizer {
            width: 960,
            scale: 2,
            padding: 24,
            columns: 2,
        }
    }
}

impl BitmapRasterizer {
    fn line_height(&self) -> u32 {
        GLYPH * self.scale + 8
    }

    fn card_width(&self) -> u32 {
        self.width.saturating_sub(self.padding * (self.columns + 1)) / self.columns
    }

    fn card_lines(view: &LocationView) -> u32 {
        // title, projection, staffing, blank, employees, warning
        let warning = u32::from(view.understaffed);
        4 + view.shifts.len().max(1) as u32 + warning
    }

    fn card_height(&self, lines: u32) -> u32 {
        lines * self.line_height() + self.padding
    }

    /// Longest text that fits in `width` pixels, truncated with "..."
    fn fit(&self, text: &str, width: u32) -> String {
        let max_chars = (width / (GLYPH * self.scale)) as usize;
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }

    fn draw_text(&self, img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
        for (i, ch) in text.chars().enumerate() {
            let glyph = glyph(ch);
            let origin_x = x + i as u32 * GLYPH * self.scale;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = origin_x + col * self.scale;
                    let py = y + row as u32 * self.scale;
                    fill_rect(img, px, py, self.scale, self.scale, color);
                }
            }
        }
    }

    fn draw_card(&self, img: &mut RgbImage, x: u32, y: u32, height: u32, view: &LocationView) {
        let width = self.card_width();
        stroke_rect(img, x, y, width, height, BORDER);

        let inner_x = x + self.padding / 2;
        let inner_w = width - self.padding;
        let mut line_y = y + self.padding / 2;
        let step = self.line_height();

        self.draw_text(img, inner_x, line_y, &self.fit(view.location.label(), inner_w), INK);
        line_y += step;
        let projection = format!("Sales projection: ${}", view.sales_projection);
        self.draw_text(img, inner_x, line_y, &self.fit(&projection, inner_w), MUTED);
        line_y += step;
        let staffing = format!("Staff: {} / {}", view.shifts.len(), view.required_staff);
        self.draw_text(img, inner_x, line_y, &staffing, MUTED);
        line_y += step * 2;

        if view.shifts.is_empty() {
            self.draw_text(img, inner_x, line_y, "(no employees)", MUTED);
            line_y += step;
        }
        for name in &view.shifts {
            self.draw_text(img, inner_x, line_y, &self.fit(&format!("- {}", name), inner_w), INK);
            line_y += step;
        }

        if view.understaffed {
            self.draw_text(img, inner_x, line_y, "! Understaffed", WARNING);
        }
    }
}

impl Rasterizer for BitmapRasterizer {
    fn rasterize(&self, view: &DayView) -> Result<RgbImage, ExportError> {
        if self.columns == 0 || self.scale == 0 {
            return Err(ExportError::Capture("layout has no columns or zero scale".to_string()));
        }
        if self.card_width() < GLYPH * self.scale * 4 {
            return Err(ExportError::Capture(format!("width {} is too narrow", self.width)));
        }

        let rows: Vec<&[LocationView]> = view.locations.chunks(self.columns as usize).collect();
        let row_heights: Vec<u32> = rows
            .iter()
            .map(|row| {
                let lines = row.iter().map(Self::card_lines).max().unwrap_or(1);
                self.card_height(lines)
            })
            .collect();

        let header = self.line_height() + self.padding;
        let height = self.padding + header + row_heights.iter().map(|h| h + self.padding).sum::<u32>();
        let mut img = RgbImage::from_pixel(self.width, height, WHITE);

        self.draw_text(&mut img, self.padding, self.padding, &format!("{} schedule", view.day), INK);

        let mut y = self.padding + header;
        for (row, row_height) in rows.iter().zip(&row_heights) {
            for (col, location) in row.iter().enumerate() {
                let x = self.padding + col as u32 * (self.card_width() + self.padding);
                self.draw_card(&mut img, x, y, *row_height, location);
            }
            y += row_height + self.padding;
        }

        Ok(img)
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    fill_rect(img, x, y, w, 1, color);
    fill_rect(img, x, y + h.saturating_sub(1), w, 1, color);
    fill_rect(img, x, y, 1, h, color);
    fill_rect(img, x + w.saturating_sub(1), y, 1, h, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, Location, Schedule};

    fn has_color(img: &RgbImage, color: Rgb<u8>) -> bool {
        img.pixels().any(|p| *p == color)
    }

    #[test]
    fn empty_day_renders_without_warnings() {
        let view = DayView::build(&Schedule::new(), Day::Monday);
        let img = BitmapRasterizer::default().rasterize(&view).unwrap();
        assert_eq!(img.width(), 960);
        assert!(has_color(&img, INK));
        assert!(!has_color(&img, WARNING));
    }

    #[test]
    fn understaffed_cards_are_flagged_in_red() {
        let schedule = Schedule::new()
            .set_sales_projection(Day::Monday, Location::Suburb, "500")
            .unwrap();
        let img = BitmapRasterizer::default()
            .rasterize(&DayView::build(&schedule, Day::Monday))
            .unwrap();
        assert!(has_color(&img, WARNING));
    }

    #[test]
    fn image_grows_with_the_roster() {
        let rasterizer = BitmapRasterizer::default();
        let short = rasterizer.rasterize(&DayView::build(&Schedule::new(), Day::Monday)).unwrap();
        let mut schedule = Schedule::new();
        for i in 0..12 {
            schedule = schedule.add_employee(Day::Monday, Location::Downtown, &format!("Employee {}", i));
        }
        let tall = rasterizer.rasterize(&DayView::build(&schedule, Day::Monday)).unwrap();
        assert!(tall.height() > short.height());
    }

    #[test]
    fn accented_names_keep_their_letters() {
        assert_ne!(glyph('é'), glyph('?'));
        assert_ne!(glyph('ë'), glyph('?'));
        assert_ne!(glyph('ü'), glyph('?'));
        assert_eq!(glyph('\u{1F600}'), glyph('?'));

        let rasterizer = BitmapRasterizer::default();
        let draw = |name: &str| {
            let schedule = Schedule::new().add_employee(Day::Monday, Location::Downtown, name);
            rasterizer.rasterize(&DayView::build(&schedule, Day::Monday)).unwrap()
        };
        assert_ne!(draw("José"), draw("Jos?"));
    }

    #[test]
    fn long_names_are_truncated() {
        let rasterizer = BitmapRasterizer::default();
        let fitted = rasterizer.fit(&"x".repeat(200), 160);
        assert_eq!(fitted.len(), 10);
        assert!(fitted.ends_with("..."));
        assert_eq!(rasterizer.fit("Ana", 160), "Ana");
    }

    #[test]
    fn degenerate_layout_is_a_capture_error() {
        let rasterizer = BitmapRasterizer { width: 100, ..Default::default() };
        let err = rasterizer
            .rasterize(&DayView::build(&Schedule::new(), Day::Monday))
            .unwrap_err();
        assert!(matches!(err, ExportError::Capture(_)));
    }
}

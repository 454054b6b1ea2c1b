//! OCR capability for scanned front-matter pages.

#[cfg(feature = "ocr")]
mod pure_engine;

#[cfg(feature = "ocr")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Turns a page image into text.
pub trait PageOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Load the configured OCR backend.
#[cfg(feature = "ocr")]
pub fn load_page_ocr(config: &OcrConfig) -> Result<Box<dyn PageOcr>, OcrError> {
    Ok(Box::new(PureOcrEngine::from_config(config.clone())?))
}

/// Load the configured OCR backend.
#[cfg(not(feature = "ocr"))]
pub fn load_page_ocr(_config: &OcrConfig) -> Result<Box<dyn PageOcr>, OcrError> {
    Err(OcrError::ModelLoad(
        "shelfmark was built without the `ocr` feature".to_string(),
    ))
}

/// A recognized text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub score: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on a page image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrResult {
    /// Build a result from unordered boxes, in reading order.
    pub fn from_boxes(boxes: Vec<TextBox>, processing_time_ms: u64) -> Self {
        let mut result = Self {
            boxes,
            text: String::new(),
            processing_time_ms,
        };
        result.sort_by_reading_order();
        result
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            row_a
                .cmp(&row_b)
                .then_with(|| ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
        });

        // Rebuild full text; boxes on one row join into one line
        let mut lines: Vec<(i32, String)> = Vec::new();
        for text_box in &self.boxes {
            let row = (text_box.rect().1 / 20.0) as i32;
            match lines.last_mut() {
                Some((last_row, line)) if *last_row == row => {
                    line.push(' ');
                    line.push_str(&text_box.text);
                }
                _ => lines.push((row, text_box.text.clone())),
            }
        }

        self.text = lines
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(x: f32, y: f32, text: &str) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_reading_order_joins_rows() {
        let result = OcrResult::from_boxes(
            vec![
                text_box(200.0, 100.0, "Press"),
                text_box(10.0, 300.0, "1998"),
                text_box(10.0, 102.0, "Example"),
            ],
            5,
        );

        assert_eq!(result.text, "Example Press\n1998");
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn test_load_without_feature_fails() {
        assert!(matches!(
            load_page_ocr(&OcrConfig::default()),
            Err(OcrError::ModelLoad(_))
        ));
    }
}

//! Pure Rust recognizer using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use super::{PageRecognizer, Result};
use crate::error::OcrError;
use crate::models::config::RdvConfig;

/// A recognized region in page coordinates.
struct RecognizedBox {
    bbox: [f32; 8],
    text: String,
}

impl RecognizedBox {
    fn top_left(&self) -> (f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        (min_x, min_y)
    }
}

/// Recognizer backed by PaddleOCR models run through `pure-onnx-ocr`.
pub struct OnnxRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl OnnxRecognizer {
    /// Load detection, recognition and dictionary files named in `config.models`.
    pub fn from_config(config: &RdvConfig) -> Result<Self> {
        let det_path = config.model_path(&config.models.detection_model);
        let rec_path = config.model_path(&config.models.recognition_model);
        let dict_path = config.model_path(&config.models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {}",
            config.models.model_dir.display()
        );

        Ok(Self {
            engine,
            keep_unk: config.ocr.keep_unk,
        })
    }
}

impl PageRecognizer for OnnxRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<String> {
        let start = Instant::now();
        let image = image::open(image_path).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        let (width, height) = image.dimensions();

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<RecognizedBox> = results
            .iter()
            .map(|r| RecognizedBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                },
            })
            .collect();

        // Reading order: rows of ~20px, then left to right.
        boxes.sort_by(|a, b| {
            let (ax, ay) = a.top_left();
            let (bx, by) = b.top_left();
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "pure-onnx-ocr: {} regions on {}x{} page in {}ms",
            boxes.len(),
            width,
            height,
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Convert a `Polygon<f64>` to `[x1, y1, x2, y2, x3, y3, x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

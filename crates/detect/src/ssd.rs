//! SSD face detector (res10 300x300) on ONNX Runtime.

use {
    crate::{DetectError, Detector},
    ndarray::Array4,
    std::{path::Path, sync::Mutex},
    video::RawFrame,
    wire::FaceBox,
};

/// Model input resolution.
const INPUT_SIZE: u32 = 300;

/// Per-channel means, BGR order (the network was trained on BGR input).
const MEAN_BGR: [f32; 3] = [104.0, 177.0, 123.0];

/// Detections at or below this confidence are discarded.
const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Values per detection row: (image_id, label, confidence, x1, y1, x2, y2).
const DETECTION_FIELDS: usize = 7;

/// SSD face detector backed by a single ONNX Runtime session.
///
/// The session is loaded once and shared across sessions; inference is
/// serialized through an interior mutex.
pub struct SsdDetector {
    session: Mutex<ort::session::Session>,
}

impl SsdDetector {
    /// Load the model. Failure here is fatal to the process; there is no
    /// per-call recovery from a missing or corrupt model.
    pub fn load(model_path: &Path) -> Result<Self, DetectError> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        log::info!("loaded detection model from {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Detector for SsdDetector {
    fn detect(&self, frame: &RawFrame) -> Result<Vec<FaceBox>, DetectError> {
        let input = preprocess(frame)?;
        let tensor = ort::value::Tensor::from_array(input)?;

        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        let outputs = session.run(ort::inputs![tensor])?;
        let detections = outputs[0].try_extract_array::<f32>()?;
        let data = detections
            .as_slice()
            .ok_or_else(|| DetectError::Output("detection tensor is not contiguous".to_string()))?;
        if data.len() % DETECTION_FIELDS != 0 {
            return Err(DetectError::Output(format!(
                "detection tensor length {} is not a multiple of {}",
                data.len(),
                DETECTION_FIELDS
            )));
        }

        Ok(map_detections(data, frame.width, frame.height))
    }
}

/// Resize to 300x300 and build the NCHW input blob with per-channel mean
/// subtraction, converting RGB frame data to the BGR order the model expects.
fn preprocess(frame: &RawFrame) -> Result<Array4<f32>, DetectError> {
    let image = image::ImageBuffer::<image::Rgb<u8>, &[u8]>::from_raw(
        frame.width,
        frame.height,
        frame.data.as_slice(),
    )
    .ok_or_else(|| {
        DetectError::Frame(format!(
            "frame data length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        ))
    })?;

    let resized = image::imageops::resize(
        &image,
        INPUT_SIZE,
        INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );

    let side = INPUT_SIZE as usize;
    let mut input = Array4::<f32>::zeros((1, 3, side, side));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let [r, g, b] = pixel.0;
        input[[0, 0, y, x]] = b as f32 - MEAN_BGR[0];
        input[[0, 1, y, x]] = g as f32 - MEAN_BGR[1];
        input[[0, 2, y, x]] = r as f32 - MEAN_BGR[2];
    }
    Ok(input)
}

/// Filter raw detections by confidence and map relative box coordinates back
/// to pixel coordinates of the original frame. Detection order is preserved.
fn map_detections(data: &[f32], width: u32, height: u32) -> Vec<FaceBox> {
    let mut faces = Vec::new();
    for detection in data.chunks_exact(DETECTION_FIELDS) {
        let confidence = detection[2];
        if confidence > CONFIDENCE_THRESHOLD {
            faces.push(scale_box(&detection[3..7], width, height, confidence));
        }
    }
    faces
}

fn scale_box(relative: &[f32], width: u32, height: u32, confidence: f32) -> FaceBox {
    // truncate like the original integer conversion, then clamp into frame
    let x1 = (relative[0] * width as f32) as i64;
    let y1 = (relative[1] * height as f32) as i64;
    let x2 = (relative[2] * width as f32) as i64;
    let y2 = (relative[3] * height as f32) as i64;

    FaceBox {
        x: x1.max(0) as u32,
        y: y1.max(0) as u32,
        width: (x2 - x1).max(0) as u32,
        height: (y2 - y1).max(0) as u32,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(confidence: f32, rel: [f32; 4]) -> [f32; 7] {
        [0.0, 1.0, confidence, rel[0], rel[1], rel[2], rel[3]]
    }

    #[test]
    fn test_confidence_filtering_keeps_order() {
        let mut data = Vec::new();
        for confidence in [0.3, 0.6, 0.9, 0.5] {
            data.extend_from_slice(&detection(confidence, [0.1, 0.1, 0.2, 0.2]));
        }

        let faces = map_detections(&data, 640, 480);
        let kept: Vec<f32> = faces.iter().map(|f| f.confidence).collect();
        assert_eq!(kept, vec![0.6, 0.9]);
    }

    #[test]
    fn test_coordinate_mapping() {
        let data = detection(0.8, [0.1, 0.2, 0.5, 0.6]);
        let faces = map_detections(&data, 640, 480);

        assert_eq!(faces.len(), 1);
        let face = &faces[0];
        assert_eq!(face.x, 64);
        assert_eq!(face.y, 96);
        assert_eq!(face.width, 256);
        assert_eq!(face.height, 192);
    }

    #[test]
    fn test_out_of_frame_boxes_clamp_to_zero() {
        let data = detection(0.95, [-0.1, -0.2, 0.5, 0.5]);
        let faces = map_detections(&data, 100, 100);

        let face = &faces[0];
        assert_eq!(face.x, 0);
        assert_eq!(face.y, 0);
        // width/height keep the truncated span, never negative
        assert_eq!(face.width, 60);
        assert_eq!(face.height, 70);
    }

    #[test]
    fn test_preprocess_rejects_bad_dimensions() {
        let frame = RawFrame {
            width: 10,
            height: 10,
            data: vec![0u8; 17],
        };
        assert!(preprocess(&frame).is_err());
    }

    #[test]
    fn test_preprocess_mean_subtraction() {
        // a uniform white frame resizes to uniform white; every input value
        // is 255 minus the channel mean
        let frame = RawFrame::new(8, 8, vec![255u8; 8 * 8 * 3]);
        let input = preprocess(&frame).expect("preprocess failed");

        assert_eq!(input.shape(), &[1, 3, 300, 300]);
        assert_eq!(input[[0, 0, 150, 150]], 255.0 - 104.0);
        assert_eq!(input[[0, 1, 150, 150]], 255.0 - 177.0);
        assert_eq!(input[[0, 2, 150, 150]], 255.0 - 123.0);
    }
}

//! Model artifact provisioning: fetch-if-missing, cached on disk.
//!
//! This is startup plumbing, not part of the pipeline's runtime contract.
//! The daemon calls [`ensure_model`] once before it starts accepting
//! connections.

use {
    crate::DetectError,
    std::{
        fs,
        io,
        path::{Path, PathBuf},
    },
};

const DEFAULT_MODEL_DIR: &str = "data/res10";
const MODEL_FILE: &str = "res10_300x300_ssd.onnx";
const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/opencv-models/res10-ssd-face/resolve/main/res10_300x300_ssd_iter_140000.onnx";

/// Return the local model path, downloading the artifact first if it is not
/// cached yet. `FACESTREAM_MODEL_DIR` and `FACESTREAM_MODEL_URL` override the
/// defaults.
pub fn ensure_model() -> Result<PathBuf, DetectError> {
    let dir = std::env::var("FACESTREAM_MODEL_DIR")
        .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
    let path = Path::new(&dir).join(MODEL_FILE);

    if path.exists() {
        log::info!("using cached detection model at {}", path.display());
        return Ok(path);
    }

    let url =
        std::env::var("FACESTREAM_MODEL_URL").unwrap_or_else(|_| DEFAULT_MODEL_URL.to_string());
    log::info!("downloading detection model from {url}");
    fs::create_dir_all(&dir)?;

    let response = ureq::get(&url)
        .call()
        .map_err(|e| DetectError::Provision(format!("GET {url}: {e}")))?;

    // write to a partial file and rename, so an interrupted download is
    // never mistaken for a cached model
    let partial = path.with_extension("onnx.partial");
    let mut reader = response.into_reader();
    let mut file = fs::File::create(&partial)?;
    let bytes = io::copy(&mut reader, &mut file)?;
    fs::rename(&partial, &path)?;

    log::info!("downloaded detection model ({bytes} bytes) to {}", path.display());
    Ok(path)
}

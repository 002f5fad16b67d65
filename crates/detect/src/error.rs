use std::fmt;

#[derive(Debug)]
pub enum DetectError {
    /// Model load or inference failure from the ONNX runtime.
    Runtime(ort::Error),
    /// The input frame could not be converted into model input.
    Frame(String),
    /// The model output did not have the expected shape.
    Output(String),
    /// Model provisioning (download/cache) failure.
    Provision(String),
    Io(std::io::Error),
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::Runtime(err) => write!(f, "onnx runtime error: {err}"),
            DetectError::Frame(msg) => write!(f, "bad frame: {msg}"),
            DetectError::Output(msg) => write!(f, "bad model output: {msg}"),
            DetectError::Provision(msg) => write!(f, "model provisioning failed: {msg}"),
            DetectError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for DetectError {}

impl From<ort::Error> for DetectError {
    fn from(err: ort::Error) -> Self {
        DetectError::Runtime(err)
    }
}

impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        DetectError::Io(err)
    }
}

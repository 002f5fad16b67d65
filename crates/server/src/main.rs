use {
    detect::{Detector, SsdDetector, provision},
    server::Server,
    std::sync::Arc,
};

const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FACESTREAM_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    // no detector, no service: a failed model load is fatal before bind
    log::info!("loading detection model");
    let detector = tokio::task::spawn_blocking(|| {
        let model_path = provision::ensure_model()?;
        SsdDetector::load(&model_path)
    })
    .await??;
    let detector: Arc<dyn Detector> = Arc::new(detector);

    log::info!("listening on {addr}");
    let _server = Server::bind(addr.as_str(), detector).await?;

    tokio::signal::ctrl_c().await?;
    log::info!("shutting down");
    Ok(())
}

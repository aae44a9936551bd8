use mock_server::Options;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "4443".to_string());
    let options = Options {
        secret: std::env::var("OPENVIDU_SECRET").unwrap_or_else(|_| "MY_SECRET".to_string()),
        recording_enabled: std::env::var("OPENVIDU_RECORDING")
            .map(|v| v != "false")
            .unwrap_or(true),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, recording = options.recording_enabled, "listening");
    mock_server::run(listener, options).await
}

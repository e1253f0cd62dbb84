use mock_server::AppState;
use sms_core::Credentials;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "4010".to_string());
    let mut state = AppState::new();
    if let (Ok(username), Ok(password)) = (std::env::var("MOCK_USERNAME"), std::env::var("MOCK_PASSWORD")) {
        state = state.with_credentials(Credentials::new(username, password));
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, auth = state.credentials.is_some(), "listening");
    mock_server::run(listener, state).await
}

use mock_server::MockConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = MockConfig::default();
    if let Ok(user) = std::env::var("ADMIN_USER") {
        config.admin_user = user;
    }
    if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
        config.admin_password = password;
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock comics backend listening");
    mock_server::run_with(listener, config).await
}

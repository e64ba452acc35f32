/**
 * filedesk Edge Server Entry Point
 *
 * Serves the page directory behind the session guard.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = filedesk::edge::EdgeConfig::from_env()?;
    let app = filedesk::edge::create_app(config.routes.clone(), &config.pages_dir);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("[Edge] Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("The edge server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin filedesk-edge --features ssr");
    std::process::exit(1);
}

use std::env;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use banner_api::{app, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = env::var("PORT").unwrap_or_else(|_| "3000".into()).parse()?;
    let environment: Environment = env::var("ENVIRONMENT")
        .map_err(|_| anyhow::anyhow!("Missing required env var: ENVIRONMENT"))?
        .parse()?;

    let router = app::intern_app();

    let addr = format!("{host}:{port}");
    info!(
        environment = environment.as_str(),
        "intern API listening on {}", addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

//! Seeds a demo banner so the dashboard and landing page have something to
//! show on a fresh database.
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo [--name NAME] [--expires-in-hours N] [--inactive]

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use ulid::Ulid;

#[derive(Parser)]
#[command(name = "seed-demo", about = "Seed a demo banner into the banners table")]
struct Args {
    /// Banner headline
    #[arg(long, default_value = "Launch day is coming")]
    name: String,

    /// Optional banner description
    #[arg(long)]
    description: Option<String>,

    /// Hours from now until the countdown target
    #[arg(long, default_value_t = 72)]
    expires_in_hours: i64,

    /// Seed the banner as inactive
    #[arg(long)]
    inactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    banner_api::db::run_migrations(&pool).await?;

    let id = Ulid::new().to_string();
    let expires_at = Utc::now() + Duration::hours(args.expires_in_hours);

    sqlx::query(
        "INSERT INTO banners (id, name, description, is_active, expires_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&id)
    .bind(&args.name)
    .bind(&args.description)
    .bind(!args.inactive)
    .bind(expires_at)
    .execute(&pool)
    .await
    .context("Failed to insert banner")?;

    tracing::info!(
        "Seeded banner {} ({}, expires {})",
        id,
        if args.inactive { "inactive" } else { "active" },
        expires_at
    );

    Ok(())
}

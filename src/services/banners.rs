use sqlx::PgPool;
use ulid::Ulid;

use crate::models::banner::{Banner, NewBanner};

pub struct BannerService;

impl BannerService {
    /// The "current banner" view: the most recently created active row.
    pub async fn list_active(pool: &PgPool) -> anyhow::Result<Vec<Banner>> {
        let banners = sqlx::query_as::<_, Banner>(
            "SELECT * FROM banners WHERE is_active = TRUE ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_all(pool)
        .await?;
        Ok(banners)
    }

    pub async fn get(pool: &PgPool, id: &str) -> anyhow::Result<Option<Banner>> {
        let banner = sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(banner)
    }

    pub async fn exists(pool: &PgPool, id: &str) -> anyhow::Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM banners WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Insert a new row and re-read it inside the same transaction so the
    /// returned banner carries the database-assigned `created_at`.
    pub async fn create(pool: &PgPool, payload: &NewBanner) -> anyhow::Result<Banner> {
        let id = Ulid::new().to_string();

        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO banners (id, name, description, is_active, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.is_active)
        .bind(payload.expires_at)
        .execute(&mut *tx)
        .await?;

        let banner = sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = $1")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(banner)
    }

    /// Update mutable fields and stamp `updated_at`, returning the row as
    /// re-read inside the transaction. Callers check existence first.
    pub async fn update(pool: &PgPool, id: &str, payload: &NewBanner) -> anyhow::Result<Banner> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE banners
             SET name = $1, description = $2, is_active = $3, expires_at = $4, updated_at = NOW()
             WHERE id = $5",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.is_active)
        .bind(payload.expires_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let banner = sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(banner)
    }
}

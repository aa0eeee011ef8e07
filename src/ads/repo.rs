use sqlx::PgPool;
use uuid::Uuid;

use crate::ads::repo_types::{Ad, AdWithOwner, NewAd};

impl Ad {
    pub async fn insert(db: &PgPool, ad: &NewAd) -> sqlx::Result<Ad> {
        sqlx::query_as::<_, Ad>(
            r#"
            INSERT INTO ads (name, image_url, link_url, width, height, zip_codes, active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, image_url, link_url, width, height, zip_codes, active, created_by, created_at
            "#,
        )
        .bind(&ad.name)
        .bind(&ad.image_url)
        .bind(&ad.link_url)
        .bind(ad.width)
        .bind(ad.height)
        .bind(&ad.zip_codes)
        .bind(ad.active)
        .bind(ad.created_by)
        .fetch_one(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Ad>> {
        sqlx::query_as::<_, Ad>(
            r#"
            SELECT id, name, image_url, link_url, width, height, zip_codes, active, created_by, created_at
            FROM ads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_with_owner(db: &PgPool, id: Uuid) -> sqlx::Result<Option<AdWithOwner>> {
        sqlx::query_as::<_, AdWithOwner>(
            r#"
            SELECT a.id, a.name, a.image_url, a.link_url, a.width, a.height,
                   a.zip_codes, a.active, a.created_by, a.created_at,
                   u.email AS owner_email
            FROM ads a
            JOIN users u ON u.id = a.created_by
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Optional filters; a NULL bind disables the matching predicate.
    pub async fn list(
        db: &PgPool,
        active: Option<bool>,
        zip_code: Option<&str>,
        created_by: Option<Uuid>,
    ) -> sqlx::Result<Vec<AdWithOwner>> {
        sqlx::query_as::<_, AdWithOwner>(
            r#"
            SELECT a.id, a.name, a.image_url, a.link_url, a.width, a.height,
                   a.zip_codes, a.active, a.created_by, a.created_at,
                   u.email AS owner_email
            FROM ads a
            JOIN users u ON u.id = a.created_by
            WHERE ($1::boolean IS NULL OR a.active = $1)
              AND ($2::text IS NULL OR $2 = ANY(a.zip_codes))
              AND ($3::uuid IS NULL OR a.created_by = $3)
            "#,
        )
        .bind(active)
        .bind(zip_code)
        .bind(created_by)
        .fetch_all(db)
        .await
    }

    /// Writes the full row back. Callers merge the patch first.
    pub async fn update(db: &PgPool, ad: &Ad) -> sqlx::Result<Ad> {
        sqlx::query_as::<_, Ad>(
            r#"
            UPDATE ads
            SET name = $2, image_url = $3, link_url = $4, width = $5,
                height = $6, zip_codes = $7, active = $8
            WHERE id = $1
            RETURNING id, name, image_url, link_url, width, height, zip_codes, active, created_by, created_at
            "#,
        )
        .bind(ad.id)
        .bind(&ad.name)
        .bind(&ad.image_url)
        .bind(&ad.link_url)
        .bind(ad.width)
        .bind(ad.height)
        .bind(&ad.zip_codes)
        .bind(ad.active)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

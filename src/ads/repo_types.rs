use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Ad record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Ad {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub width: i32,
    pub height: i32,
    pub zip_codes: Vec<String>,
    pub active: bool,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
}

/// Ad row joined with the owner's email, for the public read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct AdWithOwner {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub width: i32,
    pub height: i32,
    pub zip_codes: Vec<String>,
    pub active: bool,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub owner_email: String,
}

/// Validated input for an insert.
#[derive(Debug, Clone)]
pub struct NewAd {
    pub name: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub width: i32,
    pub height: i32,
    pub zip_codes: Vec<String>,
    pub active: bool,
    pub created_by: Uuid,
}

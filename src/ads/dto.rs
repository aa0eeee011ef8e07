use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ads::repo_types::{Ad, AdWithOwner};

/// Body for create and update. Every field is optional so validation can
/// report what is missing, and the same shape serves partial updates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPayload {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub size: Option<SizeInput>,
    pub zip_codes: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Raw size as submitted. Range checks happen during validation, so wider
/// than the stored i32 on purpose.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SizeInput {
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Serialize)]
pub struct OwnerRef {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
}

/// The owner field is a plain id after a write and an `{_id, email}`
/// object on the read endpoints, where the join fills the email in.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreatedBy {
    Id(Uuid),
    Owner(OwnerRef),
}

/// Wire shape of an ad. `dimensions` is derived from the size on the way
/// out and never stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdBody {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub size: Size,
    pub dimensions: String,
    pub zip_codes: Vec<String>,
    pub active: bool,
    pub created_by: CreatedBy,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Ad> for AdBody {
    fn from(ad: Ad) -> Self {
        Self {
            id: ad.id,
            name: ad.name,
            image_url: ad.image_url,
            link_url: ad.link_url,
            size: Size {
                width: ad.width,
                height: ad.height,
            },
            dimensions: format!("{}x{}", ad.width, ad.height),
            zip_codes: ad.zip_codes,
            active: ad.active,
            created_by: CreatedBy::Id(ad.created_by),
            created_at: ad.created_at,
        }
    }
}

impl From<AdWithOwner> for AdBody {
    fn from(row: AdWithOwner) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            link_url: row.link_url,
            size: Size {
                width: row.width,
                height: row.height,
            },
            dimensions: format!("{}x{}", row.width, row.height),
            zip_codes: row.zip_codes,
            active: row.active,
            created_by: CreatedBy::Owner(OwnerRef {
                id: row.created_by,
                email: row.owner_email,
            }),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdActionResponse {
    pub success: bool,
    pub message: String,
    pub ad: AdBody,
}

#[derive(Debug, Serialize)]
pub struct AdListResponse {
    pub success: bool,
    pub count: usize,
    pub ads: Vec<AdBody>,
}

#[derive(Debug, Serialize)]
pub struct AdDetailResponse {
    pub success: bool,
    pub ad: AdBody,
}

#[derive(Debug, Serialize)]
pub struct DeleteAdResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdsQuery {
    pub active: Option<bool>,
    pub zip_code: Option<String>,
    pub created_by: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_ad() -> Ad {
        Ad {
            id: Uuid::nil(),
            name: "Summer Sale".into(),
            image_url: Some("/uploads/banner.png".into()),
            link_url: None,
            width: 300,
            height: 250,
            zip_codes: vec!["90210".into()],
            active: true,
            created_by: Uuid::nil(),
            created_at: datetime!(2024-06-01 12:00:00 UTC),
        }
    }

    #[test]
    fn ad_body_exposes_wire_names_and_dimensions() {
        let json = serde_json::to_value(AdBody::from(sample_ad())).unwrap();
        assert_eq!(json["_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["dimensions"], "300x250");
        assert_eq!(json["size"]["width"], 300);
        assert_eq!(json["size"]["height"], 250);
        assert_eq!(json["imageUrl"], "/uploads/banner.png");
        assert_eq!(json["zipCodes"][0], "90210");
        assert_eq!(json["createdAt"], "2024-06-01T12:00:00Z");
        // absent optionals are dropped, not nulled
        assert!(json.get("linkUrl").is_none());
    }

    #[test]
    fn owner_is_a_plain_id_after_writes() {
        let json = serde_json::to_value(AdBody::from(sample_ad())).unwrap();
        assert_eq!(json["createdBy"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn owner_is_populated_on_reads() {
        let ad = sample_ad();
        let row = AdWithOwner {
            id: ad.id,
            name: ad.name,
            image_url: ad.image_url,
            link_url: ad.link_url,
            width: ad.width,
            height: ad.height,
            zip_codes: ad.zip_codes,
            active: ad.active,
            created_by: ad.created_by,
            created_at: ad.created_at,
            owner_email: "owner@example.com".into(),
        };
        let json = serde_json::to_value(AdBody::from(row)).unwrap();
        assert_eq!(
            json["createdBy"]["_id"],
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(json["createdBy"]["email"], "owner@example.com");
    }

    #[test]
    fn payload_accepts_partial_bodies() {
        let payload: AdPayload = serde_json::from_str(r#"{"active":true}"#).unwrap();
        assert_eq!(payload.active, Some(true));
        assert!(payload.name.is_none());
        assert!(payload.size.is_none());
        assert!(payload.zip_codes.is_none());
    }

    #[test]
    fn payload_reads_camel_case_fields() {
        let payload: AdPayload = serde_json::from_str(
            r#"{"name":"Ad","imageUrl":"/uploads/a.png","linkUrl":"https://example.com","size":{"width":10,"height":20},"zipCodes":["12345"]}"#,
        )
        .unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("/uploads/a.png"));
        assert_eq!(payload.link_url.as_deref(), Some("https://example.com"));
        let size = payload.size.unwrap();
        assert_eq!(size.width, Some(10));
        assert_eq!(size.height, Some(20));
        assert_eq!(payload.zip_codes.unwrap(), vec!["12345".to_string()]);
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

/// Fields are optional so missing ones surface as validation messages
/// instead of a body-decode rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User shape exposed over the wire. Built from a row by conversion, so the
/// password hash and stored refresh token can never leak into a response.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Claims echoed back by the verify endpoint.
#[derive(Debug, Serialize)]
pub struct VerifiedSession {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            email: "user@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: "Test User".into(),
            refresh_token: Some("stored-refresh".into()),
            created_at: datetime!(2024-01-15 10:30:00 UTC),
        }
    }

    #[test]
    fn public_user_uses_wire_field_names() {
        let public = PublicUser::from(sample_user());
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(
            json["_id"],
            "00000000-0000-0000-0000-000000000000".to_string()
        );
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["createdAt"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn public_user_never_carries_credentials() {
        let public = PublicUser::from(sample_user());
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("refresh"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
        assert!(req.password.is_none());
        assert!(req.name.is_none());
    }

    #[test]
    fn verified_session_uses_camel_case_user_id() {
        let session = VerifiedSession {
            user_id: Uuid::nil(),
            email: "user@example.com".into(),
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("user_id").is_none());
    }
}

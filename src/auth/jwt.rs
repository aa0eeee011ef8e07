use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload carried by both session tokens. `kind` keeps an access token
/// from being replayed as a refresh token and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub kind: TokenKind,
}

#[derive(Clone)]
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: TimeDuration,
    refresh_ttl: TimeDuration,
}

impl JwtKeys {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_minutes: i64,
        refresh_ttl_minutes: i64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl: TimeDuration::minutes(access_ttl_minutes),
            refresh_ttl: TimeDuration::minutes(refresh_ttl_minutes),
        }
    }

    pub fn access_ttl(&self) -> TimeDuration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> TimeDuration {
        self.refresh_ttl
    }

    pub fn sign_access(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(
            user_id,
            email,
            TokenKind::Access,
            self.access_ttl,
            &self.access_encoding,
        )
    }

    pub fn sign_refresh(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(
            user_id,
            email,
            TokenKind::Refresh,
            self.refresh_ttl,
            &self.refresh_encoding,
        )
    }

    fn sign_with_kind(
        &self,
        user_id: Uuid,
        email: &str,
        kind: TokenKind,
        ttl: TimeDuration,
        key: &EncodingKey,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            kind,
        };
        let token = encode(&Header::default(), &claims, key)?;
        Ok(token)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = Self::decode_claims(token, &self.access_decoding)?;
        if claims.kind != TokenKind::Access {
            anyhow::bail!("not an access token");
        }
        Ok(claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = Self::decode_claims(token, &self.refresh_decoding)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }

    fn decode_claims(token: &str, key: &DecodingKey) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, key, &Validation::default())?;
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        JwtKeys::new(
            &jwt.access_secret,
            &jwt.refresh_secret,
            jwt.access_ttl_minutes,
            jwt.refresh_ttl_minutes,
        )
    }
}

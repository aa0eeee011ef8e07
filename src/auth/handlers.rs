use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        cookies::{expired_cookie, session_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
        dto::{
            LoginRequest, LoginResponse, LogoutResponse, PublicUser, RegisterRequest,
            RegisterResponse, VerifiedSession,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, strength_errors, verify_password},
        repo_types::User,
    },
    error::{is_unique_violation, ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/verify", get(verify))
}

pub fn general_routes() -> Router<AppState> {
    Router::new().route("/user/:id", get(get_user))
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug)]
struct RegistrationInput {
    email: String,
    name: String,
    password: String,
}

/// Presence and email-shape checks, reported together. Runs before the
/// duplicate lookup.
fn validate_identity(payload: RegisterRequest) -> Result<RegistrationInput, ApiError> {
    let mut errors = Vec::new();

    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(&email) {
        errors.push("Please enter a valid email".to_string());
    }

    let name = payload.name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        errors.push("Name is required".to_string());
    }

    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        errors.push("Password is required".to_string());
    }

    if errors.is_empty() {
        Ok(RegistrationInput {
            email,
            name,
            password,
        })
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Name-length and password-strength rules. A duplicate email outranks
/// these, so they only run once the address is known to be free.
fn validate_policy(input: &RegistrationInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if input.name.chars().count() < 2 {
        errors.push("Name must be at least 2 characters long".to_string());
    } else if input.name.chars().count() > 50 {
        errors.push("Name cannot exceed 50 characters".to_string());
    }

    errors.extend(strength_errors(&input.password).into_iter().map(String::from));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let input = validate_identity(payload)?;

    if User::find_by_email(&state.db, &input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(ApiError::Conflict("Email already in use".into()));
    }

    validate_policy(&input)?;

    let hash = hash_password(&input.password)?;

    // The unique index backs up the pre-check under concurrent registration.
    let user = match User::create(&state.db, &input.email, &hash, &input.name).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %input.email, "duplicate email on insert");
            return Err(ApiError::Conflict("Email already in use".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let mut errors = Vec::new();
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    if email.is_empty() {
        errors.push("Email is required".to_string());
    }
    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        errors.push("Password is required".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            ApiError::not_found("User not found")
        })?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, &user.email)?;
    let refresh_token = keys.sign_refresh(user.id, &user.email)?;

    User::set_refresh_token(&state.db, user.id, &refresh_token).await?;

    let secure = state.config.cookies_secure();
    let jar = jar
        .add(session_cookie(
            ACCESS_COOKIE,
            access_token,
            keys.access_ttl(),
            secure,
        ))
        .add(session_cookie(
            REFRESH_COOKIE,
            refresh_token,
            keys.refresh_ttl(),
            secure,
        ));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    // Clearing the stored refresh token is best effort, logout never fails
    // the caller.
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        let keys = JwtKeys::from_ref(&state);
        if let Ok(claims) = keys.verify_access(cookie.value()) {
            if let Err(e) = User::clear_refresh_token(&state.db, claims.sub).await {
                warn!(error = %e, user_id = %claims.sub, "failed to clear refresh token");
            }
        }
    }

    let secure = state.config.cookies_secure();
    let jar = jar
        .add(expired_cookie(ACCESS_COOKIE, secure))
        .add(expired_cookie(REFRESH_COOKIE, secure));

    info!("user logged out");
    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logged out successfully".into(),
        }),
    )
}

/// Bare user object rather than the usual envelope, the dashboard reads
/// fields off the response body directly.
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "session user no longer exists");
            ApiError::not_found("User not found")
        })?;
    Ok(Json(user.into()))
}

#[instrument]
pub async fn verify(AuthUser(claims): AuthUser) -> (StatusCode, Json<VerifiedSession>) {
    (
        StatusCode::ACCEPTED,
        Json(VerifiedSession {
            user_id: claims.sub,
            email: claims.email,
            iat: claims.iat,
            exp: claims.exp,
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    ads::{
        dto::{
            AdActionResponse, AdBody, AdDetailResponse, AdListResponse, AdPayload,
            DeleteAdResponse, ListAdsQuery, UploadResponse,
        },
        repo_types::Ad,
        validate::{apply_patch, validate_new, validate_patch},
    },
    auth::{extractors::AuthUser, repo_types::User},
    error::{ApiError, ApiResult},
    state::AppState,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Ads are writable only by the user who created them.
fn ensure_owner(created_by: Uuid, caller: Uuid, action: &'static str) -> Result<(), ApiError> {
    if created_by != caller {
        return Err(ApiError::Forbidden(format!(
            "Unauthorized to {action} this ad"
        )));
    }
    Ok(())
}

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ads))
        .route("/:id", get(get_ad))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ad))
        .route("/:id", put(update_ad).delete(delete_ad))
        .route("/uploads", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[instrument(skip(state, payload))]
pub async fn create_ad(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<AdPayload>,
) -> ApiResult<(StatusCode, Json<AdActionResponse>)> {
    let new_ad = validate_new(payload, claims.sub)?;

    // The session can outlive the account row.
    if !User::exists(&state.db, claims.sub).await? {
        warn!(user_id = %claims.sub, "ad creator no longer exists");
        return Err(ApiError::bad_request("Creator user does not exist"));
    }

    let ad = Ad::insert(&state.db, &new_ad).await?;
    info!(ad_id = %ad.id, user_id = %claims.sub, "ad created");
    Ok((
        StatusCode::CREATED,
        Json(AdActionResponse {
            success: true,
            message: "Ad created successfully".into(),
            ad: ad.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_ads(
    State(state): State<AppState>,
    Query(query): Query<ListAdsQuery>,
) -> ApiResult<Json<AdListResponse>> {
    let rows = Ad::list(
        &state.db,
        query.active,
        query.zip_code.as_deref(),
        query.created_by,
    )
    .await?;
    Ok(Json(AdListResponse {
        success: true,
        count: rows.len(),
        ads: rows.into_iter().map(AdBody::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdDetailResponse>> {
    let ad = Ad::find_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;
    Ok(Json(AdDetailResponse {
        success: true,
        ad: ad.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_ad(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdPayload>,
) -> ApiResult<Json<AdActionResponse>> {
    let mut ad = Ad::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;

    if let Err(forbidden) = ensure_owner(ad.created_by, claims.sub, "update") {
        warn!(ad_id = %id, user_id = %claims.sub, "update attempt by non-owner");
        return Err(forbidden);
    }

    let patch = validate_patch(payload)?;
    apply_patch(&mut ad, patch);
    let ad = Ad::update(&state.db, &ad).await?;

    info!(ad_id = %ad.id, user_id = %claims.sub, "ad updated");
    Ok(Json(AdActionResponse {
        success: true,
        message: "Ad updated successfully".into(),
        ad: ad.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_ad(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteAdResponse>> {
    let ad = Ad::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;

    if let Err(forbidden) = ensure_owner(ad.created_by, claims.sub, "delete") {
        warn!(ad_id = %id, user_id = %claims.sub, "delete attempt by non-owner");
        return Err(forbidden);
    }

    Ad::delete(&state.db, id).await?;
    info!(ad_id = %id, user_id = %claims.sub, "ad deleted");
    Ok(Json(DeleteAdResponse {
        success: true,
        message: "Ad deleted successfully".into(),
    }))
}

/// POST /uploads (multipart, field `image`). Stores the file and answers
/// with the URL the static file route serves it under.
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().map(|s| s.to_owned());
        let content_type = field.content_type().map(|s| s.to_owned());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?;

        let image_url = state
            .images
            .save(filename.as_deref(), content_type.as_deref(), data)
            .await?;
        info!(%image_url, "image uploaded");
        return Ok(Json(UploadResponse {
            success: true,
            message: "Image uploaded successfully".into(),
            image_url,
        }));
    }

    warn!("upload request without an image field");
    Err(ApiError::bad_request("No file uploaded"))
}

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::ads::dto::{AdPayload, SizeInput};
use crate::ads::repo_types::{Ad, NewAd};
use crate::error::ApiError;

lazy_static! {
    // ASCII digits only; `\d` would also match other scripts' digits.
    static ref ZIP_RE: Regex = Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").unwrap();
}

const NAME_MAX: usize = 100;
const DIMENSION_MAX: i64 = 5000;

/// Field-presence patch for updates. `None` leaves the stored value alone.
#[derive(Debug, Default)]
pub struct AdPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub size: Option<(i32, i32)>,
    pub zip_codes: Option<Vec<String>>,
    pub active: Option<bool>,
}

fn check_name(raw: &str, errors: &mut Vec<String>) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        errors.push("Ad name is required".to_string());
        None
    } else if name.chars().count() > NAME_MAX {
        errors.push(format!("Ad name cannot exceed {NAME_MAX} characters"));
        None
    } else {
        Some(name.to_string())
    }
}

fn check_dimension(value: Option<i64>, label: &str, errors: &mut Vec<String>) -> Option<i32> {
    match value {
        None => {
            errors.push(format!("{label} is required"));
            None
        }
        Some(v) if v < 1 => {
            errors.push(format!("{label} must be at least 1px"));
            None
        }
        Some(v) if v > DIMENSION_MAX => {
            errors.push(format!("{label} cannot exceed {DIMENSION_MAX}px"));
            None
        }
        Some(v) => Some(v as i32),
    }
}

fn check_zip_codes(zips: &[String], errors: &mut Vec<String>) {
    for zip in zips {
        if !ZIP_RE.is_match(zip) {
            errors.push(format!("{zip} is not a valid ZIP code"));
        }
    }
}

/// Full validation for a create. All problems are reported in one pass.
pub fn validate_new(payload: AdPayload, created_by: Uuid) -> Result<NewAd, ApiError> {
    let mut errors = Vec::new();

    let name = match payload.name.as_deref() {
        Some(raw) => check_name(raw, &mut errors),
        None => {
            errors.push("Ad name is required".to_string());
            None
        }
    };

    let size = payload.size.unwrap_or_default();
    let width = check_dimension(size.width, "Width", &mut errors);
    let height = check_dimension(size.height, "Height", &mut errors);

    let zip_codes = payload.zip_codes.unwrap_or_default();
    check_zip_codes(&zip_codes, &mut errors);

    match (name, width, height) {
        (Some(name), Some(width), Some(height)) if errors.is_empty() => Ok(NewAd {
            name,
            image_url: payload.image_url,
            link_url: payload.link_url,
            width,
            height,
            zip_codes,
            active: payload.active.unwrap_or(false),
            created_by,
        }),
        _ => Err(ApiError::Validation(errors)),
    }
}

/// Validation for an update. Only supplied fields are checked; a supplied
/// `size` must carry both dimensions.
pub fn validate_patch(payload: AdPayload) -> Result<AdPatch, ApiError> {
    let mut errors = Vec::new();
    let mut patch = AdPatch::default();

    if let Some(raw) = payload.name.as_deref() {
        patch.name = check_name(raw, &mut errors);
    }
    patch.image_url = payload.image_url;
    patch.link_url = payload.link_url;

    if let Some(size) = payload.size {
        if size.width.is_none() || size.height.is_none() {
            errors.push("Both width and height are required in size".to_string());
        } else {
            let width = check_dimension(size.width, "Width", &mut errors);
            let height = check_dimension(size.height, "Height", &mut errors);
            if let (Some(width), Some(height)) = (width, height) {
                patch.size = Some((width, height));
            }
        }
    }

    if let Some(zips) = payload.zip_codes {
        check_zip_codes(&zips, &mut errors);
        patch.zip_codes = Some(zips);
    }
    patch.active = payload.active;

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Merges a validated patch into the stored row before it is written back.
pub fn apply_patch(ad: &mut Ad, patch: AdPatch) {
    if let Some(name) = patch.name {
        ad.name = name;
    }
    if let Some(url) = patch.image_url {
        ad.image_url = Some(url);
    }
    if let Some(url) = patch.link_url {
        ad.link_url = Some(url);
    }
    if let Some((width, height)) = patch.size {
        ad.width = width;
        ad.height = height;
    }
    if let Some(zips) = patch.zip_codes {
        ad.zip_codes = zips;
    }
    if let Some(active) = patch.active {
        ad.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn errors_of(result: Result<NewAd, ApiError>) -> Vec<String> {
        match result.unwrap_err() {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn patch_errors_of(result: Result<AdPatch, ApiError>) -> Vec<String> {
        match result.unwrap_err() {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn valid_payload() -> AdPayload {
        AdPayload {
            name: Some("Summer Sale".into()),
            image_url: Some("/uploads/banner.png".into()),
            link_url: None,
            size: Some(SizeInput {
                width: Some(300),
                height: Some(250),
            }),
            zip_codes: Some(vec!["90210".into(), "10001-0001".into()]),
            active: Some(true),
        }
    }

    fn stored_ad() -> Ad {
        Ad {
            id: Uuid::new_v4(),
            name: "Old name".into(),
            image_url: None,
            link_url: Some("https://example.com".into()),
            width: 100,
            height: 100,
            zip_codes: vec!["11111".into()],
            active: false,
            created_by: Uuid::new_v4(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_create_reports_every_missing_field() {
        let errors = errors_of(validate_new(AdPayload::default(), Uuid::new_v4()));
        assert!(errors.contains(&"Ad name is required".to_string()));
        assert!(errors.contains(&"Width is required".to_string()));
        assert!(errors.contains(&"Height is required".to_string()));
    }

    #[test]
    fn valid_create_produces_new_ad_with_defaults_applied() {
        let owner = Uuid::new_v4();
        let mut payload = valid_payload();
        payload.zip_codes = None;
        payload.active = None;
        let ad = validate_new(payload, owner).unwrap();
        assert_eq!(ad.name, "Summer Sale");
        assert_eq!((ad.width, ad.height), (300, 250));
        assert!(ad.zip_codes.is_empty());
        assert!(!ad.active);
        assert_eq!(ad.created_by, owner);
    }

    #[test]
    fn create_trims_the_name() {
        let mut payload = valid_payload();
        payload.name = Some("  Spaced out  ".into());
        let ad = validate_new(payload, Uuid::new_v4()).unwrap();
        assert_eq!(ad.name, "Spaced out");
    }

    #[test]
    fn dimension_bounds_are_enforced() {
        let mut payload = valid_payload();
        payload.size = Some(SizeInput {
            width: Some(0),
            height: Some(5001),
        });
        let errors = errors_of(validate_new(payload, Uuid::new_v4()));
        assert!(errors.contains(&"Width must be at least 1px".to_string()));
        assert!(errors.contains(&"Height cannot exceed 5000px".to_string()));
    }

    #[test]
    fn name_length_is_capped() {
        let mut payload = valid_payload();
        payload.name = Some("x".repeat(101));
        let errors = errors_of(validate_new(payload, Uuid::new_v4()));
        assert!(errors.contains(&"Ad name cannot exceed 100 characters".to_string()));
    }

    #[test]
    fn zip_codes_must_match_the_pattern() {
        let mut payload = valid_payload();
        payload.zip_codes = Some(vec![
            "90210".into(),
            "90210-1234".into(),
            "9021".into(),
            "ABCDE".into(),
        ]);
        let errors = errors_of(validate_new(payload, Uuid::new_v4()));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&"9021 is not a valid ZIP code".to_string()));
        assert!(errors.contains(&"ABCDE is not a valid ZIP code".to_string()));
    }

    #[test]
    fn zip_codes_reject_non_ascii_digits() {
        let mut payload = valid_payload();
        payload.zip_codes = Some(vec!["١٢٣٤٥".into()]);
        let errors = errors_of(validate_new(payload, Uuid::new_v4()));
        assert_eq!(errors, vec!["١٢٣٤٥ is not a valid ZIP code".to_string()]);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let patch = validate_patch(AdPayload::default()).unwrap();
        let mut ad = stored_ad();
        let before = ad.clone();
        apply_patch(&mut ad, patch);
        assert_eq!(ad.name, before.name);
        assert_eq!(ad.zip_codes, before.zip_codes);
        assert_eq!(ad.active, before.active);
        assert_eq!((ad.width, ad.height), (before.width, before.height));
    }

    #[test]
    fn supplied_empty_name_is_rejected_not_ignored() {
        let errors = patch_errors_of(validate_patch(AdPayload {
            name: Some("".into()),
            ..AdPayload::default()
        }));
        assert!(errors.contains(&"Ad name is required".to_string()));
    }

    #[test]
    fn partial_size_is_rejected() {
        let errors = patch_errors_of(validate_patch(AdPayload {
            size: Some(SizeInput {
                width: Some(300),
                height: None,
            }),
            ..AdPayload::default()
        }));
        assert!(errors.contains(&"Both width and height are required in size".to_string()));
    }

    #[test]
    fn empty_zip_list_clears_the_stored_one() {
        let patch = validate_patch(AdPayload {
            zip_codes: Some(Vec::new()),
            ..AdPayload::default()
        })
        .unwrap();
        let mut ad = stored_ad();
        apply_patch(&mut ad, patch);
        assert!(ad.zip_codes.is_empty());
    }

    #[test]
    fn active_false_is_applied_not_dropped() {
        let patch = validate_patch(AdPayload {
            active: Some(false),
            ..AdPayload::default()
        })
        .unwrap();
        let mut ad = stored_ad();
        ad.active = true;
        apply_patch(&mut ad, patch);
        assert!(!ad.active);
    }

    #[test]
    fn patch_merges_supplied_fields_only() {
        let patch = validate_patch(AdPayload {
            name: Some("New name".into()),
            size: Some(SizeInput {
                width: Some(728),
                height: Some(90),
            }),
            ..AdPayload::default()
        })
        .unwrap();
        let mut ad = stored_ad();
        apply_patch(&mut ad, patch);
        assert_eq!(ad.name, "New name");
        assert_eq!((ad.width, ad.height), (728, 90));
        assert_eq!(ad.link_url.as_deref(), Some("https://example.com"));
        assert_eq!(ad.zip_codes, vec!["11111".to_string()]);
    }
}

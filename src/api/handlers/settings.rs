use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::errors::{api_error, internal_error, ApiError};
use crate::db::{Database, UserRepository, UserSettings};

#[derive(Debug, Deserialize)]
pub struct UserSettingsUpdateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub brand_url: String,
    #[serde(default)]
    pub brief_prompt_override: String,
    #[serde(default)]
    pub writer_prompt_override: String,
}

#[axum::debug_handler]
pub async fn get_settings(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
) -> Result<Json<UserSettings>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = UserRepository::new(&mut conn);
    let settings = repo
        .get_user_settings(&user.id)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Settings not found"))?;
    Ok(Json(settings))
}

#[axum::debug_handler]
pub async fn update_settings(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
    Json(payload): Json<UserSettingsUpdateRequest>,
) -> Result<Json<UserSettings>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = UserRepository::new(&mut conn);
    let updated = repo
        .update_user_settings(
            &user.id,
            payload.name.trim(),
            payload.brand_name.trim(),
            payload.brand_url.trim(),
            payload.brief_prompt_override.trim(),
            payload.writer_prompt_override.trim(),
        )
        .map_err(|_| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to update settings",
            )
        })?;
    Ok(Json(updated))
}

//! Profile self-service handlers.
//!
//! The principal comes from the JWT middleware; a user can only ever
//! read and edit their own profile here. Cross-field validation is the
//! profile service's job, so the update payload is plain JSON rather
//! than a `ValidatedJson` shape.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ProfileForm, ProfileUpdateRequest};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// Get the authenticated user's profile form state
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile form state", body = ProfileForm),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProfileForm>>> {
    let form = state.profile_service.get_profile(current_user.id).await?;
    Ok(Json(ApiResponse::success(form)))
}

/// Update the authenticated user's name and/or password.
///
/// On success the response carries the reset form state: password
/// fields cleared, name and email re-populated from the saved record.
/// On validation failure every failing field is reported together.
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileForm),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Field validation errors")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> AppResult<Json<ApiResponse<ProfileForm>>> {
    let updated = state
        .profile_service
        .update_profile(current_user.id, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        updated.form,
        "Profile updated successfully!",
    )))
}

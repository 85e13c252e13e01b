use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::content::images::read_image_upload;
use crate::content::resolver::{resolve_images, resolve_page, resolve_section, ContentResolution};
use crate::content::validation::{validate_content, validate_key, validate_section};
use crate::errors::AppError;
use crate::models::content::{NewPageImage, PageContentRow, PageImageRow};
use crate::models::user::AdminUser;
use crate::routes::DeletedResponse;
use crate::state::AppState;
use crate::storage::image_key;

#[derive(Serialize)]
pub struct PageContentResponse {
    pub sections: Vec<PageContentRow>,
    pub use_fallback: bool,
}

#[derive(Serialize)]
pub struct ImageListResponse {
    pub images: Vec<PageImageRow>,
}

#[derive(Deserialize)]
pub struct CommitContentRequest {
    #[serde(default)]
    pub content: Value,
}

#[derive(Deserialize)]
pub struct RevertRequest {
    pub version: i32,
}

#[derive(Serialize)]
pub struct DeactivateResponse {
    pub deactivated: u64,
}

/// GET /api/page-content/:page_key/:section_key
pub async fn handle_get_section(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<ContentResolution>, AppError> {
    let Path((page_key, section_key)) = path?;
    validate_section(&page_key, &section_key)?;
    Ok(Json(
        resolve_section(state.store.as_ref(), &page_key, &section_key).await,
    ))
}

/// GET /api/page-content/:page_key
pub async fn handle_get_page(
    State(state): State<AppState>,
    page_key: Result<Path<String>, PathRejection>,
) -> Result<Json<PageContentResponse>, AppError> {
    let Path(page_key) = page_key?;
    validate_key("page_key", &page_key)?;
    let sections = resolve_page(state.store.as_ref(), &page_key).await;
    Ok(Json(PageContentResponse {
        use_fallback: sections.is_empty(),
        sections,
    }))
}

/// GET /api/page-images/:page_key/:section_key
pub async fn handle_list_images(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<ImageListResponse>, AppError> {
    let Path((page_key, section_key)) = path?;
    validate_section(&page_key, &section_key)?;
    let images = resolve_images(state.store.as_ref(), &page_key, &section_key).await;
    Ok(Json(ImageListResponse { images }))
}

/// POST /api/admin/page-content/:page_key/:section_key
///
/// Appends a new active version. Earlier versions stay in the history.
pub async fn handle_commit_content(
    admin: AdminUser,
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<CommitContentRequest>, JsonRejection>,
) -> Result<Json<PageContentRow>, AppError> {
    let Path((page_key, section_key)) = path?;
    let Json(req) = payload?;
    validate_section(&page_key, &section_key)?;
    validate_content(&req.content)?;

    let row = state
        .store
        .commit_content(&page_key, &section_key, &req.content, admin.user_id)
        .await?;

    info!(
        "Admin {} published {}/{} v{}",
        admin.user_id, page_key, section_key, row.version
    );
    Ok(Json(row))
}

/// GET /api/admin/page-content/:page_key/:section_key/history
pub async fn handle_content_history(
    _admin: AdminUser,
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Vec<PageContentRow>>, AppError> {
    let Path((page_key, section_key)) = path?;
    validate_section(&page_key, &section_key)?;
    let history = state.store.content_history(&page_key, &section_key).await?;
    Ok(Json(history))
}

/// POST /api/admin/page-content/:page_key/:section_key/revert
///
/// Re-publishes an old version's content as a new version; history is
/// never rewritten.
pub async fn handle_revert_content(
    admin: AdminUser,
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<RevertRequest>, JsonRejection>,
) -> Result<Json<PageContentRow>, AppError> {
    let Path((page_key, section_key)) = path?;
    let Json(req) = payload?;
    validate_section(&page_key, &section_key)?;
    if req.version < 1 {
        return Err(AppError::Validation(
            "version must be a positive integer".to_string(),
        ));
    }

    let source = state
        .store
        .content_history(&page_key, &section_key)
        .await?
        .into_iter()
        .find(|row| row.version == req.version)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Version {} of {page_key}/{section_key} not found",
                req.version
            ))
        })?;

    let row = state
        .store
        .commit_content(&page_key, &section_key, &source.content, admin.user_id)
        .await?;

    info!(
        "Admin {} reverted {}/{} to v{} as v{}",
        admin.user_id, page_key, section_key, req.version, row.version
    );
    Ok(Json(row))
}

/// DELETE /api/admin/page-content/:page_key/:section_key
///
/// Deactivates every version so readers get the fallback signal. A section
/// that was never published is a 404.
pub async fn handle_deactivate_content(
    admin: AdminUser,
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let Path((page_key, section_key)) = path?;
    validate_section(&page_key, &section_key)?;
    if state
        .store
        .content_history(&page_key, &section_key)
        .await?
        .is_empty()
    {
        return Err(AppError::NotFound(format!(
            "No content for {page_key}/{section_key}"
        )));
    }

    let deactivated = state
        .store
        .deactivate_content(&page_key, &section_key)
        .await?;
    info!(
        "Admin {} deactivated {}/{} ({deactivated} rows)",
        admin.user_id, page_key, section_key
    );
    Ok(Json(DeactivateResponse { deactivated }))
}

/// POST /api/admin/page-images (multipart)
pub async fn handle_upload_image(
    admin: AdminUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PageImageRow>, AppError> {
    let upload = read_image_upload(multipart?, state.config.max_upload_bytes).await?;

    let key = image_key(&upload.page_key, &upload.section_key, upload.extension);
    state
        .objects
        .put(&key, upload.data, &upload.content_type)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let row = state
        .store
        .insert_image(NewPageImage {
            page_key: upload.page_key,
            section_key: upload.section_key,
            url: state.config.public_object_url(&key),
            alt_text: upload.alt_text,
            display_order: upload.display_order,
        })
        .await?;

    info!("Admin {} uploaded image {}", admin.user_id, row.id);
    Ok(Json(row))
}

/// DELETE /api/admin/page-images/:id
pub async fn handle_delete_image(
    admin: AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = id?;
    if !state.store.delete_image(id).await? {
        return Err(AppError::NotFound(format!("Image {id} not found")));
    }
    info!("Admin {} deleted image {id}", admin.user_id);
    Ok(Json(DeletedResponse { deleted: id }))
}

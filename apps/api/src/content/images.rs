use axum::extract::Multipart;
use bytes::Bytes;

use crate::content::validation::validate_section;
use crate::errors::AppError;
use crate::storage::image_extension;

/// A validated image upload taken apart from a multipart form.
#[derive(Debug)]
pub struct ImageUpload {
    pub page_key: String,
    pub section_key: String,
    pub alt_text: Option<String>,
    pub display_order: i32,
    pub content_type: String,
    pub extension: &'static str,
    pub data: Bytes,
}

/// Reads the `page_key`, `section_key`, `alt_text`, `display_order` and
/// `file` fields. Unknown fields are ignored.
pub async fn read_image_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<ImageUpload, AppError> {
    let mut page_key = None;
    let mut section_key = None;
    let mut alt_text = None;
    let mut display_order = 0;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "page_key" => page_key = Some(field.text().await?.trim().to_string()),
            "section_key" => section_key = Some(field.text().await?.trim().to_string()),
            "alt_text" => {
                let text = field.text().await?.trim().to_string();
                alt_text = (!text.is_empty()).then_some(text);
            }
            "display_order" => {
                let raw = field.text().await?;
                display_order = raw.trim().parse::<i32>().map_err(|_| {
                    AppError::Validation("display_order must be an integer".to_string())
                })?;
            }
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                file = Some((content_type, data));
            }
            _ => {}
        }
    }

    let page_key = page_key.ok_or_else(|| AppError::Validation("page_key is required".into()))?;
    let section_key =
        section_key.ok_or_else(|| AppError::Validation("section_key is required".into()))?;
    validate_section(&page_key, &section_key)?;

    let (content_type, data) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "file exceeds the {max_bytes} byte limit"
        )));
    }
    let extension = image_extension(&content_type).ok_or_else(|| {
        AppError::Validation(format!("unsupported image type '{content_type}'"))
    })?;

    Ok(ImageUpload {
        page_key,
        section_key,
        alt_text,
        display_order,
        content_type,
        extension,
        data,
    })
}

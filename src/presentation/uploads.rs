use crate::infrastructure::media::{MAX_UPLOAD_PARTS, MediaStore, StagedUpload, UPLOAD_FIELD};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadByLink {
    pub link: String,
}

#[instrument(skip(state))]
pub async fn upload_by_link(
    state: web::Data<AppState>,
    req: web::Json<UploadByLink>,
) -> Result<HttpResponse, ApiError> {
    let name = state.media.fetch_by_url(&req.link).await?;
    Ok(HttpResponse::Ok().json(name))
}

fn malformed(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("malformed multipart body: {}", err))
}

fn io_failure(err: std::io::Error) -> ApiError {
    ApiError::Internal(format!("failed to stage upload: {}", err))
}

/// Streams one file part into a fresh staging file.
async fn stage_field(
    media: &MediaStore,
    field: &mut Field,
    staged: &mut Vec<StagedUpload>,
    original_name: String,
) -> Result<(), ApiError> {
    let path = media.staging_path();
    let mut file = tokio::fs::File::create(&path).await.map_err(io_failure)?;
    staged.push(StagedUpload {
        path,
        original_name,
    });
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        file.write_all(&chunk).await.map_err(io_failure)?;
    }
    file.flush().await.map_err(io_failure)?;
    Ok(())
}

async fn stage_parts(
    media: &MediaStore,
    payload: &mut Multipart,
    staged: &mut Vec<StagedUpload>,
) -> Result<(), ApiError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        // Plain form values and empty file inputs (`filename=""`) carry no photo.
        let Some(original_name) = filename else {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        };

        if field.name() != Some(UPLOAD_FIELD) {
            return Err(ApiError::Validation(format!(
                "unexpected file field {:?}, expected {:?}",
                field.name().unwrap_or_default(),
                UPLOAD_FIELD
            )));
        }
        if staged.len() == MAX_UPLOAD_PARTS {
            return Err(ApiError::Validation(format!(
                "at most {} files per upload",
                MAX_UPLOAD_PARTS
            )));
        }

        stage_field(media, &mut field, staged, original_name).await?;
    }
    Ok(())
}

/// `POST /upload`: multipart `photos` parts become stored filenames, in order.
#[instrument(skip(state, payload))]
pub async fn upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut staged = Vec::new();
    if let Err(e) = stage_parts(&state.media, &mut payload, &mut staged).await {
        state.media.discard(&staged).await;
        return Err(e);
    }

    let names = state.media.accept_upload(staged).await?;
    info!(count = names.len(), "Photos uploaded");
    Ok(HttpResponse::Ok().json(names))
}

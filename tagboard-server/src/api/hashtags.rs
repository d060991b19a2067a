use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tagboard_types::{
    BatchItem, BatchRequest, HashtagMatch, NormalizeRequest, NormalizeResponse, Segment,
    TextRequest,
};

use crate::{
    api::{ApiError, ApiResult},
    config::Limits,
    hashtag::{extract_hashtags, normalize_tag},
    state::AppState,
};

fn check_length(limits: &Limits, field: &str, value: &str) -> Result<(), ApiError> {
    if value.len() > limits.max_text_bytes {
        return Err(ApiError::BadRequest(format!(
            "{} is {} bytes, limit is {}",
            field,
            value.len(),
            limits.max_text_bytes
        )));
    }
    Ok(())
}

/// POST /hashtags/normalize - Canonical key for a single tag
pub async fn normalize(
    State(state): State<AppState>,
    payload: Result<Json<NormalizeRequest>, JsonRejection>,
) -> ApiResult<Json<NormalizeResponse>> {
    let Json(req) = payload?;
    let tag = req.tag.unwrap_or_default();
    check_length(&state.limits, "tag", &tag)?;

    let key = normalize_tag(&tag);
    Ok(Json(NormalizeResponse {
        key: (!key.is_empty()).then_some(key),
    }))
}

/// POST /hashtags/extract - Distinct hashtags of a text in first-seen order
pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<HashtagMatch>>> {
    let Json(req) = payload?;
    let text = req.text.unwrap_or_default();
    check_length(&state.limits, "text", &text)?;

    let hashtags = extract_hashtags(&text);
    tracing::debug!("Extracted {} hashtags", hashtags.len());

    Ok(Json(hashtags))
}

/// POST /hashtags/linkify - Text split into plain segments and tag links
pub async fn linkify(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Segment>>> {
    let Json(req) = payload?;
    let text = req.text.unwrap_or_default();
    check_length(&state.limits, "text", &text)?;

    Ok(Json(state.linker.linkify(&text)))
}

/// POST /hashtags/batch - Extract and linkify several texts at once
pub async fn batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<BatchItem>>> {
    let Json(req) = payload?;
    if req.texts.len() > state.limits.max_batch {
        return Err(ApiError::BadRequest(format!(
            "batch has {} texts, limit is {}",
            req.texts.len(),
            state.limits.max_batch
        )));
    }

    let mut items = Vec::with_capacity(req.texts.len());
    for (index, text) in req.texts.into_iter().enumerate() {
        let text = text.unwrap_or_default();
        check_length(&state.limits, &format!("texts[{}]", index), &text)?;
        items.push(BatchItem {
            hashtags: extract_hashtags(&text),
            segments: state.linker.linkify(&text),
        });
    }

    tracing::debug!("Processed batch of {} texts", items.len());
    Ok(Json(items))
}

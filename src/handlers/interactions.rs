use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use super::{AppState, MessageResponse};
use crate::error::{AppError, Result};
use crate::models::InteractionType;

/// Request body for POST /record-interaction.
///
/// Fields are optional so that absence is reported as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteractionRequest {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub interaction_type: Option<String>,
}

/// POST /record-interaction
/// Persist one interaction event for future training runs. The live model
/// is unaffected until the next POST /train.
#[post("/record-interaction")]
pub async fn record_interaction(
    body: web::Json<RecordInteractionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let (user_id, product_id, raw_type) = match (&body.user_id, &body.product_id, &body.interaction_type) {
        (Some(user_id), Some(product_id), Some(raw_type))
            if !user_id.is_empty() && !product_id.is_empty() && !raw_type.is_empty() =>
        {
            (user_id, product_id, raw_type)
        }
        _ => {
            return Err(AppError::ValidationError(
                "Missing required fields: userId, productId, interactionType".to_string(),
            ))
        }
    };

    let interaction_type = InteractionType::parse(raw_type).ok_or_else(|| {
        AppError::ValidationError(format!("Invalid interaction type: {}", raw_type))
    })?;

    state
        .recommender
        .record_interaction(user_id, product_id, interaction_type)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Interaction recorded".to_string(),
    }))
}

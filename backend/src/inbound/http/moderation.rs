//! Moderation preview handler.
//!
//! ```text
//! POST /api/v1/moderation/preview {"message":"Where is my order?","tone":"Friendly"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ModerationPreview, ModerationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_moderation_validation_error;

/// Customer message to draft a reply for.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationPreviewRequest {
    pub message: String,
    /// Desired reply tone; defaults to "Professional and Empathetic".
    pub tone: Option<String>,
}

/// Drafted reply with the model's sentiment call.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationPreviewResponse {
    #[schema(example = "Negative")]
    pub sentiment: String,
    pub suggested_reply: String,
    pub reasoning: String,
}

impl From<ModerationPreview> for ModerationPreviewResponse {
    fn from(value: ModerationPreview) -> Self {
        Self {
            sentiment: value.sentiment.as_str().to_owned(),
            suggested_reply: value.suggested_reply,
            reasoning: value.reasoning,
        }
    }
}

/// Draft a reply without posting anything.
#[utoipa::path(
    post,
    path = "/api/v1/moderation/preview",
    request_body = ModerationPreviewRequest,
    responses(
        (status = 200, description = "Drafted reply", body = ModerationPreviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 502, description = "Completion provider failed", body = ErrorSchema),
        (status = 503, description = "Completion provider unavailable", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "previewModeration"
)]
#[post("/moderation/preview")]
pub async fn preview(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ModerationPreviewRequest>,
) -> ApiResult<web::Json<ModerationPreviewResponse>> {
    let identity = authenticate(&session, &state).await?;
    let request = ModerationRequest::try_new(&payload.message, payload.tone.as_deref())
        .map_err(map_moderation_validation_error)?;
    let drafted = state.moderation.preview(&identity.id, &request).await?;
    Ok(web::Json(drafted.into()))
}

use axum::{extract::State, response::IntoResponse, Json};
use crate::dto::lead_dto::LeadPayload;
use crate::service::lead_relay_service::{LeadRelayService, LeadRelayServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use std::sync::Arc;
use tracing::{error, info};

use validator::Validate;

// Handler: Relay a lead to the shop's chat (public)
pub async fn relay_lead_handler(
    State(service): State<Arc<LeadRelayServiceImpl>>,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[relay_lead_handler] Handler called");
    if let Err(e) = payload.validate() {
        error!("[relay_lead_handler] Validation error: {}", e);
        return Err(HandlerError::new(
            HandlerErrorKind::BadRequest,
            format!("Validation error: {}", e),
        ));
    }

    let response = service.relay(payload).await?;
    Ok(Json(response))
}

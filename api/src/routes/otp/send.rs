use actix_web::{web, HttpResponse};
use validator::Validate;

use tk_core::repositories::OtpStore;
use tk_core::services::SmsGateway;
use tk_shared::phone::mask_phone_number;

use crate::app::AppState;
use crate::dto::{OtpResponse, SendOtpRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/send
///
/// # Request Body
///
/// ```json
/// {
///     "phone": "0901234567",
///     "purpose": "REGISTER"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully",
///     "phone": "090****67",
///     "expires_at": "2024-01-01T10:05:00Z",
///     "remaining_attempts": 3
/// }
/// ```
///
/// ## Errors
/// 400 invalid phone or body, 429 rate limit, 503 delivery failure, 500 store failure
pub async fn send_otp<S, G>(
    state: web::Data<AppState<S, G>>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: OtpStore + 'static,
    G: SmsGateway + 'static,
{
    let request = request.into_inner();

    tracing::info!(
        phone = %mask_phone_number(&request.phone),
        purpose = %request.purpose,
        "Processing send OTP request"
    );

    request.validate()?;

    let record = state
        .otp_service
        .generate_and_send_otp(&request.phone, request.purpose)
        .await?;

    Ok(HttpResponse::Ok().json(OtpResponse::issued(&record, "OTP sent successfully")))
}

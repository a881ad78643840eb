use actix_web::{web, HttpResponse};
use validator::Validate;

use tk_core::repositories::OtpStore;
use tk_core::services::SmsGateway;
use tk_shared::phone::{mask_phone_number, normalize_phone_number};

use crate::app::AppState;
use crate::dto::{OtpResponse, VerifyOtpRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/verify
///
/// # Request Body
///
/// ```json
/// {
///     "phone": "0901234567",
///     "otp_code": "482913",
///     "purpose": "REGISTER"
/// }
/// ```
///
/// Every negative outcome (wrong code, expired, exhausted, already used,
/// nothing issued) is the same 400 response.
pub async fn verify_otp<S, G>(
    state: web::Data<AppState<S, G>>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: OtpStore + 'static,
    G: SmsGateway + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let verified = state
        .otp_service
        .verify_otp(&request.phone, &request.otp_code, request.purpose)
        .await?;

    if !verified {
        tracing::info!(
            phone = %mask_phone_number(&request.phone),
            purpose = %request.purpose,
            "OTP verification rejected"
        );
        return Err(ApiError::InvalidOtp);
    }

    let phone = normalize_phone_number(&request.phone);
    Ok(HttpResponse::Ok().json(OtpResponse::verified(&phone)))
}

use actix_web::{web, HttpResponse};
use validator::Validate;

use tk_core::repositories::OtpStore;
use tk_core::services::SmsGateway;

use crate::app::AppState;
use crate::dto::{OtpResponse, SendOtpRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/resend
///
/// Same body and failures as `/send`. Earlier codes for the phone stop
/// being accepted once the new one is issued.
pub async fn resend_otp<S, G>(
    state: web::Data<AppState<S, G>>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: OtpStore + 'static,
    G: SmsGateway + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let record = state
        .otp_service
        .resend_otp(&request.phone, request.purpose)
        .await?;

    Ok(HttpResponse::Ok().json(OtpResponse::issued(&record, "OTP resent successfully")))
}

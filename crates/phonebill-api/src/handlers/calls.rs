//! Phone call handlers
//!
//! HTTP handlers for the `/phonebill/calls` resource. Bodies are plain
//! text in both directions of success and failure.
//!
//! Parameters that cannot be decoded (a repeated key, or `caller` sent
//! together with `callerNumber`) fail with the same 412 response as any
//! other invalid request.

use crate::dto::CallParams;
use actix_web::error::UrlencodedError;
use actix_web::{web, HttpRequest, HttpResponse};
use phonebill_core::AppError;
use phonebill_services::CallQueryService;
use tracing::{debug, instrument, warn};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

fn text(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(TEXT_PLAIN).body(body)
}

/// Fetch a customer's calls, optionally limited to a begin-time range
///
/// GET /phonebill/calls?customer=&begin=&end=
#[instrument(skip(service))]
pub async fn fetch_calls(
    service: web::Data<CallQueryService>,
    query: web::Query<CallParams>,
) -> Result<HttpResponse, AppError> {
    let body = service.fetch(query.into_inner().into()).await?;
    Ok(text(body))
}

/// Record a call
///
/// POST /phonebill/calls
///
/// Parameters come from a form body; any parameter absent there is taken
/// from the query string.
#[instrument(skip(service, form))]
pub async fn append_call(
    service: web::Data<CallQueryService>,
    form: Result<web::Form<CallParams>, actix_web::Error>,
    query: web::Query<CallParams>,
) -> Result<HttpResponse, AppError> {
    let params = match form {
        Ok(form) => form.into_inner().or(query.into_inner()),
        Err(e) if matches!(e.as_error::<UrlencodedError>(), Some(UrlencodedError::ContentType)) => {
            debug!("No form body, using query parameters");
            query.into_inner()
        }
        Err(e) => {
            warn!("Rejected form body: {}", e);
            return Err(AppError::InvalidRequest(e.to_string()));
        }
    };

    let message = service.append(params.into()).await?;
    Ok(text(message))
}

/// Delete every stored bill
///
/// DELETE /phonebill/calls
#[instrument(skip(service))]
pub async fn reset_calls(service: web::Data<CallQueryService>) -> Result<HttpResponse, AppError> {
    let message = service.reset().await?;
    Ok(text(message))
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected query string: {}", err);
    AppError::InvalidRequest(err.to_string()).into()
}

/// Configure phone call routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/phonebill/calls")
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .route(web::get().to(fetch_calls))
            .route(web::post().to(append_call))
            .route(web::delete().to(reset_calls)),
    );
}

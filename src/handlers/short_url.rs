use std::sync::Arc;

use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info, warn};
use validator::Validate;

use crate::{
    errors::{AppError, ERROR_CANNOT_PARSE_JSON, ERROR_UPDATE_RATE_LIMIT_FAILED},
    handlers::client_ip,
    models::ShortenRequest,
    services::{AnalyticsService, RateLimitService, ShortUrlService},
    types::Result,
};

/// Create short URL route handler
///
/// The quota is checked before the body is even parsed and only consumed
/// once the mapping has been stored.
pub async fn shorten_handler(
    req: HttpRequest,
    body: web::Bytes,
    service: web::Data<ShortUrlService>,
    limiter: web::Data<RateLimitService>,
) -> Result<impl Responder> {
    let client = client_ip(&req);
    limiter.check_rate_limit(&client).await?;

    let dto: ShortenRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected shorten body from {}: {}", client, e);
        AppError::Validation(ERROR_CANNOT_PARSE_JSON.to_string())
    })?;
    dto.validate()?;

    let mut response = service.shorten_url(dto).await?;

    let quota = limiter.decrement_rate_limit(&client).await.map_err(|e| {
        error!("Failed to decrement rate limit for {}: {}", client, e);
        AppError::Internal(ERROR_UPDATE_RATE_LIMIT_FAILED.to_string())
    })?;
    response.rate_limit = quota.remaining;
    response.rate_limit_reset = quota.reset_minutes;

    Ok(HttpResponse::Ok().json(response))
}

/// Redirect route handler
pub async fn resolve_handler(
    req: HttpRequest,
    path: web::Path<String>,
    service: web::Data<ShortUrlService>,
    limiter: web::Data<RateLimitService>,
    analytics: web::Data<AnalyticsService>,
) -> Result<impl Responder> {
    let client = client_ip(&req);
    limiter.check_rate_limit(&client).await?;

    let short_code = path.into_inner();
    debug!("Redirect requested for code: {}", short_code);

    let original_url = service.get_original_url(&short_code).await?;

    // Don't hold the redirect back for bookkeeping
    spawn_redirect_bookkeeping(
        limiter.into_inner(),
        analytics.into_inner(),
        client,
        short_code.clone(),
    );

    info!("Redirecting '{}' to '{}'", short_code, original_url);
    Ok(HttpResponse::MovedPermanently()
        .insert_header((LOCATION, original_url))
        .finish())
}

/// Consumes the caller's quota and bumps both redirect counters in a detached
/// task. Failures are logged and dropped.
fn spawn_redirect_bookkeeping(
    limiter: Arc<RateLimitService>,
    analytics: Arc<AnalyticsService>,
    client: String,
    short_code: String,
) {
    actix_web::rt::spawn(async move {
        if let Err(e) = limiter.decrement_rate_limit(&client).await {
            warn!("Failed to decrement rate limit for {}: {}", client, e);
        }
        if let Err(e) = analytics.track_redirect_counter().await {
            warn!("Failed to track redirect: {}", e);
        }
        if let Err(e) = analytics.track_short_url_access(&short_code).await {
            warn!("Failed to track access to '{}': {}", short_code, e);
        }
    });
}

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::{
    handlers::client_ip,
    services::{AnalyticsService, RateLimitService},
    types::Result,
};

/// Total redirect count route handler
pub async fn redirect_count_handler(
    req: HttpRequest,
    analytics: web::Data<AnalyticsService>,
    limiter: web::Data<RateLimitService>,
) -> Result<impl Responder> {
    limiter.check_rate_limit(&client_ip(&req)).await?;

    let count = analytics.get_redirect_count().await?;
    Ok(HttpResponse::Ok().json(json!({
        "total_redirects": count,
        "message": "Analytics data retrieved successfully",
    })))
}

/// Per short code access count route handler
pub async fn short_url_count_handler(
    req: HttpRequest,
    path: web::Path<String>,
    analytics: web::Data<AnalyticsService>,
    limiter: web::Data<RateLimitService>,
) -> Result<impl Responder> {
    limiter.check_rate_limit(&client_ip(&req)).await?;

    let short_code = path.into_inner();
    let count = analytics.get_short_url_access_count(&short_code).await?;
    Ok(HttpResponse::Ok().json(json!({
        "short_code": short_code,
        "access_count": count,
        "message": "Short URL analytics retrieved successfully",
    })))
}

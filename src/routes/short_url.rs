use actix_web::web;

use crate::handlers::{
    redirect_count_handler, resolve_handler, short_url_count_handler, shorten_handler,
};

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("", web::post().to(shorten_handler))
            .route("/analytics", web::get().to(redirect_count_handler))
            .route("/analytics/{code}", web::get().to(short_url_count_handler)),
    );
}

/// The catch-all redirect route; register it after every other route
pub fn configure_redirect(cfg: &mut web::ServiceConfig) {
    cfg.route("/{code}", web::get().to(resolve_handler));
}

use actix_web::web;

mod analytics;
mod rate_limit;
mod short_url;

pub use analytics::AnalyticsService;
pub use rate_limit::RateLimitService;
pub use short_url::ShortUrlService;

use crate::{config::Config, store::Stores};

/// Service instances built once at startup and shared by every worker
#[derive(Clone)]
pub struct Services {
    pub short_urls: web::Data<ShortUrlService>,
    pub rate_limits: web::Data<RateLimitService>,
    pub analytics: web::Data<AnalyticsService>,
}

impl Services {
    pub fn new(stores: &Stores, config: &Config) -> Self {
        Self {
            short_urls: web::Data::new(ShortUrlService::new(
                stores.mappings.clone(),
                &config.app.domain,
                &config.shortener,
            )),
            rate_limits: web::Data::new(RateLimitService::new(
                stores.counters.clone(),
                &config.rate_limit,
            )),
            analytics: web::Data::new(AnalyticsService::new(stores.counters.clone())),
        }
    }

    /// Service Register
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.short_urls.clone())
            .app_data(self.rate_limits.clone())
            .app_data(self.analytics.clone());
    }
}

use actix_web::{web, HttpResponse, Responder};

mod short_url;

use crate::types::{AppState, HealthStatus};

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    // Calculate uptime in seconds
    let uptime = data.start_time.elapsed().as_secs();
    let store_up = data.stores.is_healthy().await;

    let status = HealthStatus {
        status: String::from(if store_up { "OK" } else { "DEGRADED" }),
        version: data.version.clone(),
        store: String::from(if store_up { "up" } else { "down" }),
        uptime_seconds: uptime,
    };

    if store_up {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
    short_url::configure_routes(cfg);
    // Must stay last, "/{code}" matches any single segment
    short_url::configure_redirect(cfg);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use actix_web::{
        http::{header::LOCATION, StatusCode},
        test, App,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        config::{
            AppConfig, Config, Environment, RateLimitConfig, ServerConfig, ShortenerConfig,
            StoreConfig,
        },
        services::Services,
        store::{StoreBackend, Stores},
    };

    fn test_config(quota: i64) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".parse().unwrap(),
                port: 3000,
                workers: 1,
            },
            app: AppConfig {
                name: "linkquota".to_string(),
                version: "0.1.0".to_string(),
                environment: Environment::Testing,
                log_level: "debug".to_string(),
                domain: "http://localhost:3000".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                addr: "localhost:6379".to_string(),
                password: None,
            },
            rate_limit: RateLimitConfig {
                quota,
                window: Duration::from_secs(30 * 60),
            },
            shortener: ShortenerConfig {
                default_expiry_hours: 24,
            },
        }
    }

    macro_rules! test_app {
        ($quota:expr) => {{
            let stores = Stores::in_memory();
            let services = Services::new(&stores, &test_config($quota));
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        start_time: Instant::now(),
                        stores,
                        version: "0.1.0".to_string(),
                    }))
                    .configure(|cfg| services.register(cfg))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    fn shorten(ip: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1")
            .insert_header(("x-forwarded-for", ip))
            .set_json(body)
    }

    fn get(ip: &str, uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(("x-forwarded-for", ip))
    }

    #[actix_web::test]
    async fn test_shorten_then_redirect() {
        let app = test_app!(20);

        let resp = test::call_service(
            &app,
            shorten("1.2.3.4", json!({"url": "example.com/docs", "short": "docs"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["url"], "http://example.com/docs");
        assert_eq!(body["short"], "http://localhost:3000/docs");
        assert_eq!(body["expiry"], 24);
        assert_eq!(body["rate_limit"], 19);
        let reset = body["rate_limit_reset"].as_u64().unwrap();
        assert!((29..=30).contains(&reset));

        let resp = test::call_service(&app, get("1.2.3.4", "/docs").to_request()).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "http://example.com/docs"
        );
    }

    #[actix_web::test]
    async fn test_quota_exhaustion_returns_too_many_requests() {
        let app = test_app!(2);

        for (i, expected_remaining) in [1, 0].into_iter().enumerate() {
            let resp = test::call_service(
                &app,
                shorten("1.2.3.4", json!({"url": format!("https://example.com/{}", i)}))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["rate_limit"], expected_remaining);
        }

        let resp = test::call_service(
            &app,
            shorten("1.2.3.4", json!({"url": "https://example.com/2"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        // Another client is unaffected
        let resp = test::call_service(
            &app,
            shorten("5.6.7.8", json!({"url": "https://example.com/3"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_shorten_error_statuses() {
        let app = test_app!(20);

        let resp = test::call_service(
            &app,
            shorten("1.1.1.1", json!({"url": "https://example.com", "short": "taken"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            shorten("1.1.1.1", json!({"url": "https://example.org", "short": "taken"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = test::call_service(
            &app,
            shorten("1.1.1.1", json!({"url": "http://localhost:3000"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            shorten("1.1.1.1", json!({"url": "https://example.com", "short": "no/slash"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1")
                .insert_header(("x-forwarded-for", "1.1.1.1"))
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "cannot parse JSON");
    }

    #[actix_web::test]
    async fn test_unknown_code_is_not_found() {
        let app = test_app!(20);

        let resp = test::call_service(&app, get("1.2.3.4", "/missing").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], 404);
    }

    #[actix_web::test]
    async fn test_redirects_are_counted_in_background() {
        let app = test_app!(20);

        let resp = test::call_service(&app, get("9.9.9.9", "/api/v1/analytics").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            shorten("9.9.9.9", json!({"url": "https://example.com", "short": "hits"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        for _ in 0..2 {
            let resp = test::call_service(&app, get("9.9.9.9", "/hits").to_request()).await;
            assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        }

        // Let the detached bookkeeping tasks run
        actix_web::rt::time::sleep(Duration::from_millis(50)).await;

        let resp = test::call_service(&app, get("9.9.9.9", "/api/v1/analytics").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_redirects"], 2);

        let resp =
            test::call_service(&app, get("9.9.9.9", "/api/v1/analytics/hits").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["short_code"], "hits");
        assert_eq!(body["access_count"], 2);
    }

    #[actix_web::test]
    async fn test_redirect_consumes_quota() {
        let app = test_app!(2);

        let resp = test::call_service(
            &app,
            shorten("7.7.7.7", json!({"url": "https://example.com", "short": "once"})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["rate_limit"], 1);

        let resp = test::call_service(&app, get("7.7.7.7", "/once").to_request()).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);

        // Let the detached bookkeeping task run
        actix_web::rt::time::sleep(Duration::from_millis(50)).await;

        let resp = test::call_service(&app, get("7.7.7.7", "/once").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_out_of_range_expiry_is_bad_request() {
        let app = test_app!(20);

        for expiry in [json!(8761), json!(u64::MAX)] {
            let resp = test::call_service(
                &app,
                shorten("3.3.3.3", json!({"url": "https://example.com", "expiry": expiry}))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test_app!(20);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["store"], "up");
    }
}

use crate::{api::payslip, config::Config, error::PayslipError};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with a burst of the same size.
///
/// Returns `None` when `requests_per_min` is zero; `Config::from_env` rejects that value.
pub fn build_rate_limit(requests_per_min: u32) -> Option<RateLimit> {
    if requests_per_min == 0 {
        return None;
    }

    GovernorConfigBuilder::default()
        .milliseconds_per_request((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

/// Body parse failures answer with the same `{ "error": ... }` shape as validation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        PayslipError::validation(format!("Invalid JSON body: {err}")).into()
    })
}

pub fn payslip_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payslips")
            // /payslips
            .service(web::resource("").route(web::post().to(payslip::create_payslip)))
            // /payslips/{employee_id}/{month}/{year}
            .service(
                web::resource("/{employee_id}/{month}/{year}")
                    .route(web::get().to(payslip::get_payslip)),
            ),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, rate_limit: &RateLimit) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(rate_limit)) // rate limiting
            .configure(payslip_routes),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, http::StatusCode, test};

    use super::*;

    #[::core::prelude::v1::test]
    fn zero_requests_per_minute_has_no_limiter() {
        assert!(build_rate_limit(0).is_none());
    }

    #[actix_web::test]
    async fn limiter_rejects_requests_past_the_burst() {
        let rate_limit = build_rate_limit(2).unwrap();
        let app = test::init_service(
            App::new()
                .wrap(Governor::new(&rate_limit))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri("/")
                .peer_addr("127.0.0.1:40000".parse().unwrap())
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }

        assert_eq!(
            statuses,
            [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }
}

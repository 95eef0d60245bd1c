use crate::{
    api::{employee, reports, upload},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let upload_limiter = Arc::new(build_limiter(config.rate_upload_per_min));
    let query_limiter = Arc::new(build_limiter(config.rate_query_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::resource("/upload")
                    .wrap(upload_limiter)
                    .route(web::post().to(upload::upload_attendance)),
            )
            .service(
                web::scope("")
                    .wrap(query_limiter)
                    .service(web::resource("/health").route(web::get().to(reports::health)))
                    .service(web::resource("/dashboard").route(web::get().to(reports::dashboard)))
                    .service(
                        web::resource("/month/{year}/{month}")
                            .route(web::get().to(reports::monthly_statistics)),
                    )
                    .service(web::resource("/months").route(web::get().to(reports::list_months)))
                    .service(
                        web::resource("/year/{year}")
                            .route(web::get().to(reports::yearly_statistics)),
                    )
                    .service(
                        web::resource("/year-comparison")
                            .route(web::get().to(reports::year_comparison)),
                    )
                    .service(
                        web::resource("/workforce/{year}/{month}")
                            .route(web::get().to(reports::daily_workforce)),
                    )
                    .service(
                        web::resource("/employees")
                            .route(web::get().to(employee::list_employees)),
                    ),
            ),
    );
}

//! API Controller modules

use actix_web::web;

pub mod misc;
pub mod reports;

/// Registers every `/api` endpoint.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(reports::upload)
        .service(reports::get_report)
        .service(reports::get_text)
        .service(reports::download)
        .service(misc::version);
}

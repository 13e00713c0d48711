//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod requests;
pub mod schemas;
pub mod state;
pub mod technicians;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the help desk routes and the JSON extractor configuration.
///
/// Health probes are registered separately because they carry their own
/// state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(requests::create_request)
        .service(requests::list_requests)
        .service(requests::list_requests_for_technician)
        .service(requests::get_request)
        .service(requests::assign_technician)
        .service(requests::update_status)
        .service(requests::auto_update_status)
        .service(technicians::list_technicians);
}

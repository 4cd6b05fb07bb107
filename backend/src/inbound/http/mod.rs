//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod itineraries;
pub mod places;
pub mod schemas;
pub mod state;
pub(crate) mod validation;

use actix_web::{HttpRequest, HttpResponse, web};

pub use error::ApiResult;

use crate::domain::Error;

use validation::invalid_body_error;

/// JSON extractor configuration that reports malformed bodies in the domain
/// error shape instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| invalid_body_error(err.to_string()).into())
}

/// Query extractor configuration mirroring [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| invalid_body_error(err.to_string()).into())
}

/// Default service for unmatched paths, answering 404 in the domain error
/// shape.
pub async fn unknown_route(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn unmatched_paths_get_a_json_not_found() {
        let app = test::init_service(App::new().default_service(web::to(unknown_route))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/nowhere").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["message"], "no route for GET /api/v1/nowhere");
    }
}

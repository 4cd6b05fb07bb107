//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use waypoint::Trace;
#[cfg(debug_assertions)]
use waypoint::doc::ApiDoc;
use waypoint::inbound::http::health::{HealthState, live, ready};
use waypoint::inbound::http::itineraries::enrich_itinerary;
use waypoint::inbound::http::places::{explore_places, nearby_places};
use waypoint::inbound::http::state::HttpState;
use waypoint::inbound::http::{json_config, query_config, unknown_route};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(json_config())
        .app_data(query_config())
        .service(explore_places)
        .service(nearby_places)
        .service(enrich_itinerary);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .default_service(web::to(unknown_route));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] holding the bind address, settings,
///   and any connected infrastructure.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when adapter wiring, binding the socket, or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;
    use waypoint::domain::TRACE_ID_HEADER;
    use waypoint::settings::AppSettings;

    fn fixture_state() -> (web::Data<HealthState>, web::Data<HttpState>) {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket addr"),
            AppSettings::default(),
        );
        let http_state = web::Data::new(build_http_state(&config).expect("http state"));
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        (health_state, http_state)
    }

    #[rstest]
    #[actix_web::test]
    async fn explore_is_served_under_api_prefix() {
        let (health_state, http_state) = fixture_state();
        let app = test::init_service(build_app(health_state, http_state)).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/places/explore?city=V%C5%A9ng%20T%C3%A0u&category=restaurant")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
        let body: Value = test::read_body_json(res).await;
        let items = body["items"].as_array().expect("items array");
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item["category"] == "restaurant"));
        let duplicates = items
            .iter()
            .filter(|item| item["name"] == "Gành Hào")
            .count();
        assert_eq!(duplicates, 1, "curated and partner copies merge");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_itinerary_body_uses_error_payload() {
        let (health_state, http_state) = fixture_state();
        let app = test::init_service(build_app(health_state, http_state)).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/itineraries/enrich")
                .insert_header(("Content-Type", "application/json"))
                .set_payload("not json")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert!(body["traceId"].is_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_probe_is_outside_api_scope() {
        let (health_state, http_state) = fixture_state();
        let app = test::init_service(build_app(health_state, http_state)).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

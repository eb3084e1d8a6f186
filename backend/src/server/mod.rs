//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use notes_backend::Trace;
#[cfg(debug_assertions)]
use notes_backend::doc::ApiDoc;
use notes_backend::inbound::http::root::hello;
use notes_backend::inbound::http::state::HttpState;
use notes_backend::inbound::http::users;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
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
    let api = web::scope("/api/v1").service(users::scope());

    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(hello);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "listening");
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Wiring tests for the assembled application.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use notes_backend::domain::TRACE_ID_HEADER;
    use rstest::rstest;
    use serde_json::{Value, json};
    use zeroize::Zeroizing;

    fn in_memory_config() -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket address"),
            Zeroizing::new("server-test-secret".to_owned()),
            false,
        )
    }

    #[actix_web::test]
    async fn root_route_is_mounted_and_traced() {
        let app = actix_test::init_service(build_app(build_http_state(&in_memory_config()))).await;

        let request = actix_test::TestRequest::get().uri("/").to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
    }

    #[rstest]
    #[case("/api/v1/users/me")]
    #[actix_web::test]
    async fn guarded_route_rejects_anonymous_request(#[case] uri: &str) {
        let app = actix_test::init_service(build_app(build_http_state(&in_memory_config()))).await;

        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let trace_header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["traceId"].as_str().map(str::to_owned), trace_header);
    }

    #[actix_web::test]
    async fn register_then_login_through_assembled_app() {
        let app = actix_test::init_service(build_app(build_http_state(&in_memory_config()))).await;

        let register = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"name": "Grace", "email": "grace@example.com", "password": "cobol"}))
            .to_request();
        let response = actix_test::call_service(&app, register).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let login = actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({"email": "grace@example.com", "password": "cobol"}))
            .to_request();
        let response = actix_test::call_service(&app, login).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "authorization")
        );
    }
}

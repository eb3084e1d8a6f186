//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the account endpoints, their request and response
//! bodies, the error envelope, and the `authorization` cookie security scheme.
//! Swagger UI serves it at `/docs` in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::users::{
    LoginRequest, MessageEnvelope, RegisterRequest, UserEnvelope, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                crate::inbound::http::session::AUTH_COOKIE,
                "Session token cookie set by POST /api/v1/users/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notes backend API",
        description = "User registration, login and session-cookie authenticated profile access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::root::hello,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        UserResponse,
        UserEnvelope,
        MessageEnvelope,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Account registration and sessions"),
        (name = "root", description = "Service greeting")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/login")]
    #[case("/api/v1/users/me")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("UserResponse", &["id", "name", "email", "createdAt", "updatedAt"])]
    #[case("RegisterRequest", &["name", "email", "password"])]
    #[case("LoginRequest", &["email", "password"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    fn user_response_schema_omits_password_hash() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(obj)) = schemas.get("UserResponse").expect("schema") else {
            panic!("expected Object schema");
        };
        assert!(!obj.properties.keys().any(|key| key.contains("password")));
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}

//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users       {"name":"Ada","email":"ada@example.com","password":"hunter2"}
//! POST /api/v1/users/login {"email":"ada@example.com","password":"hunter2"}
//! GET  /api/v1/users/me    (requires the authorization cookie)
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, Registration, User, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{AuthenticatedUser, session_cookie};
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Public projection of an account. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Success envelope carrying a user.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserResponse,
}

/// Success envelope without a payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    #[schema(example = "User logged in successfully")]
    pub message: String,
}

fn user_envelope(message: &str, user: &User) -> UserEnvelope {
    UserEnvelope {
        success: true,
        message: message.to_owned(),
        user: UserResponse::from(user),
    }
}

fn map_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&name, &email, &password).map_err(map_validation_error)?;
    let user = state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(user_envelope("User created successfully", &user)))
}

/// Authenticate and set the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = MessageEnvelope,
            headers(("Set-Cookie" = String, description = "authorization session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect password", body = Error),
        (status = 404, description = "Unknown email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&outcome.token, state.cookie))
        .json(MessageEnvelope {
            success: true,
            message: "User logged in successfully".to_owned(),
        }))
}

/// Return the account behind the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Missing or invalid session", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: AuthenticatedUser,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.profile.current_user(session.user_id()).await?;
    Ok(web::Json(user_envelope("User fetched successfully", &user)))
}

/// Mount the users routes under `/users` with JSON errors in the API envelope.
pub fn scope() -> actix_web::Scope {
    web::scope("/users")
        .app_data(
            web::JsonConfig::default()
                .error_handler(crate::inbound::http::error::json_error_handler),
        )
        .service(register)
        .service(login)
        .service(current_user)
}

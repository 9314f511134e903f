//! Users API handlers.
//!
//! ```text
//! POST  /users/create/ {"email":"test@example.com","password":"testpass","name":"Test"}
//! POST  /users/token/  {"email":"test@example.com","password":"testpass"}
//! GET   /users/me/     Authorization: Token <key>
//! PATCH /users/me/     Authorization: Token <key> {"name":"New name"}
//! ```
//!
//! Request bodies use optional fields so a missing value surfaces as a field
//! validation error rather than a deserialisation failure.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{ProfileUpdate, RegistrationRequest};
use crate::domain::{Account, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedAccount;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /users/create/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "test@example.com")]
    pub email: Option<String>,
    #[schema(example = "testpass", min_length = 5)]
    pub password: Option<String>,
    #[schema(example = "Test name")]
    pub name: Option<String>,
}

/// Request body for `POST /users/token/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    #[schema(example = "test@example.com")]
    pub email: Option<String>,
    #[schema(example = "testpass")]
    pub password: Option<String>,
}

/// Request body for `PATCH /users/me/`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[schema(min_length = 5)]
    pub password: Option<String>,
}

/// Public view of an account. Never carries the password.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileResponse {
    #[schema(example = "test@example.com")]
    pub email: String,
    #[schema(example = "Test name")]
    pub name: String,
}

impl From<&Account> for ProfileResponse {
    fn from(account: &Account) -> Self {
        Self {
            email: account.email().to_string(),
            name: account.name().to_string(),
        }
    }
}

/// Response body for `POST /users/token/`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    let code = match err {
        LoginValidationError::EmptyEmail => "email_required",
        LoginValidationError::EmptyPassword => "password_required",
    };
    Error::invalid_request(err.to_string())
        .with_details(serde_json::json!({ "field": err.field(), "code": code }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/users/create/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse),
        (status = 400, description = "Validation failed or email taken", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let account = state
        .registration
        .register(RegistrationRequest {
            email: email.unwrap_or_default(),
            password: Zeroizing::new(password.unwrap_or_default()),
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(&account)))
}

/// Exchange credentials for the account's API token.
#[utoipa::path(
    post,
    path = "/users/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or bad credentials", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let TokenRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password.unwrap_or_default());
    let credentials =
        LoginCredentials::try_from_parts(email.as_deref().unwrap_or_default(), &password)
            .map_err(|err| map_login_validation_error(&err))?;
    let token = state.login.obtain_token(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Return the caller's profile.
#[utoipa::path(
    get,
    path = "/users/me/",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("token" = []))
)]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedAccount,
) -> ApiResult<web::Json<ProfileResponse>> {
    let account = state.profile.fetch_profile(caller.account().id()).await?;
    Ok(web::Json(ProfileResponse::from(&account)))
}

/// Partially update the caller's profile.
#[utoipa::path(
    patch,
    path = "/users/me/",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation failed or email taken", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser",
    security(("token" = []))
)]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedAccount,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let UpdateProfileRequest {
        email,
        name,
        password,
    } = payload.into_inner();
    let update = ProfileUpdate {
        email,
        name,
        password: password.map(Zeroizing::new),
    };
    let account = state
        .profile_updates
        .update_profile(caller.account().id(), update)
        .await?;
    Ok(web::Json(ProfileResponse::from(&account)))
}

async fn method_not_allowed(req: HttpRequest) -> ApiResult<HttpResponse> {
    debug!(method = %req.method(), path = %req.path(), "method not allowed");
    Err(Error::method_not_allowed(format!(
        "method \"{}\" not allowed",
        req.method()
    )))
}

/// Register the `/users` resources.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use accounts::inbound::http::users;
///
/// let app = App::new().configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(
                web::resource("/create/")
                    .route(web::post().to(create_user))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/token/")
                    .route(web::post().to(create_token))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/me/")
                    .route(web::get().to(current_user))
                    .route(web::patch().to(update_current_user))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}

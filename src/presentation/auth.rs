use crate::domain::error::DomainError;
use crate::domain::user::{CreateUser, LoginRequest, UserProfile};
use crate::presentation::error::{ApiError, in_band};
use crate::presentation::handlers::AppState;
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use std::future::{Ready, ready};
use tracing::{info, instrument};

/// Who is behind a mutating request.
#[derive(Debug, Clone, PartialEq)]
pub enum Caller {
    /// Compat contract: the client names itself in the body.
    Asserted,
    /// Hardened contract: the subject of a verified bearer token.
    Verified(String),
}

impl Caller {
    /// Resolves the acting user id from the id the body claims.
    ///
    /// With a verified token an absent claim means "myself" and a different
    /// one is refused. Without one the claim is the identity and must be set.
    pub fn acting_as(&self, claimed: Option<&str>) -> Result<String, ApiError> {
        let claimed = claimed.map(str::trim).filter(|id| !id.is_empty());
        match (self, claimed) {
            (Caller::Verified(subject), Some(id)) if id != subject => Err(DomainError::Forbidden(
                "user id does not match the authenticated user".to_string(),
            )
            .into()),
            (Caller::Verified(subject), _) => Ok(subject.clone()),
            (Caller::Asserted, Some(id)) => Ok(id.to_string()),
            (Caller::Asserted, None) => {
                Err(DomainError::Validation("user id is required".to_string()).into())
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Caller::Asserted => "asserted",
            Caller::Verified(subject) => subject,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequest for Caller {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ApiError::Internal(
                "application state not configured".to_string(),
            )));
        };
        if !state.mode.is_hardened() {
            return ready(Ok(Caller::Asserted));
        }

        let result = match bearer_token(req) {
            None => Err(ApiError::Unauthorized("Missing bearer token".to_string())),
            Some(token) => state
                .auth_service
                .authenticate(token)
                .map(Caller::Verified)
                .map_err(ApiError::from),
        };
        ready(result)
    }
}

/// Compat mode echoes the stored user, hash included; hardened mode strips it.
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    let user = match state.auth_service.register_user(req.into_inner()).await {
        Ok(user) => user,
        Err(e) => {
            return in_band(&state.mode, StatusCode::UNPROCESSABLE_ENTITY, e, |e| {
                format!("{:#}", e)
            });
        }
    };
    info!(user_id = %user.id, "Registration complete");

    if state.mode.is_hardened() {
        Ok(HttpResponse::Ok().json(UserProfile::from(user)))
    } else {
        Ok(HttpResponse::Ok().json(user))
    }
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    match state.auth_service.login(req.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => match e.downcast_ref::<DomainError>() {
            Some(DomainError::UserNotFound | DomainError::PasswordIncorrect) => {
                in_band(&state.mode, StatusCode::UNPROCESSABLE_ENTITY, e, |e| {
                    e.to_string()
                })
            }
            _ => Err(e.into()),
        },
    }
}

/// Nothing is held server-side in either mode, so there is nothing to revoke.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(true)
}

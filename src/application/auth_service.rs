use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, LoginResponse, User};
use crate::infrastructure::security::{
    TokenSettings, generate_token, hash_password, validate_token, verify_password,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    tokens: Option<TokenSettings>,
}

impl AuthService {
    /// Without token settings, login answers with the bare identity and
    /// `authenticate` refuses everything.
    pub fn new(user_repository: Arc<dyn UserRepository>, tokens: Option<TokenSettings>) -> Self {
        Self {
            user_repository,
            tokens,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user registration");

        if req.email.trim().is_empty() {
            return Err(DomainError::Validation("email is required".to_string()).into());
        }
        if req.password.is_empty() {
            return Err(DomainError::Validation("password is required".to_string()).into());
        }

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::Validation(
                "User with this email already exists".to_string(),
            )
            .into());
        }

        let password = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email,
            password,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(user)
    }

    /// Checks credentials, issuing a token when tokens are enabled. Unknown
    /// email and wrong password are reported as distinct errors.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::UserNotFound
            })?;

        if !verify_password(&req.password, &user.password) {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::PasswordIncorrect.into());
        }

        let token = match &self.tokens {
            Some(tokens) => Some(generate_token(&user.id, &tokens.secret, tokens.ttl_secs).map_err(
                |e| {
                    error!(error = %e, "Failed to generate token");
                    DomainError::Internal(format!("Failed to generate token: {}", e))
                },
            )?),
            None => None,
        };

        info!(user_id = %user.id, "Login successful");
        Ok(LoginResponse {
            name: user.name,
            email: user.email,
            id: user.id,
            token,
        })
    }

    /// Resolves a bearer token to the user id it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<String, DomainError> {
        let tokens = self.tokens.as_ref().ok_or_else(|| {
            DomainError::Unauthorized("Token authentication is disabled".to_string())
        })?;
        validate_token(token, &tokens.secret).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            DomainError::Unauthorized("Invalid or expired token".to_string())
        })
    }
}

//! Local account registration and login.
//!
//! Known deficiency: this is a convenience gate for a single-user local
//! store, not an authentication system. Digests are salted but unstretched,
//! and there is no lockout or rate limiting.

use crate::model::account::{LandingRoute, Product, SessionUser, StoredUser};
use crate::model::ValidationError;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::session::AppSession;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    EmailTaken,
    InvalidCredentials,
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailTaken => write!(f, "this email is already registered"),
            Self::InvalidCredentials => write!(f, "email, password or product is incorrect"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EmailTaken | Self::InvalidCredentials => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: SessionUser,
    pub landing: LandingRoute,
}

pub struct AuthService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account for `product`.
    ///
    /// # Errors
    /// - `Validation` for a missing/unknown product, malformed email or empty password.
    /// - `EmailTaken` when the email already has an account.
    pub fn register(&self, email: &str, password: &str, product: &str) -> Result<(), AuthError> {
        let product: Product = product.parse()?;
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let mut users = self.repo.load_users();
        if users.iter().any(|user| user.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let salt = Uuid::new_v4().simple().to_string();
        users.push(StoredUser::new(&email, password, salt, product));
        self.repo.save_users(&users)?;
        info!(
            "event=user_register module=auth status=ok product={} accounts={}",
            product.as_str(),
            users.len()
        );
        Ok(())
    }

    /// Checks credentials and records the logged-in user.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        product: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let product: Product = product.parse()?;
        let email = normalize_email(email)?;

        let users = self.repo.load_users();
        let Some(user) = users
            .iter()
            .find(|user| user.matches(&email, password, product))
        else {
            warn!(
                "event=user_login module=auth status=error error_code=invalid_credentials product={}",
                product.as_str()
            );
            return Err(AuthError::InvalidCredentials);
        };

        let session_user = SessionUser {
            email: user.email.clone(),
            product: user.product,
        };
        self.repo.set_current_user(&session_user)?;
        info!(
            "event=user_login module=auth status=ok product={}",
            product.as_str()
        );
        Ok(LoginOutcome {
            landing: product.landing_route(),
            user: session_user,
        })
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.repo.clear_current_user()?;
        info!("event=user_logout module=auth status=ok");
        Ok(())
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.repo.current_user()
    }

    /// Session context for the user currently stored, if any.
    pub fn restore_session(&self) -> AppSession {
        AppSession::new(self.repo.current_user())
    }
}

fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

//! Authentication service.
//!
//! Password login with Argon2id hashes, bearer token issuance, and the role
//! gate used by the HTTP extractors.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, Identity, TokenError, TokenIssuer};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use mindwhiz_core::{Email, LoginResponse, Role};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a user with a hashed password.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` if the email format is invalid.
/// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
/// Returns `AuthError::UserAlreadyExists` if the email is already registered.
pub async fn register_user<S: UserRepository + ?Sized>(
    users: &S,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AuthError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let user = users
        .create_user(&email, &password_hash, role)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(user)
}

/// Authentication service.
///
/// Handles login; registration is also exposed as [`register_user`] for the CLI.
pub struct AuthService<'a, S: UserRepository + ?Sized> {
    users: &'a S,
    tokens: &'a TokenIssuer,
}

impl<'a, S: UserRepository + ?Sized> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a S, tokens: &'a TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Register a new user with email, password and role.
    ///
    /// # Errors
    ///
    /// See [`register_user`].
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        register_user(self.users, email, password, role).await
    }

    /// Login with email and password and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let credentials = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        let user = credentials.user;
        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse {
            token,
            user: user.summary(),
        })
    }
}

/// Check that `identity` holds the `required` role.
///
/// Only the Admin gate is mounted (product creation, via `RequireAdmin`);
/// carts are open to every authenticated user, so the Customer gate has no
/// route yet.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` with the gate's client-facing message.
pub fn require_role(identity: &Identity, required: Role) -> Result<(), AuthError> {
    match (required, identity.role) {
        (Role::Admin, Role::Admin) | (Role::Customer, Role::Customer) => Ok(()),
        (Role::Admin, Role::Customer) => Err(AuthError::Forbidden("Admin access required")),
        (Role::Customer, Role::Admin) => Err(AuthError::Forbidden(
            "Only customers can perform this action",
        )),
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

//! # Account Manager Service
//!
//! Registration, login and profile maintenance. Passwords are bcrypt-hashed
//! and the hash never leaves the database layer as part of a user record.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::queries;
use crate::db::{Database, DatabaseError, Role, UserRecord};
use crate::models::requests::{RegisterRequest, UpdateProfileRequest};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Accepted username length bounds.
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 30;

/// Errors that can occur in account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The email is already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// The username is already taken.
    #[error("Username is already taken")]
    UsernameTaken,

    /// Wrong email/password pair, or wrong current password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account has been deactivated.
    #[error("Account is disabled")]
    AccountDisabled,

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Service for user accounts.
#[derive(Clone)]
pub struct AccountManager {
    db: Database,
}

impl AccountManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a new account. Username and email must both be free;
    /// whichever collides decides the error.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserRecord, AccountError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
            return Err(AccountError::InvalidInput(format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            )));
        }
        if !email.contains('@') {
            return Err(AccountError::InvalidInput("Invalid email address".into()));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if let Some((taken_username, _)) =
            queries::find_user_conflict(self.db.pool(), &username, &email).await?
        {
            if taken_username.eq_ignore_ascii_case(&username) {
                return Err(AccountError::UsernameTaken);
            }
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            display_name: request.display_name.unwrap_or_else(|| username.clone()),
            username,
            email,
            avatar: String::new(),
            level: 1,
            experience: 0,
            coins: 1000,
            gems: 50,
            stats: Default::default(),
            preferences: Default::default(),
            role: Role::User,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        queries::create_user(self.db.pool(), &user, &password_hash).await?;
        info!("Account registered: {}", user.username);
        Ok(user)
    }

    /// Authenticate by email and password.
    ///
    /// Returns `InvalidCredentials` both for unknown emails and for wrong
    /// passwords, so the response does not leak which half failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AccountError> {
        let email = email.trim().to_lowercase();

        let (mut user, password_hash) = queries::get_user_credentials(self.db.pool(), &email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify(password, &password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AccountError::AccountDisabled);
        }

        queries::update_last_login(self.db.pool(), user.id).await?;
        user.last_login = Some(Utc::now());

        info!("User logged in: {}", user.username);
        Ok(user)
    }

    /// Get a user by id.
    pub async fn get(&self, user_id: Uuid) -> Result<UserRecord, AccountError> {
        queries::get_user_by_id(self.db.pool(), user_id)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))
    }

    /// Update the editable profile fields. Absent fields are untouched;
    /// preference fields merge individually.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserRecord, AccountError> {
        let mut user = self.get(user_id).await?;

        if let Some(display_name) = request.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(AccountError::InvalidInput(
                    "Display name cannot be empty".into(),
                ));
            }
            user.display_name = display_name;
        }
        if let Some(avatar) = request.avatar {
            user.avatar = avatar;
        }
        if let Some(preferences) = request.preferences {
            if let Some(faction) = preferences.favorite_faction {
                user.preferences.favorite_faction = Some(faction);
            }
            if let Some(notifications) = preferences.notifications {
                user.preferences.notifications = Some(notifications);
            }
        }

        user.updated_at = Utc::now();
        queries::update_user_profile(self.db.pool(), &user).await?;
        Ok(user)
    }

    /// Change the password, verifying the current one first.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let current_hash = queries::get_password_hash(self.db.pool(), user_id)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))?;

        if !verify(current_password, &current_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let new_hash = hash(new_password, DEFAULT_COST)?;
        queries::update_password(self.db.pool(), user_id, &new_hash).await?;

        info!("Password changed for user: {}", user_id);
        Ok(())
    }
}

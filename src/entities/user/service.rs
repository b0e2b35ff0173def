//! Registration and login

use std::sync::Arc;

use crate::core::error::{AuthError, EntityError, ServiceError, ServiceResult};
use crate::core::password::PasswordHasher;
use crate::core::store::UserStore;
use crate::core::token::TokenIssuer;

use super::model::{LoginInput, NewUser, RegisterInput, User};

/// Orchestrates user persistence, password hashing and token issuance
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenIssuer>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    /// Create a user with a hashed password
    ///
    /// Fails with `AlreadyExists` when the email is taken.
    pub async fn register(&self, input: RegisterInput) -> ServiceResult<User> {
        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(EntityError::duplicate_email(input.email).into());
        }

        let password_hash = self
            .hasher
            .hash(&input.password)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let user = self
            .store
            .insert(NewUser {
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and return a signed token for the user's uuid
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> ServiceResult<String> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let Some(user) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let matches = match self.hasher.verify(&password, &user.password_hash).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "stored password hash unusable");
                false
            }
        };
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.tokens
            .issue(&user.uuid.to_string())
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

//! Session holder: sign-up, phone-number sign-in, sign-out, token refresh
//! and password changes, plus the process-wide stream of auth-state events.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{NewUser, User};
use crate::auth::services::JwtKeys;
use crate::error::internal;
use crate::store::{is_duplicate, FinanceStore};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Phone number not found")]
    PhoneNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Phone number already registered")]
    PhoneTaken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Session has been signed out")]
    SessionRevoked,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for (StatusCode, String) {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::PhoneNotFound | AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::PhoneTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
            AuthError::Internal(e) => return internal(e),
        };
        (status, err.to_string())
    }
}

/// Auth-state change, published to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: Uuid, session_id: Uuid },
    SignedOut { user_id: Uuid, session_id: Uuid },
    TokenRefreshed { user_id: Uuid, session_id: Uuid },
    PasswordUpdated { user_id: Uuid },
}

/// A freshly opened or refreshed session with its token pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

#[derive(Clone)]
pub struct SessionHolder {
    store: Arc<dyn FinanceStore>,
    keys: JwtKeys,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionHolder {
    pub fn new(store: Arc<dyn FinanceStore>, keys: JwtKeys) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, keys, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: AuthEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    async fn open(&self, user: User) -> Result<AuthSession, AuthError> {
        let session = self.store.open_session(user.id).await?;
        let access_token = self.keys.sign_access(user.id, session.id)?;
        let refresh_token = self.keys.sign_refresh(user.id, session.id)?;
        self.publish(AuthEvent::SignedIn {
            user_id: user.id,
            session_id: session.id,
        });
        Ok(AuthSession {
            user,
            session_id: session.id,
            access_token,
            refresh_token,
        })
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone_number: &str,
    ) -> Result<AuthSession, AuthError> {
        if self.store.find_user_id_by_phone(phone_number).await?.is_some() {
            warn!(phone_number, "phone number already registered");
            return Err(AuthError::PhoneTaken);
        }
        // a profile can move to another number while keeping its account email
        if self.store.find_user_by_email(email).await?.is_some() {
            warn!(email, "account email already registered");
            return Err(AuthError::PhoneTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                phone_number: phone_number.to_string(),
            })
            .await
            .map_err(|e| {
                if is_duplicate(&e) {
                    AuthError::PhoneTaken
                } else {
                    AuthError::Internal(e)
                }
            })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        self.open(user).await
    }

    /// Resolves the phone number to its account first; an unknown phone
    /// fails before any password is checked.
    pub async fn sign_in(&self, phone_number: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(user_id) = self.store.find_user_id_by_phone(phone_number).await? else {
            warn!(phone_number, "sign-in unknown phone number");
            return Err(AuthError::PhoneNotFound);
        };

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "sign-in invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, email = %user.email, "user signed in");
        self.open(user).await
    }

    pub async fn sign_out(&self, current: CurrentUser) -> Result<(), AuthError> {
        self.store.revoke_session(current.session_id).await?;
        info!(user_id = %current.user_id, session_id = %current.session_id, "user signed out");
        self.publish(AuthEvent::SignedOut {
            user_id: current.user_id,
            session_id: current.session_id,
        });
        Ok(())
    }

    async fn ensure_live(&self, user_id: Uuid, session_id: Uuid) -> Result<(), AuthError> {
        match self.store.find_session(session_id).await? {
            Some(s) if s.user_id == user_id && s.is_live() => Ok(()),
            Some(_) => Err(AuthError::SessionRevoked),
            None => Err(AuthError::InvalidToken),
        }
    }

    /// Current user/session behind an access token.
    pub async fn current(&self, access_token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self
            .keys
            .verify_access(access_token)
            .map_err(|_| AuthError::InvalidToken)?;
        self.ensure_live(claims.sub, claims.sid).await?;
        Ok(CurrentUser {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let claims = self
            .keys
            .verify_refresh(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;
        self.ensure_live(claims.sub, claims.sid).await?;

        let user = self
            .store
            .find_user(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let access_token = self.keys.sign_access(user.id, claims.sid)?;
        let refresh_token = self.keys.sign_refresh(user.id, claims.sid)?;
        self.publish(AuthEvent::TokenRefreshed {
            user_id: user.id,
            session_id: claims.sid,
        });
        Ok(AuthSession {
            user,
            session_id: claims.sid,
            access_token,
            refresh_token,
        })
    }

    pub async fn update_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !verify_password(current_password, &user.password_hash)? {
            warn!(user_id = %user_id, "password change with wrong current password");
            return Err(AuthError::InvalidCredentials);
        }
        let hash = hash_password(new_password)?;
        self.store.update_password_hash(user_id, &hash).await?;
        info!(user_id = %user_id, "password updated");
        self.publish(AuthEvent::PasswordUpdated { user_id });
        Ok(())
    }
}

/// Logs auth-state changes for as long as the holder lives.
pub async fn log_auth_events(mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => debug!(?event, "auth state changed"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "auth event subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign-up form. The account email is derived from the phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login form: phone number instead of email.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub phone_number: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after sign-up, sign-in or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: Uuid,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

/// Current user and session, as the rest of the app sees it.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub user: PublicUser,
}

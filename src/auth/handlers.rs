use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, PublicUser, RefreshRequest, SessionResponse, SignInRequest, SignUpRequest},
        services::{is_valid_email, AuthUser},
        session::{AuthSession, CurrentUser},
        validation::Validate,
    },
    error::{internal, ApiError, FieldErrors},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/refresh", post(refresh))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(get_session))
        .route("/auth/sign-out", post(sign_out))
}

async fn auth_response(state: &AppState, session: AuthSession) -> Result<AuthResponse, (StatusCode, String)> {
    let profile = state
        .store
        .get_profile(session.user.id)
        .await
        .map_err(internal)?;
    Ok(AuthResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        session_id: session.session_id,
        user: PublicUser {
            id: session.user.id,
            email: session.user.email,
            name: profile.as_ref().map(|p| p.name.clone()),
            phone_number: profile.map(|p| p.phone_number),
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(mut payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    payload.name = payload.name.trim().to_string();
    payload.phone_number = payload.phone_number.trim().to_string();
    payload.validate().map_err(ApiError::Validation)?;

    let email = state.config.email_for_phone(&payload.phone_number);
    if !is_valid_email(&email) {
        warn!(email = %email, "phone number does not form a valid account email");
        let mut fields = FieldErrors::new();
        fields.insert("phone_number", "Phone number contains invalid characters".into());
        return Err(ApiError::Validation(fields).into());
    }

    let session = state
        .sessions
        .sign_up(&email, &payload.password, &payload.name, &payload.phone_number)
        .await?;
    Ok((StatusCode::CREATED, Json(auth_response(&state, session).await?)))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(mut payload): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.phone_number = payload.phone_number.trim().to_string();
    payload.validate().map_err(ApiError::Validation)?;

    let session = state
        .sessions
        .sign_in(&payload.phone_number, &payload.password)
        .await?;
    Ok(Json(auth_response(&state, session).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let session = state.sessions.refresh(&payload.refresh_token).await?;
    Ok(Json(auth_response(&state, session).await?))
}

#[instrument(skip(state))]
pub async fn sign_out(
    State(state): State<AppState>,
    AuthUser { user_id, session_id }: AuthUser,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .sessions
        .sign_out(CurrentUser { user_id, session_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    AuthUser { user_id, session_id }: AuthUser,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let user = state
        .store
        .find_user(user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;
    let profile = state.store.get_profile(user_id).await.map_err(internal)?;

    Ok(Json(SessionResponse {
        session_id,
        user: PublicUser {
            id: user.id,
            email: user.email,
            name: profile.as_ref().map(|p| p.name.clone()),
            phone_number: profile.map(|p| p.phone_number),
        },
    }))
}

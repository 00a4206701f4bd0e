use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        services::{is_valid_email, AuthUser},
        session::AuthError,
        validation::Validate,
    },
    error::{internal, ApiError, FieldErrors},
    profile::dto::{ChangePasswordRequest, ProfileUpdateRequest, ProfileView},
    state::AppState,
    store::is_duplicate,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/password", put(change_password))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<ProfileView>, (StatusCode, String)> {
    let user = state
        .store
        .find_user(user_id)
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound("User not found".into()))?;
    let profile = state
        .store
        .get_profile(user_id)
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(ProfileView {
        name: profile.name,
        phone_number: profile.phone_number,
        email: user.email,
    }))
}

/// The account email stays as created; sign-in resolves the new phone number
/// through the profile row.
#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(mut payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileView>, (StatusCode, String)> {
    payload.name = payload.name.trim().to_string();
    payload.phone_number = payload.phone_number.trim().to_string();
    payload.validate().map_err(ApiError::Validation)?;

    if !is_valid_email(&state.config.email_for_phone(&payload.phone_number)) {
        let mut fields = FieldErrors::new();
        fields.insert("phone_number", "Phone number contains invalid characters".into());
        return Err(ApiError::Validation(fields).into());
    }

    let owner = state
        .store
        .find_user_id_by_phone(&payload.phone_number)
        .await
        .map_err(internal)?;
    if owner.is_some_and(|id| id != user_id) {
        warn!(%user_id, "profile update to a phone number owned by another account");
        return Err(AuthError::PhoneTaken.into());
    }

    let profile = state
        .store
        .update_profile(user_id, &payload.name, &payload.phone_number)
        .await
        .map_err(|e| {
            if is_duplicate(&e) {
                <(StatusCode, String)>::from(AuthError::PhoneTaken)
            } else {
                internal(e)
            }
        })?
        .ok_or(ApiError::NotFound("Profile not found".into()))?;
    let user = state
        .store
        .find_user(user_id)
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound("User not found".into()))?;
    info!(%user_id, "profile updated");

    Ok(Json(ProfileView {
        name: profile.name,
        phone_number: profile.phone_number,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    payload.validate().map_err(ApiError::Validation)?;

    match state
        .sessions
        .update_password(user_id, &payload.current_password, &payload.new_password)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(AuthError::InvalidCredentials) => {
            let mut fields = FieldErrors::new();
            fields.insert("current_password", "Current password is incorrect".into());
            Err(ApiError::Validation(fields).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{dto::SignUpRequest, handlers::sign_up};
    use crate::config::test_config;
    use crate::store::{Duplicate, MockFinanceStore};
    use std::sync::Arc;
    use uuid::Uuid;

    async fn registered(state: &AppState, phone: &str) -> AuthUser {
        let (_, Json(created)) = sign_up(
            State(state.clone()),
            Json(SignUpRequest {
                name: "Asha".into(),
                phone_number: phone.into(),
                password: "Budget2024".into(),
                confirm_password: "Budget2024".into(),
            }),
        )
        .await
        .expect("sign up");
        AuthUser {
            user_id: created.user.id,
            session_id: created.session_id,
        }
    }

    #[tokio::test]
    async fn shows_and_updates_profile() {
        let state = AppState::fake();
        let me = registered(&state, "9876543210").await;

        let Json(view) = get_profile(State(state.clone()), me).await.expect("profile");
        assert_eq!(view.email, "9876543210@finzz.app");

        let Json(updated) = update_profile(
            State(state.clone()),
            me,
            Json(ProfileUpdateRequest {
                name: " Asha K ".into(),
                phone_number: "9123456780".into(),
            }),
        )
        .await
        .expect("update");
        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.phone_number, "9123456780");
        assert_eq!(updated.email, "9876543210@finzz.app");

        // the new number signs in
        state
            .sessions
            .sign_in("9123456780", "Budget2024")
            .await
            .expect("sign in with new phone");
    }

    #[tokio::test]
    async fn phone_owned_by_someone_else_conflicts() {
        let state = AppState::fake();
        registered(&state, "9000000001").await;
        let me = registered(&state, "9000000002").await;

        let (status, _) = update_profile(
            State(state),
            me,
            Json(ProfileUpdateRequest {
                name: "Asha".into(),
                phone_number: "9000000001".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn phone_claimed_between_check_and_update_conflicts() {
        let user_id = Uuid::new_v4();
        let mut store = MockFinanceStore::new();
        store.expect_find_user_id_by_phone().returning(|_| Ok(None));
        store
            .expect_update_profile()
            .times(1)
            .returning(|_, _, _| Err(anyhow::Error::new(Duplicate("phone number"))));
        let state = AppState::from_parts(Arc::new(store), Arc::new(test_config()));
        let me = AuthUser {
            user_id,
            session_id: Uuid::new_v4(),
        };

        let (status, msg) = update_profile(
            State(state),
            me,
            Json(ProfileUpdateRequest {
                name: "Asha".into(),
                phone_number: "9000000001".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(msg, "Phone number already registered");
    }

    #[tokio::test]
    async fn old_number_of_a_moved_profile_cannot_be_registered_again() {
        let state = AppState::fake();
        let me = registered(&state, "9000000001").await;
        update_profile(
            State(state.clone()),
            me,
            Json(ProfileUpdateRequest {
                name: "Asha".into(),
                phone_number: "9000000002".into(),
            }),
        )
        .await
        .expect("move to new number");

        let (status, _) = sign_up(
            State(state),
            Json(SignUpRequest {
                name: "Ravi".into(),
                phone_number: "9000000001".into(),
                password: "Budget2024".into(),
                confirm_password: "Budget2024".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let state = AppState::fake();
        let me = registered(&state, "9876543210").await;

        let (status, body) = change_password(
            State(state.clone()),
            me,
            Json(ChangePasswordRequest {
                current_password: "Wrong2024".into(),
                new_password: "Savings2025".into(),
                confirm_new_password: "Savings2025".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("current_password"));

        let status = change_password(
            State(state.clone()),
            me,
            Json(ChangePasswordRequest {
                current_password: "Budget2024".into(),
                new_password: "Savings2025".into(),
                confirm_new_password: "Savings2025".into(),
            }),
        )
        .await
        .expect("change");
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.sign_in("9876543210", "Budget2024").await.is_err());
        assert!(state.sessions.sign_in("9876543210", "Savings2025").await.is_ok());
    }
}

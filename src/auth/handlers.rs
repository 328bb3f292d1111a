use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        avatar::gravatar_url,
        dto::{CurrentUserResponse, LoginRequest, LoginResponse, PublicUser, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::{NewUser, User},
        validate::{validate_login, validate_register},
    },
    db::AppState,
    error::{ApiError, ApiResult},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(test))
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn current_routes() -> Router<AppState> {
    Router::new().route("/current", get(current))
}

/// Route probe, public.
async fn test() -> Json<Value> {
    Json(json!({ "msg": "Users works" }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<Json<PublicUser>> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = validate_register(&payload);
    if !errors.is_empty() {
        warn!(?errors, "register input rejected");
        return Err(ApiError::Validation(errors));
    }

    // Advisory check; the unique index closes the race it leaves open.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let avatar = gravatar_url(&payload.email);
    let password_hash = hash_password(&payload.password)?;

    let draft = NewUser {
        name: payload.name,
        email: payload.email,
        avatar,
        password_hash,
    };
    let user = User::create(&state.db, &draft).await.map_err(|e| {
        if e.as_database_error()
            .map_or(false, |d| d.is_unique_violation())
        {
            warn!(email = %draft.email, "duplicate email lost the insert race");
            ApiError::EmailTaken
        } else {
            error!(error = %e, "insert user failed");
            ApiError::Db(e)
        }
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
        avatar: user.avatar,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = validate_login(&payload);
    if !errors.is_empty() {
        warn!(?errors, "login input rejected");
        return Err(ApiError::Validation(errors));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::UserNotFound
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::WrongPassword);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        token: format!("Bearer {token}"),
    }))
}

#[instrument(skip(state))]
pub async fn current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            error!(user_id = %user_id, "token subject no longer exists");
            ApiError::Unauthorized("User not found")
        })?;

    Ok(Json(CurrentUserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_route_reports_users_works() {
        let Json(body) = test().await;
        assert_eq!(body, json!({ "msg": "Users works" }));
    }

    #[test]
    fn current_user_response_serialization() {
        let response = CurrentUserResponse {
            id: uuid::Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("id"));
    }
}

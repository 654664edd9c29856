use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        password::{hash_password, verify_password},
        repo::User,
        session::{clear_session_cookie, session_cookie, CurrentUser, SessionKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/check_session", get(check_session))
        .route("/logout", delete(logout))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<PublicUser>), ApiError> {
    // Checked before anything touches storage.
    if payload.password != payload.password_confirmation {
        warn!("signup password mismatch");
        return Err(ApiError::PasswordMismatch);
    }

    let username = payload.username.trim().to_owned();
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &username, &hash).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token)),
        Json(PublicUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<PublicUser>), ApiError> {
    // Usernames are stored trimmed, so the lookup trims too.
    let username = payload.username.trim();

    // Unknown username and wrong password take the same exit so the response
    // does not reveal which one it was.
    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        jar.add(session_cookie(token)),
        Json(PublicUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn check_session(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<PublicUser>, ApiError> {
    // A session whose user no longer exists reads the same as no session.
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
    }))
}

#[instrument(skip(jar))]
pub async fn logout(
    CurrentUser(user_id): CurrentUser,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), ApiError> {
    info!(user_id, "user logged out");
    Ok((StatusCode::NO_CONTENT, jar.add(clear_session_cookie())))
}

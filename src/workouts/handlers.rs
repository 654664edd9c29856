use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::session::CurrentUser,
    error::ApiError,
    state::AppState,
    workouts::{
        dto::{CreateWorkout, PageParams, UpdateWorkout, WorkoutPage},
        repo,
        repo::Workout,
        validate,
    },
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route(
            "/workouts/:id",
            get(get_workout)
                .patch(update_workout)
                .delete(delete_workout),
        )
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<WorkoutPage>, ApiError> {
    let (page, per_page) = params.normalize();
    let (workouts, total) = repo::list_page(&state.db, user_id, page, per_page).await?;

    // ceil(total / per_page); zero pages when the owner has no workouts.
    // Saturating so a per_page near i64::MAX cannot overflow the sum.
    let total_pages = total.saturating_add(per_page - 1) / per_page;

    Ok(Json(WorkoutPage {
        page,
        per_page,
        total,
        total_pages,
        workouts,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateWorkout>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    validate::validate_new(&payload)?;
    let workout = repo::create(&state.db, user_id, &payload).await?;
    info!(user_id, workout_id = workout.id, "workout created");
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Workout>, ApiError> {
    let workout = repo::find_scoped(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(workout))
}

#[instrument(skip(state, payload))]
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateWorkout>,
) -> Result<Json<Workout>, ApiError> {
    // Validation runs before the transaction opens, so a bad patch never
    // touches the row.
    validate::validate_patch(&payload)?;
    let workout = repo::update_scoped(&state.db, user_id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id, workout_id = workout.id, "workout updated");
    Ok(Json(workout))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete_scoped(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(user_id, workout_id = id, "workout deleted");
    Ok(StatusCode::NO_CONTENT)
}

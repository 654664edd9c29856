use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::workouts::dto::{CreateWorkout, UpdateWorkout};

/// Workout record in the database. Every query in this module is scoped by
/// `user_id`; a row owned by someone else is indistinguishable from a row
/// that does not exist.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Workout {
    pub id: i64,
    pub exercise: String,
    pub sets: i64,
    pub reps: i64,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub user_id: i64,
}

const WORKOUT_COLUMNS: &str = "id, exercise, sets, reps, duration, notes, date, user_id";

pub async fn list_page(
    db: &SqlitePool,
    owner_id: i64,
    page: i64,
    per_page: i64,
) -> Result<(Vec<Workout>, i64), ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = ?")
        .bind(owner_id)
        .fetch_one(db)
        .await?;

    let rows = sqlx::query_as::<_, Workout>(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(owner_id)
    .bind(per_page)
    // saturating: an absurdly large page is just an empty page, never a panic
    .bind(page.saturating_sub(1).saturating_mul(per_page))
    .fetch_all(db)
    .await?;

    Ok((rows, total))
}

/// `user_id` comes from the resolved session, never from the payload.
pub async fn create(
    db: &SqlitePool,
    owner_id: i64,
    new: &CreateWorkout,
) -> Result<Workout, ApiError> {
    let date = new.date.unwrap_or_else(OffsetDateTime::now_utc);
    let workout = sqlx::query_as::<_, Workout>(&format!(
        r#"
        INSERT INTO workouts (exercise, sets, reps, duration, notes, date, user_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(&new.exercise)
    .bind(new.sets)
    .bind(new.reps)
    .bind(new.duration)
    .bind(&new.notes)
    .bind(date)
    .bind(owner_id)
    .fetch_one(db)
    .await?;
    Ok(workout)
}

pub async fn find_scoped(
    db: &SqlitePool,
    owner_id: i64,
    workout_id: i64,
) -> Result<Option<Workout>, ApiError> {
    let workout = sqlx::query_as::<_, Workout>(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ? AND user_id = ?"
    ))
    .bind(workout_id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?;
    Ok(workout)
}

/// Apply a partial update inside one transaction: scoped fetch, merge the
/// present fields over the current row, write back. `id` and `user_id` are
/// not patchable.
pub async fn update_scoped(
    db: &SqlitePool,
    owner_id: i64,
    workout_id: i64,
    patch: &UpdateWorkout,
) -> Result<Option<Workout>, ApiError> {
    let mut tx = db.begin().await?;

    let current = sqlx::query_as::<_, Workout>(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ? AND user_id = ?"
    ))
    .bind(workout_id)
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Ok(None);
    };

    let exercise = patch.exercise.clone().unwrap_or(current.exercise);
    let sets = patch.sets.unwrap_or(current.sets);
    let reps = patch.reps.unwrap_or(current.reps);
    let duration = patch.duration.unwrap_or(current.duration);
    let notes = patch.notes.clone().unwrap_or(current.notes);

    let updated = sqlx::query_as::<_, Workout>(&format!(
        r#"
        UPDATE workouts
        SET exercise = ?, sets = ?, reps = ?, duration = ?, notes = ?
        WHERE id = ? AND user_id = ?
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(&exercise)
    .bind(sets)
    .bind(reps)
    .bind(duration)
    .bind(&notes)
    .bind(workout_id)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(updated))
}

pub async fn delete_scoped(
    db: &SqlitePool,
    owner_id: i64,
    workout_id: i64,
) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ? AND user_id = ?")
        .bind(workout_id)
        .bind(owner_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

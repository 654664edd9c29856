use crate::error::ApiError;
use crate::workouts::dto::{CreateWorkout, UpdateWorkout};

pub fn validate_exercise(exercise: &str) -> Result<(), ApiError> {
    if exercise.trim().is_empty() {
        return Err(ApiError::Validation("Exercise name is required".into()));
    }
    Ok(())
}

pub fn validate_sets(sets: i64) -> Result<(), ApiError> {
    if sets < 1 {
        return Err(ApiError::Validation("Sets must be at least 1".into()));
    }
    Ok(())
}

pub fn validate_reps(reps: i64) -> Result<(), ApiError> {
    if reps < 1 {
        return Err(ApiError::Validation("Reps must be at least 1".into()));
    }
    Ok(())
}

/// Every field is checked on create. `duration` and `notes` carry no
/// constraints beyond their types.
pub fn validate_new(new: &CreateWorkout) -> Result<(), ApiError> {
    validate_exercise(&new.exercise)?;
    validate_sets(new.sets)?;
    validate_reps(new.reps)?;
    Ok(())
}

/// Only the fields present on the patch are checked, before any row is
/// touched, so a failing patch leaves the record exactly as it was.
pub fn validate_patch(patch: &UpdateWorkout) -> Result<(), ApiError> {
    if let Some(exercise) = &patch.exercise {
        validate_exercise(exercise)?;
    }
    if let Some(sets) = patch.sets {
        validate_sets(sets)?;
    }
    if let Some(reps) = patch.reps {
        validate_reps(reps)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_workout(exercise: &str, sets: i64, reps: i64) -> CreateWorkout {
        CreateWorkout {
            exercise: exercise.into(),
            sets,
            reps,
            duration: None,
            notes: None,
            date: None,
        }
    }

    #[test]
    fn accepts_a_valid_workout() {
        assert!(validate_new(&new_workout("Bench Press", 3, 10)).is_ok());
    }

    #[test]
    fn rejects_whitespace_only_exercise() {
        let err = validate_new(&new_workout("   ", 3, 10)).unwrap_err();
        assert_eq!(err.to_string(), "Exercise name is required");
    }

    #[test]
    fn rejects_zero_sets_and_reps() {
        let err = validate_new(&new_workout("Squat", 0, 10)).unwrap_err();
        assert_eq!(err.to_string(), "Sets must be at least 1");
        let err = validate_new(&new_workout("Squat", 3, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Reps must be at least 1");
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = UpdateWorkout {
            notes: Some(Some("easy day".into())),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_ok());

        let patch = UpdateWorkout {
            sets: Some(0),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_err());
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::workouts::repo::Workout;

/// Request body for creating a workout. `date` falls back to "now" when
/// absent; `user_id` is never read from the client.
#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub exercise: String,
    pub sets: i64,
    pub reps: i64,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// Partial update: absent fields keep their prior values. `duration` and
/// `notes` are nullable columns, so "set to null" and "leave alone" have to
/// stay distinguishable, hence the double `Option`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkout {
    pub exercise: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Raw pagination query. Values arrive as strings so a malformed `page=abc`
/// falls back to the default instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 10;

impl PageParams {
    pub fn normalize(&self) -> (i64, i64) {
        (
            lenient(self.page.as_deref(), DEFAULT_PAGE),
            lenient(self.per_page.as_deref(), DEFAULT_PER_PAGE),
        )
    }
}

fn lenient(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[derive(Debug, Serialize)]
pub struct WorkoutPage {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub workouts: Vec<Workout>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, per_page: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_owned),
            per_page: per_page.map(str::to_owned),
        }
    }

    #[test]
    fn missing_params_use_defaults() {
        assert_eq!(params(None, None).normalize(), (1, 10));
    }

    #[test]
    fn valid_params_pass_through() {
        assert_eq!(params(Some("3"), Some("25")).normalize(), (3, 25));
    }

    #[test]
    fn malformed_params_fall_back() {
        assert_eq!(params(Some("abc"), Some("2.5")).normalize(), (1, 10));
    }

    #[test]
    fn non_positive_params_fall_back() {
        assert_eq!(params(Some("0"), Some("-4")).normalize(), (1, 10));
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let absent: UpdateWorkout = serde_json::from_str(r#"{"notes":"x"}"#).unwrap();
        assert_eq!(absent.duration, None);
        assert_eq!(absent.notes, Some(Some("x".into())));

        let nulled: UpdateWorkout = serde_json::from_str(r#"{"duration":null}"#).unwrap();
        assert_eq!(nulled.duration, Some(None));
        assert_eq!(nulled.notes, None);
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MovieId, ShowId, VenueId, TIMESTAMP_FORMAT, TIMESTAMP_LEN};
use crate::error::{EngineError, EngineResult};

/// Сеанс: фильм x зал x интервал `[start, end)` x цена.
/// Метки времени хранятся строками и сравниваются как текст.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub movie_id: MovieId,
    pub venue_id: VenueId,
    pub start: String,
    pub end: String,
    pub base_price: f64,
    pub tickets_sold: u32,
    pub revenue: f64,
}

impl Show {
    /// `[s1,e1)` и `[s2,e2)` пересекаются iff `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, start: &str, end: &str) -> bool {
        self.start.as_str() < end && start < self.end.as_str()
    }
}

/// Запрос на создание сеанса.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewShow {
    pub movie_id: MovieId,
    pub venue_id: VenueId,
    pub start: String,
    pub end: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub base_price: f64,
    #[serde(default)]
    pub allow_override: bool,
}

/// Загруженная запись сеанса с уже назначенным id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShowRecord {
    pub id: ShowId,
    pub movie_id: MovieId,
    pub venue_id: VenueId,
    pub start: String,
    pub end: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub base_price: f64,
}

/// Проверяет формат `YYYY-MM-DD HH:MM` фиксированной ширины.
pub fn check_timestamp(ts: &str) -> EngineResult<()> {
    if ts.len() != TIMESTAMP_LEN || NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_err() {
        return Err(EngineError::invalid(format!(
            "timestamp '{}' must look like YYYY-MM-DD HH:MM",
            ts
        )));
    }
    Ok(())
}

pub fn check_interval(start: &str, end: &str) -> EngineResult<()> {
    check_timestamp(start)?;
    check_timestamp(end)?;
    if end <= start {
        return Err(EngineError::invalid(format!("show end {} is not after start {}", end, start)));
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::MovieId;

/// Запись каталога. Ключ упорядочивания в индексе - `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Movie {
    pub id: MovieId,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub genre: String,
    /// Длительность в минутах
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration: u32,
    #[validate(range(min = 0.0, max = 10.0, message = "rating must be within 0..=10"))]
    pub rating: f32,
    pub language: String,
    pub release_date: String,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genre: impl Into<String>, duration: u32) -> Self {
        Self {
            id,
            title: title.into(),
            genre: genre.into(),
            duration,
            rating: 0.0,
            language: "en".to_string(),
            release_date: String::new(),
        }
    }
}

//! Загрузка начальных данных из JSON.
//!
//! Записи применяются через те же проверяемые операции, что и ручной ввод,
//! в порядке зависимостей: фильмы, залы, маршруты, сеансы, брони.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::EngineResult;
use crate::models::{Booking, Movie, RouteEdge, ShowRecord, VenueRecord};
use crate::{lock, read, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub venues: Vec<VenueRecord>,
    #[serde(default)]
    pub shows: Vec<ShowRecord>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub routes: Vec<RouteEdge>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&raw)?)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub movies: usize,
    pub venues: usize,
    pub routes: usize,
    pub shows: usize,
    pub bookings: usize,
    pub skipped_bookings: usize,
}

impl AppState {
    /// Применяет начальные данные. Первая ошибочная запись прерывает загрузку.
    pub fn load_seed(&self, seed: SeedData) -> EngineResult<SeedSummary> {
        info!("Starting seed load...");
        let mut summary = SeedSummary::default();

        for movie in seed.movies {
            self.add_movie(movie)?;
            summary.movies += 1;
        }

        for venue in seed.venues {
            self.insert_venue(venue)?;
            summary.venues += 1;
        }

        for edge in seed.routes {
            self.add_route(edge)?;
            summary.routes += 1;
        }

        {
            let catalog = read(&self.catalog);
            let mut office = lock(&self.box_office);
            for show in seed.shows {
                office.restore_show(&catalog, show)?;
                summary.shows += 1;
            }
            for booking in seed.bookings {
                if office.restore_booking(booking)? {
                    summary.bookings += 1;
                } else {
                    summary.skipped_bookings += 1;
                }
            }
        }

        info!(
            "Seed loaded: {} movies, {} venues, {} routes, {} shows, {} bookings ({} skipped)",
            summary.movies, summary.venues, summary.routes, summary.shows, summary.bookings, summary.skipped_bookings
        );
        Ok(summary)
    }
}

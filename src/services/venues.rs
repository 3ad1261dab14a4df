use tracing::info;

use crate::config::LimitsConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{SeatState, Venue, VenueId, VenueRecord};

/// Реестр залов фиксированной емкости.
#[derive(Debug)]
pub struct VenueRegistry {
    venues: Vec<Venue>,
    max_venues: usize,
    max_rows: usize,
    max_cols: usize,
    next_id: VenueId,
}

impl VenueRegistry {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            venues: Vec::with_capacity(limits.max_venues),
            max_venues: limits.max_venues,
            max_rows: limits.max_rows,
            max_cols: limits.max_cols,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Venue> {
        self.venues.iter()
    }

    pub fn add_venue(&mut self, name: &str, rows: usize, cols: usize) -> EngineResult<VenueId> {
        let id = self.next_id;
        self.insert_venue(VenueRecord { id, name: name.to_string(), rows, cols })
    }

    /// Добавляет зал с уже известным id (загрузка записей).
    pub fn insert_venue(&mut self, record: VenueRecord) -> EngineResult<VenueId> {
        if record.name.trim().is_empty() {
            return Err(EngineError::invalid("venue name must not be empty"));
        }
        if record.rows == 0 || record.cols == 0 || record.rows > self.max_rows || record.cols > self.max_cols {
            return Err(EngineError::invalid(format!(
                "venue '{}' grid {}x{} must be within 1x1..{}x{}",
                record.name, record.rows, record.cols, self.max_rows, self.max_cols
            )));
        }
        if self.venues.len() >= self.max_venues {
            return Err(EngineError::capacity(format!("venue registry holds at most {} venues", self.max_venues)));
        }
        if self.venues.iter().any(|v| v.id == record.id) {
            return Err(EngineError::conflict(format!("venue id {} already exists", record.id)));
        }

        let venue = Venue::new(record.id, record.name, record.rows, record.cols);
        info!("Venue {} '{}' added with {}x{} seats", venue.id, venue.name, venue.rows, venue.cols);
        self.next_id = self.next_id.max(record.id.saturating_add(1));
        self.venues.push(venue);
        Ok(record.id)
    }

    pub fn get(&self, id: VenueId) -> EngineResult<&Venue> {
        self.venues
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| EngineError::not_found(format!("venue {}", id)))
    }

    fn get_mut(&mut self, id: VenueId) -> EngineResult<&mut Venue> {
        self.venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| EngineError::not_found(format!("venue {}", id)))
    }

    pub fn seat_state(&self, venue_id: VenueId, label: &str) -> EngineResult<SeatState> {
        self.get(venue_id)?.seat(label)
    }

    pub fn set_seat_state(&mut self, venue_id: VenueId, label: &str, state: SeatState) -> EngineResult<()> {
        self.get_mut(venue_id)?.set_seat(label, state)
    }

    pub fn render_grid(&self, venue_id: VenueId) -> EngineResult<Vec<String>> {
        Ok(self.get(venue_id)?.render())
    }

    /// (занято, всего мест)
    pub fn occupancy(&self, venue_id: VenueId) -> EngineResult<(usize, usize)> {
        let venue = self.get(venue_id)?;
        Ok((venue.booked_count(), venue.capacity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(max_venues: usize) -> VenueRegistry {
        VenueRegistry::new(&LimitsConfig { max_venues, max_rows: 5, max_cols: 8, ..LimitsConfig::default() })
    }

    #[test]
    fn new_venue_starts_empty() {
        let mut venues = registry(2);
        let id = venues.add_venue("Main Hall", 2, 2).unwrap();

        for label in ["A1", "A2", "B1", "B2"] {
            assert_eq!(venues.seat_state(id, label), Ok(SeatState::Empty));
        }
        assert_eq!(venues.occupancy(id), Ok((0, 4)));
    }

    #[test]
    fn grid_limits_and_capacity_are_enforced() {
        let mut venues = registry(1);
        assert!(matches!(venues.add_venue("Too wide", 2, 9), Err(EngineError::InvalidInput(_))));
        assert!(matches!(venues.add_venue("Too tall", 6, 2), Err(EngineError::InvalidInput(_))));
        assert!(matches!(venues.add_venue("Nothing", 0, 2), Err(EngineError::InvalidInput(_))));

        venues.add_venue("Only", 5, 8).unwrap();
        assert!(matches!(venues.add_venue("Extra", 1, 1), Err(EngineError::CapacityExceeded(_))));
        assert_eq!(venues.len(), 1);
    }

    #[test]
    fn seat_state_round_trip_and_bad_labels() {
        let mut venues = registry(2);
        let id = venues.add_venue("Studio", 2, 3).unwrap();

        venues.set_seat_state(id, "B2", SeatState::Booked).unwrap();
        assert_eq!(venues.seat_state(id, "B2"), Ok(SeatState::Booked));
        assert_eq!(venues.occupancy(id), Ok((1, 6)));

        assert!(matches!(venues.seat_state(id, "C1"), Err(EngineError::InvalidInput(_))));
        assert!(matches!(venues.set_seat_state(id, "A4", SeatState::Booked), Err(EngineError::InvalidInput(_))));
        assert!(matches!(venues.seat_state(99, "A1"), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn loaded_ids_are_kept_and_duplicates_refused() {
        let mut venues = registry(3);
        venues.insert_venue(VenueRecord { id: 7, name: "Loaded".into(), rows: 1, cols: 1 }).unwrap();
        assert!(matches!(
            venues.insert_venue(VenueRecord { id: 7, name: "Again".into(), rows: 1, cols: 1 }),
            Err(EngineError::Conflict(_))
        ));
        assert_eq!(venues.add_venue("Next", 1, 1), Ok(8));
    }
}

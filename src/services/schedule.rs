use std::cmp::Ordering;
use tracing::{info, warn};
use validator::Validate;

use crate::catalog::CatalogIndex;
use crate::error::{EngineError, EngineResult};
use crate::models::show::check_interval;
use crate::models::{NewShow, Show, ShowId, ShowRecord, VenueId};
use crate::services::ordering::sorted_indices;
use crate::services::venues::VenueRegistry;

/// Порядки вывода сеансов. Оба идут через один и тот же сортировщик индексов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOrder {
    /// По времени начала, по возрастанию
    ByStart,
    /// По выручке, по убыванию
    ByRevenue,
}

impl ShowOrder {
    fn compare(self, a: &Show, b: &Show) -> Ordering {
        match self {
            ShowOrder::ByStart => a.start.cmp(&b.start),
            ShowOrder::ByRevenue => b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal),
        }
    }
}

#[derive(Debug)]
pub struct ScheduleManager {
    shows: Vec<Show>,
    max_shows: usize,
    next_id: ShowId,
}

impl ScheduleManager {
    pub fn new(max_shows: usize) -> Self {
        Self { shows: Vec::new(), max_shows, next_id: 1 }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// Новый сеанс. Пересечение с другим сеансом в том же зале - `Conflict`,
    /// если оператор явно не разрешил его через `allow_override`.
    pub fn add_show(
        &mut self,
        venues: &VenueRegistry,
        catalog: &CatalogIndex,
        request: NewShow,
    ) -> EngineResult<ShowId> {
        request.validate()?;
        let show = Show {
            id: self.next_id,
            movie_id: request.movie_id,
            venue_id: request.venue_id,
            start: request.start,
            end: request.end,
            base_price: request.base_price,
            tickets_sold: 0,
            revenue: 0.0,
        };
        self.insert(venues, catalog, show, request.allow_override)
    }

    /// Загруженный сеанс с готовым id. Пересечения только логируются.
    pub fn restore_show(
        &mut self,
        venues: &VenueRegistry,
        catalog: &CatalogIndex,
        record: ShowRecord,
    ) -> EngineResult<ShowId> {
        record.validate()?;
        if self.shows.iter().any(|s| s.id == record.id) {
            return Err(EngineError::conflict(format!("show id {} already exists", record.id)));
        }
        let show = Show {
            id: record.id,
            movie_id: record.movie_id,
            venue_id: record.venue_id,
            start: record.start,
            end: record.end,
            base_price: record.base_price,
            tickets_sold: 0,
            revenue: 0.0,
        };
        self.insert(venues, catalog, show, true)
    }

    fn insert(
        &mut self,
        venues: &VenueRegistry,
        catalog: &CatalogIndex,
        show: Show,
        allow_override: bool,
    ) -> EngineResult<ShowId> {
        check_interval(&show.start, &show.end)?;
        if !show.base_price.is_finite() {
            return Err(EngineError::invalid("show price must be a finite number"));
        }
        if catalog.find_by_id(show.movie_id).is_none() {
            return Err(EngineError::not_found(format!("movie {}", show.movie_id)));
        }
        let venue = venues.get(show.venue_id)?;
        if self.shows.len() >= self.max_shows {
            return Err(EngineError::capacity(format!("schedule holds at most {} shows", self.max_shows)));
        }

        let conflicts = self.conflicts_with(show.venue_id, &show.start, &show.end);
        if !conflicts.is_empty() {
            if !allow_override {
                return Err(EngineError::conflict(format!(
                    "{} - {} in venue '{}' overlaps show(s) {:?}",
                    show.start, show.end, venue.name, conflicts
                )));
            }
            warn!(
                "Show {} - {} in venue '{}' overlaps show(s) {:?}, override accepted",
                show.start, show.end, venue.name, conflicts
            );
        }

        let id = show.id;
        info!("Show {} scheduled: movie {} in venue {} at {}", id, show.movie_id, show.venue_id, show.start);
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.shows.push(show);
        Ok(id)
    }

    /// Id сеансов того же зала, пересекающихся с `[start, end)`.
    pub fn conflicts_with(&self, venue_id: VenueId, start: &str, end: &str) -> Vec<ShowId> {
        self.shows
            .iter()
            .filter(|s| s.venue_id == venue_id && s.overlaps(start, end))
            .map(|s| s.id)
            .collect()
    }

    pub fn get(&self, id: ShowId) -> EngineResult<&Show> {
        self.shows
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::not_found(format!("show {}", id)))
    }

    fn get_mut(&mut self, id: ShowId) -> EngineResult<&mut Show> {
        self.shows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::not_found(format!("show {}", id)))
    }

    pub fn shows_in_venue(&self, venue_id: VenueId) -> Vec<&Show> {
        self.list_by_start().into_iter().filter(|s| s.venue_id == venue_id).collect()
    }

    pub fn list(&self, order: ShowOrder) -> Vec<&Show> {
        let shows = &self.shows;
        sorted_indices(shows.len(), |a, b| order.compare(&shows[a], &shows[b]))
            .into_iter()
            .map(|i| &shows[i])
            .collect()
    }

    pub fn list_by_start(&self) -> Vec<&Show> {
        self.list(ShowOrder::ByStart)
    }

    pub fn list_by_revenue(&self) -> Vec<&Show> {
        self.list(ShowOrder::ByRevenue)
    }

    pub fn record_sale(&mut self, id: ShowId, amount: f64) -> EngineResult<()> {
        let show = self.get_mut(id)?;
        show.tickets_sold += 1;
        show.revenue += amount;
        Ok(())
    }

    /// Обратная операция для отмены; счетчики не уходят ниже нуля.
    pub fn reverse_sale(&mut self, id: ShowId, amount: f64) -> EngineResult<()> {
        let show = self.get_mut(id)?;
        show.tickets_sold = show.tickets_sold.saturating_sub(1);
        show.revenue = (show.revenue - amount).max(0.0);
        Ok(())
    }
}

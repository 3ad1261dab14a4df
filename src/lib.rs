pub mod config;
pub mod error;
pub mod models;
pub mod catalog;
pub mod search;
pub mod services;
pub mod seed;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;
use validator::Validate;

use catalog::CatalogIndex;
use error::{EngineError, EngineResult};
use models::{
    Booking, BookingConfirmation, BookingId, BookingRequest, Movie, NewShow, OrderId, ConcessionOrder, RouteEdge,
    SeatState, Show, ShowId, Venue, VenueId, VenueRecord,
};
use services::{BoxOffice, ConcessionQueue, Route, RoutingGraph, ShowOrder};

// Shared state для всего движка.
//
// Порядок захвата блокировок всегда один: catalog -> box_office -> routes -> concessions.
// Залы, расписание и брони живут под одним мьютексом, поэтому проверка места
// и его занятие атомарны относительно других касс.
pub struct AppState {
    pub config: config::Config,
    catalog: RwLock<CatalogIndex>,
    box_office: Mutex<BoxOffice>,
    routes: RwLock<RoutingGraph>,
    concessions: Mutex<ConcessionQueue>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let box_office = BoxOffice::new(&config);
        let concessions = ConcessionQueue::with_capacity(config.limits.concession_capacity);
        Arc::new(Self {
            config,
            catalog: RwLock::new(CatalogIndex::new()),
            box_office: Mutex::new(box_office),
            routes: RwLock::new(RoutingGraph::new()),
            concessions: Mutex::new(concessions),
        })
    }

    // === Каталог ===

    /// `true` - новый фильм, `false` - заменена запись с тем же названием.
    pub fn add_movie(&self, movie: Movie) -> EngineResult<bool> {
        movie.validate()?;
        let title = movie.title.clone();
        let inserted = write(&self.catalog).insert(movie);
        if inserted {
            info!("Movie '{}' added to catalog", title);
        } else {
            info!("Movie '{}' replaced in catalog", title);
        }
        Ok(inserted)
    }

    pub fn find_movie(&self, title: &str) -> EngineResult<Movie> {
        read(&self.catalog).find(title).cloned()
    }

    pub fn remove_movie(&self, title: &str) -> EngineResult<Movie> {
        let removed = write(&self.catalog).delete(title)?;
        info!("Movie '{}' removed from catalog", removed.title);
        Ok(removed)
    }

    pub fn list_movies(&self) -> Vec<Movie> {
        read(&self.catalog).enumerate().into_iter().cloned().collect()
    }

    pub fn search_movies(&self, pattern: &str) -> Vec<Movie> {
        read(&self.catalog).search_by_pattern(pattern).into_iter().cloned().collect()
    }

    // === Залы и маршруты ===

    pub fn add_venue(&self, name: &str, rows: usize, cols: usize) -> EngineResult<VenueId> {
        let mut office = lock(&self.box_office);
        let id = office.add_venue(name, rows, cols)?;
        write(&self.routes).add_venue(id);
        Ok(id)
    }

    pub fn insert_venue(&self, record: VenueRecord) -> EngineResult<VenueId> {
        let mut office = lock(&self.box_office);
        let id = office.insert_venue(record)?;
        write(&self.routes).add_venue(id);
        Ok(id)
    }

    pub fn list_venues(&self) -> Vec<Venue> {
        lock(&self.box_office).venues().iter().cloned().collect()
    }

    pub fn seat_state(&self, venue_id: VenueId, label: &str) -> EngineResult<SeatState> {
        lock(&self.box_office).venues().seat_state(venue_id, label)
    }

    pub fn seat_map(&self, venue_id: VenueId) -> EngineResult<Vec<String>> {
        lock(&self.box_office).venues().render_grid(venue_id)
    }

    pub fn occupancy(&self, venue_id: VenueId) -> EngineResult<(usize, usize)> {
        lock(&self.box_office).venues().occupancy(venue_id)
    }

    pub fn add_route(&self, edge: RouteEdge) -> EngineResult<()> {
        write(&self.routes).add_route(edge)
    }

    /// Маршрут из `source` до каждого зала (включая сам `source` с расстоянием 0).
    pub fn routes_from(&self, source: VenueId) -> EngineResult<Vec<Route>> {
        Ok(read(&self.routes).shortest_path(source)?.routes())
    }

    pub fn path_between(&self, from: VenueId, to: VenueId) -> EngineResult<(u64, Vec<VenueId>)> {
        read(&self.routes).path_between(from, to)
    }

    pub fn nearest_venue(&self, source: VenueId) -> EngineResult<Option<(VenueId, u64)>> {
        read(&self.routes).nearest(source)
    }

    // === Расписание ===

    pub fn add_show(&self, request: NewShow) -> EngineResult<ShowId> {
        let catalog = read(&self.catalog);
        lock(&self.box_office).add_show(&catalog, request)
    }

    pub fn get_show(&self, id: ShowId) -> EngineResult<Show> {
        lock(&self.box_office).schedule().get(id).cloned()
    }

    pub fn shows(&self, order: ShowOrder) -> Vec<Show> {
        lock(&self.box_office).schedule().list(order).into_iter().cloned().collect()
    }

    // === Брони ===

    pub fn create_booking(&self, request: BookingRequest) -> EngineResult<BookingConfirmation> {
        lock(&self.box_office).create_booking(request)
    }

    pub fn cancel_booking(&self, id: BookingId) -> EngineResult<Booking> {
        lock(&self.box_office).cancel_booking(id)
    }

    pub fn get_booking(&self, id: BookingId) -> EngineResult<Booking> {
        lock(&self.box_office).bookings().get(id).cloned()
    }

    pub fn find_bookings_by_contact(&self, pattern: &str) -> Vec<Booking> {
        lock(&self.box_office).find_by_contact(pattern).into_iter().cloned().collect()
    }

    pub fn bookings_for_show(&self, show_id: ShowId) -> Vec<Booking> {
        lock(&self.box_office).bookings_for_show(show_id).into_iter().cloned().collect()
    }

    // === Буфет ===

    /// Заказ к брони: место берется из брони, сама бронь не меняется.
    pub fn order_for_booking(&self, booking_id: BookingId, items: &[(u32, f64)]) -> EngineResult<OrderId> {
        let seat = lock(&self.box_office).bookings().get(booking_id)?.seat.clone();
        lock(&self.concessions).place_order(Some(booking_id), &seat, items)
    }

    pub fn order_for_seat(&self, seat: &str, items: &[(u32, f64)]) -> EngineResult<OrderId> {
        if seat.trim().is_empty() {
            return Err(EngineError::invalid("concession order needs a seat"));
        }
        lock(&self.concessions).place_order(None, seat, items)
    }

    pub fn serve_next_order(&self) -> Option<ConcessionOrder> {
        lock(&self.concessions).serve_next()
    }

    pub fn pending_orders(&self) -> Vec<ConcessionOrder> {
        lock(&self.concessions).pending().into_iter().cloned().collect()
    }
}

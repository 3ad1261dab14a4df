//! Касса: залы, расписание и индекс броней под одним владельцем.
//!
//! `create_booking` и `cancel_booking` - составные операции "проверить место ->
//! занять -> записать в индекс -> учесть продажу". При ошибке любого шага
//! состояние возвращается к исходному.

use chrono::Local;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::catalog::CatalogIndex;
use crate::config::{Config, PricingConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Booking, BookingConfirmation, BookingId, BookingRequest, BookingStatus, NewShow, SeatState, ShowId,
    ShowRecord, VenueId, VenueRecord, TIMESTAMP_FORMAT,
};
use crate::services::bookings::BookingIndex;
use crate::services::schedule::ScheduleManager;
use crate::services::venues::VenueRegistry;

#[derive(Debug)]
pub struct BoxOffice {
    venues: VenueRegistry,
    schedule: ScheduleManager,
    bookings: BookingIndex,
    pricing: PricingConfig,
    /// Следующий свободный id; `None`, когда диапазон `u32` исчерпан.
    next_booking_id: Option<BookingId>,
}

impl BoxOffice {
    pub fn new(config: &Config) -> Self {
        Self {
            venues: VenueRegistry::new(&config.limits),
            schedule: ScheduleManager::new(config.limits.max_shows),
            bookings: BookingIndex::with_capacity(config.limits.booking_capacity),
            pricing: config.pricing.clone(),
            next_booking_id: Some(1),
        }
    }

    pub fn venues(&self) -> &VenueRegistry {
        &self.venues
    }

    pub fn schedule(&self) -> &ScheduleManager {
        &self.schedule
    }

    pub fn bookings(&self) -> &BookingIndex {
        &self.bookings
    }

    pub fn add_venue(&mut self, name: &str, rows: usize, cols: usize) -> EngineResult<VenueId> {
        self.venues.add_venue(name, rows, cols)
    }

    pub fn insert_venue(&mut self, record: VenueRecord) -> EngineResult<VenueId> {
        record.validate()?;
        self.venues.insert_venue(record)
    }

    pub fn add_show(&mut self, catalog: &CatalogIndex, request: NewShow) -> EngineResult<ShowId> {
        self.schedule.add_show(&self.venues, catalog, request)
    }

    pub fn restore_show(&mut self, catalog: &CatalogIndex, record: ShowRecord) -> EngineResult<ShowId> {
        self.schedule.restore_show(&self.venues, catalog, record)
    }

    /// Id для новой брони. Никогда не совпадает с живой записью индекса.
    fn allocate_booking_id(&self) -> EngineResult<BookingId> {
        self.next_booking_id
            .filter(|id| !self.bookings.contains(*id))
            .ok_or_else(|| EngineError::capacity("no free booking ids left"))
    }

    pub fn create_booking(&mut self, request: BookingRequest) -> EngineResult<BookingConfirmation> {
        request.validate()?;
        let id = self.allocate_booking_id()?;

        let show = self.schedule.get(request.show_id)?;
        let (venue_id, base_price) = (show.venue_id, show.base_price);
        let venue = self.venues.get(venue_id)?;
        let seat = venue.parse_label(&request.seat)?.to_string();

        if venue.seat(&seat)? == SeatState::Booked {
            return Err(EngineError::conflict(format!(
                "seat {} for show {} is already booked",
                seat, request.show_id
            )));
        }

        let booking = Booking {
            id,
            show_id: request.show_id,
            seat: seat.clone(),
            customer_name: request.customer_name,
            customer_contact: request.customer_contact,
            price_paid: self.pricing.ticket_price(base_price),
            status: BookingStatus::Active,
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        let confirmation = BookingConfirmation { booking_id: booking.id, seat: seat.clone(), price: booking.price_paid };

        self.commit(venue_id, booking)?;
        self.next_booking_id = id.checked_add(1);

        info!(
            "Booking {} created: show {} seat {} price {:.2}",
            confirmation.booking_id, request.show_id, seat, confirmation.price
        );
        Ok(confirmation)
    }

    /// Место -> индекс -> продажа. Если шаг не удался, предыдущие откатываются.
    fn commit(&mut self, venue_id: VenueId, booking: Booking) -> EngineResult<()> {
        let (id, show_id, price, seat) = (booking.id, booking.show_id, booking.price_paid, booking.seat.clone());

        self.venues.set_seat_state(venue_id, &seat, SeatState::Booked)?;
        if let Err(e) = self.bookings.insert(booking) {
            warn!("Booking {} not indexed ({}), releasing seat {} of show {}", id, e, seat, show_id);
            self.venues.set_seat_state(venue_id, &seat, SeatState::Empty)?;
            return Err(e);
        }
        if let Err(e) = self.schedule.record_sale(show_id, price) {
            warn!("Sale for booking {} not recorded ({}), rolling back", id, e);
            self.bookings.remove(id)?;
            self.venues.set_seat_state(venue_id, &seat, SeatState::Empty)?;
            return Err(e);
        }
        Ok(())
    }

    /// Отмена: место освобождается, продажа откатывается, запись становится надгробием.
    /// Возвращает запись со статусом `Cancelled`.
    pub fn cancel_booking(&mut self, id: BookingId) -> EngineResult<Booking> {
        let booking = self.bookings.get(id)?;
        if booking.status != BookingStatus::Active {
            return Err(EngineError::not_found(format!("active booking {}", id)));
        }
        let show_id = booking.show_id;
        let venue_id = self.schedule.get(show_id)?.venue_id;

        let mut booking = self.bookings.remove(id)?;
        self.venues.set_seat_state(venue_id, &booking.seat, SeatState::Empty)?;
        self.schedule.reverse_sale(show_id, booking.price_paid)?;
        booking.status = BookingStatus::Cancelled;

        info!("Booking {} cancelled, seat {} of show {} released", id, booking.seat, show_id);
        Ok(booking)
    }

    /// Загрузка записи брони. Активная бронь снова занимает свое место и
    /// учитывается как продажа, отмененная пропускается. Возвращает `true`,
    /// если запись попала в индекс.
    pub fn restore_booking(&mut self, booking: Booking) -> EngineResult<bool> {
        if booking.status == BookingStatus::Cancelled {
            debug!("Skipping cancelled booking {}", booking.id);
            return Ok(false);
        }
        if self.bookings.contains(booking.id) {
            return Err(EngineError::conflict(format!("booking id {} already exists", booking.id)));
        }

        let venue_id = self.schedule.get(booking.show_id)?.venue_id;
        let venue = self.venues.get(venue_id)?;
        let seat = venue.parse_label(&booking.seat)?.to_string();
        if venue.seat(&seat)? == SeatState::Booked {
            return Err(EngineError::conflict(format!(
                "seat {} for show {} is already booked",
                seat, booking.show_id
            )));
        }

        let (id, show_id, price) = (booking.id, booking.show_id, booking.price_paid);
        self.commit(venue_id, Booking { seat, ..booking })?;
        self.next_booking_id = match (self.next_booking_id, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        debug!("Booking {} restored for show {} at {:.2}", id, show_id, price);
        Ok(true)
    }

    pub fn find_by_contact(&self, pattern: &str) -> Vec<&Booking> {
        self.bookings.find_by_contact(pattern)
    }

    pub fn bookings_for_show(&self, show_id: ShowId) -> Vec<&Booking> {
        self.bookings.for_show(show_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn office(booking_capacity: usize, booking_fee: f64) -> (BoxOffice, ShowId) {
        let mut config = Config::default();
        config.limits.booking_capacity = booking_capacity;
        config.pricing.booking_fee = booking_fee;

        let mut catalog = CatalogIndex::new();
        catalog.insert(Movie::new(1, "Dune", "sci-fi", 155));

        let mut office = BoxOffice::new(&config);
        let venue = office.add_venue("V1", 2, 2).unwrap();
        let show = office
            .add_show(
                &catalog,
                NewShow {
                    movie_id: 1,
                    venue_id: venue,
                    start: "2024-05-01 10:00".to_string(),
                    end: "2024-05-01 12:00".to_string(),
                    base_price: 10.0,
                    allow_override: false,
                },
            )
            .unwrap();
        (office, show)
    }

    fn request(show: ShowId, seat: &str) -> BookingRequest {
        BookingRequest::new(show, seat, Name().fake::<String>(), SafeEmail().fake::<String>())
    }

    #[test]
    fn booking_occupies_seat_and_counts_sale() {
        let (mut office, show) = office(8, 1.5);
        let confirmation = office.create_booking(request(show, "a2")).unwrap();

        assert_eq!(confirmation.seat, "A2");
        assert_eq!(confirmation.price, 11.5);
        assert_eq!(office.venues().seat_state(1, "A2"), Ok(SeatState::Booked));

        let sold = office.schedule().get(show).unwrap();
        assert_eq!(sold.tickets_sold, 1);
        assert_eq!(sold.revenue, 11.5);

        let stored = office.bookings().get(confirmation.booking_id).unwrap();
        assert_eq!(stored.status, BookingStatus::Active);
        assert_eq!(stored.created_at.len(), 16);
    }

    #[test]
    fn second_booking_on_same_seat_conflicts() {
        let (mut office, show) = office(8, 0.0);
        let first = office.create_booking(request(show, "A1")).unwrap();

        assert!(matches!(office.create_booking(request(show, "A1")), Err(EngineError::Conflict(_))));
        assert_eq!(office.bookings().len(), 1);
        assert_eq!(office.bookings().get(first.booking_id).map(|b| b.status), Ok(BookingStatus::Active));
        assert_eq!(office.schedule().get(show).unwrap().tickets_sold, 1);
    }

    #[test]
    fn full_index_rolls_back_the_seat() {
        let (mut office, show) = office(1, 0.0);
        office.create_booking(request(show, "A1")).unwrap();

        let err = office.create_booking(request(show, "B1")).unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded(_)));
        assert_eq!(office.venues().seat_state(1, "B1"), Ok(SeatState::Empty));
        assert_eq!(office.schedule().get(show).unwrap().tickets_sold, 1);
        assert_eq!(office.schedule().get(show).unwrap().revenue, 10.0);
    }

    #[test]
    fn bad_requests_leave_no_trace() {
        let (mut office, show) = office(8, 0.0);
        assert!(matches!(office.create_booking(request(show, "C9")), Err(EngineError::InvalidInput(_))));
        assert!(matches!(office.create_booking(request(42, "A1")), Err(EngineError::NotFound(_))));
        assert!(matches!(
            office.create_booking(BookingRequest::new(show, "A1", "", "nobody@example.com")),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(office.bookings().is_empty());
        assert_eq!(office.venues().occupancy(1), Ok((0, 4)));
    }

    #[test]
    fn cancel_frees_seat_and_reverses_sale() {
        let (mut office, show) = office(8, 0.0);
        let first = office.create_booking(request(show, "A1")).unwrap();

        let cancelled = office.cancel_booking(first.booking_id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(office.venues().seat_state(1, "A1"), Ok(SeatState::Empty));
        assert_eq!(office.schedule().get(show).unwrap().tickets_sold, 0);
        assert!(matches!(office.bookings().get(first.booking_id), Err(EngineError::NotFound(_))));

        assert!(matches!(office.cancel_booking(first.booking_id), Err(EngineError::NotFound(_))));

        let again = office.create_booking(request(show, "A1")).unwrap();
        assert_ne!(again.booking_id, first.booking_id);
    }

    #[test]
    fn restored_bookings_occupy_seats_and_advance_ids() {
        let (mut office, show) = office(8, 0.0);
        let loaded = Booking {
            id: 40,
            show_id: show,
            seat: "b2".to_string(),
            customer_name: "Loaded".to_string(),
            customer_contact: "loaded@example.com".to_string(),
            price_paid: 9.0,
            status: BookingStatus::Active,
            created_at: "2024-04-30 18:00".to_string(),
        };
        let cancelled = Booking { id: 41, seat: "A1".to_string(), status: BookingStatus::Cancelled, ..loaded.clone() };

        assert_eq!(office.restore_booking(loaded.clone()), Ok(true));
        assert_eq!(office.restore_booking(cancelled), Ok(false));
        assert!(matches!(office.restore_booking(loaded), Err(EngineError::Conflict(_))));

        assert_eq!(office.venues().seat_state(1, "B2"), Ok(SeatState::Booked));
        assert_eq!(office.venues().seat_state(1, "A1"), Ok(SeatState::Empty));
        assert_eq!(office.bookings_for_show(show).len(), 1);
        assert_eq!(office.create_booking(request(show, "A1")).map(|c| c.booking_id), Ok(41));
        assert_eq!(office.find_by_contact("LOADED@").len(), 1);
    }

    #[test]
    fn loaded_max_id_never_gets_reused() {
        let (mut office, show) = office(8, 0.0);
        let loaded = Booking {
            id: u32::MAX,
            show_id: show,
            seat: "A1".to_string(),
            customer_name: "Anna".to_string(),
            customer_contact: "anna@example.com".to_string(),
            price_paid: 10.0,
            status: BookingStatus::Active,
            created_at: "2024-04-30 18:00".to_string(),
        };
        assert_eq!(office.restore_booking(loaded), Ok(true));

        let err = office.create_booking(BookingRequest::new(show, "A2", "Boris", "boris@example.com")).unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded(_)));

        let kept = office.bookings().get(u32::MAX).unwrap();
        assert_eq!((kept.customer_name.as_str(), kept.seat.as_str()), ("Anna", "A1"));
        assert_eq!(office.venues().seat_state(1, "A1"), Ok(SeatState::Booked));
        assert_eq!(office.venues().seat_state(1, "A2"), Ok(SeatState::Empty));
        assert_eq!(office.bookings().len(), 1);
        assert_eq!(office.schedule().get(show).unwrap().tickets_sold, 1);
    }

    #[test]
    fn allocator_skips_past_loaded_ids() {
        let (mut office, show) = office(8, 0.0);
        let first = office.create_booking(request(show, "A1")).unwrap();
        assert_eq!(first.booking_id, 1);

        let loaded = Booking {
            id: 2,
            show_id: show,
            seat: "B1".to_string(),
            customer_name: "Loaded".to_string(),
            customer_contact: "loaded@example.com".to_string(),
            price_paid: 10.0,
            status: BookingStatus::Active,
            created_at: "2024-04-30 18:00".to_string(),
        };
        assert_eq!(office.restore_booking(loaded), Ok(true));
        assert_eq!(office.create_booking(request(show, "A2")).map(|c| c.booking_id), Ok(3));
        assert_eq!(office.bookings().get(2).map(|b| b.seat.as_str()), Ok("B1"));
    }
}

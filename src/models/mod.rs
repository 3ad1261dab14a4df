pub mod movie;
pub mod venue;
pub mod show;
pub mod booking;
pub mod concession;
pub mod route;

pub use movie::Movie;
pub use venue::{SeatLabel, SeatState, Venue, VenueRecord};
pub use show::{NewShow, Show, ShowRecord};
pub use booking::{Booking, BookingConfirmation, BookingRequest, BookingStatus};
pub use concession::{ConcessionOrder, OrderStatus};
pub use route::RouteEdge;

pub type MovieId = u32;
pub type VenueId = u32;
pub type ShowId = u32;
pub type BookingId = u32;
pub type OrderId = u32;

/// Формат всех временных меток движка. Фиксированная ширина, поэтому
/// строки можно сравнивать лексикографически.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const TIMESTAMP_LEN: usize = 16;

pub mod ordering;
pub mod venues;
pub mod schedule;
pub mod bookings;
pub mod box_office;
pub mod routing;
pub mod concessions;

pub use bookings::BookingIndex;
pub use box_office::BoxOffice;
pub use concessions::ConcessionQueue;
pub use routing::{Route, RoutingGraph, ShortestPaths};
pub use schedule::{ScheduleManager, ShowOrder};
pub use venues::VenueRegistry;

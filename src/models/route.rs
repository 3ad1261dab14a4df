use serde::{Deserialize, Serialize};

use super::VenueId;

/// Ненаправленное ребро между залами с неотрицательным весом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub from: VenueId,
    pub to: VenueId,
    pub weight: u32,
}

use serde::{Deserialize, Serialize};

use super::{BookingId, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Done,
}

/// Заказ в буфете. Индексируется только позицией в очереди.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcessionOrder {
    pub id: OrderId,
    pub booking_id: Option<BookingId>,
    pub seat: String,
    pub items: Vec<u32>,
    pub total: f64,
    pub status: OrderStatus,
}

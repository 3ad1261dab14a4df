use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{BookingId, ShowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub show_id: ShowId,
    pub seat: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub price_paid: f64,
    pub status: BookingStatus,
    pub created_at: String,
}

// Запрос кассы на новую бронь
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    pub show_id: ShowId,
    pub seat: String,
    #[validate(length(min = 1, message = "customer name must not be empty"))]
    pub customer_name: String,
    pub customer_contact: String,
}

impl BookingRequest {
    pub fn new(
        show_id: ShowId,
        seat: impl Into<String>,
        customer_name: impl Into<String>,
        customer_contact: impl Into<String>,
    ) -> Self {
        Self {
            show_id,
            seat: seat.into(),
            customer_name: customer_name.into(),
            customer_contact: customer_contact.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
    pub seat: String,
    pub price: f64,
}

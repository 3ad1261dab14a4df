use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{BookingId, ConcessionOrder, OrderId, OrderStatus};

/// Кольцевая очередь заказов буфета фиксированной емкости. Строго FIFO.
#[derive(Debug)]
pub struct ConcessionQueue {
    buffer: Vec<Option<ConcessionOrder>>,
    head: usize,
    len: usize,
    next_id: OrderId,
}

impl ConcessionQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: (0..capacity.max(1)).map(|_| None).collect(),
            head: 0,
            len: 0,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    pub fn enqueue(&mut self, order: ConcessionOrder) -> EngineResult<()> {
        if self.is_full() {
            return Err(EngineError::capacity(format!(
                "concession queue holds at most {} orders",
                self.buffer.len()
            )));
        }
        let tail = (self.head + self.len) % self.buffer.len();
        self.next_id = self.next_id.max(order.id.saturating_add(1));
        self.buffer[tail] = Some(order);
        self.len += 1;
        Ok(())
    }

    /// Самый старый заказ, `None` если очередь пуста.
    pub fn dequeue(&mut self) -> Option<ConcessionOrder> {
        if self.is_empty() {
            return None;
        }
        let order = self.buffer[self.head].take();
        self.head = (self.head + 1) % self.buffer.len();
        self.len -= 1;
        order
    }

    pub fn peek(&self) -> Option<&ConcessionOrder> {
        if self.is_empty() {
            return None;
        }
        self.buffer[self.head].as_ref()
    }

    /// Ожидающие заказы от старого к новому.
    pub fn pending(&self) -> Vec<&ConcessionOrder> {
        (0..self.len)
            .filter_map(|i| self.buffer[(self.head + i) % self.buffer.len()].as_ref())
            .collect()
    }

    /// Новый заказ: id назначается очередью, сумма считается по (товар, цена).
    pub fn place_order(
        &mut self,
        booking_id: Option<BookingId>,
        seat: &str,
        items: &[(u32, f64)],
    ) -> EngineResult<OrderId> {
        if items.is_empty() {
            return Err(EngineError::invalid("concession order has no items"));
        }
        if items.iter().any(|(_, price)| !price.is_finite() || *price < 0.0) {
            return Err(EngineError::invalid("concession item price must be a non-negative number"));
        }

        let order = ConcessionOrder {
            id: self.next_id,
            booking_id,
            seat: seat.to_string(),
            items: items.iter().map(|(item, _)| *item).collect(),
            total: items.iter().map(|(_, price)| price).sum(),
            status: OrderStatus::Pending,
        };
        let id = order.id;
        self.enqueue(order)?;
        info!("Concession order {} queued for seat {}", id, seat);
        Ok(id)
    }

    /// Выдача: извлекает самый старый заказ и помечает его выполненным.
    pub fn serve_next(&mut self) -> Option<ConcessionOrder> {
        let mut order = self.dequeue()?;
        order.status = OrderStatus::Done;
        info!("Concession order {} served, total {:.2}", order.id, order.total);
        Some(order)
    }
}

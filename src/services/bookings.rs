//! Индекс броней: хеш-таблица фиксированной емкости с открытой адресацией.
//!
//! Мультипликативное хеширование (Кнут), линейное пробирование и три
//! состояния слота. Удаленный слот становится надгробием (`Tombstone`),
//! а не пустым: иначе цепочка пробирования для других ключей с тем же
//! началом оборвется и их поиск начнет возвращать `NotFound`.

use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, BookingId, ShowId};
use crate::search::{contains_ignore_case, SearchAlgorithm};

/// floor(2^32 * (sqrt(5) - 1) / 2)
const KNUTH_MULTIPLIER: u64 = 2_654_435_769;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Empty,
    Occupied(Booking),
    Tombstone,
}

/// Линейное пробирование с бюджетом, равным размеру таблицы.
struct ProbeSequence {
    start: usize,
    step: usize,
    capacity: usize,
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.step >= self.capacity {
            return None;
        }
        let pos = (self.start + self.step) % self.capacity;
        self.step += 1;
        Some(pos)
    }
}

#[derive(Debug)]
pub struct BookingIndex {
    slots: Vec<Slot>,
    len: usize,
}

impl BookingIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![Slot::Empty; capacity.max(1)], len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// h(k) = floor(m * frac(k * A))
    fn hash(&self, id: BookingId) -> usize {
        let fraction = (id as u64).wrapping_mul(KNUTH_MULTIPLIER) & 0xFFFF_FFFF;
        ((fraction * self.slots.len() as u64) >> 32) as usize
    }

    /// Слоты в порядке пробирования, ровно `capacity` штук.
    fn probe(&self, id: BookingId) -> ProbeSequence {
        ProbeSequence { start: self.hash(id), step: 0, capacity: self.slots.len() }
    }

    /// Позиция живой записи с таким id.
    fn position(&self, id: BookingId) -> Option<usize> {
        for pos in self.probe(id) {
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Occupied(b) if b.id == id => return Some(pos),
                _ => {}
            }
        }
        None
    }

    /// Вставка или замена записи с тем же id. Занимает первый
    /// пустой или надгробный слот последовательности; если вся таблица
    /// пройдена без места - `CapacityExceeded`.
    pub fn insert(&mut self, booking: Booking) -> EngineResult<()> {
        let mut free = None;
        let mut existing = None;
        for pos in self.probe(booking.id) {
            match &self.slots[pos] {
                Slot::Occupied(b) if b.id == booking.id => {
                    existing = Some(pos);
                    break;
                }
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    // Запоминаем, но идем дальше: тот же id может жить глубже
                    free.get_or_insert(pos);
                }
                Slot::Empty => {
                    free.get_or_insert(pos);
                    break;
                }
            }
        }

        if let Some(pos) = existing {
            self.slots[pos] = Slot::Occupied(booking);
            return Ok(());
        }

        match free {
            Some(pos) => {
                self.slots[pos] = Slot::Occupied(booking);
                self.len += 1;
                Ok(())
            }
            None => Err(EngineError::capacity(format!(
                "booking index is full ({} slots)",
                self.slots.len()
            ))),
        }
    }

    pub fn get(&self, id: BookingId) -> EngineResult<&Booking> {
        match self.position(id).map(|pos| &self.slots[pos]) {
            Some(Slot::Occupied(b)) => Ok(b),
            _ => Err(EngineError::not_found(format!("booking {}", id))),
        }
    }

    pub fn contains(&self, id: BookingId) -> bool {
        self.position(id).is_some()
    }

    /// Удаление ставит надгробие.
    pub fn remove(&mut self, id: BookingId) -> EngineResult<Booking> {
        let pos = self
            .position(id)
            .ok_or_else(|| EngineError::not_found(format!("booking {}", id)))?;
        match std::mem::replace(&mut self.slots[pos], Slot::Tombstone) {
            Slot::Occupied(b) => {
                self.len -= 1;
                Ok(b)
            }
            other => {
                self.slots[pos] = other;
                Err(EngineError::not_found(format!("booking {}", id)))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(b) => Some(b),
            _ => None,
        })
    }

    /// Линейный проход по занятым слотам, подстрока в контакте без учета регистра.
    pub fn find_by_contact(&self, pattern: &str) -> Vec<&Booking> {
        self.iter()
            .filter(|b| contains_ignore_case(&b.customer_contact, pattern, SearchAlgorithm::PrefixFunction))
            .collect()
    }

    pub fn for_show(&self, show_id: ShowId) -> Vec<&Booking> {
        self.iter().filter(|b| b.show_id == show_id).collect()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::VenueId;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatState {
    Empty,
    Booked,
}

impl SeatState {
    pub fn symbol(self) -> char {
        match self {
            SeatState::Empty => '.',
            SeatState::Booked => 'X',
        }
    }
}

/// Координаты места внутри сетки зала (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatLabel {
    pub row: usize,
    pub col: usize,
}

impl SeatLabel {
    /// Разбирает метку вида `B7` (буква ряда + номер места с 1).
    /// Метка вне сетки `rows x cols` отклоняется, а не обрезается.
    pub fn parse(label: &str, rows: usize, cols: usize) -> EngineResult<Self> {
        let label = label.trim();
        let mut chars = label.chars();
        let letter = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| EngineError::invalid(format!("seat label '{}' must start with a row letter", label)))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::invalid(format!("seat label '{}' has no column number", label)));
        }

        let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
        let col: usize = digits
            .parse()
            .map_err(|_| EngineError::invalid(format!("seat label '{}' has a bad column number", label)))?;

        if row >= rows || col == 0 || col > cols {
            return Err(EngineError::invalid(format!(
                "seat label '{}' is outside a {}x{} grid",
                label, rows, cols
            )));
        }

        Ok(SeatLabel { row, col: col - 1 })
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.row as u8) as char, self.col + 1)
    }
}

/// Входная запись зала (загрузка или ручное добавление).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VenueRecord {
    pub id: VenueId,
    #[validate(length(min = 1, message = "venue name must not be empty"))]
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

/// Зал с сеткой мест `rows x cols`, хранится построчно.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    seats: Vec<SeatState>,
}

impl Venue {
    pub fn new(id: VenueId, name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            id,
            name: name.into(),
            rows,
            cols,
            seats: vec![SeatState::Empty; rows * cols],
        }
    }

    pub fn parse_label(&self, label: &str) -> EngineResult<SeatLabel> {
        SeatLabel::parse(label, self.rows, self.cols)
    }

    pub fn seat(&self, label: &str) -> EngineResult<SeatState> {
        let at = self.parse_label(label)?;
        Ok(self.seats[at.row * self.cols + at.col])
    }

    pub fn set_seat(&mut self, label: &str, state: SeatState) -> EngineResult<()> {
        let at = self.parse_label(label)?;
        self.seats[at.row * self.cols + at.col] = state;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    pub fn booked_count(&self) -> usize {
        self.seats.iter().filter(|s| **s == SeatState::Booked).count()
    }

    /// Сетка для вывода: строка заголовка с номерами мест, затем по строке на ряд.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows + 1);
        let header: Vec<String> = (1..=self.cols).map(|c| format!("{:>2}", c)).collect();
        lines.push(format!("  {}", header.join(" ")));

        for (r, row) in self.seats.chunks(self.cols.max(1)).enumerate() {
            let symbols: Vec<String> = row.iter().map(|s| format!("{:>2}", s.symbol())).collect();
            lines.push(format!("{} {}", (b'A' + r as u8) as char, symbols.join(" ")));
        }
        lines
    }
}

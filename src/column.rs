use std::fmt;
use std::ops::RangeInclusive;

/// Numbers per column, and the size of every column's pool.
pub const NUMBERS_PER_COLUMN: u8 = 15;

/// Highest number in play.
pub const MAX_NUMBER: u8 = NUMBERS_PER_COLUMN * 5;

/// One of the five B-I-N-G-O columns. Each owns a fixed block of 15 numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    B,
    I,
    N,
    G,
    O,
}

impl Column {
    pub const ALL: [Column; 5] = [Column::B, Column::I, Column::N, Column::G, Column::O];

    /// Column at a 0-based card index (0 = B ... 4 = O).
    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    /// Column a drawn number belongs to; `None` outside 1..=75.
    pub fn of(number: u8) -> Option<Column> {
        if !(1..=MAX_NUMBER).contains(&number) {
            return None;
        }
        Self::from_index(usize::from((number - 1) / NUMBERS_PER_COLUMN))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Column::B => 'B',
            Column::I => 'I',
            Column::N => 'N',
            Column::G => 'G',
            Column::O => 'O',
        }
    }

    /// Parses a column letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Column> {
        Self::ALL
            .into_iter()
            .find(|col| col.letter() == c.to_ascii_uppercase())
    }

    /// The 15 numbers this column may hold, `15c+1 ..= 15c+15`.
    pub fn range(self) -> RangeInclusive<u8> {
        let low = self as u8 * NUMBERS_PER_COLUMN + 1;
        low..=low + NUMBERS_PER_COLUMN - 1
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

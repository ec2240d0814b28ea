use std::error::Error;
use std::fmt;

use rand::Rng;
use tracing::{debug, info};

use crate::column::Column;
use crate::lines::{Line, check_lines};

pub const CARD_SIZE: usize = 5;

/// Row and column of the free cell.
pub const CENTER: usize = CARD_SIZE / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` only for the free cell.
    pub number: Option<u8>,
    pub checked: bool,
    pub is_free: bool,
}

impl Cell {
    const FREE: Cell = Cell {
        number: None,
        checked: true,
        is_free: true,
    };

    fn numbered(number: u8) -> Cell {
        Cell {
            number: Some(number),
            checked: false,
            is_free: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardError {
    OutOfBounds { row: usize, col: usize },
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::OutOfBounds { row, col } => {
                write!(f, "cell ({row}, {col}) is outside the {CARD_SIZE}x{CARD_SIZE} card")
            }
        }
    }
}

impl Error for CardError {}

/// A 5x5 bingo card. Indexed `[row][col]`, column 0 is B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    cells: [[Cell; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// Deals a fresh card: every column gets four distinct numbers from its
    /// own 15-number range, the centre is free, nothing else is checked.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut cells = [[Cell::FREE; CARD_SIZE]; CARD_SIZE];

        for column in Column::ALL {
            let col = column.index();
            let mut numbers: Vec<u8> = column.range().collect();

            // Fisher-Yates shuffle
            for i in (1..numbers.len()).rev() {
                let j = rng.random_range(0..=i);
                numbers.swap(i, j);
            }

            let mut picks = numbers.into_iter();
            for (row, cells_row) in cells.iter_mut().enumerate() {
                if row == CENTER && col == CENTER {
                    continue;
                }
                if let Some(number) = picks.next() {
                    cells_row[col] = Cell::numbered(number);
                }
            }
        }

        info!("new card generated");
        Card { cells }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn is_checked(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(|c| c.checked)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; CARD_SIZE]> {
        self.cells.iter()
    }

    /// Flips the mark on one cell and returns the completed lines.
    ///
    /// The free cell ignores toggles.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<Vec<Line>, CardError> {
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(CardError::OutOfBounds { row, col })?;
        if !cell.is_free {
            cell.checked = !cell.checked;
            debug!(row, col, checked = cell.checked, "cell toggled");
        }
        Ok(check_lines(self))
    }

    /// Clears every mark except the free cell. Numbers stay.
    pub fn reset_checks(&mut self) -> Vec<Line> {
        for cell in self.cells.iter_mut().flatten() {
            cell.checked = cell.is_free;
        }
        info!("card checks reset");
        check_lines(self)
    }

    pub fn checked_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.checked).count()
    }

    /// Where a number sits on this card, if anywhere.
    pub fn position_of(&self, number: u8) -> Option<(usize, usize)> {
        self.cells.iter().enumerate().find_map(|(row, line)| {
            line.iter()
                .position(|c| c.number == Some(number))
                .map(|col| (row, col))
        })
    }
}

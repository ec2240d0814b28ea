use std::fmt;

use tracing::info;

use crate::card::{CARD_SIZE, Card};
use crate::column::Column;

/// A winning line. Ordering follows the line ids: rows 0-4, columns 5-9,
/// main diagonal 10, anti-diagonal 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    pub const ALL: [Line; 12] = [
        Line::Row(0),
        Line::Row(1),
        Line::Row(2),
        Line::Row(3),
        Line::Row(4),
        Line::Column(0),
        Line::Column(1),
        Line::Column(2),
        Line::Column(3),
        Line::Column(4),
        Line::MainDiagonal,
        Line::AntiDiagonal,
    ];

    pub fn id(self) -> u8 {
        match self {
            Line::Row(r) => r as u8,
            Line::Column(c) => (CARD_SIZE + c) as u8,
            Line::MainDiagonal => 10,
            Line::AntiDiagonal => 11,
        }
    }

    pub fn from_id(id: u8) -> Option<Line> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// `(row, col)` of the five cells on this line.
    pub fn cells(self) -> [(usize, usize); CARD_SIZE] {
        std::array::from_fn(|i| match self {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::MainDiagonal => (i, i),
            Line::AntiDiagonal => (i, CARD_SIZE - 1 - i),
        })
    }

    pub fn is_complete(self, card: &Card) -> bool {
        self.cells().iter().all(|&(r, c)| card.is_checked(r, c))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r + 1),
            Line::Column(c) => match Column::from_index(*c) {
                Some(col) => write!(f, "column {col}"),
                None => write!(f, "column {}", c + 1),
            },
            Line::MainDiagonal => write!(f, "diagonal \\"),
            Line::AntiDiagonal => write!(f, "diagonal /"),
        }
    }
}

/// Every fully checked line on the card, ascending by id.
pub fn check_lines(card: &Card) -> Vec<Line> {
    Line::ALL
        .into_iter()
        .filter(|line| line.is_complete(card))
        .collect()
}

/// Decides when to announce a bingo: only when the number of completed
/// lines goes up. Several lines finished by one mark give one notice.
#[derive(Debug, Default, Clone)]
pub struct WinNotifier {
    last_count: usize,
}

impl WinNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest line set; returns the new total when it grew.
    pub fn observe(&mut self, lines: &[Line]) -> Option<usize> {
        let count = lines.len();
        let grew = count > self.last_count;
        self.last_count = count;
        if grew {
            info!(lines = count, "bingo");
            Some(count)
        } else {
            None
        }
    }

    /// Forget the previous count, e.g. after a new card or a reset.
    pub fn clear(&mut self) {
        self.last_count = 0;
    }

    pub fn count(&self) -> usize {
        self.last_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CENTER;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fresh() -> Card {
        Card::generate(&mut StdRng::seed_from_u64(2024))
    }

    fn mark(card: &mut Card, cells: &[(usize, usize)]) -> Vec<Line> {
        let mut lines = check_lines(card);
        for &(r, c) in cells {
            lines = card.toggle(r, c).unwrap();
        }
        lines
    }

    fn ids(lines: &[Line]) -> Vec<u8> {
        lines.iter().map(|l| l.id()).collect()
    }

    #[test]
    fn line_ids_are_stable() {
        for (i, line) in Line::ALL.iter().enumerate() {
            assert_eq!(usize::from(line.id()), i);
            assert_eq!(Line::from_id(i as u8), Some(*line));
        }
        assert_eq!(Line::from_id(12), None);
        assert_eq!(Line::Column(2).id(), 7);
    }

    #[test]
    fn fresh_card_has_no_lines() {
        assert!(check_lines(&fresh()).is_empty());
    }

    #[test]
    fn full_card_completes_every_line() {
        let mut card = fresh();
        let all: Vec<(usize, usize)> = (0..CARD_SIZE)
            .flat_map(|r| (0..CARD_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| !(r == CENTER && c == CENTER))
            .collect();
        let lines = mark(&mut card, &all);
        assert_eq!(ids(&lines), (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn check_lines_is_idempotent() {
        let mut card = fresh();
        mark(&mut card, &[(0, 0), (1, 1), (3, 3)]);
        assert_eq!(check_lines(&card), check_lines(&card));
    }

    #[test]
    fn top_row_completes_line_zero() {
        let mut card = fresh();
        let lines = mark(&mut card, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        assert_eq!(lines, vec![Line::Row(0)]);
    }

    #[test]
    fn free_cell_counts_for_centre_column() {
        let mut card = fresh();
        let lines = mark(&mut card, &[(0, 2), (1, 2), (3, 2), (4, 2)]);
        assert_eq!(ids(&lines), vec![7]);
    }

    #[test]
    fn one_mark_can_finish_row_and_diagonal() {
        let mut card = fresh();
        // Row 4 minus (4,4), and the main diagonal minus (4,4).
        mark(&mut card, &[(4, 0), (4, 1), (4, 2), (4, 3), (0, 0), (1, 1), (3, 3)]);
        assert!(check_lines(&card).is_empty());

        let lines = card.toggle(4, 4).unwrap();
        assert_eq!(lines, vec![Line::Row(4), Line::MainDiagonal]);
    }

    #[test]
    fn unchecking_breaks_a_line() {
        let mut card = fresh();
        mark(&mut card, &[(0, 4), (1, 3), (3, 1), (4, 0)]);
        assert_eq!(check_lines(&card), vec![Line::AntiDiagonal]);
        assert!(card.toggle(1, 3).unwrap().is_empty());
    }

    #[test]
    fn reset_then_check_is_empty() {
        let mut card = fresh();
        mark(&mut card, &[(2, 0), (2, 1), (2, 3), (2, 4)]);
        assert_eq!(check_lines(&card), vec![Line::Row(2)]);
        card.reset_checks();
        assert!(check_lines(&card).is_empty());
    }

    #[test]
    fn notifier_fires_once_per_increase() {
        let mut notifier = WinNotifier::new();
        assert_eq!(notifier.observe(&[]), None);
        assert_eq!(notifier.observe(&[Line::Row(0)]), Some(1));
        assert_eq!(notifier.observe(&[Line::Row(0)]), None);
        // two lines at once: one notice with the total
        assert_eq!(
            notifier.observe(&[Line::Row(0), Line::Row(4), Line::MainDiagonal]),
            Some(3)
        );
        assert_eq!(notifier.observe(&[Line::Row(0)]), None);
        assert_eq!(notifier.observe(&[Line::Row(0), Line::Row(1)]), Some(2));
        notifier.clear();
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn line_labels() {
        assert_eq!(Line::Row(0).to_string(), "row 1");
        assert_eq!(Line::Column(3).to_string(), "column G");
        assert_eq!(Line::AntiDiagonal.to_string(), "diagonal /");
    }
}

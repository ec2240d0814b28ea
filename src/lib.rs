//! Bingo hall: a 75-ball lottery and a 5x5 bingo card with line detection.
//!
//! The [`draw`] and [`lottery`] modules run the number draw; [`card`] and
//! [`lines`] hold a player's card and work out which of the twelve lines
//! (five rows, five columns, two diagonals) are complete. The two halves
//! share no state. [`shell`] puts both behind a terminal front-end.

pub mod board_renderer;
pub mod card;
pub mod column;
pub mod config;
pub mod draw;
pub mod lines;
pub mod lottery;
pub mod shell;

pub use card::{CARD_SIZE, CENTER, Card, CardError, Cell};
pub use column::Column;
pub use draw::{DrawEngine, DrawError, HistoryOrder, POOL_SIZE};
pub use lines::{Line, WinNotifier, check_lines};
pub use lottery::Lottery;

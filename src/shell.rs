//! Terminal front-end: a lottery screen and a card screen driven by
//! line-based commands.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use rand::rngs::StdRng;
use tracing::warn;

use crate::board_renderer;
use crate::card::{CARD_SIZE, Card};
use crate::column::Column;
use crate::config::GameConfig;
use crate::draw::{DrawError, HistoryOrder, POOL_SIZE};
use crate::lines::{Line, WinNotifier};
use crate::lottery::Lottery;

const HELP: &str = "\
Screens:   lottery | card
Lottery:   draw | sort latest|asc | reset
Card:      mark <cell> (G4, or: mark 4 4, or: mark 52) | new | reset | render [path]
Anywhere:  show | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lottery,
    Card,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Show,
    Quit,
    Goto(Screen),
    Draw,
    Sort(HistoryOrder),
    Reset,
    NewCard,
    /// 0-based row and column.
    Mark(usize, usize),
    /// Mark whichever cell holds this number.
    MarkNumber(u8),
    Render(Option<PathBuf>),
}

/// Parses a cell written as column letter plus 1-based row, e.g. `G4`.
fn parse_cell(token: &str) -> Option<(usize, usize)> {
    let mut chars = token.chars();
    let column = Column::from_letter(chars.next()?)?;
    let row: usize = chars.as_str().parse().ok()?;
    (1..=CARD_SIZE).contains(&row).then(|| (row - 1, column.index()))
}

fn parse_index(token: &str) -> Result<usize, String> {
    match token.parse::<usize>() {
        Ok(n) if (1..=CARD_SIZE).contains(&n) => Ok(n - 1),
        _ => Err(format!("'{token}' is not a number from 1 to {CARD_SIZE}")),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Ok(Command::Show);
        };
        match (head.to_ascii_lowercase().as_str(), args) {
            ("help" | "?", _) => Ok(Command::Help),
            ("show", _) => Ok(Command::Show),
            ("quit" | "exit" | "q", _) => Ok(Command::Quit),
            ("lottery", _) => Ok(Command::Goto(Screen::Lottery)),
            ("card", _) => Ok(Command::Goto(Screen::Card)),
            ("draw" | "d", _) => Ok(Command::Draw),
            ("sort", [order]) => match order.to_ascii_lowercase().as_str() {
                "latest" => Ok(Command::Sort(HistoryOrder::Latest)),
                "asc" | "ascending" => Ok(Command::Sort(HistoryOrder::Ascending)),
                other => Err(format!("unknown sort order '{other}' (latest or asc)")),
            },
            ("sort", _) => Err("usage: sort latest|asc".to_string()),
            ("reset", _) => Ok(Command::Reset),
            ("new", _) => Ok(Command::NewCard),
            ("mark" | "m", [number]) if number.chars().all(|c| c.is_ascii_digit()) => number
                .parse()
                .map(Command::MarkNumber)
                .map_err(|_| format!("'{number}' is not a bingo number")),
            ("mark" | "m", [cell]) => parse_cell(cell)
                .map(|(row, col)| Command::Mark(row, col))
                .ok_or_else(|| format!("'{cell}' is not a cell like B1 or O5")),
            ("mark" | "m", [row, col]) => Ok(Command::Mark(parse_index(row)?, parse_index(col)?)),
            ("mark" | "m", _) => Err("usage: mark <cell> or mark <row> <col>".to_string()),
            ("render", []) => Ok(Command::Render(None)),
            ("render", [path]) => Ok(Command::Render(Some(PathBuf::from(path)))),
            (_, []) => parse_cell(head)
                .map(|(row, col)| Command::Mark(row, col))
                .ok_or_else(|| format!("unknown command '{head}', try 'help'")),
            _ => Err(format!("unknown command '{head}', try 'help'")),
        }
    }
}

pub struct Shell<I, O> {
    input: I,
    out: O,
    config: GameConfig,
    screen: Screen,
    lottery: Lottery,
    card: Card,
    card_rng: StdRng,
    lines: Vec<Line>,
    notifier: WinNotifier,
}

impl<I: BufRead, O: Write> Shell<I, O> {
    pub fn new(input: I, out: O, config: GameConfig, lottery_rng: StdRng, mut card_rng: StdRng) -> Self {
        let card = Card::generate(&mut card_rng);
        Shell {
            input,
            out,
            screen: Screen::Lottery,
            lottery: Lottery::new(lottery_rng, config.draw_delay()),
            card,
            card_rng,
            lines: Vec::new(),
            notifier: WinNotifier::new(),
            config,
        }
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Bingo! Type 'help' for commands.")?;
        self.show()?;
        while let Some(line) = self.prompt("> ")? {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }
        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Destructive actions need an explicit yes; anything else declines.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N] "))?;
        let yes = answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes"));
        if !yes {
            writeln!(self.out, "Cancelled.")?;
        }
        Ok(yes)
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        match (command, self.screen) {
            (Command::Help, _) => writeln!(self.out, "{HELP}"),
            (Command::Show, _) | (Command::Quit, _) => self.show(),
            (Command::Goto(screen), _) => {
                self.screen = screen;
                self.show()
            }
            (Command::Draw, Screen::Lottery) => self.draw(),
            (Command::Sort(order), Screen::Lottery) => {
                self.lottery.set_order(order);
                self.show_lottery()
            }
            (Command::Reset, Screen::Lottery) => {
                if self.confirm("Reset the draw history?")? {
                    self.lottery.reset();
                    self.show_lottery()?;
                }
                Ok(())
            }
            (Command::Reset, Screen::Card) => {
                if self.confirm("Clear all marks on this card?")? {
                    self.lines = self.card.reset_checks();
                    self.notifier.clear();
                    self.show_card()?;
                }
                Ok(())
            }
            (Command::NewCard, Screen::Card) => {
                self.card = Card::generate(&mut self.card_rng);
                self.lines.clear();
                self.notifier.clear();
                self.show_card()
            }
            (Command::Mark(row, col), Screen::Card) => self.mark(row, col),
            (Command::MarkNumber(number), Screen::Card) => match self.card.position_of(number) {
                Some((row, col)) => self.mark(row, col),
                None => writeln!(self.out, "{number} is not on this card."),
            },
            (Command::Render(path), Screen::Card) => self.render(path),
            (_, Screen::Lottery) => writeln!(self.out, "That works on the card screen; type 'card'."),
            (_, Screen::Card) => writeln!(self.out, "That works on the lottery screen; type 'lottery'."),
        }
    }

    fn show(&mut self) -> io::Result<()> {
        match self.screen {
            Screen::Lottery => self.show_lottery(),
            Screen::Card => self.show_card(),
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let ready_at = match self.lottery.begin_draw(Instant::now()) {
            Ok(ready_at) => ready_at,
            Err(err) => {
                let notice = match err {
                    DrawError::ExhaustedPool => "All numbers have been drawn!".to_string(),
                    DrawError::DrawPending => err.to_string(),
                };
                return writeln!(self.out, "{notice}");
            }
        };

        write!(self.out, "Drawing")?;
        let result = loop {
            if let Some(result) = self.lottery.poll(Instant::now()) {
                break result;
            }
            write!(self.out, ".")?;
            self.out.flush()?;
            let left = ready_at.saturating_duration_since(Instant::now());
            thread::sleep(left.min(self.config.spinner_frame()));
        };
        writeln!(self.out)?;

        match result {
            Ok(number) => {
                if let Some(column) = Column::of(number) {
                    writeln!(self.out, ">>> {column} {number} <<<")?;
                }
                self.show_lottery()
            }
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    fn show_lottery(&mut self) -> io::Result<()> {
        let engine = self.lottery.engine();
        let drawn = engine.history().len();
        let order = match self.lottery.order() {
            HistoryOrder::Latest => "latest first",
            HistoryOrder::Ascending => "ascending",
        };
        writeln!(self.out, "== Lottery ==")?;
        match engine.current().and_then(|n| Column::of(n).map(|c| (c, n))) {
            Some((column, number)) => writeln!(self.out, "Current: {column} {number}")?,
            None => writeln!(self.out, "Current: -")?,
        }
        writeln!(self.out, "Drawn numbers ({drawn}/{POOL_SIZE}), {order}:")?;
        let history: Vec<String> = self
            .lottery
            .sorted_history()
            .into_iter()
            .filter_map(|n| Column::of(n).map(|c| format!("{c}{n}")))
            .collect();
        for chunk in history.chunks(10) {
            writeln!(self.out, "  {}", chunk.join(" "))?;
        }
        if self.lottery.engine().is_exhausted() {
            writeln!(self.out, "Complete.")?;
        }
        Ok(())
    }

    fn mark(&mut self, row: usize, col: usize) -> io::Result<()> {
        if self.card.cell(row, col).is_some_and(|c| c.is_free) {
            return writeln!(self.out, "The FREE cell is always marked.");
        }
        match self.card.toggle(row, col) {
            Ok(lines) => {
                self.lines = lines;
                self.show_card()?;
                if let Some(total) = self.notifier.observe(&self.lines) {
                    let names: Vec<String> = self.lines.iter().map(Line::to_string).collect();
                    writeln!(self.out, "BINGO! {total} line(s) complete: {}", names.join(", "))?;
                }
                Ok(())
            }
            Err(err) => {
                warn!(%err, "mark refused");
                writeln!(self.out, "{err}")
            }
        }
    }

    fn render(&mut self, path: Option<PathBuf>) -> io::Result<()> {
        let path = path.unwrap_or_else(|| self.config.render_path.clone());
        let rendered = board_renderer::render_card_to_png(
            &self.card,
            &path,
            self.config.font_path.as_deref(),
            self.config.font_px,
        );
        match rendered {
            Ok(()) => writeln!(self.out, "Card image written to {}", path.display()),
            Err(e) => writeln!(self.out, "Failed to render card: {e}"),
        }
    }

    fn show_card(&mut self) -> io::Result<()> {
        writeln!(self.out, "== Card ==")?;
        if !self.lines.is_empty() {
            writeln!(self.out, "*** {} line BINGO! ***", self.lines.len())?;
        }
        let header: Vec<String> = Column::ALL.iter().map(|c| format!("{c:^6}")).collect();
        writeln!(self.out, "   {}", header.join(""))?;
        for (row, cells) in self.card.rows().enumerate() {
            let rendered: Vec<String> = cells
                .iter()
                .map(|cell| match (cell.number, cell.checked) {
                    (None, _) => " FREE ".to_string(),
                    (Some(n), true) => format!(" [{n:>2}] "),
                    (Some(n), false) => format!("  {n:>2}  "),
                })
                .collect();
            writeln!(self.out, "{:>2} {}", row + 1, rendered.join(""))?;
        }
        writeln!(
            self.out,
            "Checked: {}/{}  Lines: {}",
            self.card.checked_count(),
            CARD_SIZE * CARD_SIZE,
            self.lines.len()
        )?;
        Ok(())
    }
}

//! Text console for playing against the engine.
//!
//! Commands are read one per line and answered with a `=` (success) or `?`
//! (failure) line followed by a blank line. Coordinates are 1-based.
//!
//! ## Supported Commands
//!
//! - `play <row> <col>` - Place a stone for the side to move
//! - `genmove` - Let the engine play for the side to move
//! - `pass` - Pass for the side to move
//! - `undo` - Take back the last move
//! - `board` - Show the board
//! - `influence` - Show the influence of every empty cell
//! - `score` - Show the territory estimate for both colors
//! - `clear_board` - Start a new game
//! - `list_commands` / `known_command <cmd>` / `name` / `version` / `quit`

use std::fmt::{self, Write as _};
use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::analysis::MoveAnalysis;
use crate::board::{Board, Color, MoveError};
use crate::config::Config;
use crate::constants::TERRITORY_THRESHOLD;
use crate::mcts::tree_search;
use crate::position::{Move, Position};
use crate::scoring::{evaluate_position, evaluate_winner, influence_map};

/// The list of known console commands.
const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "clear_board",
    "genmove",
    "influence",
    "known_command",
    "list_commands",
    "name",
    "pass",
    "play",
    "quit",
    "score",
    "undo",
    "version",
];

/// Draw the board with 1-based coordinates.
///
/// With an influence overlay, empty cells leaning clearly to one side are
/// marked `•` (black) or `◦` (white).
pub fn render(board: &Board, overlay: Option<&[Vec<f64>]>) -> String {
    let mut out = String::new();
    match write_board(&mut out, board, overlay) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

fn write_board(out: &mut String, board: &Board, overlay: Option<&[Vec<f64>]>) -> fmt::Result {
    let size = board.size();
    out.push(' ');
    for c in 0..size {
        write!(out, " {}", c + 1)?;
    }
    out.push('\n');

    for r in 0..size {
        write!(out, "{}", r + 1)?;
        for c in 0..size {
            let ch = match (board.get((r, c)), overlay) {
                (Some(color), _) => color.symbol(),
                (None, Some(map)) if map[r][c] > TERRITORY_THRESHOLD => '•',
                (None, Some(map)) if map[r][c] < -TERRITORY_THRESHOLD => '◦',
                (None, _) => '.',
            };
            write!(out, " {ch}")?;
        }
        out.push('\n');
    }
    Ok(())
}

/// Console state.
pub struct Console {
    /// Current game
    pos: Position,
    config: Config,
    /// Answer every human move with an engine move
    auto_reply: bool,
    /// Candidates from the most recent engine search
    last_analysis: Vec<MoveAnalysis>,
}

impl Console {
    pub fn new(config: Config) -> Self {
        Self {
            pos: Position::with_size(config.board_size),
            config,
            auto_reply: false,
            last_analysis: Vec::new(),
        }
    }

    pub fn with_auto_reply(mut self, auto_reply: bool) -> Self {
        self.auto_reply = auto_reply;
        self
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn last_analysis(&self) -> &[MoveAnalysis] {
        &self.last_analysis
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            if message.is_empty() {
                writeln!(output, "{prefix}\n")?;
            } else {
                writeln!(output, "{prefix} {message}\n")?;
            }
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.pos = Position::with_size(self.config.board_size);
                self.last_analysis.clear();
                (true, String::new())
            }

            "board" => (true, self.show_board()),

            "influence" => (true, self.show_influence()),

            "score" => (true, self.show_score()),

            "undo" => {
                if self.pos.undo() {
                    (true, self.show_board())
                } else {
                    (false, "nothing to undo".to_string())
                }
            }

            "pass" => {
                let color = self.pos.next_to_move();
                self.pos.pass_turn();
                info!("{color} passes");
                let mut response = format!("{color} passes");
                self.after_human_move(&mut response);
                (true, response)
            }

            "play" => {
                let [row, col] = args else {
                    return (false, "usage: play <row> <col>".to_string());
                };
                let (Ok(row), Ok(col)) = (row.parse::<isize>(), col.parse::<isize>()) else {
                    warn!("unparsable coordinates: {row} {col}");
                    return (false, "Invalid input. Use row and column numbers.".to_string());
                };

                let color = self.pos.next_to_move();
                let (Some(r), Some(c)) = (row.checked_sub(1), col.checked_sub(1)) else {
                    return (false, MoveError::OutOfBounds.to_string());
                };
                match self.pos.apply_move(r, c, color) {
                    Ok(outcome) => {
                        info!("{color} plays ({row}, {col}) {}", outcome.message());
                        let mut response = outcome.message();
                        self.after_human_move(&mut response);
                        (true, response)
                    }
                    Err(e) => {
                        warn!("{color} move ({row}, {col}) rejected: {e}");
                        (false, e.to_string())
                    }
                }
            }

            "genmove" => match self.engine_move() {
                Ok(response) => (true, response),
                Err(e) => (false, e),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn after_human_move(&mut self, response: &mut String) {
        if self.auto_reply && !self.pos.is_game_over() {
            let reply = self.engine_move().unwrap_or_else(|e| e);
            append_line(response, &reply);
        }
        if self.pos.is_game_over() {
            append_line(response, &self.game_over());
        }
    }

    /// Search for the side to move and play the result.
    fn engine_move(&mut self) -> Result<String, String> {
        let color = self.pos.next_to_move();
        let result = tree_search(&self.pos, &self.config.search_config());
        self.pos.play(result.best).map_err(|e| e.to_string())?;
        info!(
            "engine ({color}) plays {} after {} iterations",
            result.best, result.iterations
        );

        let mut response = match result.best {
            Move::Pass => format!("{color} passes"),
            mv => format!("{color} plays {mv}"),
        };
        for candidate in &result.analysis {
            append_line(&mut response, &candidate.to_string());
        }
        self.last_analysis = result.analysis;
        Ok(response)
    }

    fn show_board(&self) -> String {
        let overlay = self
            .config
            .show_influence
            .then(|| influence_map(self.pos.board()));
        render(self.pos.board(), overlay.as_deref())
    }

    fn show_influence(&self) -> String {
        let mut out = String::new();
        for row in influence_map(self.pos.board()) {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:+.2}")).collect();
            append_line(&mut out, &cells.join(" "));
        }
        out
    }

    fn show_score(&self) -> String {
        let board = self.pos.board();
        [Color::Black, Color::White]
            .iter()
            .map(|&c| {
                format!(
                    "{c}: {:.1}% territory, strength {:.1}",
                    evaluate_winner(board, c) * 100.0,
                    evaluate_position(board, c)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn game_over(&self) -> String {
        let black = evaluate_winner(self.pos.board(), Color::Black);
        let winner = if black > 0.5 {
            "black wins"
        } else if black < 0.5 {
            "white wins"
        } else {
            "draw"
        };
        format!(
            "game over: {winner} (black {:.1}%, white {:.1}%)",
            black * 100.0,
            (1.0 - black) * 100.0
        )
    }
}

fn append_line(out: &mut String, line: &str) {
    if line.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(line);
}

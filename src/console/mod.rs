//! Line-oriented front end for playing a game in the terminal.
//!
//! [`Console::run`] is the "main loop": it reads one command per line, turns
//! it into calls to [`Game`] and prints the outcome. Every response starts
//! with a keyword (`ok`, `rejected:`, `status:`, `moves:`, `error:`) so the
//! output is easy to consume from scripts.

use std::io::{BufRead, Write};

use anyhow::Context;
use itertools::Itertools;
use tracing::info;

use crate::chess::core::Square;
use crate::chess::rules;
use crate::chess::ChessError;
use crate::console::command::Command;
use crate::game::Game;

mod command;

const HELP: &str = "\
commands:
  <from><to>, move <from><to>  move a piece, e.g. e2e4
  moves <square>               list legal targets of the piece on square
  status                       print game status
  board, d                     print the board
  fen                          print the position in FEN
  new                          start a new game
  position <fen>               continue from the given position
  help                         print this message
  quit                         exit";

/// Connects a [`Game`] with the input and output streams.
pub struct Console<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    /// Creates a console driving `game` with provided I/O.
    #[must_use]
    pub fn new(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    /// Reads and executes commands until `quit` or the end of input.
    ///
    /// Rejected moves and malformed commands are reported and the loop goes
    /// on.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails or the board invariants
    /// are violated (see [`ChessError::is_fatal`]).
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.print_status()?;
        loop {
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("failed to read command")?
                == 0
            {
                break;
            }
            match Command::parse(&line) {
                Command::Move { from, to } => self.handle_move(from, to)?,
                Command::Moves(square) => self.handle_moves(square)?,
                Command::Status => self.print_status()?,
                Command::ShowBoard => writeln!(self.output, "{:?}", self.game.board())?,
                Command::Fen => writeln!(self.output, "{}", self.game.board())?,
                Command::NewGame => {
                    self.game.new_game();
                    self.print_status()?;
                },
                Command::SetPosition { fen } => self.handle_position(&fen)?,
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Quit => break,
                Command::Empty => {},
                Command::Unknown(command) => {
                    writeln!(self.output, "unknown command: {command}")?;
                },
            }
        }
        info!("console session finished");
        Ok(())
    }

    fn handle_move(&mut self, from: Square, to: Square) -> anyhow::Result<()> {
        match self.game.attempt_move(from, to) {
            Ok(applied) => {
                writeln!(self.output, "ok {applied}")?;
                self.print_status()
            },
            Err(ChessError::IllegalMove { reason, .. }) => {
                writeln!(self.output, "rejected: {reason}")?;
                Ok(())
            },
            Err(e) => self.report(e),
        }
    }

    fn handle_moves(&mut self, square: Square) -> anyhow::Result<()> {
        match self.game.legal_targets(square) {
            Ok(targets) if targets.is_empty() => writeln!(self.output, "moves: none")?,
            Ok(targets) => writeln!(self.output, "moves: {}", targets.iter().join(" "))?,
            Err(e) => return self.report(e),
        }
        Ok(())
    }

    /// Replaces the game if the position is valid; keeps the current one
    /// otherwise.
    fn handle_position(&mut self, fen: &str) -> anyhow::Result<()> {
        match Game::from_fen(fen) {
            Ok(game) => {
                self.game = game;
                self.print_status()
            },
            Err(e) => {
                writeln!(self.output, "error: {e}")?;
                Ok(())
            },
        }
    }

    fn print_status(&mut self) -> anyhow::Result<()> {
        let status = self.game.status();
        match self.game.checked_king() {
            Some(king) if !status.is_over() => {
                let board = self.game.board();
                let checkers = rules::checkers(board, board.side_to_move())?;
                writeln!(
                    self.output,
                    "status: {status}, king on {king} is in check from {}",
                    checkers.iter().join(" ")
                )?;
            },
            _ => writeln!(self.output, "status: {status}")?,
        }
        Ok(())
    }

    /// Prints recoverable errors, aborts the session on fatal ones.
    fn report(&mut self, error: ChessError) -> anyhow::Result<()> {
        if error.is_fatal() {
            return Err(error).context("game can not continue");
        }
        writeln!(self.output, "error: {error}")?;
        Ok(())
    }
}

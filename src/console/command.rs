use crate::chess::core::Square;

/// A single line of console input.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Move { from: Square, to: Square },
    Moves(Square),
    Status,
    ShowBoard,
    Fen,
    NewGame,
    SetPosition { fen: String },
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parses coordinate notation: source and target squares without separator,
/// e.g. "e2e4".
fn parse_move(input: &str) -> Option<Command> {
    if input.len() != 4 || !input.is_ascii() {
        return None;
    }
    let (from, to) = input.split_at(2);
    Some(Command::Move {
        from: Square::try_from(from).ok()?,
        to: Square::try_from(to).ok()?,
    })
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let unknown = || Self::Unknown(input.trim().to_string());

        match parts.as_slice() {
            [] => Self::Empty,
            ["move", notation] => parse_move(notation).unwrap_or_else(unknown),
            ["moves", square] => Square::try_from(*square).map_or_else(|_| unknown(), Self::Moves),
            ["status"] => Self::Status,
            ["board" | "d"] => Self::ShowBoard,
            ["fen"] => Self::Fen,
            ["new"] => Self::NewGame,
            ["position", fen @ ..] if !fen.is_empty() => Self::SetPosition { fen: fen.join(" ") },
            ["help"] => Self::Help,
            ["quit" | "exit"] => Self::Quit,
            [notation] => parse_move(notation).unwrap_or_else(unknown),
            _ => unknown(),
        }
    }
}

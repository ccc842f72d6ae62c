//! Chat command parser.
//!
//! Turns a raw chat line into a [`Command`]. Parsing never fails: anything
//! that is not a recognized command becomes [`Command::Unrecognized`] and is
//! answered by the dispatcher's fallback.

/// Sub-commands of `.status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCommand {
    /// `.status set <text>`; empty text is rejected by the dispatcher
    Set(String),
    /// `.status auto on|off`
    Auto(bool),
    /// `.status` with no (or unrecognized) arguments
    Show,
}

/// Sub-commands of `.tictactoe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Start,
    Join,
    /// Raw position token, validated by the game engine
    Move(Option<String>),
}

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Menu,
    Alive,
    TagAll(String),
    Status(StatusCommand),
    TicTacToe(GameCommand),
    Unrecognized,
}

impl Command {
    /// Command name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Menu => "menu",
            Command::Alive => "alive",
            Command::TagAll(_) => "tagall",
            Command::Status(_) => "status",
            Command::TicTacToe(_) => "tictactoe",
            Command::Unrecognized => "unrecognized",
        }
    }
}

/// Parse a chat line.
///
/// The first whitespace-separated token is matched case-insensitively;
/// remaining tokens keep their case.
pub fn parse(text: &str) -> Command {
    let mut args = text.split_whitespace();
    let Some(first) = args.next() else {
        return Command::Unrecognized;
    };

    match first.to_lowercase().as_str() {
        ".menu" => Command::Menu,
        ".alive" => Command::Alive,
        ".tagall" => Command::TagAll(args.collect::<Vec<_>>().join(" ")),
        ".status" => Command::Status(parse_status(args)),
        ".tictactoe" => match parse_game(args) {
            Some(cmd) => Command::TicTacToe(cmd),
            None => Command::Unrecognized,
        },
        _ => Command::Unrecognized,
    }
}

fn parse_status<'a>(mut args: impl Iterator<Item = &'a str>) -> StatusCommand {
    match args.next() {
        Some("set") => StatusCommand::Set(args.collect::<Vec<_>>().join(" ")),
        Some("auto") => match args.next() {
            Some("on") => StatusCommand::Auto(true),
            Some("off") => StatusCommand::Auto(false),
            _ => StatusCommand::Show,
        },
        _ => StatusCommand::Show,
    }
}

fn parse_game<'a>(mut args: impl Iterator<Item = &'a str>) -> Option<GameCommand> {
    match args.next()? {
        "start" => Some(GameCommand::Start),
        "join" => Some(GameCommand::Join),
        "move" => Some(GameCommand::Move(args.next().map(str::to_string))),
        _ => None,
    }
}

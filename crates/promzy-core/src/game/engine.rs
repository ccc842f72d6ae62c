//! Tic-tac-toe state machine
//!
//! Every transition takes an immutable snapshot and returns either a new
//! [`GameState`] or a [`GameError`]. A rejected transition never changes the
//! caller's state because nothing is mutated in place.

use thiserror::Error;

use super::board::{Board, CELL_COUNT, Mark};

/// Why a game command was rejected. `Display` is the chat reply.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("No active game.")]
    NoActiveGame,

    #[error("A game is already active.")]
    AlreadyActive,

    #[error("Game already has two players.")]
    GameFull,

    #[error("You already joined this game.")]
    AlreadyJoined,

    #[error("It's not your turn.")]
    NotYourTurn,

    #[error("Invalid move.")]
    InvalidMove,
}

/// Lifecycle of a single game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won { winner: String },
    Draw,
}

/// Result of a legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Win { winner: String },
    Draw,
    Continue { next: String },
}

/// State of one tic-tac-toe game in a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Seat 0 plays X, seat 1 plays O
    pub players: Vec<String>,
    /// Index into `players` of whoever moves next
    pub turn: usize,
    pub status: GameStatus,
}

impl GameState {
    /// Fresh game with `starter` in the first seat
    pub fn new(starter: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            players: vec![starter.into()],
            turn: 0,
            status: GameStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn current_player(&self) -> Option<&str> {
        self.players.get(self.turn).map(String::as_str)
    }
}

/// Maximum number of seats
pub const MAX_PLAYERS: usize = 2;

fn active(current: Option<&GameState>) -> Result<&GameState, GameError> {
    current
        .filter(|game| game.is_active())
        .ok_or(GameError::NoActiveGame)
}

/// Begin a new game unless one is already running
pub fn start(current: Option<&GameState>, sender: &str) -> Result<GameState, GameError> {
    if current.is_some_and(GameState::is_active) {
        return Err(GameError::AlreadyActive);
    }
    Ok(GameState::new(sender))
}

/// Take the second seat of the active game
pub fn join(current: Option<&GameState>, sender: &str) -> Result<GameState, GameError> {
    let game = active(current)?;
    if game.players.len() >= MAX_PLAYERS {
        return Err(GameError::GameFull);
    }
    if game.players.iter().any(|p| p == sender) {
        return Err(GameError::AlreadyJoined);
    }

    let mut next = game.clone();
    next.players.push(sender.to_string());
    Ok(next)
}

/// Parse a 1-based board position into a 0-based cell index
pub fn parse_position(raw: Option<&str>) -> Option<usize> {
    let n: usize = raw?.parse().ok()?;
    (1..=CELL_COUNT).contains(&n).then(|| n - 1)
}

/// Place the sender's mark at `raw_position` (1-9)
pub fn play(
    current: Option<&GameState>,
    sender: &str,
    raw_position: Option<&str>,
) -> Result<(GameState, MoveOutcome), GameError> {
    let game = active(current)?;
    if game.current_player() != Some(sender) {
        return Err(GameError::NotYourTurn);
    }

    let index = parse_position(raw_position).ok_or(GameError::InvalidMove)?;
    let mark = Mark::for_seat(game.turn);
    let board = game
        .board
        .with_mark(index, mark)
        .ok_or(GameError::InvalidMove)?;

    let mut next = GameState {
        board,
        players: game.players.clone(),
        turn: game.turn,
        status: GameStatus::Active,
    };

    let outcome = if board.winner().is_some() {
        next.status = GameStatus::Won {
            winner: sender.to_string(),
        };
        MoveOutcome::Win {
            winner: sender.to_string(),
        }
    } else if board.is_full() {
        next.status = GameStatus::Draw;
        MoveOutcome::Draw
    } else {
        next.turn = (next.turn + 1) % next.players.len();
        MoveOutcome::Continue {
            next: next.players[next.turn].clone(),
        }
    };

    Ok((next, outcome))
}

/// Reply for a successful `start`
pub fn render_started(game: &GameState) -> String {
    format!(
        "🎮 TicTacToe started. Player1: @{}. Another player must join with \".tictactoe join\".\n{}",
        game.players.first().map(String::as_str).unwrap_or_default(),
        game.board.render()
    )
}

/// Reply for a successful `join`
pub fn render_joined(game: &GameState, joiner: &str) -> String {
    format!(
        "Player @{} joined!\n{}\nNext: @{}",
        joiner,
        game.board.render(),
        game.current_player().unwrap_or_default()
    )
}

/// Reply for a legal move
pub fn render_move(game: &GameState, outcome: &MoveOutcome) -> String {
    let board = game.board.render();
    match outcome {
        MoveOutcome::Win { winner } => format!("{}\n🏆 Winner: @{}", board, winner),
        MoveOutcome::Draw => format!("{}\n🤝 Draw.", board),
        MoveOutcome::Continue { next } => format!("{}\nNext: @{}", board, next),
    }
}

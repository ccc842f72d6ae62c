//! Tic-tac-toe mini-game
//!
//! One game per chat. See [`engine`] for the state machine and [`board`] for
//! win detection and rendering.

mod board;
mod engine;

pub use board::{Board, CELL_COUNT, Mark, WINNING_LINES};
pub use engine::{
    GameError, GameState, GameStatus, MAX_PLAYERS, MoveOutcome, join, parse_position, play,
    render_joined, render_move, render_started, start,
};

//! Tic-tac-toe board

use std::fmt;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// The 8 winning triples: rows, columns, diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Mark for the player seated at `index` (0 = X, otherwise O)
    pub fn for_seat(index: usize) -> Self {
        if index == 0 { Mark::X } else { Mark::O }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Nine cells, each empty or marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from raw cells
    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// Cell at a 0-based index
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Return a copy with `mark` placed at `index`.
    ///
    /// Returns `None` if the index is out of range or the cell is taken.
    pub fn with_mark(&self, index: usize, mark: Mark) -> Option<Self> {
        match self.cells.get(index) {
            Some(None) => {
                let mut next = *self;
                next.cells[index] = Some(mark);
                Some(next)
            }
            _ => None,
        }
    }

    /// Mark holding any complete line
    pub fn winner(&self) -> Option<Mark> {
        WINNING_LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                Some(mark)
            }
            _ => None,
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Render the board as three lines.
    ///
    /// Empty cells show their 1-based position.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(mark) => out.push_str(&mark.to_string()),
                None => out.push_str(&(i + 1).to_string()),
            }
            out.push_str(if i % 3 == 2 { "\n" } else { " | " });
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

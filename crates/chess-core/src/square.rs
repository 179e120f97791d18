//! Board square representation.
//!
//! Squares are addressed by column and row in `[0, 7] x [0, 7]`. Column 0..7
//! maps to files a..h. Row 0 is rank 8 (Black's back rank) and row 7 is rank 1
//! (White's back rank), so rows grow downward on screen.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by coordinate arithmetic and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("square ({col}, {row}) is outside the board")]
    OutOfBounds { col: i16, row: i16 },

    #[error("invalid square notation: '{0}'")]
    InvalidNotation(String),
}

/// A file (column) on the chess board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from a column index (0-7).
    #[inline]
    pub fn from_col(col: u8) -> Option<Self> {
        Self::ALL.get(col as usize).copied()
    }

    /// Creates a file from a character ('a'-'h').
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Self::from_col(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Returns the column index (0-7).
    #[inline]
    pub const fn col(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank on the chess board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from a board row (row 0 is rank 8).
    #[inline]
    pub fn from_row(row: u8) -> Option<Self> {
        if row < 8 {
            Some(Self::ALL[7 - row as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a character ('1'-'8').
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::from_row(b'8' - c as u8),
            _ => None,
        }
    }

    /// Returns the board row of this rank.
    #[inline]
    pub const fn row(self) -> u8 {
        7 - self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Shade of a square. a8 and h1 are light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareColor {
    Light,
    Dark,
}

/// A square on the board.
///
/// Ordering is row-major from a8, which keeps maps keyed by square in
/// reading order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Returns true if `(col, row)` lies on the board.
    #[inline]
    pub const fn is_valid(col: i16, row: i16) -> bool {
        col >= 0 && col < 8 && row >= 0 && row < 8
    }

    /// Creates a square, failing if the coordinates are off the board.
    pub fn new(col: i16, row: i16) -> Result<Self, SquareError> {
        if Self::is_valid(col, row) {
            Ok(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(SquareError::OutOfBounds { col, row })
        }
    }

    /// Creates a square from coordinates known to be on the board.
    #[inline]
    const fn at(col: u8, row: u8) -> Self {
        debug_assert!(col < 8 && row < 8);
        Square { row, col }
    }

    /// Creates a square from a file and rank.
    #[inline]
    pub const fn from_file_rank(file: File, rank: Rank) -> Self {
        Square::at(file.col(), rank.row())
    }

    /// Creates a square from a dense index (`row * 8 + col`).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square::at((index % 8) as u8, (index / 8) as u8))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::from_file_rank(file, rank))
    }

    /// Iterates over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(|i| Square::at((i % 8) as u8, (i / 8) as u8))
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Dense index (`row * 8 + col`), 0 for a8 and 63 for h1.
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    #[inline]
    pub fn file(self) -> File {
        File::ALL[self.col as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[7 - self.row as usize]
    }

    /// Returns true if shifting by `(d_col, d_row)` stays on the board.
    #[inline]
    pub const fn is_valid_shift(self, d_col: i8, d_row: i8) -> bool {
        Self::is_valid(
            self.col as i16 + d_col as i16,
            self.row as i16 + d_row as i16,
        )
    }

    /// Shifts the square, failing with `OutOfBounds` when leaving the board.
    pub fn shift(self, d_col: i8, d_row: i8) -> Result<Self, SquareError> {
        Square::new(
            self.col as i16 + d_col as i16,
            self.row as i16 + d_row as i16,
        )
    }

    /// Non-failing form of [`shift`](Square::shift).
    #[inline]
    pub fn offset(self, d_col: i8, d_row: i8) -> Option<Self> {
        self.shift(d_col, d_row).ok()
    }

    #[inline]
    pub const fn color(self) -> SquareColor {
        if (self.col + self.row) % 2 == 0 {
            SquareColor::Light
        } else {
            SquareColor::Dark
        }
    }

    /// The same square seen from the other side of the board.
    #[inline]
    pub const fn rotate_180(self) -> Self {
        Square::at(7 - self.col, 7 - self.row)
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    pub const A1: Square = Square::at(0, 7);
    pub const B1: Square = Square::at(1, 7);
    pub const C1: Square = Square::at(2, 7);
    pub const D1: Square = Square::at(3, 7);
    pub const E1: Square = Square::at(4, 7);
    pub const F1: Square = Square::at(5, 7);
    pub const G1: Square = Square::at(6, 7);
    pub const H1: Square = Square::at(7, 7);
    pub const A8: Square = Square::at(0, 0);
    pub const B8: Square = Square::at(1, 0);
    pub const C8: Square = Square::at(2, 0);
    pub const D8: Square = Square::at(3, 0);
    pub const E8: Square = Square::at(4, 0);
    pub const F8: Square = Square::at(5, 0);
    pub const G8: Square = Square::at(6, 0);
    pub const H8: Square = Square::at(7, 0);
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| SquareError::InvalidNotation(s.to_string()))
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

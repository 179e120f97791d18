//! Board state and raw move application.

use crate::legality::legal_destinations;
use crate::movegen::is_square_attacked;
use crate::EngineError;
use chess_core::{Color, Piece, PieceKind, Placement, Square};
use std::collections::BTreeMap;
use std::fmt;

/// Wing on which a king castles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    /// Column delta from the king's start square to this wing's rook.
    #[inline]
    pub const fn rook_offset(self) -> i8 {
        match self {
            CastleSide::King => 3,
            CastleSide::Queen => -4,
        }
    }

    /// Column delta of a single king step toward this wing.
    #[inline]
    pub const fn step(self) -> i8 {
        match self {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        }
    }

    /// Column of this wing's rook at the start of the game.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }
}

/// Per-color castling availability.
///
/// A right is lost for good once the king moves, or once the rook on that
/// wing leaves or is captured on its corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        let shift = match (color, side) {
            (Color::White, CastleSide::King) => 0,
            (Color::White, CastleSide::Queen) => 1,
            (Color::Black, CastleSide::King) => 2,
            (Color::Black, CastleSide::Queen) => 3,
        };
        1 << shift
    }

    /// Returns true if `color` may still castle toward `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        for side in CastleSide::BOTH {
            self.revoke(color, side);
        }
    }

    /// Drops the right tied to a rook corner, if `sq` is one.
    fn revoke_corner(&mut self, sq: Square) {
        for color in Color::ALL {
            if sq.row() != color.home_row() {
                continue;
            }
            for side in CastleSide::BOTH {
                if sq.col() == side.rook_col() {
                    self.revoke(color, side);
                }
            }
        }
    }
}

/// Repetition key: the placement text of a position.
///
/// Side to move, castling rights and en-passant availability are not part of
/// the key, so two positions with equal placement always count as the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionDigest(String);

impl PositionDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value copy of everything [`Board::apply_move`] can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub placement: Placement,
    pub kings: [Square; 2],
    pub en_passant: Option<Square>,
    pub castling: CastlingRights,
}

/// An 8x8 board with the side to move and its legal-move map.
///
/// The legal-move map always belongs to the side to move and is rebuilt in
/// full after every committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    placement: Placement,
    side_to_move: Color,
    en_passant: Option<Square>,
    kings: [Square; 2],
    castling: CastlingRights,
    legal_moves: BTreeMap<Square, Vec<Square>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with the standard starting layout, White to move.
    pub fn new() -> Self {
        let mut board = Board {
            placement: Placement::startpos(),
            side_to_move: Color::White,
            en_passant: None,
            kings: [Square::E1, Square::E8],
            castling: CastlingRights::ALL,
            legal_moves: BTreeMap::new(),
        };
        board.recompute_legal_moves();
        board
    }

    /// Creates a board from placement text and the side to move.
    ///
    /// Castling rights are granted wherever king and rook still stand on
    /// their start squares. No en-passant target is set.
    pub fn from_placement(text: &str, side_to_move: Color) -> Result<Self, EngineError> {
        let placement = Placement::parse(text)?;
        Self::from_parts(placement, side_to_move)
    }

    /// Creates a board from a placement grid and the side to move.
    pub fn from_parts(placement: Placement, side_to_move: Color) -> Result<Self, EngineError> {
        let mut kings: [Option<Square>; 2] = [None, None];
        for (sq, piece) in placement.pieces() {
            match piece.kind {
                PieceKind::King => {
                    let slot = &mut kings[piece.color.index()];
                    if slot.is_some() {
                        return Err(EngineError::InvalidPosition(format!(
                            "more than one {} king",
                            piece.color
                        )));
                    }
                    *slot = Some(sq);
                }
                PieceKind::Pawn if sq.row() == 0 || sq.row() == 7 => {
                    return Err(EngineError::InvalidPosition(format!(
                        "pawn on back rank square {}",
                        sq
                    )));
                }
                _ => {}
            }
        }
        let king = |color: Color| {
            kings[color.index()]
                .ok_or_else(|| EngineError::InvalidPosition(format!("no {} king", color)))
        };
        let kings = [king(Color::White)?, king(Color::Black)?];

        let mut castling = CastlingRights::NONE;
        for color in Color::ALL {
            let home = kings[color.index()];
            if home.row() != color.home_row() || home.col() != 4 {
                continue;
            }
            for side in CastleSide::BOTH {
                let rook = home
                    .offset(side.rook_offset(), 0)
                    .and_then(|sq| placement.get(sq));
                if rook == Some(Piece::new(PieceKind::Rook, color)) {
                    castling.grant(color, side);
                }
            }
        }

        let mut board = Board {
            placement,
            side_to_move,
            en_passant: None,
            kings,
            castling,
            legal_moves: BTreeMap::new(),
        };
        let waiting = side_to_move.opposite();
        if is_square_attacked(&board, board.king_square(waiting), side_to_move, true) {
            return Err(EngineError::InvalidPosition(format!(
                "{} king is in check with {} to move",
                waiting, side_to_move
            )));
        }
        board.recompute_legal_moves();
        Ok(board)
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.placement.get(sq)
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The square skipped by a pawn double step on the previous move.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.placement.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Legal destinations per origin square for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> &BTreeMap<Square, Vec<Square>> {
        &self.legal_moves
    }

    /// Legal destinations from one square. Empty for squares that do not hold
    /// a piece of the side to move.
    pub fn legal_moves_from(&self, from: Square) -> &[Square] {
        self.legal_moves
            .get(&from)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.legal_moves_from(from).contains(&to)
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.legal_moves.values().any(|dests| !dests.is_empty())
    }

    /// Number of legal moves available to the side to move.
    pub fn legal_move_count(&self) -> usize {
        self.legal_moves.values().map(Vec::len).sum()
    }

    /// The repetition key of the current placement.
    pub fn digest(&self) -> PositionDigest {
        PositionDigest(self.placement.to_text())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            placement: self.placement,
            kings: self.kings,
            en_passant: self.en_passant,
            castling: self.castling,
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.placement = snapshot.placement;
        self.kings = snapshot.kings;
        self.en_passant = snapshot.en_passant;
        self.castling = snapshot.castling;
    }

    /// Relocates the piece on `from` to `to` without any legality checking.
    ///
    /// A king moving two files also relocates the rook of that wing. A pawn
    /// landing on the en-passant target removes the enemy pawn behind it.
    /// Side to move, castling rights and the en-passant target are unchanged.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<(), EngineError> {
        let piece = self
            .placement
            .get(from)
            .ok_or(EngineError::InvalidState { at: from })?;
        self.relocate(from, to, piece);
        Ok(())
    }

    pub(crate) fn relocate(&mut self, from: Square, to: Square, piece: Piece) {
        if piece.kind == PieceKind::King
            && from.row() == to.row()
            && from.col().abs_diff(to.col()) == 2
        {
            let side = if to.col() > from.col() {
                CastleSide::King
            } else {
                CastleSide::Queen
            };
            let rook_from = from.offset(side.rook_offset(), 0);
            let rook_to = from.offset(side.step(), 0);
            if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                let rook = self.placement.take(rook_from);
                self.placement.set(rook_to, rook);
            }
        }

        if piece.kind == PieceKind::Pawn && Some(to) == self.en_passant {
            if let Some(victim) = to.offset(0, -piece.color.forward()) {
                let is_enemy_pawn = self
                    .placement
                    .get(victim)
                    .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != piece.color);
                if is_enemy_pawn {
                    self.placement.set(victim, None);
                }
            }
        }

        self.placement.set(from, None);
        self.placement.set(to, Some(piece));
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = to;
        }
    }

    /// Overwrites one square. The caller keeps the king cache consistent.
    pub(crate) fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.placement.set(sq, piece);
    }

    /// Plays a move already known to be legal and hands the turn over.
    ///
    /// `promotion` replaces the arriving pawn. Castling rights and the
    /// en-passant target are updated before the legal-move map is rebuilt.
    pub(crate) fn commit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), EngineError> {
        let piece = self
            .placement
            .get(from)
            .ok_or(EngineError::InvalidState { at: from })?;
        self.relocate(from, to, piece);
        if let Some(kind) = promotion {
            self.placement.set(to, Some(Piece::new(kind, piece.color)));
        }

        if piece.kind == PieceKind::King {
            self.castling.revoke_color(piece.color);
        }
        self.castling.revoke_corner(from);
        self.castling.revoke_corner(to);

        self.en_passant = if piece.kind == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2
        {
            from.offset(0, piece.color.forward())
        } else {
            None
        };

        self.side_to_move = self.side_to_move.opposite();
        self.recompute_legal_moves();
        Ok(())
    }

    /// Rebuilds the legal-move map for every piece of the side to move.
    pub fn recompute_legal_moves(&mut self) {
        let side = self.side_to_move;
        let origins: Vec<(Square, Piece)> = self.pieces_of(side).collect();
        let mut map = BTreeMap::new();
        for (at, piece) in origins {
            let dests = legal_destinations(self, at, piece);
            map.insert(at, dests);
        }
        self.legal_moves = map;
    }

    /// A copy of this board with `color` to move and its legal moves computed.
    pub(crate) fn with_side_to_move(&self, color: Color) -> Board {
        let mut board = self.clone();
        if board.side_to_move != color {
            board.side_to_move = color;
            board.recompute_legal_moves();
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn starting_board() {
        let board = Board::new();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.king_square(Color::White), Square::E1);
        assert_eq!(board.king_square(Color::Black), Square::E8);
        assert_eq!(board.castling(), CastlingRights::ALL);
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.legal_move_count(), 20);
        assert_eq!(board.digest().as_str(), Placement::STARTPOS);
    }

    #[test]
    fn legal_map_only_holds_side_to_move() {
        let board = Board::new();
        assert!(board
            .legal_moves()
            .keys()
            .all(|&at| board.piece_at(at).map(|p| p.color) == Some(Color::White)));
        assert!(board.legal_moves_from(sq("e7")).is_empty());
    }

    #[test]
    fn from_placement_requires_both_kings() {
        assert!(matches!(
            Board::from_placement("8/8/8/8/8/8/8/4K3", Color::White),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(matches!(
            Board::from_placement("4k3/8/8/8/8/8/8/3KK3", Color::White),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(matches!(
            Board::from_placement("P3k3/8/8/8/8/8/8/4K3", Color::White),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(matches!(
            Board::from_placement("4k3/8/8/8/8/8/8/4RK2", Color::White),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(Board::from_placement("4k3/8/8/8/8/8/8/4RK2", Color::Black).is_ok());
        assert!(matches!(
            Board::from_placement("8/8/8", Color::White),
            Err(EngineError::Placement(_))
        ));
    }

    #[test]
    fn from_placement_infers_castling() {
        let board = Board::from_placement("r3k3/8/8/8/8/8/8/4K2R", Color::White).unwrap();
        let rights = board.castling();
        assert!(rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::Queen));
        assert!(!rights.has(Color::Black, CastleSide::King));
    }

    #[test]
    fn apply_move_castles_rook() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        board.apply_move(Square::E1, Square::G1).unwrap();
        assert_eq!(board.digest().as_str(), "4k3/8/8/8/8/8/8/R4RK1");
        assert_eq!(board.king_square(Color::White), Square::G1);

        let mut board = Board::from_placement("r3k3/8/8/8/8/8/8/4K3", Color::Black).unwrap();
        board.apply_move(Square::E8, Square::C8).unwrap();
        assert_eq!(board.digest().as_str(), "2kr4/8/8/8/8/8/8/4K3");
    }

    #[test]
    fn apply_move_from_empty_square_fails() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(
            board.apply_move(sq("e4"), sq("e5")),
            Err(EngineError::InvalidState { at: sq("e4") })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn snapshot_restores_castling_side_effects() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        let snapshot = board.snapshot();
        board.apply_move(Square::E1, Square::C1).unwrap();
        assert_ne!(board.snapshot(), snapshot);
        board.restore(snapshot);
        assert_eq!(board.snapshot(), snapshot);
    }

    #[test]
    fn commit_sets_and_clears_en_passant() {
        let mut board = Board::new();
        board.commit(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(board.en_passant(), Some(sq("e3")));
        assert_eq!(board.side_to_move(), Color::Black);
        board.commit(sq("g8"), sq("f6"), None).unwrap();
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn commit_revokes_castling() {
        let mut board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        board.commit(Square::H1, sq("h8"), None).unwrap();
        let rights = board.castling();
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(rights.has(Color::White, CastleSide::Queen));
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));

        board.commit(Square::E8, sq("d8"), None).unwrap();
        assert!(!board.castling().has(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn corner_revocation_only_touches_home_rows() {
        let mut rights = CastlingRights::ALL;
        rights.revoke_corner(sq("a4"));
        assert_eq!(rights, CastlingRights::ALL);
        rights.revoke_corner(Square::A8);
        assert!(!rights.has(Color::Black, CastleSide::Queen));
        assert!(rights.has(Color::White, CastleSide::Queen));
    }
}

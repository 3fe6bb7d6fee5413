use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastleBits, Color, Piece};
use crate::board::castle_bits::castle_bits_string;
use crate::fen::{Fen, piece_glyph};
use crate::hash::zobrist::zobrist_keys;
use crate::moves::types::Undo;
use crate::square::Square;
use crate::utils::pop_lsb;
use arrayvec::ArrayVec;
use std::fmt;
use std::str::FromStr;

/// Upper bound on half-moves in one game; the undo stack never outgrows it.
pub const MAX_GAME_MOVES: usize = 2048;

/// A full game state: piece placement plus everything FEN carries, the
/// incrementally maintained hash, and the undo stack.
///
/// All mutation goes through `moves::execute::{make_move, take_move}`; the
/// fields are crate-private so nothing else can desynchronize the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastleBits,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    /// Half-moves played since the game's initial position.
    pub(crate) ply: u32,
    pub(crate) hash: u64,
    pub(crate) history: ArrayVec<Undo, MAX_GAME_MOVES>,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        Position::from_fen(&Fen::starting_position())
    }

    /// Builds a position from a parsed FEN record and computes the hash
    /// from scratch.
    pub fn from_fen(fen: &Fen) -> Self {
        let mut board = Board::new_empty();
        for idx in 0..64u8 {
            let sq = Square::from_index(idx);
            if let Some((color, piece)) = fen.piece_at(sq) {
                board.add_piece(color, piece, sq);
            }
        }

        let side_to_move = fen.side_to_move();
        let ply = (fen.fullmove_number() - 1) * 2
            + if side_to_move == Color::Black { 1 } else { 0 };

        let mut pos = Position {
            board,
            side_to_move,
            castling_rights: fen.castling_rights(),
            en_passant: fen.ep_target(),
            halfmove_clock: fen.halfmove_clock(),
            ply,
            hash: 0,
            history: ArrayVec::new(),
        };
        pos.hash = pos.compute_hash_full();
        pos
    }

    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> CastleBits {
        self.castling_rights
    }

    #[inline(always)]
    pub fn ep_target(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Derived: FEN's move counter, starting at 1.
    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// Number of moves currently undoable.
    #[inline(always)]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    #[inline(always)]
    pub fn has_kingside_castle(&self, color: Color) -> bool {
        match color {
            Color::White => self.castling_rights & CASTLE_WK != 0,
            Color::Black => self.castling_rights & CASTLE_BK != 0,
        }
    }

    #[inline(always)]
    pub fn has_queenside_castle(&self, color: Color) -> bool {
        match color {
            Color::White => self.castling_rights & CASTLE_WQ != 0,
            Color::Black => self.castling_rights & CASTLE_BQ != 0,
        }
    }

    /// Is the side to move in check?
    #[inline(always)]
    pub fn in_check(&self) -> bool {
        crate::moves::square_control::in_check(&self.board, self.side_to_move)
    }

    /// Full recompute from current state. Must match the incremental hash
    /// at all times.
    pub fn compute_hash_full(&self) -> u64 {
        let keys = zobrist_keys();
        let mut hash = 0u64;

        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                let mut bb = self.board.bb(color, piece);
                while bb != 0 {
                    let sq = pop_lsb(&mut bb);
                    hash ^= keys.piece[color as usize][piece as usize][sq as usize];
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= keys.side_to_move;
        }

        hash ^= keys.castling[self.castling_rights as usize];

        if let Some(ep) = self.en_passant {
            hash ^= keys.ep_square[ep.index() as usize];
        }

        hash
    }

    #[cfg(debug_assertions)]
    #[inline]
    pub fn assert_hash(&self) {
        let full = self.compute_hash_full();
        debug_assert_eq!(
            self.hash, full,
            "hash parity mismatch: stored={:#018x}, full={:#018x}",
            self.hash, full
        );
    }

    /// Renders the six FEN fields of the current state.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(80);

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = Square::from_rank_file(rank, file);
                match self.board.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push(char::from_digit(empty_run, 10).unwrap());
                            empty_run = 0;
                        }
                        out.push(piece_glyph(color, piece));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push(char::from_digit(empty_run, 10).unwrap());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        out.push(' ');
        out.push_str(&castle_bits_string(self.castling_rights));
        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number()));
        out
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fen: Fen = s.parse()?;
        Ok(Position::from_fen(&fen))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastleBits, Color, Piece};
use crate::hash::zobrist::{xor_castling_delta, zobrist_keys};
use crate::moves::movegen::generate_all;
use crate::moves::square_control::is_square_attacked;
use crate::moves::types::{Move, MoveBuffer, Undo};
use crate::position::Position;
use crate::square::Square;

/// Rook endpoints for a castle, keyed by the king's destination.
#[inline(always)]
fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    match king_to.index() {
        6 => (Square::H1, Square::F1),  // White O-O
        2 => (Square::A1, Square::D1),  // White O-O-O
        62 => (Square::H8, Square::F8), // Black O-O
        58 => (Square::A8, Square::D8), // Black O-O-O
        _ => panic!("not a castle destination: {}", king_to),
    }
}

/// The square the king passes over while castling.
#[inline(always)]
fn castle_transit_square(king_to: Square) -> Square {
    match king_to.index() {
        6 => Square::F1,
        2 => Square::D1,
        62 => Square::F8,
        58 => Square::D8,
        _ => panic!("not a castle destination: {}", king_to),
    }
}

/// Right lost when a rook of `color` leaves (or is taken on) `rook_sq`.
#[inline(always)]
fn rights_cleared_by_rook(color: Color, rook_sq: Square) -> CastleBits {
    match (color, rook_sq.index()) {
        (Color::White, 0) => CASTLE_WQ,  // a1
        (Color::White, 7) => CASTLE_WK,  // h1
        (Color::Black, 56) => CASTLE_BQ, // a8
        (Color::Black, 63) => CASTLE_BK, // h8
        _ => 0,
    }
}

/// Applies a pseudo-legal move and reports whether it was legal.
///
/// An undo record is pushed first in every case. If the move leaves the
/// mover's king attacked (for castles: also the king's start or transit
/// square), the position is rolled back via `take_move` before returning
/// false, so a failed make is invisible to the caller.
pub fn make_move(pos: &mut Position, mv: Move) -> bool {
    let keys = zobrist_keys();
    let color = pos.side_to_move;
    let from = mv.from();
    let to = mv.to();

    let mover = match pos.board.piece_at(from) {
        Some((c, p)) if c == color => p,
        other => panic!(
            "make_move: expected {:?} piece on {}, found {:?} (move {})",
            color, from, other, mv
        ),
    };

    let mut undo = Undo {
        mv,
        capture: None,
        prev_castling_rights: pos.castling_rights,
        prev_en_passant: pos.en_passant,
        prev_halfmove_clock: pos.halfmove_clock,
        prev_hash: pos.hash,
    };

    // The old EP target dies with this move; a double push sets a new one.
    if let Some(ep) = pos.en_passant.take() {
        pos.hash ^= keys.ep_square[ep.index() as usize];
    }

    let ci = color as usize;
    let oi = color.opposite() as usize;

    if mv.is_en_passant() {
        // The victim stands behind the destination, not on it.
        let cap_sq = match color {
            Color::White => Square::from_index(to.index() - 8),
            Color::Black => Square::from_index(to.index() + 8),
        };
        pos.board.remove_piece(color.opposite(), Piece::Pawn, cap_sq);
        pos.hash ^= keys.piece[oi][Piece::Pawn as usize][cap_sq.index() as usize];

        pos.board.move_piece(color, Piece::Pawn, from, to);
        pos.hash ^= keys.piece[ci][Piece::Pawn as usize][from.index() as usize];
        pos.hash ^= keys.piece[ci][Piece::Pawn as usize][to.index() as usize];

        undo.capture = Some((color.opposite(), Piece::Pawn, cap_sq));
    } else {
        if mv.is_capture() {
            let (cap_color, cap_piece) = match pos.board.piece_at(to) {
                Some(found) if found.0 != color => found,
                other => panic!(
                    "make_move: capture {} expected a victim, found {:?}",
                    mv, other
                ),
            };
            pos.board.remove_piece(cap_color, cap_piece, to);
            pos.hash ^= keys.piece[cap_color as usize][cap_piece as usize][to.index() as usize];
            undo.capture = Some((cap_color, cap_piece, to));
        }

        if mv.is_promotion() {
            let promo = mv.promoted_role();
            pos.board.remove_piece(color, Piece::Pawn, from);
            pos.hash ^= keys.piece[ci][Piece::Pawn as usize][from.index() as usize];
            pos.board.add_piece(color, promo, to);
            pos.hash ^= keys.piece[ci][promo as usize][to.index() as usize];
        } else {
            pos.board.move_piece(color, mover, from, to);
            pos.hash ^= keys.piece[ci][mover as usize][from.index() as usize];
            pos.hash ^= keys.piece[ci][mover as usize][to.index() as usize];

            if mv.is_castle() {
                let (rook_from, rook_to) = rook_castle_squares(to);
                pos.board.move_piece(color, Piece::Rook, rook_from, rook_to);
                pos.hash ^= keys.piece[ci][Piece::Rook as usize][rook_from.index() as usize];
                pos.hash ^= keys.piece[ci][Piece::Rook as usize][rook_to.index() as usize];
            }

            if mv.is_double_pawn() {
                let ep = match color {
                    Color::White => Square::from_index(from.index() + 8),
                    Color::Black => Square::from_index(from.index() - 8),
                };
                pos.en_passant = Some(ep);
                pos.hash ^= keys.ep_square[ep.index() as usize];
            }
        }
    }

    // Castling rights survive only while king and rooks sit untouched.
    let old_rights = pos.castling_rights;
    let mut cleared: CastleBits = 0;
    if mover == Piece::King {
        cleared |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if mover == Piece::Rook {
        cleared |= rights_cleared_by_rook(color, from);
    }
    if let Some((cap_color, Piece::Rook, cap_sq)) = undo.capture {
        cleared |= rights_cleared_by_rook(cap_color, cap_sq);
    }
    let new_rights = old_rights & !cleared;
    if new_rights != old_rights {
        pos.castling_rights = new_rights;
        xor_castling_delta(&mut pos.hash, keys, old_rights, new_rights);
    }

    if mover == Piece::Pawn || mv.is_capture() {
        pos.halfmove_clock = 0;
    } else {
        pos.halfmove_clock += 1;
    }

    pos.side_to_move = color.opposite();
    pos.hash ^= keys.side_to_move;
    pos.ply += 1;

    pos.history.push(undo);

    // Own-king safety decides legality; for a castle the start and transit
    // squares may not be attacked either.
    let opponent = pos.side_to_move;
    let own_king = pos.board.king_square(color);
    let mut legal = !is_square_attacked(&pos.board, own_king, opponent);
    if legal && mv.is_castle() {
        let transit = castle_transit_square(to);
        legal = !is_square_attacked(&pos.board, from, opponent)
            && !is_square_attacked(&pos.board, transit, opponent);
    }

    if !legal {
        take_move(pos);
        return false;
    }

    #[cfg(feature = "paranoid_hash")]
    {
        let full = pos.compute_hash_full();
        if pos.hash != full {
            tracing::error!(
                stored = %format!("{:#018x}", pos.hash),
                full = %format!("{:#018x}", full),
                %mv,
                "hash diverged after make"
            );
        }
    }

    #[cfg(debug_assertions)]
    pos.assert_hash();
    #[cfg(feature = "paranoid_hash")]
    pos.board.assert_coherent();

    true
}

/// Reverts the most recent make. Every field, hash included, returns to its
/// exact prior value (the hash is restored verbatim from the undo record).
pub fn take_move(pos: &mut Position) {
    let undo = pos
        .history
        .pop()
        .expect("take_move with no move to undo");
    let mv = undo.mv;
    let from = mv.from();
    let to = mv.to();

    // The mover is the side that is NOT to move now.
    let color = pos.side_to_move.opposite();
    pos.side_to_move = color;
    pos.ply -= 1;

    if mv.is_promotion() {
        pos.board.remove_piece(color, mv.promoted_role(), to);
        pos.board.add_piece(color, Piece::Pawn, from);
    } else {
        let mover = match pos.board.piece_at(to) {
            Some((c, p)) if c == color => p,
            other => panic!(
                "take_move: expected {:?} piece on {}, found {:?} (move {})",
                color, to, other, mv
            ),
        };
        pos.board.move_piece(color, mover, to, from);

        if mv.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(to);
            pos.board.move_piece(color, Piece::Rook, rook_to, rook_from);
        }
    }

    if let Some((cap_color, cap_piece, cap_sq)) = undo.capture {
        pos.board.add_piece(cap_color, cap_piece, cap_sq);
    }

    pos.castling_rights = undo.prev_castling_rights;
    pos.en_passant = undo.prev_en_passant;
    pos.halfmove_clock = undo.prev_halfmove_clock;
    pos.hash = undo.prev_hash;

    #[cfg(debug_assertions)]
    pos.assert_hash();
    #[cfg(feature = "paranoid_hash")]
    pos.board.assert_coherent();
}

/// Fills `moves` with the strictly legal moves, using `scratch` for the
/// pseudo-legal superset.
pub fn generate_legal(
    pos: &mut Position,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    generate_all(pos, scratch);
    moves.clear();
    for i in 0..scratch.len() {
        let mv = scratch[i];
        if make_move(pos, mv) {
            take_move(pos);
            moves.push(mv);
        }
    }
}

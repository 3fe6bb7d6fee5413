use crate::bitboard::square_bb;
use crate::board::{Board, Color, Piece};
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::pawn::pawn_attacks;
use crate::moves::rays::{between, rays};
use crate::square::Square;
use crate::utils::pop_lsb;

/// Is `square` attacked by any piece of `attacker`?
///
/// Cheap piece classes first. Sliders are resolved without computing attack
/// sets: a rook/queen (bishop/queen) attacks the square iff it stands on the
/// same rank/file (diagonal) and the squares in between are all empty.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    let index = square.index() as usize;
    let sq_bit = square_bb(square.index());

    // A pawn of `attacker` capturing onto `square` stands on one of the
    // squares the *opposite*-colour pawn mask of `square` covers.
    let pawn_sources = pawn_attacks(square.index(), attacker.opposite());
    if pawn_sources & board.pieces(Piece::Pawn, attacker) != 0 {
        return true;
    }

    if KNIGHT_ATTACKS[index] & board.pieces(Piece::Knight, attacker) != 0 {
        return true;
    }

    if KING_ATTACKS[index] & board.pieces(Piece::King, attacker) != 0 {
        return true;
    }

    let occupied = board.occupied();
    let queens = board.pieces(Piece::Queen, attacker);

    let mut rook_like = board.pieces(Piece::Rook, attacker) | queens;
    while rook_like != 0 {
        let from = Square::from_index(pop_lsb(&mut rook_like));
        let m = rays(from);
        if (m.rank | m.file) & sq_bit != 0 && between(from, square) & occupied == 0 {
            return true;
        }
    }

    let mut bishop_like = board.pieces(Piece::Bishop, attacker) | queens;
    while bishop_like != 0 {
        let from = Square::from_index(pop_lsb(&mut bishop_like));
        let m = rays(from);
        if (m.diag | m.anti_diag) & sq_bit != 0 && between(from, square) & occupied == 0 {
            return true;
        }
    }

    false
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color) -> bool {
    is_square_attacked(board, board.king_square(side), side.opposite())
}

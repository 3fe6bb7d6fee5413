//! Slider attacks via Hyperbola Quintessence.
//!
//! One ray at a time: `o - 2r` sweeps the ray above the slider, the
//! bit-reversed copy sweeps below, and xor-ing the two leaves exactly the
//! reachable squares up to and including the first blocker each way. The
//! subtraction is *supposed* to wrap when no blocker exists on the ray.

use crate::bitboard::BitboardExt;
use crate::moves::rays::rays;
use crate::square::Square;

#[inline(always)]
fn line_attacks(occ: u64, slider: u64, mask: u64) -> u64 {
    let forward = (occ & mask).wrapping_sub(slider.wrapping_mul(2));
    let backward = (occ & mask)
        .reversed()
        .wrapping_sub(slider.reversed().wrapping_mul(2))
        .reversed();
    (forward ^ backward) & mask
}

#[inline(always)]
pub fn bishop_attacks(occ: u64, sq: Square) -> u64 {
    let m = rays(sq);
    line_attacks(occ, m.bit, m.diag) | line_attacks(occ, m.bit, m.anti_diag)
}

#[inline(always)]
pub fn rook_attacks(occ: u64, sq: Square) -> u64 {
    let m = rays(sq);
    line_attacks(occ, m.bit, m.rank) | line_attacks(occ, m.bit, m.file)
}

#[inline(always)]
pub fn queen_attacks(occ: u64, sq: Square) -> u64 {
    bishop_attacks(occ, sq) | rook_attacks(occ, sq)
}

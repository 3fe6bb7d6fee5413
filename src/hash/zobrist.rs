use crate::board::CastleBits;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed seed: the same position must hash identically across runs.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub struct ZobristKeys {
    /// [color][piece][square] with {White=0, Black=1} and {P,N,B,R,Q,K}={0..5}
    pub piece: [[[u64; 64]; 6]; 2],
    /// XORed in when Black is to move.
    pub side_to_move: u64,
    /// Indexed by the full 4-bit castling-rights value.
    pub castling: [u64; 16],
    /// Indexed by the en-passant target square.
    pub ep_square: [u64; 64],
}

/// Global keys, generated once on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

/// Swap the castling contribution from `old` rights to `new` rights.
#[inline(always)]
pub fn xor_castling_delta(hash: &mut u64, keys: &ZobristKeys, old: CastleBits, new: CastleBits) {
    *hash ^= keys.castling[old as usize];
    *hash ^= keys.castling[new as usize];
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // avoid zero keys to reduce degenerate collisions
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 16],
        ep_square: [0u64; 64],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }

    keys.side_to_move = non_zero(&mut rng);

    for rights in 0..16 {
        keys.castling[rights] = non_zero(&mut rng);
    }

    for sq in 0..64 {
        keys.ep_square[sq] = non_zero(&mut rng);
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic() {
        let a = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        let b = zobrist_keys();
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.piece[0][0][0], b.piece[0][0][0]);
        assert_eq!(a.piece[1][5][63], b.piece[1][5][63]);
        assert_eq!(a.castling, b.castling);
        assert_eq!(a.ep_square[16], b.ep_square[16]);
    }

    #[test]
    fn castling_delta_is_reversible() {
        let keys = zobrist_keys();
        let mut hash = 0xDEAD_BEEFu64;
        let start = hash;
        xor_castling_delta(&mut hash, keys, 0b1111, 0b0101);
        assert_ne!(hash, start);
        xor_castling_delta(&mut hash, keys, 0b0101, 0b1111);
        assert_eq!(hash, start);
    }

    #[test]
    fn no_zero_keys() {
        let keys = zobrist_keys();
        assert_ne!(keys.side_to_move, 0);
        assert!(keys.castling.iter().all(|&k| k != 0));
        assert!(keys.ep_square.iter().all(|&k| k != 0));
    }
}

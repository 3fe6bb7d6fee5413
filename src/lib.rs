pub mod bitboard;
pub mod board;
pub mod epd;
pub mod fen;
pub mod hash;
#[cfg(feature = "cli")]
pub mod logger;
pub mod moves;
pub mod position;
pub mod square;
pub mod utils;

/// Forces the process-wide tables into existence.
///
/// The attack and ray tables are compile-time constants; the Zobrist key
/// block is generated lazily behind a `OnceCell`. Calling this once at
/// startup moves that work out of the first perft run and guarantees the
/// keys exist before any worker threads are spawned. Skipping the call is safe
/// for single-threaded users: first access initializes on demand.
pub fn init_tables() {
    hash::zobrist::zobrist_keys();
}

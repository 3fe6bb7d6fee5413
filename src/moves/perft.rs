use crate::moves::execute::{generate_legal, make_move, take_move};
use crate::moves::movegen::generate_all;
use crate::moves::types::{Move, MoveList};
use crate::position::Position;
use tracing::{debug, instrument};

const MAX_LOG_DEPTH: u32 = 3; // only trace details for shallow nodes

#[derive(Debug, Default)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add(&mut self, o: &PerftCounters) {
        self.nodes += o.nodes;
        self.captures += o.captures;
        self.ep_captures += o.ep_captures;
        self.castles += o.castles;
        self.promotions += o.promotions;
        self.checks += o.checks;
        self.checkmates += o.checkmates;
    }
}

fn perft_recursive(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);

    let mut nodes = 0;
    for &mv in moves.iter() {
        if make_move(pos, mv) {
            nodes += perft_recursive(pos, depth - 1);
            take_move(pos);
        }
    }
    nodes
}

/// Leaf count of the legal move tree to `depth`. Exact and reproducible.
#[instrument(skip(pos), fields(depth))]
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    perft_recursive(pos, depth)
}

/// Per-root-move node counts, printed as "move: count" lines plus a total.
/// The standard tool for bisecting a generator discrepancy.
#[instrument(skip(pos), fields(depth))]
pub fn perft_divide(pos: &mut Position, depth: u32) -> u64 {
    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);

    if depth <= MAX_LOG_DEPTH {
        debug!(depth, pseudo = moves.len(), "divide: root move candidates");
    }

    let mut total = 0;
    for &mv in moves.iter() {
        if !make_move(pos, mv) {
            continue;
        }
        let count = perft_recursive(pos, depth.saturating_sub(1));
        take_move(pos);

        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, nodes = count, "divide: root child total");
        }
        println!("{}: {}", mv, count);
        total += count;
    }

    println!("Total: {}", total);
    total
}

fn perft_count_recursive(pos: &mut Position, depth: u32, out: &mut PerftCounters) {
    if depth == 0 {
        out.nodes += 1;

        let side_in_check = pos.in_check();
        if side_in_check {
            out.checks += 1;

            let mut legal = MoveList::new();
            let mut scratch = MoveList::new();
            generate_legal(pos, &mut legal, &mut scratch);
            if legal.is_empty() {
                out.checkmates += 1;
            }
        }
        return;
    }

    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);

    for &mv in moves.iter() {
        if !make_move(pos, mv) {
            continue;
        }

        // Standard perft convention: tag only the final half-move of each
        // line, so the figures line up with published reference tables.
        if depth == 1 {
            tag_move(mv, out);
        }

        perft_count_recursive(pos, depth - 1, out);
        take_move(pos);
    }
}

#[inline(always)]
fn tag_move(mv: Move, out: &mut PerftCounters) {
    if mv.is_capture() {
        out.captures += 1;
        if mv.is_en_passant() {
            out.ep_captures += 1;
        }
    }
    if mv.is_castle() {
        out.castles += 1;
    }
    if mv.is_promotion() {
        out.promotions += 1;
    }
}

/// Perft with the usual capture/EP/castle/promotion/check/checkmate tallies.
pub fn perft_count_with_breakdown(pos: &mut Position, depth: u32, out: &mut PerftCounters) {
    perft_count_recursive(pos, depth, out);
}

/// Breakdown per root move; the root moves themselves are untagged.
pub fn perft_divide_with_breakdown(pos: &mut Position, depth: u32) -> Vec<(Move, PerftCounters)> {
    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);

    let mut out = Vec::with_capacity(moves.len());
    for &mv in moves.iter() {
        if !make_move(pos, mv) {
            continue;
        }
        let mut pc = PerftCounters::zero();
        if depth > 1 {
            perft_count_recursive(pos, depth - 1, &mut pc);
        } else {
            pc.nodes = 1;
            tag_move(mv, &mut pc);
        }
        take_move(pos);
        out.push((mv, pc));
    }
    out
}

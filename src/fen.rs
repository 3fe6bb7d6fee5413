//! Parsed-FEN collaborator: the only place text becomes board state.
//!
//! `Fen` holds a fully validated snapshot of the six FEN fields; the
//! position layer turns it into live state without re-parsing anything.

use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastleBits, Color, Piece};
use crate::square::Square;
use std::str::FromStr;

/// The standard initial position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// O(1) FEN glyph <-> (color, piece) maps.
const GLYPH_TO_PC: [Option<(Color, Piece)>; 128] = {
    let mut t: [Option<(Color, Piece)>; 128] = [None; 128];
    t['P' as usize] = Some((Color::White, Piece::Pawn));
    t['N' as usize] = Some((Color::White, Piece::Knight));
    t['B' as usize] = Some((Color::White, Piece::Bishop));
    t['R' as usize] = Some((Color::White, Piece::Rook));
    t['Q' as usize] = Some((Color::White, Piece::Queen));
    t['K' as usize] = Some((Color::White, Piece::King));
    t['p' as usize] = Some((Color::Black, Piece::Pawn));
    t['n' as usize] = Some((Color::Black, Piece::Knight));
    t['b' as usize] = Some((Color::Black, Piece::Bishop));
    t['r' as usize] = Some((Color::Black, Piece::Rook));
    t['q' as usize] = Some((Color::Black, Piece::Queen));
    t['k' as usize] = Some((Color::Black, Piece::King));
    t
};

const PC_TO_GLYPH: [[char; 6]; 2] = [
    ['P', 'N', 'B', 'R', 'Q', 'K'],
    ['p', 'n', 'b', 'r', 'q', 'k'],
];

#[inline(always)]
pub fn piece_glyph(color: Color, piece: Piece) -> char {
    PC_TO_GLYPH[color as usize][piece as usize]
}

#[inline(always)]
pub fn glyph_piece(glyph: char) -> Option<(Color, Piece)> {
    if (glyph as usize) < 128 {
        GLYPH_TO_PC[glyph as usize]
    } else {
        None
    }
}

/// A parsed, validated FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    placement: [Option<(Color, Piece)>; 64],
    side_to_move: Color,
    castling: CastleBits,
    ep_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Fen {
    pub fn starting_position() -> Self {
        START_FEN.parse().expect("start FEN parses")
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.placement[sq.index() as usize]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> CastleBits {
        self.castling
    }

    #[inline(always)]
    pub fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
}

impl FromStr for Fen {
    type Err = String;

    /// Accepts the full six-field form and the four-field EPD form
    /// (clock fields defaulted to "0 1").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(format!("FEN needs 4 or 6 fields, got {}", fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("bad side-to-move field: {:?}", other)),
        };

        let castling = parse_castling(fields[2])?;

        let ep_target = match fields[3] {
            "-" => None,
            sq => {
                let sq: Square = sq.parse()?;
                // The jumped-over square is always on rank 3 or 6.
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(format!("en-passant square off rank 3/6: {}", sq));
                }
                Some(sq)
            }
        };

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            let half = fields[4]
                .parse::<u32>()
                .map_err(|_| format!("bad halfmove clock: {:?}", fields[4]))?;
            let full = fields[5]
                .parse::<u32>()
                .map_err(|_| format!("bad fullmove number: {:?}", fields[5]))?;
            if full == 0 {
                return Err("fullmove number starts at 1".to_string());
            }
            (half, full)
        } else {
            (0, 1)
        };

        for color in [Color::White, Color::Black] {
            let kings = placement
                .iter()
                .filter(|p| **p == Some((color, Piece::King)))
                .count();
            if kings != 1 {
                return Err(format!("{:?} has {} kings, expected 1", color, kings));
            }
        }

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            ep_target,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_placement(field: &str) -> Result<[Option<(Color, Piece)>; 64], String> {
    let mut placement: [Option<(Color, Piece)>; 64] = [None; 64];
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(format!("placement needs 8 ranks, got {}", ranks.len()));
    }

    // FEN lists rank 8 first.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(format!("bad empty-run digit {:?} in rank {}", ch, rank + 1));
                }
                file += skip as u8;
            } else if let Some((color, piece)) = glyph_piece(ch) {
                if file > 7 {
                    return Err(format!("rank {} overflows 8 files", rank + 1));
                }
                placement[Square::from_rank_file(rank, file).index() as usize] =
                    Some((color, piece));
                file += 1;
            } else {
                return Err(format!("bad placement glyph: {:?}", ch));
            }
        }
        if file != 8 {
            return Err(format!("rank {} has {} files, expected 8", rank + 1, file));
        }
    }
    Ok(placement)
}

fn parse_castling(field: &str) -> Result<CastleBits, String> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights: CastleBits = 0;
    for ch in field.chars() {
        let bit = match ch {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            other => return Err(format!("bad castling glyph: {:?}", other)),
        };
        if rights & bit != 0 {
            return Err(format!("duplicate castling glyph: {:?}", ch));
        }
        rights |= bit;
    }
    Ok(rights)
}

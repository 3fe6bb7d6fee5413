//! Reader for perft EPD suites.
//!
//! Row format: `<FEN> ;D1 <nodes> ;D2 <nodes> ... ;D6 <nodes>` — fields
//! separated by semicolons, each depth field a literal "D<n>" followed by
//! the expected node count.

use crate::fen::Fen;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpdRow {
    pub fen: String,
    /// (depth, expected nodes), in file order.
    pub expected: Vec<(u32, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpdSuite {
    pub rows: Vec<EpdRow>,
}

/// Parses a whole suite; blank lines are skipped, every other line must be
/// a well-formed row with a parseable FEN.
pub fn parse_suite(text: &str) -> Result<EpdSuite, String> {
    let mut rows = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = parse_row(line).map_err(|e| format!("line {}: {}", lineno + 1, e))?;
        rows.push(row);
    }
    Ok(EpdSuite { rows })
}

pub fn load_suite<P: AsRef<Path>>(path: P) -> Result<EpdSuite, String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse_suite(&text)
}

fn parse_row(line: &str) -> Result<EpdRow, String> {
    let mut fields = line.split(';').map(str::trim);

    let fen = fields.next().unwrap_or_default().to_string();
    // Fail here, not halfway through a perft run.
    fen.parse::<Fen>()
        .map_err(|e| format!("bad FEN {:?}: {}", fen, e))?;

    let mut expected = Vec::new();
    for field in fields {
        if field.is_empty() {
            continue;
        }
        let rest = field
            .strip_prefix('D')
            .ok_or_else(|| format!("depth field must start with 'D': {:?}", field))?;
        let mut parts = rest.split_whitespace();
        let depth: u32 = parts
            .next()
            .ok_or_else(|| format!("missing depth in {:?}", field))?
            .parse()
            .map_err(|_| format!("bad depth in {:?}", field))?;
        let nodes: u64 = parts
            .next()
            .ok_or_else(|| format!("missing node count in {:?}", field))?
            .parse()
            .map_err(|_| format!("bad node count in {:?}", field))?;
        expected.push((depth, nodes));
    }

    if expected.is_empty() {
        return Err("row has no depth fields".to_string());
    }
    Ok(EpdRow { fen, expected })
}

use indicatif::{ProgressBar, ProgressStyle};
use std::process::exit;
use std::time::Instant;
use talon::epd::load_suite;
use talon::moves::perft::{perft, perft_divide};
use talon::position::Position;

fn main() {
    talon::init_tables();

    if let Ok(path) = std::env::var("TALON_LOG") {
        talon::logger::init_logging(path, "info");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("perft") => run_perft(&args[1..], false),
        Some("divide") => run_perft(&args[1..], true),
        Some("suite") => run_suite(&args[1..]),
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("usage:");
    eprintln!("  talon perft <depth> [fen]    count leaf nodes");
    eprintln!("  talon divide <depth> [fen]   per-root-move counts");
    eprintln!("  talon suite <file> [depth]   verify a perft EPD suite");
    eprintln!();
    eprintln!("[fen] defaults to the starting position; spaces are fine unquoted.");
    exit(2);
}

fn parse_position(args: &[String]) -> Position {
    if args.is_empty() {
        return Position::new();
    }
    match args.join(" ").parse() {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("bad FEN: {}", e);
            exit(2);
        }
    }
}

fn run_perft(args: &[String], divide: bool) {
    let Some(depth) = args.first().and_then(|d| d.parse::<u32>().ok()) else {
        usage();
    };
    let mut pos = parse_position(&args[1..]);

    let start = Instant::now();
    let nodes = if divide {
        perft_divide(&mut pos, depth)
    } else {
        perft(&mut pos, depth)
    };
    let secs = start.elapsed().as_secs_f64().max(1e-9);

    println!(
        "depth {} nodes {} time {:.3}s nps {}",
        depth,
        nodes,
        secs,
        (nodes as f64 / secs) as u64
    );
}

fn run_suite(args: &[String]) {
    let Some(path) = args.first() else {
        usage();
    };
    let max_depth: u32 = args
        .get(1)
        .map(|d| d.parse().unwrap_or_else(|_| usage()))
        .unwrap_or(u32::MAX);

    let suite = match load_suite(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            exit(2);
        }
    };

    let checks: u64 = suite
        .rows
        .iter()
        .flat_map(|r| r.expected.iter())
        .filter(|(d, _)| *d <= max_depth)
        .count() as u64;

    let pb = ProgressBar::new(checks);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let start = Instant::now();
    let mut total_nodes: u64 = 0;

    for row in &suite.rows {
        for &(depth, expected) in row.expected.iter().filter(|(d, _)| *d <= max_depth) {
            pb.set_message(format!("D{} {}", depth, row.fen));

            // fresh position per check: rows are independent
            let mut pos: Position = row.fen.parse().expect("suite rows pre-validated");
            let nodes = perft(&mut pos, depth);
            total_nodes += nodes;

            if nodes != expected {
                pb.finish_and_clear();
                eprintln!("perft mismatch");
                eprintln!("  fen:      {}", row.fen);
                eprintln!("  depth:    {}", depth);
                eprintln!("  expected: {}", expected);
                eprintln!("  actual:   {}", nodes);
                exit(1);
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    let secs = start.elapsed().as_secs_f64().max(1e-9);
    println!(
        "suite ok: {} rows, {} checks, {} nodes in {:.3}s ({} nps)",
        suite.rows.len(),
        checks,
        total_nodes,
        secs,
        (total_nodes as f64 / secs) as u64
    );
}

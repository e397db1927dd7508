//! Lattice occupancy and a printable view of the cube state.
//!
//! The cube is shown as three z-slices side by side, each slice a 3x3 block
//! of piece ids with y running from top (+1) to bottom (-1) and x from left
//! (-1) to right (+1).

use rustc_hash::FxHashMap;

use crate::geometry::Coord;
use crate::pieces::{lattice_cells, Piece, PieceId, NUM_PIECES};

/// Maps each occupied lattice cell to the piece recorded there.
pub fn occupancy(pieces: &[Piece]) -> FxHashMap<Coord, PieceId> {
    pieces.iter().map(|piece| (piece.lattice, piece.id)).collect()
}

/// Returns whether every lattice cell holds exactly one piece.
pub fn is_complete(pieces: &[Piece]) -> bool {
    let cells = occupancy(pieces);
    pieces.len() == NUM_PIECES
        && cells.len() == NUM_PIECES
        && lattice_cells().all(|cell| cells.contains_key(&cell))
}

/// Formats the cube state as a human-readable string.
///
/// Empty cells show as `..`.
pub fn format_cube(pieces: &[Piece]) -> String {
    const SLICE_WIDTH: usize = 8;
    let cells = occupancy(pieces);

    let mut output = String::new();
    let header: Vec<String> = (-1..=1)
        .map(|z| format!("{:<width$}", format!("z={z}"), width = SLICE_WIDTH))
        .collect();
    output.push_str(header.join("  ").trim_end());
    output.push('\n');

    // rows from top (y=1) to bottom (y=-1)
    for y in (-1..=1).rev() {
        let slices: Vec<String> = (-1..=1)
            .map(|z| {
                (-1..=1)
                    .map(|x| match cells.get(&(x, y, z)) {
                        Some(id) => format!("{:02}", id.0),
                        None => "..".to_owned(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        output.push_str(&slices.join("  "));
        output.push('\n');
    }

    output
}

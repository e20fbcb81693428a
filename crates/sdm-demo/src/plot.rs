//! Text rendering of bit vectors as grids.

use sdm_core::BitVector;

/// Render `v` row by row, `columns` bits per row: `*` for 1, blank for 0.
///
/// Each cell is followed by a space. A trailing partial row is terminated
/// like a full one.
pub fn render_grid(v: &BitVector, columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::with_capacity(v.len() * 2 + v.len() / columns + 1);
    for (i, bit) in v.iter().enumerate() {
        out.push(if bit { '*' } else { ' ' });
        out.push(' ');
        if (i + 1) % columns == 0 {
            out.push('\n');
        }
    }
    if v.len() % columns != 0 {
        out.push('\n');
    }
    out
}

//! Material and piece-placement evaluation in centipawns, from White's
//! point of view. The duck carries no value.

use super::{Color, Grid, Occupant, PieceKind};

#[inline]
pub fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 100.0,
        PieceKind::Knight => 600.0,
        PieceKind::Bishop => 300.0,
        PieceKind::Rook => 500.0,
        PieceKind::Queen => 800.0,
        PieceKind::King => 0.0,
    }
}

const PAWN_BONUS: [[i16; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_BONUS: [[i16; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP_BONUS: [[i16; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_BONUS: [[i16; 8]; 8] = [
    [0, 0, 0, 5, 5, 0, 0, 0],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const QUEEN_BONUS: [[i16; 8]; 8] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

fn placement_bonus(kind: PieceKind, row: usize, col: usize) -> f32 {
    let table = match kind {
        PieceKind::Pawn => &PAWN_BONUS,
        PieceKind::Knight => &KNIGHT_BONUS,
        PieceKind::Bishop => &BISHOP_BONUS,
        PieceKind::Rook => &ROOK_BONUS,
        PieceKind::Queen => &QUEEN_BONUS,
        PieceKind::King => return 0.0,
    };
    table[row][col] as f32
}

pub fn evaluate(grid: &Grid) -> f32 {
    let mut score = 0.0;
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(Occupant::Piece(color, kind)) = cell {
                let value = piece_value(*kind) + placement_bonus(*kind, row, col);
                match color {
                    Color::White => score += value,
                    Color::Black => score -= value,
                }
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::super::DuckPosition;
    use super::*;

    #[test]
    fn losing_the_queen_costs_white_material() {
        let mut pos = DuckPosition::initial();
        let baseline = evaluate(&pos.grid);
        pos.grid[7][3] = None; // white queen off the board
        assert!(evaluate(&pos.grid) < baseline - 500.0);
    }

    #[test]
    fn the_duck_is_worthless() {
        let mut pos = DuckPosition::initial();
        let baseline = evaluate(&pos.grid);
        pos.grid[4][4] = Some(Occupant::Duck);
        assert_eq!(evaluate(&pos.grid), baseline);
    }

    #[test]
    fn centralizing_a_knight_beats_the_rim() {
        assert!(
            placement_bonus(PieceKind::Knight, 4, 3)
                > placement_bonus(PieceKind::Knight, 0, 0)
        );
    }
}

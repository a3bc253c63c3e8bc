//! 6x7 connect-four. Row 0 is the top of the board; pieces fall toward
//! row 5.

use std::fmt::Display;

use crate::game::{Game, MoveList, Side};
use crate::hashing::{CONNECT4_CELL_KEYS, CONNECT4_SIDE_KEY};

pub const WIDTH: usize = 7;
pub const HEIGHT: usize = 6;

/// Strategic value of each board location, higher toward the center.
const POSITION_VALUES: [[f32; WIDTH]; HEIGHT] = [
    [3.0, 4.0, 5.0, 7.0, 5.0, 4.0, 3.0],
    [4.0, 6.0, 8.0, 10.0, 8.0, 6.0, 4.0],
    [5.0, 8.0, 11.0, 13.0, 11.0, 8.0, 5.0],
    [5.0, 8.0, 11.0, 13.0, 11.0, 8.0, 5.0],
    [4.0, 6.0, 8.0, 10.0, 8.0, 6.0, 4.0],
    [3.0, 4.0, 5.0, 7.0, 5.0, 4.0, 3.0],
];

const POSITIONS_WEIGHT: f32 = 0.1;
const THREATS_WEIGHT: f32 = 2.0;
const CONNECTIVITY_WEIGHT: f32 = 1.2;
const OPPONENT_THREATS_WEIGHT: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect4Position {
    grid: [[Option<Side>; WIDTH]; HEIGHT],
    side_to_move: Side,
}

impl Connect4Position {
    pub fn empty(side_to_move: Side) -> Self {
        Self {
            grid: [[None; WIDTH]; HEIGHT],
            side_to_move,
        }
    }

    /// Builds a position from signed cells: `1` for [`Side::Max`], `-1`
    /// for [`Side::Min`], `0` for empty.
    pub fn from_grid(cells: [[i8; WIDTH]; HEIGHT], side_to_move: Side) -> Self {
        let mut grid = [[None; WIDTH]; HEIGHT];
        for (row, values) in grid.iter_mut().zip(cells.iter()) {
            for (slot, &value) in row.iter_mut().zip(values.iter()) {
                *slot = match value {
                    1 => Some(Side::Max),
                    -1 => Some(Side::Min),
                    _ => None,
                };
            }
        }
        Self { grid, side_to_move }
    }

    /// Row a piece dropped in `col` lands on, `None` when the column is
    /// full.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        if self.grid[0][col].is_some() {
            return None;
        }
        for row in 1..HEIGHT {
            if self.grid[row][col].is_some() {
                return Some(row - 1);
            }
        }
        Some(HEIGHT - 1)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Side> {
        self.grid[row][col]
    }

    fn window_counts(&self, cells: [Option<Side>; 4]) -> (usize, usize) {
        let own = cells.iter().filter(|&&c| c == Some(Side::Max)).count();
        let theirs = cells.iter().filter(|&&c| c == Some(Side::Min)).count();
        (own, theirs)
    }

    /// The four heuristic signals over horizontal and vertical windows:
    /// positional value, own threats, own connectivity, opponent threats.
    fn signals(&self) -> (f32, f32, f32, f32) {
        let mut positions = 0.0;
        let mut threats = 0.0;
        let mut connectivity = 0.0;
        let mut opponent_threats = 0.0;

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if let Some(side) = self.grid[y][x] {
                    positions += side.sign() * POSITION_VALUES[y][x];
                }

                if x + 4 <= WIDTH {
                    let window = [
                        self.grid[y][x],
                        self.grid[y][x + 1],
                        self.grid[y][x + 2],
                        self.grid[y][x + 3],
                    ];
                    let (own, theirs) = self.window_counts(window);
                    if own == 3 && theirs == 0 {
                        threats += 1.0;
                    }
                    if own >= 2 && theirs == 0 {
                        connectivity += 1.0;
                    }
                    if theirs == 3 && own == 0 {
                        opponent_threats += 1.0;
                    }
                }

                if y + 4 <= HEIGHT {
                    let window = [
                        self.grid[y][x],
                        self.grid[y + 1][x],
                        self.grid[y + 2][x],
                        self.grid[y + 3][x],
                    ];
                    let (own, theirs) = self.window_counts(window);
                    if own == 3 && theirs == 0 {
                        threats += 1.0;
                    }
                    if own >= 2 && theirs == 0 {
                        connectivity += 1.0;
                    }
                    if theirs == 3 && own == 0 {
                        opponent_threats += 1.0;
                    }
                }
            }
        }

        (positions, threats, connectivity, opponent_threats)
    }
}

impl Display for Connect4Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.grid.iter() {
            for cell in row.iter() {
                let glyph = match cell {
                    Some(Side::Max) => 'O',
                    Some(Side::Min) => 'X',
                    None => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct Connect4;

impl Game for Connect4 {
    type Position = Connect4Position;
    type Move = usize;

    fn side_to_move(&self, pos: &Connect4Position) -> Side {
        pos.side_to_move
    }

    fn legal_moves(&self, pos: &Connect4Position) -> MoveList<usize> {
        (0..WIDTH).filter(|&col| pos.drop_row(col).is_some()).collect()
    }

    fn apply(&self, pos: &Connect4Position, col: usize) -> Connect4Position {
        let mut next = pos.clone();
        if let Some(row) = pos.drop_row(col) {
            next.grid[row][col] = Some(pos.side_to_move);
        }
        next.side_to_move = pos.side_to_move.opposite();
        next
    }

    fn won_by_last_move(&self, pos: &Connect4Position) -> bool {
        let grid = &pos.grid;
        // Cheap occupancy prechecks: no horizontal line fits before four
        // pieces reach the bottom row, no vertical one before a column
        // is four high.
        let check_horizontal = grid[HEIGHT - 1].iter().filter(|c| c.is_some()).count() >= 4;
        let check_vertical = grid[HEIGHT - 4].iter().any(|c| c.is_some());

        if check_horizontal {
            for row in grid.iter() {
                for x in 0..=WIDTH - 4 {
                    if row[x].is_some()
                        && row[x] == row[x + 1]
                        && row[x] == row[x + 2]
                        && row[x] == row[x + 3]
                    {
                        return true;
                    }
                }
            }
        }

        if check_vertical {
            for x in 0..WIDTH {
                for y in 0..=HEIGHT - 4 {
                    if grid[y][x].is_some()
                        && grid[y][x] == grid[y + 1][x]
                        && grid[y][x] == grid[y + 2][x]
                        && grid[y][x] == grid[y + 3][x]
                    {
                        return true;
                    }
                }
            }
        }

        if check_horizontal && check_vertical {
            for y in 0..=HEIGHT - 4 {
                for x in 0..WIDTH {
                    let cell = grid[y][x];
                    if cell.is_none() {
                        continue;
                    }
                    // Down-left
                    if x >= 3
                        && cell == grid[y + 1][x - 1]
                        && cell == grid[y + 2][x - 2]
                        && cell == grid[y + 3][x - 3]
                    {
                        return true;
                    }
                    // Down-right
                    if x + 3 < WIDTH
                        && cell == grid[y + 1][x + 1]
                        && cell == grid[y + 2][x + 2]
                        && cell == grid[y + 3][x + 3]
                    {
                        return true;
                    }
                }
            }
        }

        false
    }

    fn is_draw(&self, pos: &Connect4Position) -> bool {
        pos.grid[0].iter().all(|c| c.is_some())
    }

    fn evaluate(&self, pos: &Connect4Position) -> f32 {
        let (positions, threats, connectivity, opponent_threats) = pos.signals();

        let total = positions * POSITIONS_WEIGHT
            + threats * THREATS_WEIGHT
            + connectivity * CONNECTIVITY_WEIGHT
            - opponent_threats * OPPONENT_THREATS_WEIGHT;

        // The win sentinel must dominate any heuristic score.
        total.clamp(-Self::WIN_SCORE + 1.0, Self::WIN_SCORE - 1.0)
    }

    fn fingerprint(&self, pos: &Connect4Position) -> u64 {
        let mut hash = 0;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if let Some(side) = pos.grid[y][x] {
                    hash ^= CONNECT4_CELL_KEYS[(y * WIDTH + x) * 2 + side as usize];
                }
            }
        }
        if pos.side_to_move == Side::Min {
            hash ^= CONNECT4_SIDE_KEY;
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Searcher;

    fn drop_sequence(cols: &[usize], start: Side) -> Connect4Position {
        let game = Connect4;
        let mut pos = Connect4Position::empty(start);
        for &col in cols {
            pos = game.apply(&pos, col);
        }
        pos
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let pos = drop_sequence(&[3, 3, 3], Side::Max);
        assert_eq!(pos.cell(5, 3), Some(Side::Max));
        assert_eq!(pos.cell(4, 3), Some(Side::Min));
        assert_eq!(pos.cell(3, 3), Some(Side::Max));
        assert_eq!(pos.drop_row(3), Some(2));
    }

    #[test]
    fn full_column_generates_no_move() {
        let game = Connect4;
        let pos = drop_sequence(&[0, 0, 0, 0, 0, 0], Side::Max);
        assert_eq!(pos.drop_row(0), None);
        assert!(!game.legal_moves(&pos).contains(&0));
    }

    #[test]
    fn detects_all_four_winning_directions() {
        let game = Connect4;
        // Max drops 0..3 on the bottom row while Min stacks column 6.
        let horizontal = drop_sequence(&[0, 6, 1, 6, 2, 6, 3], Side::Max);
        assert!(game.won_by_last_move(&horizontal));

        let vertical = drop_sequence(&[0, 1, 0, 1, 0, 1, 0], Side::Max);
        assert!(game.won_by_last_move(&vertical));

        let diagonal = drop_sequence(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3], Side::Max);
        assert!(game.won_by_last_move(&diagonal));

        assert!(!game.won_by_last_move(&drop_sequence(&[0, 1, 2], Side::Max)));
    }

    #[test]
    fn engine_blocks_an_immediate_threat() {
        let game = Connect4;
        // Min holds 0..2 on the bottom row; column 3 completes it. Max
        // has no win of its own available.
        let pos = drop_sequence(&[0, 5, 1, 5, 2], Side::Min);
        assert_eq!(game.side_to_move(&pos), Side::Max);

        let mut searcher = Searcher::new(&game);
        let result = searcher.find_best_move(&pos, 4).unwrap();
        assert_eq!(result.best_move, Some(3));
    }

    #[test]
    fn fingerprints_distinguish_piece_columns() {
        let game = Connect4;
        let a = drop_sequence(&[2], Side::Max);
        let b = drop_sequence(&[4], Side::Max);
        assert_ne!(game.fingerprint(&a), game.fingerprint(&b));
    }

    #[test]
    fn warm_cache_entries_do_not_leak_across_positions() {
        let game = Connect4;
        let a = drop_sequence(&[2], Side::Max);
        let b = drop_sequence(&[4], Side::Max);

        let mut searcher = Searcher::new(&game);
        let from_a = searcher.find_best_move(&a, 3).unwrap();
        let direct_b = Searcher::new(&game).find_best_move(&b, 3).unwrap();
        let warm_b = searcher.find_best_move(&b, 3).unwrap();

        assert_eq!(warm_b.score, direct_b.score);
        assert_eq!(warm_b.best_move, direct_b.best_move);
        // Distinct fingerprints mean `a`'s root entry cannot answer `b`.
        let _ = from_a;
    }

    #[test]
    fn evaluation_is_pure_and_bounded() {
        let game = Connect4;
        let pos = drop_sequence(&[3, 2, 3, 4, 3], Side::Max);
        let first = game.evaluate(&pos);
        assert_eq!(first, game.evaluate(&pos));
        assert!(first.abs() < Connect4::WIN_SCORE);
    }

    #[test]
    fn central_material_evaluates_higher_than_edge_material() {
        let game = Connect4;
        let center = drop_sequence(&[3], Side::Max);
        let edge = drop_sequence(&[0], Side::Max);
        assert!(game.evaluate(&center) > game.evaluate(&edge));
    }
}

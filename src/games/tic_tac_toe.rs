//! 3x3 tic-tac-toe. Small enough that the engine searches it to the end.

use std::fmt::Display;

use crate::game::{Game, MoveList, Side};
use crate::hashing::{TTT_CELL_KEYS, TTT_SIDE_KEY};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TttPosition {
    cells: [Option<Side>; 9],
    side_to_move: Side,
}

impl TttPosition {
    pub fn empty(side_to_move: Side) -> Self {
        Self {
            cells: [None; 9],
            side_to_move,
        }
    }

    /// Builds a position from signed cells: `1` for [`Side::Max`], `-1`
    /// for [`Side::Min`], `0` for empty.
    pub fn from_cells(cells: [i8; 9], side_to_move: Side) -> Self {
        let mut out = [None; 9];
        for (slot, &value) in out.iter_mut().zip(cells.iter()) {
            *slot = match value {
                1 => Some(Side::Max),
                -1 => Some(Side::Min),
                _ => None,
            };
        }
        Self {
            cells: out,
            side_to_move,
        }
    }

    pub fn cell(&self, index: usize) -> Option<Side> {
        self.cells[index]
    }
}

impl Display for TttPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let glyph = match self.cells[row * 3 + col] {
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

pub struct TicTacToe;

impl TicTacToe {
    fn line_threats(&self, pos: &TttPosition, side: Side) -> u32 {
        let mut threats = 0;
        for line in LINES {
            let own = line
                .iter()
                .filter(|&&i| pos.cells[i] == Some(side))
                .count();
            let empty = line.iter().filter(|&&i| pos.cells[i].is_none()).count();
            if own == 2 && empty == 1 {
                threats += 1;
            }
        }
        threats
    }
}

impl Game for TicTacToe {
    type Position = TttPosition;
    type Move = usize;

    fn side_to_move(&self, pos: &TttPosition) -> Side {
        pos.side_to_move
    }

    fn legal_moves(&self, pos: &TttPosition) -> MoveList<usize> {
        (0..9).filter(|&i| pos.cells[i].is_none()).collect()
    }

    fn apply(&self, pos: &TttPosition, mv: usize) -> TttPosition {
        let mut next = pos.clone();
        next.cells[mv] = Some(pos.side_to_move);
        next.side_to_move = pos.side_to_move.opposite();
        next
    }

    fn won_by_last_move(&self, pos: &TttPosition) -> bool {
        LINES.iter().any(|line| {
            pos.cells[line[0]].is_some()
                && pos.cells[line[0]] == pos.cells[line[1]]
                && pos.cells[line[1]] == pos.cells[line[2]]
        })
    }

    fn is_draw(&self, pos: &TttPosition) -> bool {
        pos.cells.iter().all(|c| c.is_some())
    }

    fn evaluate(&self, pos: &TttPosition) -> f32 {
        let own = self.line_threats(pos, Side::Max) as f32;
        let theirs = self.line_threats(pos, Side::Min) as f32;
        (own - theirs) * 10.0
    }

    fn fingerprint(&self, pos: &TttPosition) -> u64 {
        let mut hash = 0;
        for (i, cell) in pos.cells.iter().enumerate() {
            if let Some(side) = cell {
                hash ^= TTT_CELL_KEYS[i * 2 + *side as usize];
            }
        }
        if pos.side_to_move == Side::Min {
            hash ^= TTT_SIDE_KEY;
        }
        hash
    }
}

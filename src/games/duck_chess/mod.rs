//! Duck chess: orthodox piece movement plus a duck that blocks a square.
//! One engine ply is a (piece move, duck placement) pair; the two phases
//! are enumerated sequentially and each is legality-filtered on its own.

use std::fmt::Display;

use smallvec::SmallVec;

use crate::game::{Game, MoveList, Side};
use crate::hashing::{DUCK_CASTLE_KEYS, DUCK_EP_KEYS, DUCK_PIECE_KEYS, DUCK_SIDE_KEY};

pub mod bot;
pub mod eval;
pub mod worker;

/// Placement candidates kept when no square touches a piece at all.
const DUCK_FALLBACK: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// White is the maximizing reference player.
    #[inline]
    pub fn side(&self) -> Side {
        match self {
            Color::White => Side::Max,
            Color::Black => Side::Min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Piece(Color, PieceKind),
    Duck,
}

pub type Grid = [[Option<Occupant>; 8]; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[inline]
    fn offset(&self, dr: i32, dc: i32) -> Option<Square> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.row as usize * 8 + self.col as usize
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.col) as char;
        write!(f, "{}{}", file, 8 - self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub fn initial() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    fn clear_for(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Color::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }
}

/// A complete ply: move a piece, then relocate the duck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuckMove {
    pub from: Square,
    pub to: Square,
    pub duck: Square,
}

impl Display for DuckMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}@{}", self.from, self.to, self.duck)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuckPosition {
    pub grid: Grid,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

impl DuckPosition {
    /// Standard chess setup; the duck enters on the first placement.
    pub fn initial() -> Self {
        use Color::*;
        use PieceKind::*;

        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut grid: Grid = [[None; 8]; 8];
        for (col, &kind) in back.iter().enumerate() {
            grid[0][col] = Some(Occupant::Piece(Black, kind));
            grid[7][col] = Some(Occupant::Piece(White, kind));
        }
        for col in 0..8 {
            grid[1][col] = Some(Occupant::Piece(Black, Pawn));
            grid[6][col] = Some(Occupant::Piece(White, Pawn));
        }

        Self {
            grid,
            side_to_move: Color::White,
            castling: CastlingRights::initial(),
            en_passant: None,
        }
    }
}

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
fn piece_at(grid: &Grid, sq: Square) -> Option<Occupant> {
    grid[sq.row as usize][sq.col as usize]
}

/// Whether `color` may move to or capture on the square. The duck blocks
/// everything and can never be captured.
#[inline]
fn landable(grid: &Grid, sq: Square, color: Color) -> bool {
    match piece_at(grid, sq) {
        None => true,
        Some(Occupant::Piece(c, _)) => c != color,
        Some(Occupant::Duck) => false,
    }
}

#[inline]
fn is_enemy_piece(grid: &Grid, sq: Square, color: Color) -> bool {
    matches!(piece_at(grid, sq), Some(Occupant::Piece(c, _)) if c != color)
}

/// Pseudo-legal destinations of the piece on `from`, provided it belongs
/// to `turn`. Check exposure is the caller's concern.
pub fn piece_destinations(
    grid: &Grid,
    from: Square,
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> SmallVec<[Square; 28]> {
    let mut out = SmallVec::new();
    let (color, kind) = match piece_at(grid, from) {
        Some(Occupant::Piece(color, kind)) if color == turn => (color, kind),
        _ => return out,
    };

    match kind {
        PieceKind::Pawn => {
            let dir = if color == Color::White { -1 } else { 1 };
            let start_row = if color == Color::White { 6 } else { 1 };
            if let Some(step) = from.offset(dir, 0) {
                if piece_at(grid, step).is_none() {
                    out.push(step);
                    if from.row == start_row {
                        if let Some(leap) = from.offset(2 * dir, 0) {
                            if piece_at(grid, leap).is_none() {
                                out.push(leap);
                            }
                        }
                    }
                }
            }
            for dc in [-1, 1] {
                if let Some(diag) = from.offset(dir, dc) {
                    if is_enemy_piece(grid, diag, color) {
                        out.push(diag);
                    }
                }
            }
            if let Some(target) = en_passant {
                let capture_row = if color == Color::White { 3 } else { 4 };
                if from.row == capture_row
                    && target.row as i32 == from.row as i32 + dir
                    && (target.col as i32 - from.col as i32).abs() == 1
                {
                    out.push(target);
                }
            }
        }
        PieceKind::Knight => {
            for (dr, dc) in KNIGHT_JUMPS {
                if let Some(to) = from.offset(dr, dc) {
                    if landable(grid, to, color) {
                        out.push(to);
                    }
                }
            }
        }
        PieceKind::King => {
            for (dr, dc) in KING_STEPS {
                if let Some(to) = from.offset(dr, dc) {
                    if landable(grid, to, color) {
                        out.push(to);
                    }
                }
            }
            let (home, king_side, queen_side) = match color {
                Color::White => (7u8, castling.white_king_side, castling.white_queen_side),
                Color::Black => (0u8, castling.black_king_side, castling.black_queen_side),
            };
            if from.row == home && from.col == 4 {
                let row = home as usize;
                if king_side
                    && grid[row][5].is_none()
                    && grid[row][6].is_none()
                    && grid[row][7] == Some(Occupant::Piece(color, PieceKind::Rook))
                {
                    out.push(Square::new(home, 6));
                }
                if queen_side
                    && grid[row][3].is_none()
                    && grid[row][2].is_none()
                    && grid[row][1].is_none()
                    && grid[row][0] == Some(Occupant::Piece(color, PieceKind::Rook))
                {
                    out.push(Square::new(home, 2));
                }
            }
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let dirs: &[(i32, i32)] = match kind {
                PieceKind::Bishop => &BISHOP_DIRS,
                PieceKind::Rook => &ROOK_DIRS,
                _ => &KING_STEPS,
            };
            for &(dr, dc) in dirs {
                let mut cursor = from;
                while let Some(to) = cursor.offset(dr, dc) {
                    match piece_at(grid, to) {
                        None => out.push(to),
                        Some(Occupant::Piece(c, _)) if c != color => {
                            out.push(to);
                            break;
                        }
                        _ => break,
                    }
                    cursor = to;
                }
            }
        }
    }

    out
}

pub fn king_square(grid: &Grid, color: Color) -> Option<Square> {
    for row in 0..8u8 {
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            if piece_at(grid, sq) == Some(Occupant::Piece(color, PieceKind::King)) {
                return Some(sq);
            }
        }
    }
    None
}

pub fn square_attacked(
    grid: &Grid,
    target: Square,
    attacker: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> bool {
    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Square::new(row, col);
            if matches!(piece_at(grid, from), Some(Occupant::Piece(c, _)) if c == attacker)
                && piece_destinations(grid, from, attacker, castling, en_passant)
                    .contains(&target)
            {
                return true;
            }
        }
    }
    false
}

/// A missing king reads as in check, the way the source treats a
/// captured king as mate.
pub fn in_check(
    grid: &Grid,
    color: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> bool {
    match king_square(grid, color) {
        Some(sq) => square_attacked(grid, sq, color.opposite(), castling, en_passant),
        None => true,
    }
}

fn remove_duck(grid: &mut Grid) {
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            if *cell == Some(Occupant::Duck) {
                *cell = None;
            }
        }
    }
}

/// Applies the primary move in place, updating castling rights, playing
/// out rook shifts and en-passant captures, and auto-queening on the
/// last rank. Returns the new en-passant target.
pub fn make_move(
    grid: &mut Grid,
    from: Square,
    to: Square,
    castling: &mut CastlingRights,
    en_passant: Option<Square>,
) -> Option<Square> {
    let piece = piece_at(grid, from);

    if let Some(Occupant::Piece(color, PieceKind::King)) = piece {
        if (to.col as i32 - from.col as i32).abs() == 2 {
            let row = to.row as usize;
            if to.col == 6 {
                grid[row][5] = grid[row][7].take();
            }
            if to.col == 2 {
                grid[row][3] = grid[row][0].take();
            }
        }
        castling.clear_for(color);
    }

    if let Some(Occupant::Piece(color, PieceKind::Rook)) = piece {
        let home = if color == Color::White { 7 } else { 0 };
        if from.row == home && from.col == 0 {
            match color {
                Color::White => castling.white_queen_side = false,
                Color::Black => castling.black_queen_side = false,
            }
        }
        if from.row == home && from.col == 7 {
            match color {
                Color::White => castling.white_king_side = false,
                Color::Black => castling.black_king_side = false,
            }
        }
    }

    let mut next_en_passant = None;
    if let Some(Occupant::Piece(color, PieceKind::Pawn)) = piece {
        if en_passant == Some(to) {
            let behind = if color == Color::White { 1 } else { -1 };
            if let Some(captured) = to.offset(behind, 0) {
                grid[captured.row as usize][captured.col as usize] = None;
            }
        }
        if (to.row as i32 - from.row as i32).abs() == 2 {
            next_en_passant = Some(Square::new((from.row + to.row) / 2, from.col));
        }
    }

    let landing = match piece {
        Some(Occupant::Piece(color, PieceKind::Pawn))
            if to.row == if color == Color::White { 0 } else { 7 } =>
        {
            Some(Occupant::Piece(color, PieceKind::Queen))
        }
        other => other,
    };
    grid[to.row as usize][to.col as usize] = landing;
    grid[from.row as usize][from.col as usize] = None;

    next_en_passant
}

/// Capture-first ordering score over the pre-move grid: MVV-LVA for
/// captures, a promotion bump, a small center bump.
fn move_score(grid: &Grid, from: Square, to: Square, turn: Color) -> i32 {
    let mut score = 0;
    if let Some(Occupant::Piece(color, kind)) = piece_at(grid, to) {
        if color != turn {
            score += 10_000 + eval::piece_value(kind) as i32;
            if let Some(Occupant::Piece(_, attacker)) = piece_at(grid, from) {
                score -= eval::piece_value(attacker) as i32;
            }
        }
    }
    if let Some(Occupant::Piece(color, PieceKind::Pawn)) = piece_at(grid, from) {
        let last_rank = if color == Color::White { 0 } else { 7 };
        if to.row == last_rank {
            score += 5_000;
        }
    }
    if (2..=5).contains(&to.row) && (2..=5).contains(&to.col) {
        score += 100;
    }
    score
}

/// Legal piece moves for the side to move, capture-first. A move is
/// legal when, with the duck lifted off the board, it does not leave the
/// mover's own king in check.
pub fn primary_moves(pos: &DuckPosition) -> SmallVec<[(Square, Square); 64]> {
    let mut moves: SmallVec<[(Square, Square); 64]> = SmallVec::new();
    let turn = pos.side_to_move;

    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Square::new(row, col);
            if !matches!(piece_at(&pos.grid, from), Some(Occupant::Piece(c, _)) if c == turn) {
                continue;
            }
            for to in piece_destinations(&pos.grid, from, turn, pos.castling, pos.en_passant) {
                let mut grid = pos.grid;
                let mut castling = pos.castling;
                make_move(&mut grid, from, to, &mut castling, pos.en_passant);
                remove_duck(&mut grid);
                if !in_check(&grid, turn, castling, pos.en_passant) {
                    moves.push((from, to));
                }
            }
        }
    }

    moves.sort_by_key(|&(from, to)| std::cmp::Reverse(move_score(&pos.grid, from, to, turn)));
    moves
}

/// Duck placement candidates on the post-move grid, pruned the way the
/// source prunes them: squares touching an opponent piece first, then
/// squares touching anything, then the first few empties. The old duck
/// still occupies its square here, so the duck always relocates.
pub fn duck_candidates(grid: &Grid, mover: Color) -> SmallVec<[Square; 16]> {
    let opponent = mover.opposite();
    let mut empties: SmallVec<[Square; 64]> = SmallVec::new();
    for row in 0..8u8 {
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            if piece_at(grid, sq).is_none() {
                empties.push(sq);
            }
        }
    }

    let touches = |sq: Square, wanted: Option<Color>| -> bool {
        KING_STEPS.iter().any(|&(dr, dc)| {
            sq.offset(dr, dc).is_some_and(|n| match piece_at(grid, n) {
                Some(Occupant::Piece(c, _)) => wanted.map_or(true, |w| c == w),
                _ => false,
            })
        })
    };

    let mut candidates: SmallVec<[Square; 16]> = empties
        .iter()
        .copied()
        .filter(|&sq| touches(sq, Some(opponent)))
        .collect();
    if candidates.is_empty() {
        candidates = empties
            .iter()
            .copied()
            .filter(|&sq| touches(sq, None))
            .collect();
    }
    if candidates.is_empty() {
        candidates = empties.iter().copied().take(DUCK_FALLBACK).collect();
    }
    candidates
}

pub struct DuckChess;

impl Game for DuckChess {
    type Position = DuckPosition;
    type Move = DuckMove;

    /// The evaluator works in centipawns; the sentinel sits far above
    /// any material total.
    const WIN_SCORE: f32 = 1_000_000.0;

    fn side_to_move(&self, pos: &DuckPosition) -> Side {
        pos.side_to_move.side()
    }

    fn legal_moves(&self, pos: &DuckPosition) -> MoveList<DuckMove> {
        let mut out = MoveList::new();
        let turn = pos.side_to_move;

        for (from, to) in primary_moves(pos) {
            let mut grid = pos.grid;
            let mut castling = pos.castling;
            let next_ep = make_move(&mut grid, from, to, &mut castling, pos.en_passant);

            for duck in duck_candidates(&grid, turn) {
                let mut placed = grid;
                remove_duck(&mut placed);
                placed[duck.row as usize][duck.col as usize] = Some(Occupant::Duck);
                if !in_check(&placed, turn, castling, next_ep) {
                    out.push(DuckMove { from, to, duck });
                }
            }
        }

        out
    }

    fn apply(&self, pos: &DuckPosition, mv: DuckMove) -> DuckPosition {
        let mut next = pos.clone();
        let next_ep = make_move(
            &mut next.grid,
            mv.from,
            mv.to,
            &mut next.castling,
            pos.en_passant,
        );
        remove_duck(&mut next.grid);
        next.grid[mv.duck.row as usize][mv.duck.col as usize] = Some(Occupant::Duck);
        next.en_passant = next_ep;
        next.side_to_move = pos.side_to_move.opposite();
        next
    }

    fn won_by_last_move(&self, pos: &DuckPosition) -> bool {
        king_square(&pos.grid, pos.side_to_move).is_none()
    }

    fn is_draw(&self, pos: &DuckPosition) -> bool {
        self.legal_moves(pos).is_empty()
    }

    fn evaluate(&self, pos: &DuckPosition) -> f32 {
        eval::evaluate(&pos.grid)
    }

    fn fingerprint(&self, pos: &DuckPosition) -> u64 {
        let mut hash = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                if let Some(occupant) = piece_at(&pos.grid, sq) {
                    let kind_index = match occupant {
                        Occupant::Piece(Color::White, kind) => kind as usize,
                        Occupant::Piece(Color::Black, kind) => 6 + kind as usize,
                        Occupant::Duck => 12,
                    };
                    hash ^= DUCK_PIECE_KEYS[sq.index() * 13 + kind_index];
                }
            }
        }
        if pos.castling.white_king_side {
            hash ^= DUCK_CASTLE_KEYS[0];
        }
        if pos.castling.white_queen_side {
            hash ^= DUCK_CASTLE_KEYS[1];
        }
        if pos.castling.black_king_side {
            hash ^= DUCK_CASTLE_KEYS[2];
        }
        if pos.castling.black_queen_side {
            hash ^= DUCK_CASTLE_KEYS[3];
        }
        if let Some(target) = pos.en_passant {
            hash ^= DUCK_EP_KEYS[target.col as usize];
        }
        if pos.side_to_move == Color::Black {
            hash ^= DUCK_SIDE_KEY;
        }
        hash
    }
}

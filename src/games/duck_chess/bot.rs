//! A weak random opponent. It mates when it can, avoids hanging its own
//! king when it can, and otherwise plays any move at all.

use rand::Rng;
use smallvec::SmallVec;

use super::{
    in_check, make_move, piece_at, piece_destinations, remove_duck, Color, DuckMove,
    DuckPosition, Grid, Occupant, Square,
};

fn has_legal_primary_move(
    grid: &Grid,
    color: Color,
    castling: super::CastlingRights,
    en_passant: Option<Square>,
) -> bool {
    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Square::new(row, col);
            if !matches!(piece_at(grid, from), Some(Occupant::Piece(c, _)) if c == color) {
                continue;
            }
            for to in piece_destinations(grid, from, color, castling, en_passant) {
                let mut next = *grid;
                let mut rights = castling;
                make_move(&mut next, from, to, &mut rights, en_passant);
                remove_duck(&mut next);
                if !in_check(&next, color, rights, en_passant) {
                    return true;
                }
            }
        }
    }
    false
}

/// Picks a random ply, preferring mating moves, then moves that do not
/// expose the mover's own king, then anything. The duck lands on a
/// random empty square other than the one it came from. Returns `None`
/// only when the mover has no pieces left to move.
pub fn random_move<R: Rng>(pos: &DuckPosition, rng: &mut R) -> Option<DuckMove> {
    let turn = pos.side_to_move;
    let mut all: SmallVec<[(Square, Square); 64]> = SmallVec::new();
    let mut safe: SmallVec<[(Square, Square); 64]> = SmallVec::new();
    let mut mating: SmallVec<[(Square, Square); 16]> = SmallVec::new();

    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = Square::new(row, col);
            if !matches!(piece_at(&pos.grid, from), Some(Occupant::Piece(c, _)) if c == turn) {
                continue;
            }
            for to in piece_destinations(&pos.grid, from, turn, pos.castling, pos.en_passant) {
                all.push((from, to));

                let mut grid = pos.grid;
                let mut castling = pos.castling;
                let next_ep = make_move(&mut grid, from, to, &mut castling, pos.en_passant);
                remove_duck(&mut grid);
                if in_check(&grid, turn, castling, next_ep) {
                    continue;
                }
                safe.push((from, to));

                let opponent = turn.opposite();
                if in_check(&grid, opponent, castling, next_ep)
                    && !has_legal_primary_move(&grid, opponent, castling, next_ep)
                {
                    mating.push((from, to));
                }
            }
        }
    }

    let pool: &[(Square, Square)] = if !mating.is_empty() {
        &mating
    } else if !safe.is_empty() {
        &safe
    } else {
        &all
    };
    if pool.is_empty() {
        return None;
    }
    let (from, to) = pool[rng.gen_range(0..pool.len())];

    let mut grid = pos.grid;
    let mut castling = pos.castling;
    make_move(&mut grid, from, to, &mut castling, pos.en_passant);
    // Empties are collected with the old duck still on its square, so
    // the duck never stays put.
    let mut empties: SmallVec<[Square; 64]> = SmallVec::new();
    for row in 0..8u8 {
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            if piece_at(&grid, sq).is_none() {
                empties.push(sq);
            }
        }
    }
    let duck = empties[rng.gen_range(0..empties.len())];

    Some(DuckMove { from, to, duck })
}

//! Compile-time zobrist key tables, one set per game.

const SEED: u128 = 0x3C69A1F7D24B80E5196FD3A78B42C60D;

pub struct XorShiftState {
    pub state: u128,
}

impl XorShiftState {
    pub const fn new() -> Self {
        Self { state: SEED }
    }

    pub const fn next_self(mut self) -> (u64, Self) {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        #[allow(clippy::cast_possible_truncation)]
        let r = x as u64;
        let r = r ^ (x >> 64) as u64;
        (r, self)
    }
}

const fn generate_keys<const N: usize>(mut state: XorShiftState) -> ([u64; N], XorShiftState) {
    let mut keys = [0; N];
    let mut i = 0;
    while i < N {
        let key;
        (key, state) = state.next_self();
        keys[i] = key;
        i += 1;
    }
    (keys, state)
}

/// Keys for a plain grid game: one key per (cell, side) pair, indexed
/// `cell * 2 + side as usize`, plus a side-to-move key.
const fn grid_keys<const CELLS: usize>() -> ([u64; CELLS], u64) {
    let state = XorShiftState::new();
    let (cell_keys, state) = generate_keys::<CELLS>(state);
    let (side_key, _) = state.next_self();
    (cell_keys, side_key)
}

const fn duck_keys() -> ([u64; 832], [u64; 4], [u64; 8], u64) {
    let state = XorShiftState::new();
    // 13 occupant kinds per square: 6 white pieces, 6 black, the duck.
    let (piece_keys, state) = generate_keys::<832>(state);
    let (castle_keys, state) = generate_keys::<4>(state);
    let (ep_keys, state) = generate_keys::<8>(state);
    let (side_key, _) = state.next_self();
    (piece_keys, castle_keys, ep_keys, side_key)
}

pub const TTT_CELL_KEYS: [u64; 18] = grid_keys::<18>().0;
pub const TTT_SIDE_KEY: u64 = grid_keys::<18>().1;

pub const CONNECT4_CELL_KEYS: [u64; 84] = grid_keys::<84>().0;
pub const CONNECT4_SIDE_KEY: u64 = grid_keys::<84>().1;

pub const DUCK_PIECE_KEYS: [u64; 832] = duck_keys().0;
pub const DUCK_CASTLE_KEYS: [u64; 4] = duck_keys().1;
pub const DUCK_EP_KEYS: [u64; 8] = duck_keys().2;
pub const DUCK_SIDE_KEY: u64 = duck_keys().3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_within_a_table() {
        for i in 0..CONNECT4_CELL_KEYS.len() {
            for j in (i + 1)..CONNECT4_CELL_KEYS.len() {
                assert_ne!(CONNECT4_CELL_KEYS[i], CONNECT4_CELL_KEYS[j]);
            }
        }
    }

    #[test]
    fn side_key_differs_from_cell_keys() {
        assert!(!TTT_CELL_KEYS.contains(&TTT_SIDE_KEY));
        assert!(!CONNECT4_CELL_KEYS.contains(&CONNECT4_SIDE_KEY));
    }
}

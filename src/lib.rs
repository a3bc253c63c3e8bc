pub mod game;
pub mod games;
pub mod hashing;
pub mod search;
pub mod transposition_table;

pub use game::{Game, MoveList, Side};
pub use search::{
    find_best_move_async, minimax, SearchError, SearchResult, SearchStats, Searcher, MAX_DEPTH,
};
pub use transposition_table::TranspositionTable;

//! Offloads a duck chess search to the thread pool. The request carries
//! the full position snapshot, the response carries the chosen ply plus
//! the searcher's profiling counters.

use std::sync::mpsc::{self, Receiver};

use futures::executor::ThreadPool;

use crate::search::{SearchStats, Searcher};

use super::{CastlingRights, Color, DuckChess, DuckMove, DuckPosition, Grid, Square};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub board: Grid,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchResponse {
    /// `None` when the position is already decided or has no legal ply.
    pub best_move: Option<DuckMove>,
    pub profile: SearchStats,
}

/// Spawns one search task. Each task owns a private cache; requests are
/// independent and there is no cancellation.
pub fn spawn_search(request: SearchRequest, executor: &ThreadPool) -> Receiver<SearchResponse> {
    let (tx, rx) = mpsc::channel();
    executor.spawn_ok(async move {
        let game = DuckChess;
        let pos = DuckPosition {
            grid: request.board,
            side_to_move: request.turn,
            castling: request.castling,
            en_passant: request.en_passant,
        };
        let mut searcher = Searcher::new(&game);
        let best_move = searcher
            .find_best_move(&pos, request.depth)
            .ok()
            .and_then(|result| result.best_move);
        let _ = tx.send(SearchResponse {
            best_move,
            profile: searcher.stats(),
        });
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn offloaded_request_answers_with_a_legal_ply() {
        let executor = ThreadPool::new().unwrap();
        let pos = DuckPosition::initial();
        let request = SearchRequest {
            board: pos.grid,
            turn: pos.side_to_move,
            castling: pos.castling,
            en_passant: pos.en_passant,
            depth: 1,
        };

        let response = spawn_search(request, &executor).recv().unwrap();
        let mv = response.best_move.expect("opening position has moves");
        assert!(DuckChess.legal_moves(&pos).contains(&mv));
        assert!(response.profile.nodes > 0);
    }
}

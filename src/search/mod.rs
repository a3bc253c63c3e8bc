//! Minimax search with alpha-beta pruning over any [`Game`].
//!
//! One [`Searcher`] is one search session: it owns its transposition
//! table, so results are reused across branches and across successive
//! calls, and two sessions never share cache state.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use futures::executor::ThreadPool;
use thiserror::Error;

use crate::game::{Game, Side};
use crate::transposition_table::{NodeType, TranspositionTable, EXACT_DEPTH};

/// Depth ceiling exposed to callers that want full strength.
pub const MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult<M> {
    /// Signed score, positive in favor of [`Side::Max`].
    pub score: f32,
    /// `None` signals a terminal or depth-exhausted node.
    pub best_move: Option<M>,
    /// Horizon the result was computed at.
    pub depth: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The move generator returned nothing for a position that is
    /// neither won nor drawn. That is a contract violation in the game
    /// implementation, never a valid search outcome.
    #[error("no legal moves in a position that is neither won nor drawn")]
    NoLegalMoves,
}

/// Profiling counters for one `find_best_move` invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub evals: u64,
    pub movegen: Duration,
    pub eval: Duration,
    pub total: Duration,
}

pub struct Searcher<'a, G: Game> {
    game: &'a G,
    tt: TranspositionTable<G::Move>,
    stats: SearchStats,
}

impl<'a, G: Game> Searcher<'a, G> {
    pub fn new(game: &'a G) -> Self {
        Self {
            game,
            tt: TranspositionTable::new(),
            stats: SearchStats::default(),
        }
    }

    /// Full-window search: the move the side to move should play, with
    /// the score from [`Side::Max`]'s perspective.
    pub fn find_best_move(
        &mut self,
        pos: &G::Position,
        depth: usize,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        self.stats = SearchStats::default();
        let start = Instant::now();
        let result = self.search(pos, depth, f32::NEG_INFINITY, f32::INFINITY);
        self.stats.total = start.elapsed();
        result
    }

    pub fn search(
        &mut self,
        pos: &G::Position,
        depth: usize,
        mut alpha: f32,
        mut beta: f32,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        self.stats.nodes += 1;

        let key = self.game.fingerprint(pos);
        if let Some(entry) = self.tt.probe(key, depth) {
            let usable = match entry.node_type() {
                NodeType::PV => true,
                NodeType::All => entry.result().score <= alpha,
                NodeType::Cut => entry.result().score >= beta,
            };
            if usable {
                self.stats.cache_hits += 1;
                return Ok(*entry.result());
            }
        }

        // A win is depth-independent truth: checked before depth
        // exhaustion, stored so it answers any future request.
        if self.game.won_by_last_move(pos) {
            let winner = self.game.side_to_move(pos).opposite();
            let result = SearchResult {
                score: G::WIN_SCORE * winner.sign(),
                best_move: None,
                depth,
            };
            self.tt.insert(key, EXACT_DEPTH, result, NodeType::PV);
            return Ok(result);
        }

        if self.game.is_draw(pos) {
            let result = SearchResult {
                score: 0.0,
                best_move: None,
                depth,
            };
            self.tt.insert(key, EXACT_DEPTH, result, NodeType::PV);
            return Ok(result);
        }

        if depth == 0 {
            // Leaf evaluations are cheap and low-confidence; they are
            // deliberately never cached.
            let t0 = Instant::now();
            let score = self.game.evaluate(pos);
            self.stats.eval += t0.elapsed();
            self.stats.evals += 1;
            return Ok(SearchResult {
                score,
                best_move: None,
                depth: 0,
            });
        }

        let t0 = Instant::now();
        let moves = self.game.legal_moves(pos);
        self.stats.movegen += t0.elapsed();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let maximizing = self.game.side_to_move(pos) == Side::Max;
        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        let mut best_move = None;

        for &mv in moves.iter() {
            let child = self.game.apply(pos, mv);
            let score = self.search(&child, depth - 1, alpha, beta)?.score;

            if maximizing {
                // Ties keep the first move in generation order.
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                if best > beta {
                    break;
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                if best < alpha {
                    break;
                }
                beta = beta.min(best);
            }
        }

        let result = SearchResult {
            score: best,
            best_move,
            depth,
        };
        let node_type = if best <= alpha0 {
            NodeType::All
        } else if best >= beta0 {
            NodeType::Cut
        } else {
            NodeType::PV
        };
        self.tt.insert(key, depth, result, node_type);
        Ok(result)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn cache(&self) -> &TranspositionTable<G::Move> {
        &self.tt
    }

    pub fn clear_cache(&mut self) {
        self.tt.clear();
    }
}

/// Plain minimax without pruning or caching. Slow; the oracle the pruned
/// search is checked against.
pub fn minimax<G: Game>(
    game: &G,
    pos: &G::Position,
    depth: usize,
) -> Result<SearchResult<G::Move>, SearchError> {
    if game.won_by_last_move(pos) {
        let winner = game.side_to_move(pos).opposite();
        return Ok(SearchResult {
            score: G::WIN_SCORE * winner.sign(),
            best_move: None,
            depth,
        });
    }
    if game.is_draw(pos) {
        return Ok(SearchResult {
            score: 0.0,
            best_move: None,
            depth,
        });
    }
    if depth == 0 {
        return Ok(SearchResult {
            score: game.evaluate(pos),
            best_move: None,
            depth: 0,
        });
    }

    let moves = game.legal_moves(pos);
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    let maximizing = game.side_to_move(pos) == Side::Max;
    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    let mut best_move = None;
    for &mv in moves.iter() {
        let child = game.apply(pos, mv);
        let score = minimax(game, &child, depth - 1)?.score;
        if (maximizing && score > best) || (!maximizing && score < best) {
            best = score;
            best_move = Some(mv);
        }
    }
    Ok(SearchResult {
        score: best,
        best_move,
        depth,
    })
}

/// Runs one whole search invocation on the pool and delivers the result
/// over a channel. The task owns a private cache; nothing is shared with
/// the caller and there is no cancellation — bound `depth` instead.
pub fn find_best_move_async<G>(
    game: G,
    pos: G::Position,
    depth: usize,
    executor: &ThreadPool,
) -> mpsc::Receiver<Result<SearchResult<G::Move>, SearchError>>
where
    G: Game + Send + 'static,
    G::Position: Send,
    G::Move: Send,
{
    let (tx, rx) = mpsc::channel();
    executor.spawn_ok(async move {
        let mut searcher = Searcher::new(&game);
        let _ = tx.send(searcher.find_best_move(&pos, depth));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MoveList;
    use crate::games::connect4::{Connect4, Connect4Position};
    use crate::games::tic_tac_toe::{TicTacToe, TttPosition};

    #[test]
    fn forced_win_completes_the_row() {
        let game = TicTacToe;
        let pos = TttPosition::from_cells([1, 1, 0, -1, -1, 0, 0, 0, 0], Side::Max);
        let mut searcher = Searcher::new(&game);

        let result = searcher.find_best_move(&pos, 5).unwrap();
        assert_eq!(result.score, TicTacToe::WIN_SCORE);
        assert_eq!(result.best_move, Some(2));
    }

    #[test]
    fn empty_board_is_a_draw_under_perfect_play() {
        let game = TicTacToe;
        let pos = TttPosition::empty(Side::Max);
        let mut searcher = Searcher::new(&game);

        let result = searcher.find_best_move(&pos, 9).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn win_on_previous_turn_returns_sentinel_and_no_move() {
        let game = TicTacToe;
        let mut searcher = Searcher::new(&game);

        let max_won = TttPosition::from_cells([1, 1, 1, -1, -1, 0, 0, 0, 0], Side::Min);
        let result = searcher.find_best_move(&max_won, 4).unwrap();
        assert_eq!(result.score, TicTacToe::WIN_SCORE);
        assert_eq!(result.best_move, None);

        let min_won = TttPosition::from_cells([-1, -1, -1, 1, 1, 0, 0, 1, 0], Side::Max);
        let result = searcher.find_best_move(&min_won, 4).unwrap();
        assert_eq!(result.score, -TicTacToe::WIN_SCORE);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn full_board_without_win_scores_zero() {
        let game = TicTacToe;
        let pos = TttPosition::from_cells([1, -1, 1, -1, -1, 1, 1, 1, -1], Side::Min);
        let mut searcher = Searcher::new(&game);

        let result = searcher.find_best_move(&pos, 6).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn pruned_search_matches_plain_minimax() {
        let game = TicTacToe;
        let positions = [
            TttPosition::empty(Side::Max),
            TttPosition::from_cells([1, 0, 0, 0, -1, 0, 0, 0, 0], Side::Max),
            TttPosition::from_cells([1, -1, 0, 0, 1, 0, 0, 0, -1], Side::Max),
            TttPosition::from_cells([0, 0, 0, 0, 1, 0, 0, 0, 0], Side::Min),
        ];
        for pos in &positions {
            for depth in [3, 5, 9] {
                let oracle = minimax(&game, pos, depth).unwrap();
                let mut searcher = Searcher::new(&game);
                let pruned = searcher.find_best_move(pos, depth).unwrap();
                assert_eq!(pruned.score, oracle.score);
            }
        }
    }

    #[test]
    fn pruned_search_matches_plain_minimax_with_heuristic_leaves() {
        let game = Connect4;
        let mut pos = Connect4Position::empty(Side::Max);
        for col in [3, 3, 2, 4, 4, 1] {
            pos = game.apply(&pos, col);
        }
        let oracle = minimax(&game, &pos, 4).unwrap();
        let mut searcher = Searcher::new(&game);
        let pruned = searcher.find_best_move(&pos, 4).unwrap();
        assert_eq!(pruned.score, oracle.score);
    }

    #[test]
    fn warm_cache_returns_identical_result() {
        let game = Connect4;
        let pos = Connect4Position::empty(Side::Max);
        let mut searcher = Searcher::new(&game);

        let cold = searcher.find_best_move(&pos, 5).unwrap();
        assert!(!searcher.cache().is_empty());
        let warm = searcher.find_best_move(&pos, 5).unwrap();

        assert_eq!(cold.score, warm.score);
        assert_eq!(cold.best_move, warm.best_move);
        assert!(searcher.stats().cache_hits > 0);
    }

    #[test]
    fn deeper_search_primes_shallower_queries() {
        let game = TicTacToe;
        let pos = TttPosition::from_cells([1, 1, 0, -1, -1, 0, 0, 0, 0], Side::Max);
        let mut searcher = Searcher::new(&game);

        let deep = searcher.find_best_move(&pos, 8).unwrap();
        let shallow = searcher.find_best_move(&pos, 2).unwrap();
        assert_eq!(deep.score, shallow.score);
        assert_eq!(deep.best_move, shallow.best_move);
    }

    #[test]
    fn search_reports_profiling_counters() {
        let game = TicTacToe;
        let pos = TttPosition::empty(Side::Max);
        let mut searcher = Searcher::new(&game);

        searcher.find_best_move(&pos, 4).unwrap();
        let stats = searcher.stats();
        assert!(stats.nodes > 1);
        assert!(stats.evals > 0);
    }

    #[test]
    fn offloaded_search_delivers_over_the_channel() {
        let game = TicTacToe;
        let pos = TttPosition::from_cells([1, 1, 0, -1, -1, 0, 0, 0, 0], Side::Max);
        let executor = ThreadPool::new().unwrap();

        let rx = find_best_move_async(game, pos, 5, &executor);
        let result = rx.recv().unwrap().unwrap();
        assert_eq!(result.score, TicTacToe::WIN_SCORE);
        assert_eq!(result.best_move, Some(2));
    }

    /// Game that violates the move-generator contract on purpose.
    struct Stuck;

    impl Game for Stuck {
        type Position = ();
        type Move = u8;

        fn side_to_move(&self, _: &()) -> Side {
            Side::Max
        }
        fn legal_moves(&self, _: &()) -> MoveList<u8> {
            MoveList::new()
        }
        fn apply(&self, _: &(), _: u8) {}
        fn won_by_last_move(&self, _: &()) -> bool {
            false
        }
        fn is_draw(&self, _: &()) -> bool {
            false
        }
        fn evaluate(&self, _: &()) -> f32 {
            0.0
        }
        fn fingerprint(&self, _: &()) -> u64 {
            0
        }
    }

    #[test]
    fn empty_move_generator_is_an_invariant_failure() {
        let mut searcher = Searcher::new(&Stuck);
        assert_eq!(
            searcher.find_best_move(&(), 3),
            Err(SearchError::NoLegalMoves)
        );
    }
}

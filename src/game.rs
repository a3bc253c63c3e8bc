//! The seam between the search engine and a concrete game.

use smallvec::SmallVec;

/// One of the two players. [`Side::Max`] is the fixed reference player:
/// scores are always signed in its favor.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Side {
    Max,
    Min,
}

impl Side {
    #[inline]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Side::Max => 1.0,
            Side::Min => -1.0,
        }
    }
}

/// Move buffer produced fresh per search node and consumed immediately.
pub type MoveList<M> = SmallVec<[M; 32]>;

/// A two-player, perfect-information game searchable by the engine.
///
/// A position fully determines the legal moves and the evaluation; no
/// hidden state may influence either. `legal_moves` must return the same
/// sequence for the same position every time — the engine's tie-break and
/// pruning behavior depend on generation order being stable.
pub trait Game {
    type Position: Clone;
    type Move: Copy + Eq + std::fmt::Debug;

    /// Exact-win sentinel. Heuristic evaluations must stay strictly
    /// inside `(-WIN_SCORE, WIN_SCORE)` so true wins always dominate.
    const WIN_SCORE: f32 = 100.0;

    fn side_to_move(&self, pos: &Self::Position) -> Side;

    fn legal_moves(&self, pos: &Self::Position) -> MoveList<Self::Move>;

    /// Applies a move to a copy of the position. The input is never
    /// mutated; ancestor search frames keep their snapshots.
    fn apply(&self, pos: &Self::Position, mv: Self::Move) -> Self::Position;

    /// Whether the player who just moved (the opponent of
    /// `side_to_move`) has won.
    fn won_by_last_move(&self, pos: &Self::Position) -> bool;

    /// Whether the position is drawn. Assumes there is no win.
    fn is_draw(&self, pos: &Self::Position) -> bool;

    /// Static score of a non-terminal position, positive when it favors
    /// [`Side::Max`]. Pure: repeated calls return the same value.
    fn evaluate(&self, pos: &Self::Position) -> f32;

    /// Canonical fingerprint over every fact that affects future search:
    /// cell contents, side to move, and auxiliary legality state.
    fn fingerprint(&self, pos: &Self::Position) -> u64;
}

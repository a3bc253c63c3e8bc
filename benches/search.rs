use criterion::{black_box, criterion_group, criterion_main, Criterion};

use grubler::games::connect4::{Connect4, Connect4Position};
use grubler::games::tic_tac_toe::{TicTacToe, TttPosition};
use grubler::{Searcher, Side};

fn tic_tac_toe_full_depth(c: &mut Criterion) {
    c.bench_function("tic-tac-toe solved from the empty board", |b| {
        let game = TicTacToe;
        let pos = black_box(TttPosition::empty(Side::Max));
        b.iter(|| {
            let mut searcher = Searcher::new(&game);
            searcher.find_best_move(&pos, 9).unwrap()
        });
    });
}

fn connect4_opening(c: &mut Criterion) {
    c.bench_function("connect four depth 6 from the empty board", |b| {
        let game = Connect4;
        let pos = black_box(Connect4Position::empty(Side::Max));
        b.iter(|| {
            let mut searcher = Searcher::new(&game);
            searcher.find_best_move(&pos, 6).unwrap()
        });
    });
}

criterion_group!(benches, tic_tac_toe_full_depth, connect4_opening);
criterion_main!(benches);

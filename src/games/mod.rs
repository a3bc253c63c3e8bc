pub mod connect4;
pub mod duck_chess;
pub mod tic_tac_toe;

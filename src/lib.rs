mod board;
mod digits;
mod grid;
mod solver;
mod strategy;

pub use board::{Board, Cell, Unit};
pub use digits::DigitSet;
pub use grid::{Grid, History};
pub use solver::{reduce, Contradiction, Solution, SolveError, Solver};
pub use strategy::{Strategy, STRATEGIES};

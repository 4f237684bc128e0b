use crate::board::{Board, Cell};
use crate::digits::DigitSet;
use crate::grid::{Grid, History};
use itertools::Itertools;
use log::trace;

/// A constraint propagation strategy: one pure reduction pass over a grid.
///
/// Strategies never touch the history themselves; every reduction goes
/// through [`Grid::updated`] so that snapshot bookkeeping stays centralized.
pub trait Strategy: Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, board: &Board, history: &mut History, grid: Grid) -> Grid;
}

/// The strategy registry, in application order. Each reducer pass runs these
/// in sequence, every strategy seeing the previous one's output.
pub static STRATEGIES: [&dyn Strategy; 3] = [&Elimination, &OnlyChoice, &NakedTwins];

/// Removes each solved cell's digit from all of its peers.
pub struct Elimination;

impl Strategy for Elimination {
    fn name(&self) -> &'static str {
        "Elimination"
    }

    fn apply(&self, board: &Board, history: &mut History, mut grid: Grid) -> Grid {
        let solved = Cell::all()
            .filter(|&cell| grid.candidates(cell).len() == 1)
            .collect_vec();
        for cell in solved {
            // Re-read at processing time: a same-digit peer earlier in the
            // pass may have emptied this cell already.
            let Some(digit) = grid.candidates(cell).as_single() else {
                continue;
            };
            for &peer in board.peers_of(cell) {
                let reduced = grid.candidates(peer).without(digit);
                grid = grid.updated(history, peer, reduced);
            }
        }
        grid
    }
}

/// Forces a digit into the only cell of a unit that still admits it.
pub struct OnlyChoice;

impl Strategy for OnlyChoice {
    fn name(&self) -> &'static str {
        "Only Choice"
    }

    fn apply(&self, board: &Board, history: &mut History, mut grid: Grid) -> Grid {
        for unit in board.units() {
            for digit in 1..=9 {
                let places = unit
                    .iter()
                    .filter(|&&cell| grid.candidates(cell).contains(digit))
                    .copied()
                    .collect_vec();
                if let [only] = places.as_slice() {
                    grid = grid.updated(history, *only, DigitSet::single(digit));
                }
            }
        }
        grid
    }
}

/// Finds peer pairs holding the same 2-candidate set and strips those two
/// digits from every other cell of each unit the pair shares.
pub struct NakedTwins;

impl Strategy for NakedTwins {
    fn name(&self) -> &'static str {
        "Naked Twins"
    }

    fn apply(&self, board: &Board, history: &mut History, mut grid: Grid) -> Grid {
        let pair_cells = Cell::all()
            .filter(|&cell| grid.candidates(cell).len() == 2)
            .collect_vec();

        // Unordered pairs of peers with identical candidate sets. The scan
        // borrows the grid, so it finishes before any elimination below.
        let twins = {
            let grid = &grid;
            pair_cells
                .iter()
                .flat_map(move |&twin| {
                    board
                        .peers_of(twin)
                        .iter()
                        .filter(move |&&other| {
                            other < twin && grid.candidates(other) == grid.candidates(twin)
                        })
                        .map(move |&other| (twin, other))
                })
                .collect_vec()
        };

        for (twin_a, twin_b) in twins {
            // Both diagonals, a row and a square can all be shared at once.
            let shared_units = board
                .units_of(twin_a)
                .filter(|unit| unit.contains(&twin_b))
                .copied()
                .collect_vec();
            let twin_digits = grid.candidates(twin_a);
            trace!("naked twins {twin_a}/{twin_b} on {twin_digits} in {} unit(s)", shared_units.len());
            for unit in shared_units {
                for &cell in &unit {
                    if cell == twin_a || cell == twin_b {
                        continue;
                    }
                    for digit in twin_digits.iter() {
                        let reduced = grid.candidates(cell).without(digit);
                        grid = grid.updated(history, cell, reduced);
                    }
                }
            }
        }
        grid
    }
}

use crate::board::{Board, Cell};
use crate::grid::{Grid, History};
use crate::strategy::STRATEGIES;
use itertools::Itertools;
use log::debug;
use std::fmt;

/// Externally visible failure modes of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The input string is not a valid 81-character grid encoding.
    InputFormat(String),
    /// The search tree was exhausted without finding a solution.
    Unsolvable,
    /// The search was aborted after expanding more nodes than the budget
    /// allows.
    BudgetExhausted(usize),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputFormat(reason) => write!(f, "invalid grid input: {reason}"),
            Self::Unsolvable => write!(f, "no solution exists"),
            Self::BudgetExhausted(limit) => {
                write!(f, "search aborted after exceeding the budget of {limit} nodes")
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// A cell ran out of candidates during reduction. Branch-local and expected:
/// the search treats it as a signal to backtrack, never as a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

/// Apply the strategy registry until a fixed point: passes stop once a full
/// round no longer changes the number of solved cells.
///
/// A contradiction (some cell with an empty candidate set) ends the loop
/// immediately, taking precedence over the stall check.
pub fn reduce(board: &Board, history: &mut History, mut grid: Grid) -> Result<Grid, Contradiction> {
    let mut pass = 0;
    loop {
        pass += 1;
        let solved_before = grid.solved_count();
        for strategy in STRATEGIES {
            grid = strategy.apply(board, history, grid);
        }
        if grid.has_empty_cell() {
            debug!("pass {pass}: contradiction");
            return Err(Contradiction);
        }
        let solved_after = grid.solved_count();
        debug!("pass {pass}: {solved_before} -> {solved_after} solved cells");
        if solved_after == solved_before {
            return Ok(grid);
        }
    }
}

/// The cell to branch on: fewest remaining candidates among the undetermined
/// cells, lowest identifier breaking ties.
fn branch_cell(grid: &Grid) -> Cell {
    Cell::all()
        .filter(|&cell| grid.candidates(cell).len() > 1)
        .min_by_key(|&cell| grid.candidates(cell).len())
        .expect("an unsolved grid has an undetermined cell")
}

/// Depth-first search over grids, run on an explicit work stack.
///
/// Every popped grid is reduced first; contradictions prune the branch, a
/// fully determined grid is the answer, anything else branches over the
/// candidates of the most constrained cell. Children are pushed in
/// descending digit order so the stack explores ascending digits first.
///
/// Returns the solved grid together with the number of nodes expanded.
fn search(
    board: &Board,
    history: &mut History,
    start: Grid,
    budget: Option<usize>,
) -> Result<(Grid, usize), SolveError> {
    let mut stack = vec![start];
    let mut nodes = 0;

    while let Some(grid) = stack.pop() {
        nodes += 1;
        if let Some(limit) = budget {
            if nodes > limit {
                return Err(SolveError::BudgetExhausted(limit));
            }
        }
        let grid = match reduce(board, history, grid) {
            Ok(grid) => grid,
            Err(Contradiction) => continue,
        };
        if grid.is_solved() {
            return Ok((grid, nodes));
        }
        let cell = branch_cell(&grid);
        let candidates = grid.candidates(cell);
        debug!("node {nodes}: branching on {cell} over {candidates}");
        for digit in candidates.iter().collect_vec().into_iter().rev() {
            stack.push(grid.assigned(cell, digit));
        }
    }
    Err(SolveError::Unsolvable)
}

/// A fully determined, constraint-satisfying grid plus solve bookkeeping.
#[derive(Debug)]
pub struct Solution {
    grid: Grid,
    history: History,
    nodes: usize,
}

impl Solution {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Every determination made on the way here, dead branches included.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Search nodes expanded, 1 for puzzles cracked by propagation alone.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// The final single-digit assignment of every cell, in identifier order.
    pub fn assignments(&self) -> impl Iterator<Item = (Cell, u8)> + '_ {
        Cell::all().map(|cell| {
            let digit = self
                .grid
                .candidates(cell)
                .as_single()
                .expect("solution grids are fully determined");
            (cell, digit)
        })
    }
}

/// Solver for one board configuration.
///
/// The board topology is computed once at construction; the diagonal flag
/// must therefore be chosen before any grid is parsed or solved.
pub struct Solver {
    board: Board,
    node_budget: Option<usize>,
}

impl Solver {
    pub fn new(diagonal: bool) -> Self {
        Self {
            board: Board::new(diagonal),
            node_budget: None,
        }
    }

    /// Cap the number of search nodes; exceeding it yields
    /// [`SolveError::BudgetExhausted`] instead of running unbounded.
    pub fn with_node_budget(mut self, nodes: usize) -> Self {
        self.node_budget = Some(nodes);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Parse and solve a grid string. Returns a complete solution or an
    /// error; never a partially solved grid.
    pub fn solve(&self, input: &str) -> Result<Solution, SolveError> {
        let grid = Grid::parse(input)?;
        let mut history = History::new();
        let (grid, nodes) = search(&self.board, &mut history, grid, self.node_budget)?;
        Ok(Solution {
            grid,
            history,
            nodes,
        })
    }
}

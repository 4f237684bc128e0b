use crate::board::{Cell, COL_LABELS, ROW_LABELS};
use crate::digits::DigitSet;
use crate::solver::SolveError;
use colored::Colorize;
use itertools::Itertools;
use std::fmt;

/// Placeholder character for an unknown cell in the 81-character encoding.
pub const PLACEHOLDER: char = '.';

/// Candidate grid: every cell mapped to the digits still possible for it.
///
/// `Grid` is a value type. There is no public in-place mutation; reductions
/// go through [`Grid::updated`] and search branches through
/// [`Grid::assigned`], both of which yield a fresh value. Sibling search
/// branches therefore can never observe each other's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [DigitSet; Cell::COUNT],
}

impl Grid {
    /// Parse the 81-character row-major encoding: digits `1`-`9` for known
    /// cells, `.` for unknown ones (which get the full candidate set).
    pub fn parse(input: &str) -> Result<Self, SolveError> {
        let len = input.chars().count();
        if len != Cell::COUNT {
            return Err(SolveError::InputFormat(format!(
                "grid string must be exactly {} characters, got {len}",
                Cell::COUNT
            )));
        }
        let mut cells = [DigitSet::ALL; Cell::COUNT];
        for (i, c) in input.chars().enumerate() {
            cells[i] = match c {
                PLACEHOLDER => DigitSet::ALL,
                '1'..='9' => DigitSet::single(c as u8 - b'0'),
                other => {
                    return Err(SolveError::InputFormat(format!(
                        "invalid character {other:?} at position {i}"
                    )))
                }
            };
        }
        Ok(Self { cells })
    }

    pub fn candidates(&self, cell: Cell) -> DigitSet {
        self.cells[cell.index()]
    }

    /// Number of cells already narrowed to a single digit.
    pub fn solved_count(&self) -> usize {
        self.cells.iter().filter(|set| set.len() == 1).count()
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|set| set.len() == 1)
    }

    /// True when some cell has run out of candidates, i.e. the grid is
    /// contradictory.
    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().any(|set| set.is_empty())
    }

    /// The central update operation: every strategy reduction goes through
    /// here so that history bookkeeping stays in one place.
    ///
    /// When `candidates` equals the cell's current set the grid is returned
    /// untouched and nothing is recorded; otherwise the successor grid is
    /// returned, with a snapshot appended to `history` iff the cell just
    /// became fully determined.
    #[must_use]
    pub fn updated(self, history: &mut History, cell: Cell, candidates: DigitSet) -> Self {
        if self.cells[cell.index()] == candidates {
            return self;
        }
        let mut next = self;
        next.cells[cell.index()] = candidates;
        if candidates.len() == 1 {
            history.record(next.clone());
        }
        next
    }

    /// A copy of this grid with `cell` forced to `digit`. Used by the search
    /// to construct child branches; deliberately bypasses the history (a
    /// guess is not a determination).
    #[must_use]
    pub fn assigned(&self, cell: Cell, digit: u8) -> Self {
        let mut next = self.clone();
        next.cells[cell.index()] = DigitSet::single(digit);
        next
    }

    #[cfg(test)]
    pub(crate) fn set_candidates(&mut self, cell: Cell, candidates: DigitSet) {
        self.cells[cell.index()] = candidates;
    }

    /// 81-character serialization: solved cells as their digit, everything
    /// else as the placeholder.
    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .map(|set| match set.as_single() {
                Some(digit) => (b'0' + digit) as char,
                None => PLACEHOLDER,
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = 1 + self.cells.iter().map(|set| set.len().max(1)).max().unwrap();
        let band = "-".repeat(width * 3);
        let line = format!("  +{band}+{band}+{band}+");
        writeln!(
            f,
            "   {}",
            COL_LABELS
                .iter()
                .map(|c| format!("{c:^width$}"))
                .join("")
        )?;
        for row in 0..9 {
            if row % 3 == 0 {
                writeln!(f, "{line}")?;
            }
            write!(f, "{} |", ROW_LABELS[row])?;
            for col in 0..9 {
                let set = self.candidates(Cell::new(row, col));
                let padded = format!("{:^width$}", set.to_string());
                if set.is_empty() {
                    write!(f, "{}", format!("{:^width$}", "!").on_red())?;
                } else if set.len() == 1 {
                    write!(f, "{padded}")?;
                } else {
                    write!(f, "{}", padded.dimmed())?;
                }
                if col % 3 == 2 {
                    write!(f, "|")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{line}")
    }
}

/// Append-only log of grid snapshots, one per cell determination.
///
/// Owned by the top-level solve and threaded by reference through the
/// reducer and the strategies. Search branching never writes to it, and it
/// is never truncated when a branch is abandoned: it records every
/// determination ever made, including ones on dead branches.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Grid>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, grid: Grid) {
        self.snapshots.push(grid);
    }

    pub fn snapshots(&self) -> &[Grid] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_GRID: &str = ".................................................................................";

    fn cell(id: &str) -> Cell {
        id.parse().unwrap()
    }

    #[test]
    fn parse_gives_unknown_cells_all_candidates() {
        let grid = Grid::parse(EMPTY_GRID).unwrap();
        assert_eq!(grid.candidates(cell("A1")), DigitSet::ALL);
        assert_eq!(grid.solved_count(), 0);
    }

    #[test]
    fn parse_reads_known_cells() {
        let input = format!("53{}", &EMPTY_GRID[2..]);
        let grid = Grid::parse(&input).unwrap();
        assert_eq!(grid.candidates(cell("A1")), DigitSet::single(5));
        assert_eq!(grid.candidates(cell("A2")), DigitSet::single(3));
        assert_eq!(grid.candidates(cell("A3")), DigitSet::ALL);
        assert_eq!(grid.solved_count(), 2);
    }

    #[test]
    fn parse_rejects_wrong_lengths() {
        for len in [0, 80, 82] {
            let input = ".".repeat(len);
            assert!(matches!(
                Grid::parse(&input),
                Err(SolveError::InputFormat(_))
            ));
        }
    }

    #[test]
    fn parse_rejects_foreign_characters() {
        let input = format!("x{}", &EMPTY_GRID[1..]);
        assert!(matches!(
            Grid::parse(&input),
            Err(SolveError::InputFormat(_))
        ));
    }

    #[test]
    fn noop_update_returns_grid_unchanged() {
        let grid = Grid::parse(EMPTY_GRID).unwrap();
        let mut history = History::new();
        let same = grid
            .clone()
            .updated(&mut history, cell("D4"), grid.candidates(cell("D4")));
        assert_eq!(same, grid);
        assert!(history.is_empty());
    }

    #[test]
    fn update_to_singleton_records_snapshot() {
        let grid = Grid::parse(EMPTY_GRID).unwrap();
        let mut history = History::new();
        let next = grid.updated(&mut history, cell("D4"), DigitSet::single(7));
        assert_eq!(next.candidates(cell("D4")), DigitSet::single(7));
        assert_eq!(history.len(), 1);
        assert_eq!(history.snapshots()[0], next);
    }

    #[test]
    fn update_to_wider_set_records_nothing() {
        let grid = Grid::parse(EMPTY_GRID).unwrap();
        let mut history = History::new();
        let next = grid.updated(&mut history, cell("D4"), DigitSet::from_iter([1, 2, 3]));
        assert_eq!(next.candidates(cell("D4")).len(), 3);
        assert!(history.is_empty());
    }

    #[test]
    fn assigned_bypasses_history() {
        let grid = Grid::parse(EMPTY_GRID).unwrap();
        let child = grid.assigned(cell("I9"), 3);
        assert_eq!(child.candidates(cell("I9")), DigitSet::single(3));
        assert_eq!(grid.candidates(cell("I9")), DigitSet::ALL);
    }

    #[test]
    fn to_line_round_trips() {
        let input = "2.............62....1....7...6..8...3...9...7...6..4...4....8....52.............3";
        let grid = Grid::parse(input).unwrap();
        assert_eq!(grid.to_line(), input);
    }
}

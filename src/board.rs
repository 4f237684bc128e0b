use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Row labels, top to bottom.
pub const ROW_LABELS: [char; 9] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'];
/// Column labels, left to right.
pub const COL_LABELS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// One of the 81 boxes of the board, stored as a row-major index.
///
/// Displays as the usual row-letter/column-digit pair (`A1` top-left,
/// `I9` bottom-right). `Ord` follows the index, which coincides with
/// lexicographic order of the identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const COUNT: usize = 81;

    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < 9 && col < 9);
        Self((row * 9 + col) as u8)
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::COUNT);
        Self(index as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn row(self) -> usize {
        self.0 as usize / 9
    }

    pub fn col(self) -> usize {
        self.0 as usize % 9
    }

    /// All 81 cells in row-major (= identifier) order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ROW_LABELS[self.row()], COL_LABELS[self.col()])
    }
}

impl FromStr for Cell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (r, c) = s
            .chars()
            .collect_tuple()
            .ok_or_else(|| format!("Invalid cell id: {s}"))?;
        let row = ROW_LABELS
            .iter()
            .position(|&x| x == r)
            .ok_or_else(|| format!("Invalid row label: {r}"))?;
        let col = COL_LABELS
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| format!("Invalid column label: {c}"))?;
        Ok(Self::new(row, col))
    }
}

/// A group of 9 cells that must contain every digit exactly once.
pub type Unit = [Cell; 9];

/// The fixed topology of the board: units and per-cell unit/peer lookups.
///
/// Computed once per solve configuration and read-only afterwards. With
/// `diagonal` enabled the two main diagonals join the rows, columns and
/// squares as units, which grows the peer sets of the diagonal cells.
pub struct Board {
    units: Vec<Unit>,
    units_of: Vec<Vec<usize>>,
    peers_of: Vec<Vec<Cell>>,
    diagonal: bool,
}

impl Board {
    pub fn new(diagonal: bool) -> Self {
        let mut units: Vec<Unit> = Vec::with_capacity(29);
        for row in 0..9 {
            units.push(collect_unit((0..9).map(|col| Cell::new(row, col))));
        }
        for col in 0..9 {
            units.push(collect_unit((0..9).map(|row| Cell::new(row, col))));
        }
        for (band, stack) in (0..3).cartesian_product(0..3) {
            units.push(collect_unit(
                (0..3)
                    .cartesian_product(0..3)
                    .map(|(i, j)| Cell::new(band * 3 + i, stack * 3 + j)),
            ));
        }
        if diagonal {
            units.push(collect_unit((0..9).map(|i| Cell::new(i, i))));
            units.push(collect_unit((0..9).map(|i| Cell::new(8 - i, i))));
        }

        let units_of = Cell::all()
            .map(|cell| units.iter().positions(|unit| unit.contains(&cell)).collect_vec())
            .collect_vec();

        let peers_of = Cell::all()
            .map(|cell| {
                units_of[cell.index()]
                    .iter()
                    .flat_map(|&u| units[u])
                    .filter(|&peer| peer != cell)
                    .sorted()
                    .dedup()
                    .collect_vec()
            })
            .collect_vec();

        Self {
            units,
            units_of,
            peers_of,
            diagonal,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The units containing `cell`: 3 normally, 4 or 5 on the diagonals.
    pub fn units_of(&self, cell: Cell) -> impl Iterator<Item = &Unit> {
        self.units_of[cell.index()].iter().map(move |&u| &self.units[u])
    }

    /// Every cell sharing a unit with `cell`, excluding `cell` itself.
    /// Sorted by identifier.
    pub fn peers_of(&self, cell: Cell) -> &[Cell] {
        &self.peers_of[cell.index()]
    }

    pub fn is_diagonal(&self) -> bool {
        self.diagonal
    }
}

fn collect_unit(cells: impl Iterator<Item = Cell>) -> Unit {
    cells.collect_vec().try_into().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: &str) -> Cell {
        id.parse().unwrap()
    }

    #[test]
    fn cell_ids_round_trip() {
        assert_eq!(Cell::new(0, 0).to_string(), "A1");
        assert_eq!(Cell::new(8, 8).to_string(), "I9");
        assert_eq!(cell("E5"), Cell::new(4, 4));
        assert_eq!(cell("C7").index(), 2 * 9 + 6);
        assert!("J1".parse::<Cell>().is_err());
        assert!("A0".parse::<Cell>().is_err());
    }

    #[test]
    fn cell_order_matches_identifier_order() {
        let ids = Cell::all().map(|c| c.to_string()).collect_vec();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn classic_board_has_27_units() {
        let board = Board::new(false);
        assert!(!board.is_diagonal());
        assert_eq!(board.units().len(), 27);
        for unit in board.units() {
            assert_eq!(unit.iter().sorted().dedup().count(), 9);
        }
    }

    #[test]
    fn diagonal_board_has_29_units() {
        let board = Board::new(true);
        assert!(board.is_diagonal());
        assert_eq!(board.units().len(), 29);
        let main: Vec<_> = (0..9).map(|i| Cell::new(i, i)).collect();
        let anti: Vec<_> = (0..9).map(|i| Cell::new(8 - i, i)).collect();
        assert!(board.units().iter().any(|u| u.as_slice() == main));
        assert!(board.units().iter().any(|u| u.as_slice() == anti));
    }

    #[test]
    fn units_of_counts() {
        let classic = Board::new(false);
        assert_eq!(classic.units_of(cell("B2")).count(), 3);
        assert_eq!(classic.units_of(cell("E5")).count(), 3);

        let diagonal = Board::new(true);
        assert_eq!(diagonal.units_of(cell("B2")).count(), 3 + 1);
        assert_eq!(diagonal.units_of(cell("A1")).count(), 3 + 1);
        // E5 sits on both diagonals.
        assert_eq!(diagonal.units_of(cell("E5")).count(), 3 + 2);
        assert_eq!(diagonal.units_of(cell("A2")).count(), 3);
    }

    #[test]
    fn peer_counts() {
        let classic = Board::new(false);
        assert_eq!(classic.peers_of(cell("B2")).len(), 20);
        assert_eq!(classic.peers_of(cell("E5")).len(), 20);

        let diagonal = Board::new(true);
        assert_eq!(diagonal.peers_of(cell("B2")).len(), 20 + 6);
        assert_eq!(diagonal.peers_of(cell("A1")).len(), 20 + 6);
        assert_eq!(diagonal.peers_of(cell("E5")).len(), 20 + 12);
        assert_eq!(diagonal.peers_of(cell("A2")).len(), 20);
    }

    #[test]
    fn peers_exclude_self_and_are_symmetric() {
        let board = Board::new(true);
        for c in Cell::all() {
            assert!(!board.peers_of(c).contains(&c));
            for &p in board.peers_of(c) {
                assert!(board.peers_of(p).contains(&c));
            }
        }
    }
}

//! Dense wall/open cell storage shared by the generator, world and renderers.

use crate::{breadth_first, Cell, CellCoord, MazeDimensions};

/// Rectangular matrix of maze cells stored in row-major order.
///
/// Grids are produced whole by the maze generator and replaced whole by the
/// world when a new maze is installed; nothing edits an installed grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: MazeDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell holds `cell`.
    #[must_use]
    pub fn filled(dimensions: MazeDimensions, cell: Cell) -> Self {
        Self {
            dimensions,
            cells: vec![cell; dimensions.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.dimensions.rows()
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.dimensions.columns()
    }

    /// Cell stored at `coord`, or `None` when the coordinate is out of bounds.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        index(self.dimensions, coord).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether `coord` lies in bounds and is open.
    #[must_use]
    pub fn is_open(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(Cell::is_open)
    }

    /// Carves `coord` open. Out-of-bounds coordinates are ignored.
    pub fn open(&mut self, coord: CellCoord) {
        if let Some(slot) = index(self.dimensions, coord).and_then(|index| self.cells.get_mut(index))
        {
            *slot = Cell::Open;
        }
    }

    /// Row-major iterator over every coordinate paired with its cell.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let columns = self.columns();
        (0..self.rows())
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
            .zip(self.cells.iter().copied())
    }

    /// Coordinates of every wall cell in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, cell)| !cell.is_open())
            .map(|(coord, _)| coord)
    }

    /// Coordinates of every open cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_open())
            .map(|(coord, _)| coord)
    }

    /// Breadth-first reachability mask over open cells, seeded at `start`.
    ///
    /// The mask is indexed row-major. When `start` is a wall or out of bounds
    /// nothing is reachable.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord) -> Vec<bool> {
        breadth_first(self.dimensions, start, |cell| self.is_open(cell))
    }

    /// Reports whether a 4-connected path of open cells joins `from` and `to`.
    #[must_use]
    pub fn has_path(&self, from: CellCoord, to: CellCoord) -> bool {
        let reachable = self.reachable_from(from);
        index(self.dimensions, to)
            .and_then(|index| reachable.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether every open cell is reachable from `start`.
    #[must_use]
    pub fn is_connected_from(&self, start: CellCoord) -> bool {
        let reachable = self.reachable_from(start);
        self.cells
            .iter()
            .zip(reachable)
            .all(|(cell, reached)| cell.is_open() == reached)
    }
}

pub(crate) fn index(dimensions: MazeDimensions, cell: CellCoord) -> Option<usize> {
    if !dimensions.contains(cell) {
        return None;
    }

    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let width = usize::try_from(dimensions.columns()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimensions(rows: u32, columns: u32) -> MazeDimensions {
        MazeDimensions::new(rows, columns).expect("valid dimensions")
    }

    #[test]
    fn cell_lookup_rejects_out_of_bounds() {
        let grid = Grid::filled(dimensions(3, 4), Cell::Open);
        assert_eq!(grid.cell(CellCoord::new(3, 2)), Some(Cell::Open));
        assert_eq!(grid.cell(CellCoord::new(4, 0)), None);
        assert_eq!(grid.cell(CellCoord::new(0, 3)), None);
        assert!(!grid.is_open(CellCoord::new(4, 0)));
    }

    #[test]
    fn open_carves_single_cell() {
        let mut grid = Grid::filled(dimensions(3, 3), Cell::Wall);
        grid.open(CellCoord::new(1, 2));
        grid.open(CellCoord::new(7, 7));

        let open: Vec<_> = grid.open_cells().collect();
        assert_eq!(open, vec![CellCoord::new(1, 2)]);
        assert_eq!(grid.wall_cells().count(), 8);
    }

    #[test]
    fn reachability_respects_walls() {
        let mut grid = Grid::filled(dimensions(3, 3), Cell::Wall);
        for coord in [
            CellCoord::new(0, 2),
            CellCoord::new(1, 2),
            CellCoord::new(1, 1),
            CellCoord::new(2, 0),
        ] {
            grid.open(coord);
        }

        assert!(grid.has_path(CellCoord::new(0, 2), CellCoord::new(1, 1)));
        assert!(!grid.has_path(CellCoord::new(0, 2), CellCoord::new(2, 0)));
        assert!(!grid.is_connected_from(CellCoord::new(0, 2)));

        grid.open(CellCoord::new(1, 0));
        assert!(grid.is_connected_from(CellCoord::new(0, 2)));
    }

    #[test]
    fn reachability_from_wall_is_empty() {
        let grid = Grid::filled(dimensions(2, 2), Cell::Wall);
        assert!(grid.reachable_from(CellCoord::new(0, 0)).iter().all(|seen| !seen));
    }
}

//! Placement occupancy grid backing the defender placement rules.

use lane_defence_core::{layout, CommandError, DefenderId, GridCell};

/// Dense occupancy grid covering the placeable portion of the playfield.
///
/// Invariant: a cell holds at most one defender, and a placed defender's
/// cell always indexes back to its own slot.
#[derive(Clone, Debug)]
pub(crate) struct PlacementGrid {
    cells: Vec<Option<DefenderId>>,
}

impl PlacementGrid {
    /// Creates an empty grid sized to the configured playfield.
    pub(crate) fn new() -> Self {
        let capacity = (layout::GRID_ROWS * layout::GRID_COLUMNS) as usize;
        Self {
            cells: vec![None; capacity],
        }
    }

    /// Clears every cell, returning the grid to its initial state.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Validates a placement target, reporting the first rule it violates.
    pub(crate) fn placement_error(&self, cell: GridCell) -> Option<CommandError> {
        let Some(index) = self.index(cell) else {
            return Some(CommandError::InvalidCell);
        };
        if cell.column() >= layout::DANGER_COLUMN {
            return Some(CommandError::InvalidCell);
        }
        if self.cells[index].is_some() {
            return Some(CommandError::CellOccupied);
        }
        None
    }

    /// Records the provided defender as the occupant of the cell.
    pub(crate) fn occupy(&mut self, defender: DefenderId, cell: GridCell) {
        if let Some(index) = self.index(cell) {
            debug_assert!(self.cells[index].is_none(), "cell already occupied");
            self.cells[index] = Some(defender);
        }
    }

    /// Vacates the cell previously held by a destroyed defender.
    pub(crate) fn vacate(&mut self, cell: GridCell) {
        if let Some(index) = self.index(cell) {
            debug_assert!(self.cells[index].is_some(), "vacating an empty cell");
            self.cells[index] = None;
        }
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if cell.row() < layout::GRID_ROWS && cell.column() < layout::GRID_COLUMNS {
            Some((cell.row() * layout::GRID_COLUMNS + cell.column()) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_column_is_never_placeable() {
        let grid = PlacementGrid::new();
        let cell = GridCell::new(0, layout::DANGER_COLUMN);
        assert_eq!(grid.placement_error(cell), Some(CommandError::InvalidCell));
    }

    #[test]
    fn out_of_bounds_cells_are_invalid() {
        let grid = PlacementGrid::new();
        assert_eq!(
            grid.placement_error(GridCell::new(layout::GRID_ROWS, 0)),
            Some(CommandError::InvalidCell)
        );
        assert_eq!(
            grid.placement_error(GridCell::new(0, layout::GRID_COLUMNS)),
            Some(CommandError::InvalidCell)
        );
    }

    #[test]
    fn occupancy_round_trips() {
        let mut grid = PlacementGrid::new();
        let cell = GridCell::new(2, 3);
        assert_eq!(grid.placement_error(cell), None);

        grid.occupy(DefenderId::new(7), cell);
        assert_eq!(grid.placement_error(cell), Some(CommandError::CellOccupied));

        grid.vacate(cell);
        assert_eq!(grid.placement_error(cell), None);
    }
}

use crate::grid::{GridCreationError, RectGrid};
use crate::units::{ColumnsCount, RowsCount};

/// The graph index type bounds how many cells a grid can hold - a `u8`
/// indexed grid keeps every cell handle a single byte but caps out at 255
/// cells. `RectGrid::new` checks the capacity, these aliases just name the
/// tiers.
pub type SmallRectGrid = RectGrid<u8>;
pub type MediumRectGrid = RectGrid<u16>;
pub type LargeRectGrid = RectGrid<u32>;

pub fn small_rect_grid(rows: RowsCount,
                       columns: ColumnsCount)
                       -> Result<SmallRectGrid, GridCreationError> {
    SmallRectGrid::new(rows, columns)
}

pub fn medium_rect_grid(rows: RowsCount,
                        columns: ColumnsCount)
                        -> Result<MediumRectGrid, GridCreationError> {
    MediumRectGrid::new(rows, columns)
}

pub fn large_rect_grid(rows: RowsCount,
                       columns: ColumnsCount)
                       -> Result<LargeRectGrid, GridCreationError> {
    LargeRectGrid::new(rows, columns)
}

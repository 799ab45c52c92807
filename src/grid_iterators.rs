use crate::cells::Cartesian2DCoordinate;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Iterator over every cell coordinate of a rows x columns grid in row major
/// order.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    row_width: ColumnsCount,
}

impl CellIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: rows.0 * columns.0,
            row_width: columns,
        }
    }
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.row_width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iterator over a grid one whole row (or column) of coordinates at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl BatchIter {
    pub(crate) fn over_rows(rows: RowsCount, columns: ColumnsCount) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            rows,
            columns,
        }
    }

    pub(crate) fn over_columns(rows: RowsCount, columns: ColumnsCount) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            rows,
            columns,
        }
    }
}

impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.iter_type {
            BatchIterType::Row => {
                let RowsCount(rows_count) = self.rows;
                if self.current_index < rows_count {
                    let ColumnsCount(row_length) = self.columns;
                    let coords = (0..row_length)
                        .map(|i| {
                            Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(i),
                                                                           RowIndex(self.current_index))
                        })
                        .collect();
                    self.current_index += 1;
                    Some(coords)
                } else {
                    None
                }
            }
            BatchIterType::Column => {
                let ColumnsCount(columns_count) = self.columns;
                if self.current_index < columns_count {
                    let RowsCount(column_length) = self.rows;
                    let coords = (0..column_length)
                        .map(|i| {
                            Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(self.current_index),
                                                                           RowIndex(i))
                        })
                        .collect();
                    self.current_index += 1;
                    Some(coords)
                } else {
                    None
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = match self.iter_type {
            BatchIterType::Row => self.rows.0,
            BatchIterType::Column => self.columns.0,
        };
        let lower_bound = count - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for BatchIter {} // default impl using size_hint()

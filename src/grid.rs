use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::Rng;
use std::fmt;
use std::rc::Rc;
use std::slice;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateOptionSmallVec,
                   CoordinateSmallVec, COMPASS_PRIMARY_DIRECTIONS};
use crate::grid_displays::GridDisplay;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{ColumnsCount, RowsCount};

/// Movement cost paid when stepping into a cell. Every cell starts at one;
/// weighted pathing reads this, generation never does.
pub type CellWeight = u32;

const DEFAULT_CELL_WEIGHT: CellWeight = 1;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridCreationError {
    /// A grid with zero rows or zero columns holds no cells.
    ZeroDimension,
    /// The requested cell count does not fit into the graph index type.
    IndexTypeOverflow,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

/// A rows x columns grid of cells.
///
/// Cells are nodes of an undirected graph and a carved passage between two
/// cells is an edge, so link symmetry holds by construction and there is no
/// ownership cycle between neighbouring cells - algorithms pass around plain
/// `Cartesian2DCoordinate` handles and the grid owns everything. Neighbour
/// relations are fixed by the dimensions for the lifetime of the grid; only
/// link state and cell weights change after construction.
pub struct RectGrid<GridIndexType: IndexType> {
    graph: Graph<CellWeight, (), Undirected, GridIndexType>,
    rows: RowsCount,
    columns: ColumnsCount,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl<GridIndexType: IndexType> fmt::Debug for RectGrid<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "RectGrid :: rows: {:?}, columns: {:?}, graph: {:?}",
               self.rows,
               self.columns,
               self.graph)
    }
}

impl<GridIndexType: IndexType> RectGrid<GridIndexType> {
    pub fn new(rows: RowsCount,
               columns: ColumnsCount)
               -> Result<RectGrid<GridIndexType>, GridCreationError> {

        let RowsCount(rows_count) = rows;
        let ColumnsCount(columns_count) = columns;
        if rows_count == 0 || columns_count == 0 {
            return Err(GridCreationError::ZeroDimension);
        }

        let cells_count = rows_count * columns_count;
        if cells_count > <GridIndexType as IndexType>::max().index() {
            return Err(GridCreationError::IndexTypeOverflow);
        }

        // Twice the spanning tree edge count covers even a fully braided maze.
        let edges_count_hint = 2 * cells_count;
        let mut grid = RectGrid {
            graph: Graph::with_capacity(cells_count, edges_count_hint),
            rows,
            columns,
            grid_display: None,
        };
        for _ in 0..cells_count {
            let _ = grid.graph.add_node(DEFAULT_CELL_WEIGHT);
        }

        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Total links carved into the grid so far.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0, self.size());
        Cartesian2DCoordinate::from_row_major_index(index, self.columns)
    }

    /// Link two cells, bidirectionally.
    ///
    /// The link is an undirected graph edge, so `is_linked(a, b)` and
    /// `is_linked(b, a)` cannot disagree. Re-linking already linked cells is
    /// a no-op.
    pub fn link(&mut self,
                a: Cartesian2DCoordinate,
                b: Cartesian2DCoordinate)
                -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        match (a_index_opt, b_index_opt) {
            (Some(a_index), Some(b_index)) => {
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Unlink two cells, if the coordinates are valid and a link exists
    /// between them. Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);

        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // This invalidates the last edge index in the graph, which is
                // fine as we are not storing edge indices anywhere.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }

        false
    }

    /// Cells linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord).map(|node_index| {
            self.graph
                .neighbors(node_index)
                .map(|linked_node| {
                    Cartesian2DCoordinate::from_row_major_index(linked_node.index(), self.columns)
                })
                .collect()
        })
    }

    /// How many passages run into/out of a cell. Zero for invalid coordinates.
    pub fn cell_links_count(&self, coord: Cartesian2DCoordinate) -> usize {
        self.grid_coordinate_graph_index(coord)
            .map_or(0, |node_index| self.graph.neighbors(node_index).count())
    }

    /// Cells to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage. The order is fixed (N, S, E, W with
    /// off-grid directions dropped) so callers that shuffle or sample get
    /// reproducible behaviour from a seeded rng.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        COMPASS_PRIMARY_DIRECTIONS
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Cartesian2DCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|&direction| self.neighbour_at_direction(coord, direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        coord.offset(direction).and_then(|neighbour_coord| {
            if self.is_valid_coordinate(neighbour_coord) {
                Some(neighbour_coord)
            } else {
                None
            }
        })
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false,
                    |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// The cost of stepping into a cell. None for invalid coordinates.
    pub fn weight(&self, coord: Cartesian2DCoordinate) -> Option<CellWeight> {
        self.grid_coordinate_graph_index(coord)
            .and_then(|node_index| self.graph.node_weight(node_index))
            .cloned()
    }

    /// Set the cost of stepping into a cell. Returns true if the coordinate
    /// was valid and the weight updated.
    pub fn set_weight(&mut self, coord: Cartesian2DCoordinate, weight: CellWeight) -> bool {
        if let Some(node_index) = self.grid_coordinate_graph_index(coord) {
            if let Some(w) = self.graph.node_weight_mut(node_index) {
                *w = weight;
                return true;
            }
        }
        false
    }

    /// Convert a grid coordinate to a one dimensional index in the range
    /// 0..grid.size(). Returns None if the coordinate is out of the grid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some((coord.y as usize * self.columns.0) + coord.x as usize)
        } else {
            None
        }
    }

    /// Is the coordinate within the grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.columns.0 && (coord.y as usize) < self.rows.0
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::over_rows(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::over_columns(self.rows, self.columns)
    }

    pub fn iter_links(&self) -> LinksIter<GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            columns: self.columns,
        }
    }

    /// All cells with exactly one link.
    ///
    /// Only meaningful once generation has finished: a cell with zero links
    /// mid generation is unvisited, not a dead end.
    pub fn dead_ends(&self) -> Vec<Cartesian2DCoordinate> {
        self.iter()
            .filter(|&coord| self.cell_links_count(coord) == 1)
            .collect()
    }

    /// Remove dead ends by linking them to a neighbouring cell, adding loops
    /// to the maze.
    ///
    /// Dead ends are visited in a shuffled order and each is braided with
    /// probability `braid_probability`, preferring an unlinked neighbour that
    /// is itself a dead end and falling back to any unlinked neighbour. A
    /// braid earlier in the pass can repair a later cell, so each cell's link
    /// count is re-checked when its turn comes.
    pub fn braid<R: Rng>(&mut self, rng: &mut R, braid_probability: f64) {
        let mut dead_end_coords = self.dead_ends();
        tracing::debug!("braiding up to {} dead ends with probability {}",
                        dead_end_coords.len(),
                        braid_probability);
        rng.shuffle(&mut dead_end_coords);

        for coord in dead_end_coords {
            if self.cell_links_count(coord) != 1 {
                continue;
            }
            if rng.gen::<f64>() > braid_probability {
                continue;
            }

            let unlinked_neighbours: CoordinateSmallVec = self.neighbours(coord)
                .iter()
                .cloned()
                .filter(|&neighbour| !self.is_linked(coord, neighbour))
                .collect();
            if unlinked_neighbours.is_empty() {
                // Every neighbour already connects to this cell (tiny grids).
                continue;
            }

            let dead_end_neighbours: CoordinateSmallVec = unlinked_neighbours.iter()
                .cloned()
                .filter(|&neighbour| self.cell_links_count(neighbour) == 1)
                .collect();
            let candidates: &[Cartesian2DCoordinate] = if dead_end_neighbours.is_empty() {
                &unlinked_neighbours
            } else {
                &dead_end_neighbours
            };

            if let Some(&neighbour) = rng.choose(candidates) {
                self.link(coord, neighbour)
                    .expect("dead end neighbours are always linkable");
            }
        }
    }

    /// Convert a grid coordinate into a petgraph node index.
    /// Returns None if the coordinate is out of the grid's dimensions.
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: Cartesian2DCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord).map(graph::NodeIndex::<GridIndexType>::new)
    }
}

/// Iterator over every linked cell pair of a grid.
pub struct LinksIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    columns: ColumnsCount,
}

impl<'a, GridIndexType: IndexType> Iterator for LinksIter<'a, GridIndexType> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.source().index(),
                                                                             self.columns);
            let dst_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.target().index(),
                                                                             self.columns);
            (src_cell_coord, dst_cell_coord)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for LinksIter<'a, GridIndexType> {} // default impl using size_hint()

impl<'a, GridIndexType: IndexType> fmt::Debug for LinksIter<'a, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: edges iter: {:?}", self.graph_edge_iter)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools; // a trait
    use rand::{SeedableRng, XorShiftRng};
    use smallvec::SmallVec;
    use std::u32;

    use super::*;
    use crate::grids::{small_rect_grid, SmallRectGrid};
    use crate::units::{ColumnsCount, RowsCount};

    fn small_grid(rows: usize, columns: usize) -> SmallRectGrid {
        small_rect_grid(RowsCount(rows), ColumnsCount(columns))
            .expect("grid dimensions too large for a small grid")
    }

    fn test_rng() -> XorShiftRng {
        XorShiftRng::from_seed([0x0139_8ba4, 0x92b0_01aa, 0x7767_2b09, 0x1b0b_bd4a])
    }

    // Compare a smallvec to e.g. a vec! or &[T].
    // SmallVec really ruins the syntax ergonomics, hence this macro.
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    #[test]
    fn cannot_create_grid_with_zero_dimension() {
        assert_eq!(RectGrid::<u8>::new(RowsCount(0), ColumnsCount(3)).err(),
                   Some(GridCreationError::ZeroDimension));
        assert_eq!(RectGrid::<u8>::new(RowsCount(3), ColumnsCount(0)).err(),
                   Some(GridCreationError::ZeroDimension));
    }

    #[test]
    fn cannot_create_grid_exceeding_index_type() {
        assert_eq!(RectGrid::<u8>::new(RowsCount(16), ColumnsCount(16)).err(),
                   Some(GridCreationError::IndexTypeOverflow));
        assert!(RectGrid::<u16>::new(RowsCount(16), ColumnsCount(16)).is_ok());
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let actual_neighbours: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted();
            let expected_neighbours: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted();
            assert_eq!(actual_neighbours, expected_neighbours);
        };
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(0, 8), &[gc(1, 8), gc(0, 7), gc(0, 9)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // somewhere with all four neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        let check_neighbours =
            |coord, dirs: &[CompassPrimary], neighbour_opts: &[Option<Cartesian2DCoordinate>]| {
                let neighbour_options = g.neighbours_at_directions(coord, dirs);
                assert_eq!(&*neighbour_options, neighbour_opts);
            };
        check_neighbours(gc(0, 0), &[], &[]);
        check_neighbours(gc(0, 0), &[CompassPrimary::North], &[None]);
        check_neighbours(gc(0, 0), &[CompassPrimary::West], &[None]);
        check_neighbours(gc(0, 0),
                         &[CompassPrimary::West, CompassPrimary::North],
                         &[None, None]);
        check_neighbours(gc(0, 0),
                         &[CompassPrimary::East, CompassPrimary::South],
                         &[Some(gc(1, 0)), Some(gc(0, 1))]);

        check_neighbours(gc(1, 1), &[], &[]);
        check_neighbours(gc(1, 1), &[CompassPrimary::South], &[None]);
        check_neighbours(gc(1, 1), &[CompassPrimary::East], &[None]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::South, CompassPrimary::East],
                         &[None, None]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::West, CompassPrimary::North],
                         &[Some(gc(0, 1)), Some(gc(1, 0))]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, None);
        check_neighbour(gc(0, 0), CompassPrimary::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(1, 1), CompassPrimary::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::South, None);
        check_neighbour(gc(1, 1), CompassPrimary::East, None);
        check_neighbour(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 10);
        assert_eq!(g.size(), 100);

        let rect = small_grid(3, 7);
        assert_eq!(rect.size(), 21);
        assert_eq!(rect.rows(), RowsCount(3));
        assert_eq!(rect.columns(), ColumnsCount(7));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> =
            coords.iter().map(|coord| g.grid_coordinate_to_index(*coord)).collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 4);
        let mut rng = test_rng();
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(3, 2);
        assert_eq!(g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[Cartesian2DCoordinate::new(0, 0),
                     Cartesian2DCoordinate::new(1, 0),
                     Cartesian2DCoordinate::new(0, 1),
                     Cartesian2DCoordinate::new(1, 1),
                     Cartesian2DCoordinate::new(0, 2),
                     Cartesian2DCoordinate::new(1, 2)]);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_row().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
                   &[&[Cartesian2DCoordinate::new(0, 0),
                       Cartesian2DCoordinate::new(1, 0),
                       Cartesian2DCoordinate::new(2, 0)],
                     &[Cartesian2DCoordinate::new(0, 1),
                       Cartesian2DCoordinate::new(1, 1),
                       Cartesian2DCoordinate::new(2, 1)]]);
    }

    #[test]
    fn column_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_column().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
                   &[&[Cartesian2DCoordinate::new(0, 0), Cartesian2DCoordinate::new(0, 1)],
                     &[Cartesian2DCoordinate::new(1, 0), Cartesian2DCoordinate::new(1, 1)],
                     &[Cartesian2DCoordinate::new(2, 0), Cartesian2DCoordinate::new(2, 1)]]);
    }

    #[test]
    fn linking_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 1);
        let b = Cartesian2DCoordinate::new(0, 2);
        let c = Cartesian2DCoordinate::new(0, 3);

        // Testing the expected grid `links`
        let sorted_links = |grid: &SmallRectGrid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord).expect("coordinate is invalid").iter().cloned().sorted()
        };
        macro_rules! links_sorted {
            ($x:expr) => (sorted_links(&g, $x))
        }

        // Testing that the order of the arguments to `is_linked` does not matter
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => (g.is_linked($x, $y) && g.is_linked($y, $x))
        }

        // Testing `is_neighbour_linked` for all directions
        let directional_links_check = |grid: &SmallRectGrid,
                                       coord: Cartesian2DCoordinate,
                                       expected_dirs_linked: &[CompassPrimary]| {
            let expected_complement: SmallVec<[CompassPrimary; 4]> =
                COMPASS_PRIMARY_DIRECTIONS.iter()
                    .cloned()
                    .filter(|dir: &CompassPrimary| !expected_dirs_linked.contains(dir))
                    .collect();
            for exp_dir in expected_dirs_linked {
                assert!(grid.is_neighbour_linked(coord, *exp_dir));
            }
            for not_exp_dir in expected_complement.iter() {
                assert!(!grid.is_neighbour_linked(coord, *not_exp_dir));
            }
        };
        macro_rules! check_directional_links {
            ($coord:expr, $expected:expr) => (directional_links_check(&g, $coord, &$expected))
        }

        // a, b and c start with no links
        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(a, c));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);
        assert_eq!(links_sorted!(c), vec![]);
        check_directional_links!(a, []);
        check_directional_links!(b, []);
        check_directional_links!(c, []);

        g.link(a, b).expect("link failed");
        // a - b linked bi-directionally
        assert!(bi_check_linked!(a, b));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a]);
        check_directional_links!(a, [CompassPrimary::South]);
        check_directional_links!(b, [CompassPrimary::North]);
        check_directional_links!(c, []);

        g.link(b, c).expect("link failed");
        // a - b still linked bi-directionally after linking b - c
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a, c]);
        assert_eq!(links_sorted!(c), vec![b]);
        check_directional_links!(a, [CompassPrimary::South]);
        check_directional_links!(b, [CompassPrimary::North, CompassPrimary::South]);
        check_directional_links!(c, [CompassPrimary::North]);

        // a - b unlinked, b still linked to c bi-directionally
        let is_ab_unlinked = g.unlink(a, b);
        assert!(is_ab_unlinked);
        assert!(!bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![c]);
        assert_eq!(links_sorted!(c), vec![b]);
        check_directional_links!(a, []);
        check_directional_links!(b, [CompassPrimary::South]);
        check_directional_links!(c, [CompassPrimary::North]);

        // a, b and c all unlinked again
        let is_bc_unlinked = g.unlink(b, c);
        assert!(is_bc_unlinked);
        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(a, c));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);
        assert_eq!(links_sorted!(c), vec![]);
        check_directional_links!(a, []);
        check_directional_links!(b, []);
        check_directional_links!(c, []);
    }

    #[test]
    fn link_unlink_round_trip_preserves_links_count() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(1, 1);
        let b = Cartesian2DCoordinate::new(1, 2);
        let links_count_before = g.links_count();

        g.link(a, b).expect("link failed");
        g.unlink(a, b);
        assert_eq!(g.links_count(), links_count_before);
    }

    #[test]
    fn unlinking_unlinked_cells_is_a_noop() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(0, 1);
        assert!(!g.unlink(a, b));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn no_self_linked_cycles() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let link_result = g.link(a, a);
        assert_eq!(link_result, Err(CellLinkError::SelfLink));
    }

    #[test]
    fn no_links_to_invalid_coordinates() {
        let mut g = small_grid(4, 4);
        let good_coord = Cartesian2DCoordinate::new(0, 0);
        let invalid_coord = Cartesian2DCoordinate::new(100, 100);
        let link_result = g.link(good_coord, invalid_coord);
        assert_eq!(link_result, Err(CellLinkError::InvalidGridCoordinate));
    }

    #[test]
    fn no_parallel_duplicated_linked_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(0, 1);
        g.link(a, b).expect("link failed");
        g.link(a, b).expect("link failed");
        assert_smallvec_eq!(g.links(a).unwrap(), &[b]);
        assert_smallvec_eq!(g.links(b).unwrap(), &[a]);
        assert_eq!(g.links_count(), 1);

        g.unlink(a, b);
        assert_smallvec_eq!(g.links(a).unwrap(), &[]);
        assert_smallvec_eq!(g.links(b).unwrap(), &[]);
    }

    #[test]
    fn default_and_updated_cell_weights() {
        let mut g = small_grid(3, 3);
        let coord = Cartesian2DCoordinate::new(1, 1);
        assert_eq!(g.weight(coord), Some(1));

        assert!(g.set_weight(coord, 42));
        assert_eq!(g.weight(coord), Some(42));

        let invalid = Cartesian2DCoordinate::new(10, 10);
        assert_eq!(g.weight(invalid), None);
        assert!(!g.set_weight(invalid, 3));
    }

    #[test]
    fn iter_links_sees_every_passage() {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(0, 0), gc(0, 1)).expect("link failed");

        let links: Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)> = g.iter_links().collect();
        assert_eq!(links.len(), 2);
        assert!(links.contains(&(gc(0, 0), gc(1, 0))) || links.contains(&(gc(1, 0), gc(0, 0))));
        assert!(links.contains(&(gc(0, 0), gc(0, 1))) || links.contains(&(gc(0, 1), gc(0, 0))));
    }

    #[test]
    fn dead_ends_are_cells_with_one_link() {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        // Corridor (0,0) - (1,0) - (1,1) - (0,1)
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        g.link(gc(1, 1), gc(0, 1)).expect("link failed");

        let dead_ends = g.dead_ends().iter().cloned().sorted();
        assert_eq!(dead_ends, vec![gc(0, 0), gc(0, 1)]);
    }

    #[test]
    fn full_braid_removes_all_eligible_dead_ends() {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        g.link(gc(1, 1), gc(0, 1)).expect("link failed");

        let mut rng = test_rng();
        g.braid(&mut rng, 1.0);

        // The two corridor end cells are dead ends and also neighbours of one
        // another, so a full braid links them and nothing else.
        assert_eq!(g.links_count(), 4);
        assert!(g.dead_ends().is_empty());
        assert!(g.is_linked(gc(0, 0), gc(0, 1)));
    }

    #[test]
    fn zero_probability_braid_changes_nothing() {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        g.link(gc(1, 1), gc(0, 1)).expect("link failed");

        let mut rng = test_rng();
        g.braid(&mut rng, 0.0);
        assert_eq!(g.links_count(), 3);
        assert_eq!(g.dead_ends().len(), 2);
    }

    #[test]
    fn braid_skips_dead_ends_with_no_unlinked_neighbour() {
        // On a 1x2 grid each cell's only neighbour is already linked, so a
        // full braid cannot remove either dead end.
        let mut g = small_grid(1, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");

        let mut rng = test_rng();
        g.braid(&mut rng, 1.0);
        assert_eq!(g.links_count(), 1);
        assert_eq!(g.dead_ends().len(), 2);
    }
}

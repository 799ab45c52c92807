//! Distance analysis and route finding over a maze's link graph.
//!
//! `Distances` floods a grid from one root cell, accumulating the weight of
//! every cell stepped into. On a freshly generated spanning tree that is a
//! single pass; braided links just mean a few relaxations before the map
//! settles. A `Distances` object is a snapshot of the grid's link state at
//! the time it was built - changing links afterwards silently stales it, and
//! re-running `for_grid` is the caller's job.

use std::fmt::{Debug, Display, LowerHex};
use std::ops::Add;

use itertools::Itertools;
use num::traits::{Bounded, NumCast, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::{IndexType, RectGrid};
use crate::utils;
use crate::utils::FnvHashMap;

// Trait (hack) used purely as a generic type parameter alias because it looks
// ugly to type this out each time. Note generic parameter type aliases are
// not in the language - `type X = Y;` only works with concrete types.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + Add + NumCast + Debug + Clone + Copy + Display + LowerHex + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + Add + NumCast + Debug + Clone + Copy + Display + LowerHex + Ord> MaxDistance for T {}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PathError {
    /// A start or goal coordinate outside the grid.
    InvalidCoordinate,
    /// No sequence of links leads from the start to the goal.
    UnreachableGoal,
}

/// The accumulated cost of walking from one root cell to every cell reachable
/// from it.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Flood the grid's links from `start_coordinate`, paying each cell's
    /// weight on entry. Returns None when the start coordinate is not on the
    /// grid.
    ///
    /// The pending cell with the largest distance so far is expanded first.
    /// On a tree any expansion order converges to the same map; braided
    /// links can lower an already recorded distance, in which case the cell
    /// is simply re-queued until nothing improves.
    pub fn for_grid<GridIndexType>(grid: &RectGrid<GridIndexType>,
                                   start_coordinate: Cartesian2DCoordinate)
                                   -> Option<Distances<MaxDistanceT>>
        where GridIndexType: IndexType
    {
        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let cells_count = grid.size();
        let mut distances = utils::fnv_hashmap(cells_count);
        distances.insert(start_coordinate, MaxDistanceT::zero());

        let mut pending = vec![start_coordinate];
        while !pending.is_empty() {

            let mut next_index = 0;
            for i in 1..pending.len() {
                if distances[&pending[i]] > distances[&pending[next_index]] {
                    next_index = i;
                }
            }
            let cell_coord = pending.remove(next_index);
            let distance_to_cell = distances[&cell_coord];

            let links: CoordinateSmallVec =
                grid.links(cell_coord).expect("pending coordinates are always on the grid");
            for &link_coordinate in links.iter() {

                let step_cost: MaxDistanceT =
                    NumCast::from(grid.weight(link_coordinate)
                            .expect("linked coordinates are always on the grid"))
                        .expect("cell weight is not representable in the distance type");
                let distance_through_cell = distance_to_cell + step_cost;

                let improved = match distances.get(&link_coordinate) {
                    Some(&existing_distance) => distance_through_cell < existing_distance,
                    None => true,
                };
                if improved {
                    distances.insert(link_coordinate, distance_through_cell);
                    pending.push(link_coordinate);
                }
            }
        }

        let max_distance = distances.values()
            .cloned()
            .fold(MaxDistanceT::zero(),
                  |max, d| if d > max { d } else { max });
        tracing::debug!("distances settled over {} cells, max distance {}",
                        distances.len(),
                        max_distance);

        Some(Distances {
            start_coordinate,
            distances,
            max_distance,
        })
    }

    #[inline]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// The distance recorded for a cell. None for cells unreachable from the
    /// root and for coordinates off the grid.
    #[inline]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let mut furthest = SmallVec::<[Cartesian2DCoordinate; 8]>::new();
        let furthest_distance = self.max();

        for (coord, distance) in self.distances.iter() {
            if *distance == furthest_distance {
                furthest.push(*coord);
            }
        }
        furthest
    }
}

/// The shortest route from the distances' start to `end_point`, as a vector
/// of coordinates ordered start to end.
///
/// Walks backwards from the end, always stepping to a linked neighbour
/// strictly closer to the start. Returns None when the end point was never
/// reached by the distance flood or when no strictly closer neighbour exists
/// (stale or broken distance data) - the walk can never loop.
pub fn shortest_path<GridIndexType, MaxDistanceT>(grid: &RectGrid<GridIndexType>,
                                                  distances_from_start: &Distances<MaxDistanceT>,
                                                  end_point: Cartesian2DCoordinate)
                                                  -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance
{
    if distances_from_start.distance_from_start_to(end_point).is_none() {
        // The end point is not reachable from the start.
        return None;
    }

    let start = distances_from_start.start();
    let mut current_coord = end_point;
    let mut path = vec![end_point];

    while current_coord != start {

        let current_distance_to_start = distances_from_start.distance_from_start_to(current_coord)
            .expect("every path cell has a distance");

        let linked_cells: CoordinateSmallVec =
            grid.links(current_coord).expect("path coordinates are always on the grid");
        let neighbour_distances = linked_cells.iter()
            .filter_map(|&coord| {
                distances_from_start.distance_from_start_to(coord)
                    .map(|distance| (coord, distance))
            })
            .collect::<SmallVec<[(Cartesian2DCoordinate, MaxDistanceT); 8]>>();
        let closest_to_start = neighbour_distances.iter()
            .cloned()
            .fold1(|closest_accumulator, closest_candidate| {
                if closest_candidate.1 < closest_accumulator.1 {
                    closest_candidate
                } else {
                    closest_accumulator
                }
            });

        match closest_to_start {
            Some((closer_coord, closer_distance))
                if closer_distance < current_distance_to_start => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            _ => {
                // No linked neighbour makes progress towards the start.
                return None;
            }
        }
    }

    path.reverse();
    Some(path)
}

/// The shortest route between two cells, flooding distances from the start
/// first. The returned path begins at `start` and ends at `goal`; each cell's
/// cost is recoverable from a `Distances` built at `start`.
pub fn shortest_path_to_goal<GridIndexType, MaxDistanceT>
    (grid: &RectGrid<GridIndexType>,
     start: Cartesian2DCoordinate,
     goal: Cartesian2DCoordinate)
     -> Result<Vec<Cartesian2DCoordinate>, PathError>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance
{
    if !grid.is_valid_coordinate(goal) {
        return Err(PathError::InvalidCoordinate);
    }
    let distances: Distances<MaxDistanceT> =
        Distances::for_grid(grid, start).ok_or(PathError::InvalidCoordinate)?;
    shortest_path(grid, &distances, goal).ok_or(PathError::UnreachableGoal)
}

/// The longest shortest-path in the maze.
///
/// Only exact on a perfect maze: flood from an arbitrary corner, re-flood
/// from the furthest cell found, then path to the furthest cell of the second
/// flood. On a braided maze this is an approximation.
pub fn dijkstra_longest_path<GridIndexType, MaxDistanceT>(grid: &RectGrid<GridIndexType>)
                                                          -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance
{
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances: Distances<MaxDistanceT> = Distances::for_grid(grid,
                                                                       arbitrary_start_point)?;

    // The start of the longest path is the point furthest away from an
    // arbitrary initial point.
    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start: Distances<MaxDistanceT> =
        Distances::for_grid(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}

//! Maze generation algorithms.
//!
//! Every generator carves a spanning tree into an unlinked grid: afterwards
//! each cell is reachable from every other and the link count is exactly
//! `grid.size() - 1`. The algorithms differ only in how they pick the cells
//! to visit, which gives each its own texture of corridors and dead ends.
//!
//! Randomness is injected: each generator takes `&mut R where R: Rng`, so a
//! seeded rng reproduces a maze exactly and tests can substitute a fixed
//! sequence.

use rand::Rng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec};
use crate::grid::{IndexType, RectGrid};

/// Apply the binary tree maze generation algorithm to the grid.
///
/// Visit every cell in row major order and carve a passage to its south or
/// east neighbour, picked uniformly from whichever of the two exist. The
/// south east corner cell has neither and is skipped - by then both of its
/// walls have already been opened from the other side. Produces long
/// corridors along the southern and eastern edges.
pub fn binary_tree<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    const CARVE_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::South, CompassPrimary::East];

    for cell_coord in grid.iter() {

        let candidates: CoordinateSmallVec = grid.neighbours_at_directions(cell_coord,
                                                                           &CARVE_DIRECTIONS)
            .iter()
            .filter_map(|coord_maybe| *coord_maybe)
            .collect();

        if let Some(&link_coord) = rng.choose(&*candidates) {
            grid.link(cell_coord, link_coord)
                .expect("south/east neighbours are always linkable");
        }
    }
}

/// Apply the sidewinder maze generation algorithm to the grid.
///
/// Work through each row west to east, accumulating the cells seen so far
/// into a "run". At each cell either extend the run by carving east, or close
/// it out: pick one cell of the run uniformly and carve north from it, then
/// start a fresh run. A run must close at the eastern boundary and may close
/// on a coin flip anywhere a north neighbour exists, so the top row becomes a
/// single east-west corridor.
pub fn sidewinder<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    for row in grid.iter_row() {
        let mut run: Vec<Cartesian2DCoordinate> = Vec::new();

        for cell_coord in row {
            run.push(cell_coord);

            let east_neighbour = grid.neighbour_at_direction(cell_coord, CompassPrimary::East);
            let has_north_neighbour =
                grid.neighbour_at_direction(cell_coord, CompassPrimary::North).is_some();
            let should_close_out = east_neighbour.is_none() ||
                                   (has_north_neighbour && rng.gen::<bool>());

            if should_close_out {
                let run_member = *rng.choose(&run).expect("a run is never empty when closing out");
                if let Some(north_coord) =
                    grid.neighbour_at_direction(run_member, CompassPrimary::North) {
                    grid.link(run_member, north_coord)
                        .expect("north neighbours are always linkable");
                }
                run.clear();
            } else {
                let east_coord = east_neighbour
                    .expect("a run only continues while an east neighbour exists");
                grid.link(cell_coord, east_coord).expect("east neighbours are always linkable");
            }
        }
    }
}

/// Apply the Aldous-Broder maze generation algorithm to the grid.
///
/// A plain random walk: from the current cell step to a uniformly random
/// neighbour, linking into any neighbour that has never been visited (zero
/// links). Every spanning tree is equally likely, which no simple biased
/// algorithm gives, but the walk must blunder into the last few unvisited
/// cells so runtimes have a long tail.
pub fn aldous_broder<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    let mut current = grid.random_cell(rng);
    let mut unvisited_count = grid.size() - 1;

    while unvisited_count > 0 {
        let neighbours = grid.neighbours(current);
        let neighbour = *rng.choose(&*neighbours)
            .expect("cells on a multi cell grid always have a neighbour");

        if grid.cell_links_count(neighbour) == 0 {
            grid.link(current, neighbour).expect("neighbours are always linkable");
            unvisited_count -= 1;
        }
        current = neighbour;
    }
}

/// Apply the hunt and kill maze generation algorithm to the grid.
///
/// Random walk over unvisited cells only. When the walk corners itself, hunt:
/// scan the grid in row major order for the first unvisited cell that touches
/// the maze built so far, link it to a random visited neighbour and resume
/// walking from there. Finishes when the hunt comes up empty. Slower than the
/// backtracker because of the rescans, but needs no stack and leaves fewer
/// dead ends than Aldous-Broder.
pub fn hunt_and_kill<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    let mut current = Some(grid.random_cell(rng));

    while let Some(current_coord) = current {

        let unvisited_neighbours: CoordinateSmallVec = grid.neighbours(current_coord)
            .iter()
            .cloned()
            .filter(|&neighbour| grid.cell_links_count(neighbour) == 0)
            .collect();

        if let Some(&next_coord) = rng.choose(&*unvisited_neighbours) {
            // Walk phase.
            grid.link(current_coord, next_coord).expect("neighbours are always linkable");
            current = Some(next_coord);
        } else {
            // Hunt phase.
            current = None;
            for cell_coord in grid.iter() {
                if grid.cell_links_count(cell_coord) != 0 {
                    continue;
                }
                let visited_neighbours: CoordinateSmallVec = grid.neighbours(cell_coord)
                    .iter()
                    .cloned()
                    .filter(|&neighbour| grid.cell_links_count(neighbour) > 0)
                    .collect();
                if let Some(&visited_coord) = rng.choose(&*visited_neighbours) {
                    tracing::debug!("hunt restarting the walk at ({}, {})",
                                    cell_coord.x,
                                    cell_coord.y);
                    grid.link(cell_coord, visited_coord).expect("neighbours are always linkable");
                    current = Some(cell_coord);
                    break;
                }
            }
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to the grid.
///
/// Depth first carving with an explicit stack of the current corridor (a real
/// call stack would overflow on large grids). Peek the top cell; link to a
/// random unvisited neighbour and push it, or pop to backtrack when the
/// corridor is walled in. The classic long-winding-passages maze.
pub fn recursive_backtracker<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    let mut stack = vec![grid.random_cell(rng)];

    while let Some(&current_coord) = stack.last() {

        let unvisited_neighbours: CoordinateSmallVec = grid.neighbours(current_coord)
            .iter()
            .cloned()
            .filter(|&neighbour| grid.cell_links_count(neighbour) == 0)
            .collect();

        if let Some(&next_coord) = rng.choose(&*unvisited_neighbours) {
            grid.link(current_coord, next_coord).expect("neighbours are always linkable");
            stack.push(next_coord);
        } else {
            stack.pop();
        }
    }
}

/// Apply Wilson's maze generation algorithm to the grid.
///
/// Loop erased random walks. One cell seeds the maze, then repeatedly: start
/// a random walk from a random unvisited cell, recording the path. Whenever
/// the walk re-enters its own path the loop just formed is erased by cutting
/// the path back to the re-entered cell, so a committed path never contains a
/// cycle. When the walk touches the maze, link the whole path in and mark its
/// cells visited. Uniformly random over all spanning trees like
/// Aldous-Broder, but usually faster as finished territory is never re-walked.
pub fn wilson<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    let mut unvisited: Vec<Cartesian2DCoordinate> = grid.iter().collect();

    // Seed the maze with one arbitrary visited cell.
    let first_visited_index = rng.gen_range(0, unvisited.len());
    unvisited.remove(first_visited_index);

    while !unvisited.is_empty() {

        let mut current = *rng.choose(&unvisited).expect("unvisited cells remain");
        let mut path = vec![current];

        while unvisited.contains(&current) {
            let neighbours = grid.neighbours(current);
            current = *rng.choose(&*neighbours)
                .expect("cells on a multi cell grid always have a neighbour");

            if let Some(previous_position) = path.iter().position(|&c| c == current) {
                // Walked into our own path: erase the loop.
                path.truncate(previous_position + 1);
            } else {
                path.push(current);
            }
        }

        tracing::debug!("committing a loop erased walk of {} cells", path.len());
        for pair in path.windows(2) {
            grid.link(pair[0], pair[1]).expect("walk steps are always between neighbours");
            let visited_position = unvisited.iter()
                .position(|&c| c == pair[0])
                .expect("cells before the walk end are always unvisited");
            unvisited.remove(visited_position);
        }
    }
}

/// Apply the weighted Prim's maze generation algorithm to the grid.
///
/// Grow outward from one cell. Each cell gets a temporary random weight in
/// 0..=100 used only to bias the growth - with the uniform default cell
/// weights the frontier selection would degenerate into a biased flood from
/// one corner. Repeatedly take the frontier cell with the largest temporary
/// weight (first in insertion order on a tie), carve to its cheapest unlinked
/// neighbour and add that neighbour to the frontier, or retire the cell once
/// it has no unlinked neighbour left. A scan per iteration stands in for a
/// priority queue; fine at these grid sizes.
pub fn prims<GridIndexType, R>(grid: &mut RectGrid<GridIndexType>, rng: &mut R)
    where GridIndexType: IndexType,
          R: Rng
{
    // Generation-time bias only: the real cell weights are left untouched.
    let temp_weights: Vec<u32> = (0..grid.size()).map(|_| rng.gen_range(0, 101)).collect();

    let mut frontier = vec![grid.random_cell(rng)];

    while !frontier.is_empty() {

        let mut current_index = 0;
        for i in 1..frontier.len() {
            if temp_weight(grid, &temp_weights, frontier[i]) >
               temp_weight(grid, &temp_weights, frontier[current_index]) {
                current_index = i;
            }
        }
        let current = frontier[current_index];

        let unlinked_neighbours: CoordinateSmallVec = grid.neighbours(current)
            .iter()
            .cloned()
            .filter(|&neighbour| grid.cell_links_count(neighbour) == 0)
            .collect();

        let mut cheapest: Option<Cartesian2DCoordinate> = None;
        for &candidate in unlinked_neighbours.iter() {
            cheapest = match cheapest {
                Some(best) if temp_weight(grid, &temp_weights, candidate) <
                              temp_weight(grid, &temp_weights, best) => Some(candidate),
                Some(best) => Some(best),
                None => Some(candidate),
            };
        }

        if let Some(neighbour) = cheapest {
            grid.link(current, neighbour).expect("neighbours are always linkable");
            frontier.push(neighbour);
        } else {
            // Nothing left to carve from here, the cell is now interior.
            frontier.remove(current_index);
        }
    }
}

fn temp_weight<GridIndexType: IndexType>(grid: &RectGrid<GridIndexType>,
                                         weights: &[u32],
                                         coord: Cartesian2DCoordinate)
                                         -> u32 {
    let index = grid.grid_coordinate_to_index(coord)
        .expect("frontier coordinates are always on the grid");
    weights[index]
}

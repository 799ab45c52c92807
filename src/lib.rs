//! **mazegen** is a maze generation, analysis and route finding library.
//!
//! A maze is a grid of cells overlaid with an undirected graph: a graph edge
//! is a carved passage ("link") between two adjacent cells. Seven generation
//! algorithms each grow a spanning tree over the grid under a different
//! policy, `pathing` floods weighted distances over the result and
//! reconstructs shortest routes, and `RectGrid::braid` knocks through dead
//! ends afterwards to add loops. Rendering stays outside the core: the grid
//! exposes its cell, neighbour and link state plus a pluggable per-cell
//! annotation hook, and the bundled textual renderer is just one consumer.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grids;
pub mod pathing;
pub mod units;
mod utils;

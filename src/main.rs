use docopt::Docopt;
use rand::{SeedableRng, XorShiftRng};
use serde_derive::Deserialize;

use mazegen::{
    cells::{Cartesian2DCoordinate, CoordinateSmallVec},
    generators,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay},
    grids::{large_rect_grid, LargeRectGrid},
    pathing,
    units::{ColumnsCount, RowsCount},
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc
};

const USAGE: &str = "Mazegen

Usage:
    mazegen_driver -h | --help
    mazegen_driver [(binary-tree|sidewinder|aldous-broder|wilson|hunt-kill|recursive-backtracker|prims)] [--grid-size=<n>|[--grid-width=<w> --grid-height=<h>]] [--seed=<s>] [--braid=<p>] [--show-distances|--show-path] [--start-point-x=<x> --start-point-y=<y>] [--end-point-x=<e1> --end-point-y=<e2>] [--text-out=<path>]

Options:
    -h --help            Show this screen.
    --grid-size=<n>      The grid size is n * n.
    --grid-width=<w>     The grid width in a w*h grid [default: 20].
    --grid-height=<h>    The grid height in a w*h grid [default: 20].
    --seed=<s>           Unsigned integer seeding the random generator, for reproducible mazes.
    --braid=<p>          After generation, braid the maze: remove each dead end with probability p (0.0 to 1.0) by linking it to a neighbour.
    --show-distances     Show the distance from the start point to all other points on the grid. The start point is the longest path start if not specified.
    --show-path          Show the path from the start to end point. Missing points are chosen from the longest path in the maze.
    --start-point-x=<x>  x coordinate of the path start.
    --start-point-y=<y>  y coordinate of the path start.
    --end-point-x=<e1>   x coordinate of the path end.
    --end-point-y=<e2>   y coordinate of the path end.
    --text-out=<path>    Output file path for a textual rendering of the maze, instead of stdout.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_binary_tree: bool,
    cmd_sidewinder: bool,
    cmd_aldous_broder: bool,
    cmd_wilson: bool,
    cmd_hunt_kill: bool,
    cmd_recursive_backtracker: bool,
    cmd_prims: bool,
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u32>,
    flag_braid: Option<f64>,
    flag_show_distances: bool,
    flag_show_path: bool,
    flag_start_point_x: Option<u32>,
    flag_start_point_y: Option<u32>,
    flag_end_point_x: Option<u32>,
    flag_end_point_y: Option<u32>,
    flag_text_out: String,
}

// All the error types used by the driver live behind `error_chain!` generated
// types. Result is a typedef of std `Result` with our own `Error`.
mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    tracing_subscriber::fmt::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let mut maze_grid = large_rect_grid(RowsCount(height), ColumnsCount(width))
        .map_err(|e| Error::from(format!("Cannot create a {}x{} grid: {:?}", width, height, e)))?;

    let mut rng = driver_rng(args.flag_seed);
    generate_maze_on_grid(&mut maze_grid, &args, &mut rng);

    if let Some(braid_probability) = args.flag_braid {
        if !(0.0..=1.0).contains(&braid_probability) {
            return Err("The braid probability must be between 0.0 and 1.0.".into());
        }
        maze_grid.braid(&mut rng, braid_probability);
    }

    set_maze_griddisplay(&mut maze_grid, &args)?;

    let rendered = format!("{}", maze_grid);
    if args.flag_text_out.is_empty() {
        print!("{}", rendered);
    } else {
        write_text_to_file(&rendered, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// A seeded rng reproduces a maze exactly; otherwise seed weakly from the OS.
fn driver_rng(seed: Option<u32>) -> XorShiftRng {
    match seed {
        // Fixed distinct words keep the seed non-zero whatever the user passes.
        Some(s) => {
            XorShiftRng::from_seed([0x9e37_79b9 ^ s,
                                    0x243f_6a88 ^ s,
                                    0xb7e1_5162 ^ s,
                                    0x8aed_2a6b ^ s])
        }
        None => rand::weak_rng(),
    }
}

fn generate_maze_on_grid(maze_grid: &mut LargeRectGrid,
                         maze_args: &MazeArgs,
                         rng: &mut XorShiftRng) {
    if maze_args.cmd_binary_tree {
        generators::binary_tree(maze_grid, rng);
    } else if maze_args.cmd_aldous_broder {
        generators::aldous_broder(maze_grid, rng);
    } else if maze_args.cmd_wilson {
        generators::wilson(maze_grid, rng);
    } else if maze_args.cmd_hunt_kill {
        generators::hunt_and_kill(maze_grid, rng);
    } else if maze_args.cmd_recursive_backtracker {
        generators::recursive_backtracker(maze_grid, rng);
    } else if maze_args.cmd_prims {
        generators::prims(maze_grid, rng);
    } else {
        generators::sidewinder(maze_grid, rng);
    }
}

/// Wade through the driver arguments and decide how the grid's cells are
/// annotated in the textual rendering:
/// - Nothing in the cells
/// - Start and End point markers, if any were supplied
/// - Distances from some start cell to all other cells
/// - The shortest path between a start and an end point
/// Missing path endpoints default to the endpoints of the longest path in
/// the maze.
fn set_maze_griddisplay(maze_grid: &mut LargeRectGrid, maze_args: &MazeArgs) -> Result<()> {

    let needs_made_up_points = (maze_args.flag_show_distances || maze_args.flag_show_path) &&
                               (maze_args.flag_start_point_x.is_none() ||
                                maze_args.flag_start_point_y.is_none() ||
                                maze_args.flag_end_point_x.is_none() ||
                                maze_args.flag_end_point_y.is_none());
    let longest_path: Vec<Cartesian2DCoordinate> = if needs_made_up_points {
        pathing::dijkstra_longest_path::<u32, u32>(maze_grid).unwrap_or_else(Vec::new)
    } else {
        Vec::new()
    };

    let start_opt = get_start_point(maze_args, &longest_path);
    let end_opt = get_end_point(maze_args, &longest_path);

    if maze_args.flag_show_distances {

        let (start_x, start_y) = start_opt
            .ok_or("No start point available from which to show path distances.")?;
        let distances =
            pathing::Distances::<u32>::for_grid(maze_grid,
                                                Cartesian2DCoordinate::new(start_x, start_y))
                .ok_or("Provided invalid start coordinate from which to show path distances.")?;
        maze_grid.set_grid_display(Some(Rc::new(distances) as Rc<dyn GridDisplay>));

    } else if maze_args.flag_show_path {

        let (start_x, start_y) = start_opt.ok_or("No start point available for the path.")?;
        let (end_x, end_y) = end_opt.ok_or("No end point available for the path.")?;
        let start = Cartesian2DCoordinate::new(start_x, start_y);
        let end = Cartesian2DCoordinate::new(end_x, end_y);

        match pathing::shortest_path_to_goal::<u32, u32>(maze_grid, start, end) {
            Ok(path) => {
                let display_path = Rc::new(PathDisplay::new(&path));
                maze_grid.set_grid_display(Some(display_path as Rc<dyn GridDisplay>));
            }
            Err(e) => {
                // No route; mark the requested endpoints instead.
                tracing::debug!("no path to show: {:?}", e);
                let display_start_end_points =
                    Rc::new(StartEndPointsDisplay::new(as_coordinate_smallvec(start),
                                                       as_coordinate_smallvec(end)));
                maze_grid.set_grid_display(Some(display_start_end_points as Rc<dyn GridDisplay>));
            }
        }

    } else if start_opt.is_some() || end_opt.is_some() {

        // Show whichever start and end points exist.
        let start_points = start_opt
            .map(|(x, y)| as_coordinate_smallvec(Cartesian2DCoordinate::new(x, y)))
            .unwrap_or_else(CoordinateSmallVec::new);
        let end_points = end_opt
            .map(|(x, y)| as_coordinate_smallvec(Cartesian2DCoordinate::new(x, y)))
            .unwrap_or_else(CoordinateSmallVec::new);
        let display_start_end_points = Rc::new(StartEndPointsDisplay::new(start_points,
                                                                          end_points));
        maze_grid.set_grid_display(Some(display_start_end_points as Rc<dyn GridDisplay>));
    }

    Ok(())
}

fn get_start_point(maze_args: &MazeArgs,
                   longest_path: &[Cartesian2DCoordinate])
                   -> Option<(u32, u32)> {
    if let (Some(start_x), Some(start_y)) =
        (maze_args.flag_start_point_x, maze_args.flag_start_point_y) {
        Some((start_x, start_y))
    } else {
        longest_path.first().map(|start| (start.x, start.y))
    }
}

fn get_end_point(maze_args: &MazeArgs,
                 longest_path: &[Cartesian2DCoordinate])
                 -> Option<(u32, u32)> {
    if let (Some(end_x), Some(end_y)) = (maze_args.flag_end_point_x, maze_args.flag_end_point_y) {
        Some((end_x, end_y))
    } else {
        longest_path.last().map(|end| (end.x, end.y))
    }
}

fn as_coordinate_smallvec(coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
    [coord].iter().cloned().collect::<CoordinateSmallVec>()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

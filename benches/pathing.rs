use criterion::{criterion_group, criterion_main, Criterion};
use mazegen::{
    cells::Cartesian2DCoordinate,
    generators,
    grids::large_rect_grid,
    pathing,
    units::{ColumnsCount, RowsCount},
};

type GridDistances = pathing::Distances<u32>;

fn bench_distances(c: &mut Criterion) {
    c.bench_function("distances", |b| {
        let mut g = large_rect_grid(RowsCount(350), ColumnsCount(350)).unwrap();
        let mut rng = rand::weak_rng();
        generators::recursive_backtracker(&mut g, &mut rng);
        let start_coord = Cartesian2DCoordinate::new(250, 250);
        b.iter(|| GridDistances::for_grid(&g, start_coord))
    });
}

fn bench_furthest_points(c: &mut Criterion) {
    c.bench_function("furthest_points", |b| {
        let mut g = large_rect_grid(RowsCount(350), ColumnsCount(350)).unwrap();
        let mut rng = rand::weak_rng();
        generators::recursive_backtracker(&mut g, &mut rng);
        let start_coord = Cartesian2DCoordinate::new(250, 250);
        let distances = GridDistances::for_grid(&g, start_coord).unwrap();
        b.iter(|| distances.furthest_points_on_grid())
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    c.bench_function("shortest_path", |b| {
        let mut g = large_rect_grid(RowsCount(350), ColumnsCount(350)).unwrap();
        let mut rng = rand::weak_rng();
        generators::recursive_backtracker(&mut g, &mut rng);
        let start_coord = Cartesian2DCoordinate::new(250, 250);
        let distances = GridDistances::for_grid(&g, start_coord).unwrap();
        let end_coord = Cartesian2DCoordinate::new(0, 0);
        b.iter(|| pathing::shortest_path(&g, &distances, end_coord))
    });
}

fn bench_longest_path(c: &mut Criterion) {
    c.bench_function("longest_path", |b| {
        let mut g = large_rect_grid(RowsCount(100), ColumnsCount(100)).unwrap();
        let mut rng = rand::weak_rng();
        generators::hunt_and_kill(&mut g, &mut rng);
        b.iter(|| pathing::dijkstra_longest_path::<u32, u32>(&g))
    });
}

criterion_group!(
    benches,
    bench_distances,
    bench_furthest_points,
    bench_shortest_path,
    bench_longest_path
);
criterion_main!(benches);

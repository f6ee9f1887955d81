//! Benchmark for the `generate_texture` function
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mesh_to_distance::{generate_texture, Grid, Mesh, Options, SearchMethod, TriangleLists};

/// Watertight sphere made by projecting a subdivided cube on a unit sphere.
fn cube_sphere(n: i32) -> Mesh {
    let faces: [([i32; 3], [i32; 3], [i32; 3]); 6] = [
        ([0, 0, 0], [0, 1, 0], [1, 0, 0]),
        ([0, 0, n], [1, 0, 0], [0, 1, 0]),
        ([0, 0, 0], [0, 0, 1], [0, 1, 0]),
        ([n, 0, 0], [0, 1, 0], [0, 0, 1]),
        ([0, 0, 0], [1, 0, 0], [0, 0, 1]),
        ([0, n, 0], [0, 0, 1], [1, 0, 0]),
    ];

    let mut lattice = std::collections::HashMap::new();
    let mut vertices = Vec::new();
    let mut vertex = |p: [i32; 3]| -> u32 {
        *lattice.entry(p).or_insert_with(|| {
            let half = n as f32 / 2.0;
            let [x, y, z] = [p[0] as f32 - half, p[1] as f32 - half, p[2] as f32 - half];
            let length = (x * x + y * y + z * z).sqrt();
            vertices.push([x / length, y / length, z / length]);
            vertices.len() as u32 - 1
        })
    };

    let mut triangles = Vec::new();
    for (origin, u, v) in faces {
        let at = |i: i32, j: i32| {
            [
                origin[0] + i * u[0] + j * v[0],
                origin[1] + i * u[1] + j * v[1],
                origin[2] + i * u[2] + j * v[2],
            ]
        };
        for (i, j) in itertools::iproduct!(0..n, 0..n) {
            let p00 = vertex(at(i, j));
            let p10 = vertex(at(i + 1, j));
            let p11 = vertex(at(i + 1, j + 1));
            let p01 = vertex(at(i, j + 1));
            triangles.push([p00, p10, p11]);
            triangles.push([p00, p11, p01]);
        }
    }

    Mesh::new(vertices, triangles).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    // env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mesh = cube_sphere(24);
    let cell_count = [32, 32, 32];
    let grid =
        Grid::from_bounding_box(&[-1.25, -1.25, -1.25], &[1.25, 1.25, 1.25], cell_count).unwrap();

    println!("vertices: {:?}", mesh.vertices().len());
    println!("triangles: {:?}", mesh.triangles().len());
    println!("grid size: {cell_count:?}");

    c.bench_function("build_triangle_lists", |b| {
        b.iter(|| TriangleLists::build(black_box(&mesh), black_box(&grid)));
    });

    c.bench_function("generate_texture_triangle_lists", |b| {
        b.iter(|| {
            generate_texture(
                black_box(&mesh),
                black_box(&grid),
                black_box(&Options::default()),
            )
            .unwrap();
        });
    });

    // Far fewer samples: every sample evaluates every triangle.
    let small_grid =
        Grid::from_bounding_box(&[-1.25, -1.25, -1.25], &[1.25, 1.25, 1.25], [8, 8, 8]).unwrap();
    let brute_force = Options {
        search: SearchMethod::BruteForce,
        ..Options::default()
    };
    c.bench_function("generate_texture_brute_force", |b| {
        b.iter(|| {
            generate_texture(
                black_box(&mesh),
                black_box(&small_grid),
                black_box(&brute_force),
            )
            .unwrap();
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

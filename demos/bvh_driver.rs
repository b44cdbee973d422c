//! Builds a hierarchy over the nodes of a structured grid and runs a batch
//! of radius or k-nearest queries from randomly placed points.
//!
//! The thread pool is selected at compile time: build the example with
//! `--features parallel` to fan the construction and the batch out on rayon.

use canopy::math::{Point, Real};
use canopy::partitioning::Lbvh;
use canopy::query::{nearest, within, Nearest, Within};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIDE: Real = 100.0;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    /// Match every grid node within a random radius of each query point.
    Radius,
    /// Collect a random number of nearest grid nodes for each query point.
    Knn,
}

#[derive(Parser, Debug)]
#[command(about = "Radius and k-nearest searches over a structured point cloud")]
struct Args {
    /// Source cloud points in the x direction.
    #[arg(long, default_value_t = 11)]
    nx: usize,

    /// Source cloud points in the y direction.
    #[arg(long, default_value_t = 11)]
    ny: usize,

    /// Source cloud points in the z direction.
    #[arg(long, default_value_t = 11)]
    nz: usize,

    /// Number of randomly placed query points.
    #[arg(long = "N", default_value_t = 100)]
    n_queries: usize,

    /// Query kind to run.
    #[arg(long, value_enum, default_value = "radius")]
    mode: Mode,

    /// Seed of the query generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// The nodes of an `nx * ny * nz` grid spanning `[0, SIDE]^3`, with the x
/// index varying fastest.
fn make_structured_cloud(nx: usize, ny: usize, nz: usize) -> Vec<Point<Real>> {
    let step = |count: usize| {
        if count > 1 {
            SIDE / (count - 1) as Real
        } else {
            0.0
        }
    };
    let (sx, sy, sz) = (step(nx), step(ny), step(nz));

    let mut cloud = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                cloud.push(Point::new(i as Real * sx, j as Real * sy, k as Real * sz));
            }
        }
    }
    cloud
}

fn make_random_cloud(rng: &mut StdRng, len: usize) -> Vec<Point<Real>> {
    (0..len)
        .map(|_| {
            Point::new(
                rng.gen_range(0.0..SIDE),
                rng.gen_range(0.0..SIDE),
                rng.gen_range(0.0..SIDE),
            )
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let cloud = make_structured_cloud(args.nx, args.ny, args.nz);
    let bvh = Lbvh::from_primitives(&cloud)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let queries = make_random_cloud(&mut rng, args.n_queries);

    let mut offsets = Vec::new();
    let mut indices = Vec::new();

    match args.mode {
        Mode::Radius => {
            // Cap the radius so a single query matches about a hundred
            // points.
            let pi = std::f64::consts::PI as Real;
            let n = cloud.len() as Real;
            let max_radius = (100.0 * (3.0 * SIDE * SIDE) / (n * pi)).sqrt();

            let predicates: Vec<Within> = queries
                .iter()
                .map(|&point| within(point, rng.gen_range(0.0..max_radius)))
                .collect();
            bvh.query(&predicates, &mut offsets, &mut indices)?;
        }
        Mode::Knn => {
            let max_k = (((args.nx * args.nx + args.ny * args.ny + args.nz * args.nz) as Real)
                .sqrt() as usize)
                .max(1);

            let predicates: Vec<Nearest> = queries
                .iter()
                .map(|&point| nearest(point, rng.gen_range(1..=max_k)))
                .collect();
            bvh.query(&predicates, &mut offsets, &mut indices)?;
        }
    }

    let per_query = offsets.windows(2).map(|pair| pair[1] - pair[0]);
    println!(
        "{} primitives, {} queries in {:?} mode (seed {})",
        cloud.len(),
        args.n_queries,
        args.mode,
        args.seed,
    );
    println!(
        "{} total matches, at most {} per query",
        indices.len(),
        per_query.max().unwrap_or(0),
    );

    Ok(())
}

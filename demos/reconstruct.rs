//! Reconstruct a drawing and print what was found.
//!
//! With an argument, each non-empty line of the file is read as the path
//! data of one drawing path. Without one, a small built-in drawing is used.
//! Run with `--features tracing` and `RUST_LOG=inktopo=trace` to watch the
//! stages.

use inktopo::{Config, Point, Primitive, reconstruct};
use tracing_subscriber::EnvFilter;

fn builtin() -> Primitive {
    let p = Point::new;
    Primitive::group(vec![
        // A hashed wedge
        Primitive::group(
            (0..4)
                .map(|i| {
                    let x = i as f64;
                    let half = 0.25 * (x + 1.0);
                    Primitive::line(p(x, -half), p(x, half))
                })
                .collect(),
        ),
        // A double bond and a single bond continuing from it
        Primitive::line(p(10.0, 20.0), p(20.0, 20.0)),
        Primitive::line(p(10.0, 21.5), p(20.0, 21.5)),
        Primitive::line(p(20.5, 20.75), p(28.0, 28.0)).with_id("bond"),
        Primitive::text(p(28.5, 28.5), "N", 0.5).with_id("n"),
        Primitive::polygon(vec![p(60.0, 0.0), p(70.0, 0.0), p(65.0, 8.0)]),
    ])
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let tree = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("cannot read {path}: {e}"))?;
            let mut children = Vec::new();
            for (n, d) in source.lines().map(str::trim).enumerate() {
                if d.is_empty() {
                    continue;
                }
                children.push(Primitive::path_data(d)?.with_id(format!("path{}", n + 1)));
            }
            Primitive::group(children)
        }
        None => builtin(),
    };

    let mut reconstruction = reconstruct(tree, Config::default())?;
    println!("{}", reconstruction.summary());
    println!();

    let junctions = reconstruction.junctions().to_vec();
    tracing::info!(junctions = junctions.len(), "reconstruction finished");
    for junction in &junctions {
        let members: Vec<String> = reconstruction
            .members_of(junction)
            .into_iter()
            .map(|j| format!("{} ({})", j.id(), j.kind_name()))
            .collect();
        println!("{} <- {}", junction.coordinate, members.join(", "));
    }
    Ok(())
}

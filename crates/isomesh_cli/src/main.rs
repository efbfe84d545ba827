//! Scene mesher.
//!
//! Loads a TOML scene, runs the chunk lattice once and writes every chunk
//! mesh into one Wavefront OBJ file, one object per chunk.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use isomesh::export::write_lattice_obj;
use isomesh::{ChunkLattice, Dispatch, ExecutionModel, RayonDispatch, SequentialDispatch};
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use config::Config;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Execution {
	Sequential,
	Parallel,
}

/// Chunked Marching Cubes mesher.
#[derive(Parser, Debug)]
#[command(name = "isomesh")]
#[command(about = "Meshes a density field scene into Wavefront OBJ")]
struct Args {
	/// Path to the scene TOML file (defaults are used when omitted).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// OBJ output path; overrides the scene's `output`.
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Override the execution model.
	#[arg(long, value_enum)]
	execution: Option<Execution>,

	/// Worker threads for the parallel model.
	#[arg(long)]
	threads: Option<usize>,

	/// Override samples per chunk axis.
	#[arg(long)]
	points: Option<usize>,

	/// Override the noise seed.
	#[arg(long)]
	seed: Option<u32>,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => {
			println!("Loading scene from: {}", path.display());
			Config::load(path)?
		}
		None => Config::default(),
	};

	if let Some(execution) = args.execution {
		config.execution = match execution {
			Execution::Sequential => ExecutionModel::Sequential,
			Execution::Parallel => ExecutionModel::Parallel,
		};
	}
	if let Some(points) = args.points {
		config.grid.num_points_per_axis = points;
	}
	if let Some(seed) = args.seed {
		config.field.noise.seed = seed;
	}
	if args.threads.is_some() {
		config.threads = args.threads;
	}
	if args.output.is_some() {
		config.output = args.output.clone();
	}
	config.validate()?;

	match (config.execution, config.threads) {
		(ExecutionModel::Sequential, _) => run(&config, SequentialDispatch),
		(ExecutionModel::Parallel, Some(threads)) => {
			let dispatch = RayonDispatch::with_threads(threads)
				.with_context(|| format!("Failed to build a {threads}-thread pool"))?;
			run(&config, dispatch)
		}
		(ExecutionModel::Parallel, None) => run(&config, RayonDispatch::new()),
	}
}

fn run<D: Dispatch>(config: &Config, dispatch: D) -> Result<()> {
	let grid = &config.grid;
	println!(
		"Meshing {}x{}x{} chunks at {}³ samples ({:?})",
		grid.num_chunks[0],
		grid.num_chunks[1],
		grid.num_chunks[2],
		grid.num_points_per_axis,
		config.execution
	);

	let field = config.field.build(grid);
	let mut lattice = ChunkLattice::with_dispatch(grid.clone(), field, dispatch)
		.context("Invalid grid parameters")?;

	let start = Instant::now();
	let report = lattice.run();
	let elapsed = start.elapsed();

	for chunk in lattice.chunks() {
		println!("  {}: {} triangles", chunk.name(), chunk.mesh().triangle_count());
	}
	if report.dropped > 0 {
		println!("  ! {} triangles dropped on buffer overflow", report.dropped);
	}
	println!(
		"\n{} chunks, {} triangles in {:.2?}",
		report.regenerated, report.triangles, elapsed
	);

	if isomesh::metrics::is_enabled() {
		let metrics = lattice.metrics();
		println!(
			"avg sample {:.1}us, avg march {:.1}us",
			metrics.avg_sample_timing_us(),
			metrics.avg_march_timing_us()
		);
	}

	if let Some(output) = &config.output {
		let file = File::create(output)
			.with_context(|| format!("Failed to create output file: {}", output.display()))?;
		let mut writer = BufWriter::new(file);
		let written = write_lattice_obj(&mut writer, &lattice)
			.and_then(|n| writer.flush().map(|()| n))
			.with_context(|| format!("Failed to write: {}", output.display()))?;
		tracing::info!(path = %output.display(), triangles = written, "wrote OBJ");
		println!("Output written to: {}", output.display());
	}

	Ok(())
}

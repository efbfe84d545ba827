//! Scene file parsing.
//!
//! ```toml
//! output = "terrain.obj"
//! execution = "parallel"
//!
//! [grid]
//! num_points_per_axis = 32
//! num_chunks = [2, 1, 2]
//!
//! [field.mode]
//! kind = "volumetric"
//!
//! [field.noise]
//! seed = 7
//! octaves = 6
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use isomesh::{ExecutionModel, FieldConfig, GridParams};

/// Root scene configuration. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Lattice layout.
	pub grid: GridParams,
	/// Density field selection and noise settings.
	pub field: FieldConfig,
	/// Sequential or parallel kernels.
	pub execution: ExecutionModel,
	/// Worker threads for the parallel model; rayon's default when absent.
	pub threads: Option<usize>,
	/// OBJ output path, relative to the scene file.
	pub output: Option<PathBuf>,
}

impl Config {
	/// Load configuration from a TOML file.
	///
	/// A relative `output` is resolved against the file's directory.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read scene file: {}", path.display()))?;
		let mut config = Self::parse(&content)
			.with_context(|| format!("Invalid scene file: {}", path.display()))?;

		if let (Some(output), Some(dir)) = (config.output.as_ref(), path.parent()) {
			if output.is_relative() {
				config.output = Some(dir.join(output));
			}
		}
		Ok(config)
	}

	/// Parse and validate a scene from TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).context("Failed to parse scene TOML")?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		self.grid.validate().context("Invalid [grid] section")?;
		if self.threads == Some(0) {
			anyhow::bail!("threads must be at least 1");
		}
		Ok(())
	}
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

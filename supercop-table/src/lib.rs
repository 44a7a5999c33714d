//! Turns SUPERCOP benchmark logs into a LaTeX comparison table.
//!
//! The pipeline runs strictly in one direction:
//!
//! 1. [`loader::load_observations`] reads `<root>/<host>/data` for every
//!    configured host and parses each line with [`record::parse_line`];
//! 2. [`AggregateMatrix::from_observations`] keeps the best cycle count of
//!    every (implementation, host) pair;
//! 3. [`stats`] derives geometric means and per-section minimums;
//! 4. [`render::render`] lays the result out as a `table*` environment.
//!
//! [`generate_report`] runs all of it. The output depends only on the files
//! under the root directory and on the [`Config`] value passed in.

use std::path::Path;

use log::{debug, info, warn};

pub mod config;
pub mod error;
pub mod loader;
pub mod matrix;
pub mod record;
pub mod render;
pub mod stats;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::matrix::{AggregateMatrix, Observation};

/// Builds the aggregate matrix from the logs under `root`
pub fn build_matrix(root: &Path, config: &Config) -> Result<AggregateMatrix> {
    let observations = loader::load_observations(root, &config.hosts)?;
    info!(
        "{} measurements read from {}",
        observations.len(),
        root.display()
    );

    let matrix = AggregateMatrix::from_observations(observations);
    if matrix.is_empty() {
        warn!("no usable measurements under {}", root.display());
    } else {
        info!("{} implementations measured", matrix.len());
    }

    for implementation in matrix.implementations() {
        let listed = config
            .sections
            .iter()
            .any(|section| section.implementations.iter().any(|id| id == implementation));
        if !listed {
            debug!("{implementation} is measured but not part of any section");
        }
    }

    Ok(matrix)
}

/// Reads the logs under `root` and renders the comparison table.
///
/// The configuration is validated first; nothing is rendered if it or the
/// data turns out to be unusable.
pub fn generate_report(root: &Path, config: &Config) -> Result<String> {
    config.validate()?;
    let matrix = build_matrix(root, config)?;
    render::render(config, &matrix)
}

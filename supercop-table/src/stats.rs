//! Summary values derived from the aggregate matrix: per-implementation
//! geometric means, and the per-section minimums that ratios are taken
//! against.

use itertools::Itertools;
use log::trace;

use crate::config::Section;
use crate::error::{Error, Result};
use crate::matrix::{AggregateMatrix, Row};

/// Returns the geometric mean of `row`'s cycle counts over `hosts`.
///
/// Every host must have a measurement; a missing one is reported as
/// [`Error::IncompleteData`] rather than being skipped or counted as zero.
/// The result depends only on the multiset of counts, not on host order.
pub fn geometric_mean(implementation: &str, row: &Row, hosts: &[&str]) -> Result<f64> {
    if hosts.is_empty() {
        return Err(Error::NoHosts);
    }

    let mut values = Vec::with_capacity(hosts.len());
    for &host in hosts {
        let cycles = row
            .cycles(host)
            .ok_or_else(|| Error::IncompleteData {
                implementation: implementation.to_owned(),
                host: host.to_owned(),
            })?;
        values.push(cycles);
    }

    // Multiplied in ascending order: rows holding the same counts on
    // different hosts must get bit-identical means.
    let exponent = 1.0 / hosts.len() as f64;
    Ok(values
        .into_iter()
        .sorted_unstable()
        .fold(1.0, |mean, cycles| mean * (cycles as f64).powf(exponent)))
}

/// The implementations of `section` that have at least one measurement, in
/// section order
pub fn present<'a>(section: &'a Section, matrix: &AggregateMatrix) -> Vec<&'a str> {
    section
        .implementations
        .iter()
        .map(String::as_str)
        .filter(|id| matrix.contains(id))
        .collect()
}

/// The smallest cycle count on `host` among `implementations`
pub fn column_minimum(
    matrix: &AggregateMatrix,
    implementations: &[&str],
    host: &str,
) -> Option<u64> {
    implementations
        .iter()
        .filter_map(|id| matrix.get(id, host))
        .min()
}

/// The smallest of `means`
pub fn minimum_mean(means: impl IntoIterator<Item = f64>) -> Option<f64> {
    means.into_iter().min_by(f64::total_cmp)
}

/// The derived values of one implementation's row
#[derive(Clone, Debug, PartialEq)]
pub struct RowStats<'a> {
    pub implementation: &'a str,
    /// Best cycle count per host, in host order
    pub cycles: Vec<u64>,
    pub mean: f64,
}

/// The derived values of one section.
///
/// Only implementations with measurements take part, and minimums are taken
/// within the section alone.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionStats<'a> {
    pub rows: Vec<RowStats<'a>>,
    /// The smallest cycle count per host, in host order
    pub column_minimums: Vec<u64>,
    /// The smallest geometric mean of the section
    pub best_mean: f64,
}

impl<'a> SectionStats<'a> {
    /// Computes the section's rows and minimums.
    ///
    /// Returns `Ok(None)` when none of the section's implementations has a
    /// measurement.
    pub fn compute(
        section: &'a Section,
        matrix: &AggregateMatrix,
        hosts: &[&str],
    ) -> Result<Option<Self>> {
        let implementations = present(section, matrix);
        trace!(
            "section {}: {} of {} implementations measured",
            section.heading,
            implementations.len(),
            section.implementations.len()
        );

        let mut rows = Vec::with_capacity(implementations.len());
        for &implementation in &implementations {
            let Some(row) = matrix.row(implementation) else {
                continue;
            };
            let mean = geometric_mean(implementation, row, hosts)?;
            let cycles = hosts
                .iter()
                .filter_map(|host| row.cycles(host))
                .collect();
            rows.push(RowStats {
                implementation,
                cycles,
                mean,
            });
        }

        let Some(best_mean) = minimum_mean(rows.iter().map(|row| row.mean)) else {
            return Ok(None);
        };
        let column_minimums = hosts
            .iter()
            .filter_map(|host| column_minimum(matrix, &implementations, host))
            .collect();

        Ok(Some(Self {
            rows,
            column_minimums,
            best_mean,
        }))
    }
}

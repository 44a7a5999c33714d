use std::collections::BTreeMap;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::record::Record;

/// One benchmark run of an implementation on a host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub implementation: String,
    pub host: String,
    pub cycles: u64,
    pub compiler: String,
    pub flags: String,
}

impl Observation {
    /// Creates an observation from a parsed line of `host`'s data file
    pub fn from_record(host: &str, record: &Record<'_>) -> Self {
        Self {
            implementation: record.implementation.to_owned(),
            host: host.to_owned(),
            cycles: record.cycles,
            compiler: record.compiler.to_owned(),
            flags: record.flags.to_owned(),
        }
    }

    /// Orders competing observations of the same (implementation, host) pair.
    ///
    /// Fewer cycles wins; equal counts fall back to the lowest compiler and
    /// then the lowest flags, so the selection never depends on input order.
    fn preference(&self) -> (u64, &str, &str) {
        (self.cycles, &self.compiler, &self.flags)
    }
}

/// The winning observation of one (implementation, host) pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Best {
    pub cycles: u64,
    /// The compiler that produced `cycles`
    pub compiler: String,
    /// The flags that produced `cycles`
    pub flags: String,
}

/// The best measurements of one implementation, by host
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, Best>,
}

impl Row {
    /// Returns the best cycle count on `host`, if any run succeeded there
    pub fn cycles(&self, host: &str) -> Option<u64> {
        self.cells
            .get(host)
            .map(|best| best.cycles)
    }

    /// Returns the winning observation on `host`
    pub fn best(&self, host: &str) -> Option<&Best> {
        self.cells.get(host)
    }
}

/// Best cycle count per implementation and host.
///
/// Built once from the full set of observations and never modified
/// afterwards. Every cell is the minimum over the observations sharing its
/// key, and there is no cell without at least one observation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateMatrix {
    rows: BTreeMap<String, Row>,
}

impl AggregateMatrix {
    /// Reduces `observations` to the best one per (implementation, host) pair
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut winners = FxHashMap::<(String, String), Observation>::default();
        for obs in observations {
            match winners.entry((obs.implementation.clone(), obs.host.clone())) {
                Entry::Occupied(mut entry) => {
                    if obs.preference() < entry.get().preference() {
                        entry.insert(obs);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(obs);
                }
            }
        }

        let mut rows = BTreeMap::<String, Row>::new();
        for ((implementation, host), obs) in winners {
            rows.entry(implementation)
                .or_default()
                .cells
                .insert(
                    host,
                    Best {
                        cycles: obs.cycles,
                        compiler: obs.compiler,
                        flags: obs.flags,
                    },
                );
        }

        Self { rows }
    }

    /// Returns the measurements of `implementation`, if it has any
    pub fn row(&self, implementation: &str) -> Option<&Row> {
        self.rows.get(implementation)
    }

    /// Returns the best cycle count of `implementation` on `host`
    pub fn get(&self, implementation: &str, host: &str) -> Option<u64> {
        self.row(implementation)?
            .cycles(host)
    }

    pub fn contains(&self, implementation: &str) -> bool {
        self.rows.contains_key(implementation)
    }

    /// Implementation identifiers, in name order
    pub fn implementations(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// The number of implementations with at least one measurement
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

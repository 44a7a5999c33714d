use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace, warn};

use crate::config::Host;
use crate::error::{Error, Result};
use crate::matrix::Observation;
use crate::record;

/// The name of the log file inside each host's directory
pub const DATA_FILENAME: &str = "data";

/// Reads the observations of every allow-listed host under `root`.
///
/// Hosts without a directory are skipped, and directories of hosts that are
/// not in `hosts` are never looked at. Lines that are not measurements are
/// dropped. Failing to read the `data` file of a host that has a directory
/// is an error.
pub fn load_observations(root: &Path, hosts: &[Host]) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();

    for host in hosts {
        let dir = root.join(&host.id);
        if !dir.is_dir() {
            info!("no results for host {} in {}", host.id, root.display());
            continue;
        }

        let before = observations.len();
        let lines = read_host_data(&dir.join(DATA_FILENAME), &host.id, &mut observations)?;
        let accepted = observations.len() - before;

        debug!("host {}: {accepted} measurements out of {lines} lines", host.id);
        if accepted == 0 {
            warn!("host {} has no usable measurements", host.id);
        }
    }

    Ok(observations)
}

/// Appends the measurements in the data file at `path` to `out`, tagged
/// with `host`, and returns the number of lines read.
///
/// A zero cycle count is not a usable measurement and is dropped like any
/// other non-matching line.
fn read_host_data(path: &Path, host: &str, out: &mut Vec<Observation>) -> Result<usize> {
    let io_error = |source| Error::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;

    let mut lines = 0;
    // Split on raw bytes: a stray non-UTF-8 byte only spoils its own line
    for line in BufReader::new(file).split(b'\n') {
        let line = line.map_err(io_error)?;
        let line = String::from_utf8_lossy(&line);
        lines += 1;

        if record::is_objsize(&line) {
            continue;
        }
        match record::parse_line(&line) {
            Some(record) if record.cycles == 0 => {
                trace!("{}: ignoring zero cycle count in {line:?}", path.display());
            }
            Some(record) => {
                if record.host != host {
                    trace!("{}: line names host {}", path.display(), record.host);
                }
                out.push(Observation::from_record(host, &record));
            }
            None => trace!("{}: skipping {line:?}", path.display()),
        }
    }

    Ok(lines)
}

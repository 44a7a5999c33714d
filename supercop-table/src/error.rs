use core::fmt;
use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

/// Errors that abort report generation.
///
/// Everything that is not fatal (unparseable lines, hosts without a
/// directory) is absorbed by the pipeline and never surfaces here.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// A host's `data` file exists but could not be read.
    Io {
        /// The file that was being read
        path: PathBuf,
        /// The underlying failure
        source: io::Error,
    },

    /// A section lists an implementation that has no display metadata.
    UnknownImplementation(String),

    /// An implementation lacks a measurement on one of the report's hosts, so
    /// no geometric mean can be computed for it.
    IncompleteData {
        /// The implementation whose row is incomplete
        implementation: String,
        /// The first host without a measurement
        host: String,
    },

    /// A geometric mean was requested over an empty host ordering.
    NoHosts,

    /// The same host is configured more than once.
    DuplicateHost(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            Self::UnknownImplementation(name) => {
                write!(f, "no display metadata for implementation {name}")
            }
            Self::IncompleteData {
                implementation,
                host,
            } => write!(
                f,
                "incomplete data: {implementation} has no measurement on host {host}"
            ),
            Self::NoHosts => write!(f, "no hosts configured"),
            Self::DuplicateHost(host) => write!(f, "host {host} is configured twice"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Shorthand used throughout the pipeline.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_data_names_implementation_and_host() {
        let err = Error::IncompleteData {
            implementation: "crypto_scalarmult/curve25519/donna".into(),
            host: "nakhash".into(),
        };
        assert_eq!(
            err.to_string(),
            "incomplete data: crypto_scalarmult/curve25519/donna has no measurement on host nakhash"
        );
    }

    #[test]
    fn io_error_exposes_source() {
        let err = Error::Io {
            path: PathBuf::from("/nowhere/kivsa/data"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(
            err.to_string()
                .starts_with("cannot read /nowhere/kivsa/data")
        );
    }
}

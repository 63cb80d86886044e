use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while filtering the reference datasets
#[derive(Debug, Error)]
pub enum FilterError {
    /// An input file could not be opened
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file could not be created
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A row is shorter than the columns the filter reads
    #[error("line {line}: expected field {index} but row has {found} field(s)")]
    MissingField { line: u64, index: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::countries::{ExclusionSet, RetainedCountries};
use crate::error::{FilterError, Result};
use crate::filter::{filter_country_codes, filter_postal_codes};
use crate::table::{DigestAlgorithm, FilteredTable};

pub const POSTAL_INPUT: &str = "geonames-postal-code.csv";
pub const POSTAL_OUTPUT: &str = "geonames-postal-code-filtered.csv";
pub const COUNTRIES_INPUT: &str = "countries-codes.csv";
pub const COUNTRIES_OUTPUT: &str = "countries-codes-filtered.csv";

/// Locations of the two inputs and their filtered outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub postal_input: PathBuf,
    pub postal_output: PathBuf,
    pub countries_input: PathBuf,
    pub countries_output: PathBuf,
}

impl Paths {
    /// The fixed file names, relative to `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Paths {
            postal_input: dir.join(POSTAL_INPUT),
            postal_output: dir.join(POSTAL_OUTPUT),
            countries_input: dir.join(COUNTRIES_INPUT),
            countries_output: dir.join(COUNTRIES_OUTPUT),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Paths::in_dir(".")
    }
}

/// Summary of one written output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub kept: usize,
    pub dropped: usize,
    pub digest: Option<String>,
}

/// Summary of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub postal: FileReport,
    pub countries: FileReport,
    pub retained: RetainedCountries,
}

/// Filter both datasets, postal codes first
///
/// Each input is read completely and closed before its output is created,
/// and the postal output is written before the country file is opened.
/// Outputs are overwritten.
pub fn run(
    paths: &Paths,
    excluded: &ExclusionSet,
    digest_algorithm: Option<DigestAlgorithm>,
) -> Result<Report> {
    let postal = filter_postal_codes(open(&paths.postal_input)?, excluded)?;
    let postal_digest = write_table(&postal.table, &paths.postal_output, digest_algorithm)?;
    info!(
        path = %paths.postal_output.display(),
        kept = postal.table.rows.len(),
        dropped = postal.dropped,
        countries = postal.retained.len(),
        "written postal codes"
    );

    let countries = filter_country_codes(open(&paths.countries_input)?, &postal.retained)?;
    let countries_digest =
        write_table(&countries.table, &paths.countries_output, digest_algorithm)?;
    info!(
        path = %paths.countries_output.display(),
        kept = countries.table.rows.len(),
        dropped = countries.dropped.len(),
        "written country codes"
    );

    Ok(Report {
        postal: FileReport {
            path: paths.postal_output.clone(),
            kept: postal.table.rows.len(),
            dropped: postal.dropped,
            digest: postal_digest,
        },
        countries: FileReport {
            path: paths.countries_output.clone(),
            kept: countries.table.rows.len(),
            dropped: countries.dropped.len(),
            digest: countries_digest,
        },
        retained: postal.retained,
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| FilterError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn write_table(
    table: &FilteredTable,
    path: &Path,
    digest_algorithm: Option<DigestAlgorithm>,
) -> Result<Option<String>> {
    let file = File::create(path).map_err(|source| FilterError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut output = BufWriter::new(file);
    Ok(table.write_to(&mut output, digest_algorithm)?)
}

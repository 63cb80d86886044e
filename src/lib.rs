//! geonames-filter - Prune the geonames postal-code and country-code datasets
//!
//! This library reduces two opendatasoft reference exports to the rows and
//! columns a geo lookup service actually serves:
//!
//! - `geonames-postal-code.csv` keeps `country_code;postal_code;place_name`
//!   for every country outside a fixed exclusion list
//! - `countries-codes.csv` keeps `iso2_code;english_label` for the countries
//!   that still have postal codes after that exclusion
//!
//! # Key Features
//!
//! - **Semicolon CSV**: Quoted fields with embedded `;` keep their column positions
//! - **Header preservation**: The first row is pruned but never filtered
//! - **Deterministic output**: Bodies are sorted bytewise, joined with `\n`
//! - **Checksums**: Optional SHA-256/SHA-512 digests of each written file
//!
//! # Examples
//!
//! **Full run** over the fixed file names in the current directory:
//!
//! ```no_run
//! use geonames_filter::{run, ExclusionSet, Paths};
//!
//! let report = run(&Paths::default(), &ExclusionSet::default(), None).unwrap();
//! println!("{} postal rows kept", report.postal.kept);
//! ```
//!
//! **In memory**, one dataset at a time:
//!
//! ```
//! use geonames_filter::{filter_country_codes, filter_postal_codes, ExclusionSet};
//!
//! let postal = "country code;postal code;place name\nUS;10001;NYC\nPK;00001;Karachi\nFR;75000;Paris\n";
//! let postal = filter_postal_codes(postal.as_bytes(), &ExclusionSet::default()).unwrap();
//! assert_eq!(postal.table.rows, vec!["FR;75000;Paris", "US;10001;NYC"]);
//!
//! let countries = "a;ISO2 CODE;c;d;e;f;LABEL EN\nx;PK;x;x;x;x;Pakistan\nx;FR;x;x;x;x;France\n";
//! let countries = filter_country_codes(countries.as_bytes(), &postal.retained).unwrap();
//! assert_eq!(countries.table.rows, vec!["FR;France"]);
//! ```

pub mod countries;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod table;

pub use countries::{ExclusionSet, RetainedCountries, EXCLUDED_COUNTRY_CODES};
pub use error::{FilterError, Result};
pub use filter::{filter_country_codes, filter_postal_codes, CountryCodes, PostalCodes};
pub use pipeline::{run, FileReport, Paths, Report};
pub use table::{DigestAlgorithm, FilteredTable};

use std::io::Read;

use tracing::{debug, info};

use crate::countries::{ExclusionSet, RetainedCountries};
use crate::error::Result;
use crate::parser::parse_rows;
use crate::table::FilteredTable;

/// Columns kept from the postal-code file: country code, postal code, place name
pub const POSTAL_COLUMNS: [usize; 3] = [0, 1, 2];

/// Columns kept from the country-code file: ISO2 code, English label
pub const COUNTRY_COLUMNS: [usize; 2] = [1, 6];

const POSTAL_COUNTRY_FIELD: usize = POSTAL_COLUMNS[0];
const COUNTRY_ISO2_FIELD: usize = COUNTRY_COLUMNS[0];

/// Result of filtering the postal-code dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCodes {
    /// Pruned and sorted table
    pub table: FilteredTable,
    /// Countries that kept at least one postal row
    pub retained: RetainedCountries,
    /// Number of rows dropped by the exclusion set
    pub dropped: usize,
}

/// Result of filtering the country-code dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCodes {
    /// Pruned and sorted table
    pub table: FilteredTable,
    /// ISO2 codes of the dropped rows, in input order
    pub dropped: Vec<String>,
}

/// Filter the postal-code dataset against an exclusion set
///
/// This function:
/// - Keeps the header, reduced to its first three columns
/// - Drops every row whose country code (column 0) is excluded
/// - Reduces kept rows to `country_code;postal_code;place_name`
/// - Records each kept row's country code in the retained set
/// - Sorts kept rows by full row text
///
/// Fails with `MissingField` on any row with fewer than three fields.
pub fn filter_postal_codes<R: Read>(input: R, excluded: &ExclusionSet) -> Result<PostalCodes> {
    let mut rows = parse_rows(input)?;

    let header = rows
        .next()
        .transpose()?
        .map(|row| row.project(&POSTAL_COLUMNS))
        .transpose()?;

    let mut kept = Vec::new();
    let mut retained = RetainedCountries::new();
    let mut dropped = 0;

    for row in rows {
        let row = row?;
        let country_code = row.field(POSTAL_COUNTRY_FIELD)?;
        if excluded.contains(country_code) {
            dropped += 1;
            continue;
        }
        if retained.insert(country_code) {
            debug!(country_code, line = row.line, "retaining country");
        }
        kept.push(row.project(&POSTAL_COLUMNS)?);
    }

    let mut table = FilteredTable::new(header, kept);
    table.sort();

    debug!(
        kept = table.rows.len(),
        dropped,
        countries = retained.len(),
        "filtered postal codes"
    );

    Ok(PostalCodes {
        table,
        retained,
        dropped,
    })
}

/// Filter the country-code dataset down to the retained countries
///
/// This function:
/// - Keeps the header, reduced to its ISO2 and English label columns
/// - Keeps rows whose ISO2 code (column 1) is retained, as `iso2;label`
/// - Logs `filter country {code}` for every other row
/// - Sorts kept rows by full row text
///
/// Fails with `MissingField` on any row with fewer than seven fields.
pub fn filter_country_codes<R: Read>(
    input: R,
    retained: &RetainedCountries,
) -> Result<CountryCodes> {
    let mut rows = parse_rows(input)?;

    let header = rows
        .next()
        .transpose()?
        .map(|row| row.project(&COUNTRY_COLUMNS))
        .transpose()?;

    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for row in rows {
        let row = row?;
        let iso2 = row.field(COUNTRY_ISO2_FIELD)?;
        if retained.contains(iso2) {
            kept.push(row.project(&COUNTRY_COLUMNS)?);
        } else {
            info!("filter country {}", iso2);
            dropped.push(iso2.to_string());
        }
    }

    let mut table = FilteredTable::new(header, kept);
    table.sort();

    debug!(
        kept = table.rows.len(),
        dropped = dropped.len(),
        "filtered country codes"
    );

    Ok(CountryCodes { table, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    const COUNTRIES: &str = r#"OFFICIAL LANG CODE;ISO2 CODE;ISO3 CODE;ONU CODE;IS ILOMEMBER;IS RECEIVING QUEST;LABEL EN;LABEL FR;LABEL SP;Geo Shape;geo_point_2d
en;US;USA;840;Y;Y;United States of America;États-Unis d'Amérique;Estados Unidos de América;"{""type"": ""MultiPolygon""}";39.5,-98.7
ur;PK;PAK;586;Y;Y;Pakistan;Pakistan;Pakistán;"{""type"": ""Polygon""}";29.9,69.3
fr;FR;FRA;250;Y;Y;France;France;Francia;"{""type"": ""MultiPolygon""}";46.2,2.2
nl;BE;BEL;56;Y;Y;Belgium;Belgique;Bélgica;;50.6,4.6
"#;

    #[test]
    fn test_postal_exclusion() {
        let input = "country code;postal code;place name;admin name1\nUS;10001;NYC;New York\nPK;00001;Karachi;Sindh\nFR;75000;Paris;Île-de-France\n";

        let result = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap();

        assert_eq!(
            result.table.header.as_deref(),
            Some("country code;postal code;place name")
        );
        assert_eq!(result.table.rows, vec!["FR;75000;Paris", "US;10001;NYC"]);
        assert_eq!(result.retained.sorted(), vec!["FR", "US"]);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_postal_duplicates_counted_once() {
        let input = r#"country code;postal code;place name
BE;1083;Ganshoren
BE;1080;Molenbeek-Saint-Jean
BE;1081;Koekelberg
"#;

        let result = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap();

        assert_eq!(result.retained.len(), 1);
        assert_eq!(
            result.table.rows,
            vec![
                "BE;1080;Molenbeek-Saint-Jean",
                "BE;1081;Koekelberg",
                "BE;1083;Ganshoren"
            ]
        );
    }

    #[test]
    fn test_postal_header_never_filtered() {
        // Header whose first column looks like an excluded code
        let input = "PK;postal code;place name\nFR;75000;Paris\n";

        let result = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap();

        assert_eq!(result.table.header.as_deref(), Some("PK;postal code;place name"));
        assert!(!result.retained.contains("PK"));
    }

    #[test]
    fn test_postal_empty_input() {
        let result = filter_postal_codes("".as_bytes(), &ExclusionSet::default()).unwrap();

        assert_eq!(result.table, FilteredTable::default());
        assert!(result.retained.is_empty());
    }

    #[test]
    fn test_postal_short_row_fails() {
        let input = "country code;postal code;place name\nFR;75000\n";

        let err = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 2,
                index: 2,
                found: 2
            }
        ));
    }

    #[test]
    fn test_postal_short_excluded_row_is_dropped() {
        // Excluded rows are discarded before the other columns are read
        let input = "country code;postal code;place name\nPK\nFR;75000;Paris\n";

        let result = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap();

        assert_eq!(result.table.rows, vec!["FR;75000;Paris"]);
    }

    #[test]
    fn test_postal_custom_exclusions() {
        let input = "h0;h1;h2\nUS;10001;NYC\nFR;75000;Paris\n";

        let result = filter_postal_codes(input.as_bytes(), &ExclusionSet::new(["US"])).unwrap();

        assert_eq!(result.table.rows, vec!["FR;75000;Paris"]);
        assert!(!result.retained.contains("US"));
    }

    #[test]
    fn test_country_filter() {
        let retained: RetainedCountries = ["US", "FR"].into_iter().collect();

        let result = filter_country_codes(COUNTRIES.as_bytes(), &retained).unwrap();

        assert_eq!(result.table.header.as_deref(), Some("ISO2 CODE;LABEL EN"));
        assert_eq!(
            result.table.rows,
            vec!["FR;France", "US;United States of America"]
        );
        assert_eq!(result.dropped, vec!["PK", "BE"]);
    }

    #[test]
    fn test_country_filter_empty_retained() {
        let result = filter_country_codes(COUNTRIES.as_bytes(), &RetainedCountries::new()).unwrap();

        assert!(result.table.rows.is_empty());
        assert_eq!(result.dropped.len(), 4);
        assert_eq!(result.table.header.as_deref(), Some("ISO2 CODE;LABEL EN"));
    }

    #[test]
    fn test_country_short_row_fails() {
        let input = "a;b;c;d;e;f;g\nen;US;USA\n";
        let retained: RetainedCountries = ["US"].into_iter().collect();

        let err = filter_country_codes(input.as_bytes(), &retained).unwrap_err();

        assert!(matches!(err, FilterError::MissingField { index: 6, .. }));
    }

    #[test]
    fn test_postal_blank_line_fails() {
        let input = "country code;postal code;place name\nFR;75000;Paris\n\nUS;10001;NYC\n";

        let err = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 3,
                index: 0,
                found: 0
            }
        ));
    }

    #[test]
    fn test_postal_blank_first_line_fails() {
        // The blank line is the header, data rows must not take its place
        let input = "\nFR;75000;Paris\nUS;10001;NYC\n";

        let err = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 1,
                index: 0,
                found: 0
            }
        ));
    }

    #[test]
    fn test_postal_trailing_blank_line_fails() {
        let input = "country code;postal code;place name\nFR;75000;Paris\n\n";

        let err = filter_postal_codes(input.as_bytes(), &ExclusionSet::default()).unwrap_err();

        assert!(matches!(err, FilterError::MissingField { line: 3, .. }));
    }

    #[test]
    fn test_country_blank_line_fails() {
        let input = format!("{}\n", COUNTRIES);
        let retained: RetainedCountries = ["US", "FR"].into_iter().collect();

        let err = filter_country_codes(input.as_bytes(), &retained).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 6,
                index: 1,
                found: 0
            }
        ));
    }

    #[test]
    fn test_country_short_dropped_row_fails() {
        // Column 1 is read before deciding to drop the row
        let input = "a;ISO2 CODE;c;d;e;f;LABEL EN\nen\nfr;FR;FRA;250;Y;Y;France\n";
        let retained: RetainedCountries = ["FR"].into_iter().collect();

        let err = filter_country_codes(input.as_bytes(), &retained).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 2,
                index: 1,
                found: 1
            }
        ));
    }

    #[test]
    fn test_short_header_fails() {
        let err = filter_country_codes("a;b\n".as_bytes(), &RetainedCountries::new()).unwrap_err();

        assert!(matches!(
            err,
            FilterError::MissingField {
                line: 1,
                index: 6,
                ..
            }
        ));
    }
}

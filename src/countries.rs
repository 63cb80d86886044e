use rustc_hash::FxHashSet;

/// Country codes dropped from the postal dataset
pub const EXCLUDED_COUNTRY_CODES: [&str; 16] = [
    "PK", "IN", "MY", "TH", "SG", "JP", "KR", "ZA", "PH", "PW", "RU", "BY", "RS", "UA", "MX", "BR",
];

/// Country codes whose postal rows are removed unconditionally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet(FxHashSet<String>);

impl ExclusionSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExclusionSet(codes.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        ExclusionSet::new(EXCLUDED_COUNTRY_CODES)
    }
}

/// Distinct country codes seen on kept postal rows
///
/// Built while filtering postal codes, then used as the membership filter
/// for the country metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedCountries(FxHashSet<String>);

impl RetainedCountries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a code, returns false if it was already present
    pub fn insert(&mut self, code: &str) -> bool {
        if self.0.contains(code) {
            return false;
        }
        self.0.insert(code.to_string())
    }

    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes in ascending order
    pub fn sorted(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.0.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl<S: Into<String>> FromIterator<S> for RetainedCountries {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RetainedCountries(iter.into_iter().map(Into::into).collect())
    }
}

use std::io::Write;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha512};

/// Supported digest algorithms for output checksums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-256 checksum
    Sha256,
    /// SHA-512 checksum
    Sha512,
}

impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(format!(
                "unknown digest algorithm '{}', supported: sha256, sha512",
                s
            )),
        }
    }
}

/// Writer that hashes every byte the inner writer accepts
pub struct DigestWriter<W, D> {
    inner: W,
    hasher: D,
}

impl<W: Write, D: Digest> DigestWriter<W, D> {
    pub fn new(inner: W) -> Self {
        DigestWriter {
            inner,
            hasher: D::new(),
        }
    }

    /// Hex-encoded checksum of everything written so far
    pub fn finalize_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<W: Write, D: Digest> Write for DigestWriter<W, D> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        Digest::update(&mut self.hasher, &buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// A pruned dataset: reconstructed header plus kept rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredTable {
    /// `None` when the input had no rows at all
    pub header: Option<String>,
    pub rows: Vec<String>,
}

impl FilteredTable {
    pub fn new(header: Option<String>, rows: Vec<String>) -> Self {
        FilteredTable { header, rows }
    }

    /// Sort the body rows by full row text, header untouched
    pub fn sort(&mut self) {
        self.rows.sort_unstable();
    }

    /// Header followed by body rows, in output order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.header
            .as_deref()
            .into_iter()
            .chain(self.rows.iter().map(String::as_str))
    }

    /// Write lines joined by `\n`, with no trailing newline
    ///
    /// Returns:
    /// - `Ok(None)` if no digest algorithm was specified
    /// - `Ok(Some(hex_string))` with the checksum of the bytes written
    pub fn write_to<W: Write>(
        &self,
        output: &mut W,
        digest_algorithm: Option<DigestAlgorithm>,
    ) -> std::io::Result<Option<String>> {
        let digest = match digest_algorithm {
            Some(DigestAlgorithm::Sha256) => Some(self.write_hashed::<_, Sha256>(output)?),
            Some(DigestAlgorithm::Sha512) => Some(self.write_hashed::<_, Sha512>(output)?),
            None => {
                self.write_lines(output)?;
                output.flush()?;
                None
            }
        };
        Ok(digest)
    }

    fn write_hashed<W: Write, D: Digest>(&self, output: &mut W) -> std::io::Result<String> {
        let mut writer = DigestWriter::<_, D>::new(output);
        self.write_lines(&mut writer)?;
        writer.flush()?;
        Ok(writer.finalize_hex())
    }

    fn write_lines<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                output.write_all(b"\n")?;
            }
            output.write_all(line.as_bytes())?;
        }
        Ok(())
    }
}

//! Identifier redaction.
//!
//! Raw exports embed tracker issue keys (`AHCAH-12345`) in summaries and
//! link columns. The redactor masks the numeric part before any other stage
//! sees the data, working on the file as plain text so the CSV structure is
//! untouched.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// What one file's redaction did.
#[derive(Debug, Clone, Copy)]
pub struct RedactOutcome {
    /// Number of identifier occurrences masked.
    pub replaced: usize,
}

/// Masks issue keys for one identifier prefix.
#[derive(Debug)]
pub struct Redactor {
    pattern: Regex,
    replacement: String,
}

impl Redactor {
    /// Builds a redactor for `prefix`, masking the digits with `mask`.
    ///
    /// Only runs of two or more digits count as an issue key; a single digit
    /// after the prefix is left alone.
    pub fn new(prefix: &str, mask: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("{}-[0-9]{{2,}}", regex::escape(prefix)))
            .context("compile redaction pattern")?;
        Ok(Self {
            pattern,
            replacement: format!("{prefix}-{mask}"),
        })
    }

    /// Masks every identifier occurrence in `text`.
    pub fn redact_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, self.replacement.as_str())
    }

    /// Counts identifier occurrences without rewriting anything. Dry runs
    /// report through this.
    pub fn count_in_text(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// Reads `src`, masks identifiers, and writes the result to `dest`.
    ///
    /// Files without a match are still written so every input has a redacted
    /// counterpart for the next stage to pick up.
    pub fn redact_file(&self, src: &Path, dest: &Path) -> Result<RedactOutcome> {
        let text =
            fs::read_to_string(src).with_context(|| format!("read {}", src.display()))?;
        let replaced = self.count_in_text(&text);
        let redacted = self.redact_text(&text);
        fs::write(dest, redacted.as_bytes())
            .with_context(|| format!("write {}", dest.display()))?;
        Ok(RedactOutcome { replaced })
    }
}

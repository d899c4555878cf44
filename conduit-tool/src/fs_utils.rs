use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Decides which paths the traversal leaves out of the archive.
///
/// Skip patterns are matched against the entry name relative to the root.
/// Excluded paths are absolute and compared as-is (the archive being written
/// is always excluded this way).
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    skip: Vec<Pattern>,
    excluded: Vec<PathBuf>,
}

impl EntryFilter {
    /// Compile skip patterns with proper error handling
    pub fn new(patterns: &[String]) -> Result<Self> {
        let skip = patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid skip pattern: {p}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skip,
            excluded: Vec::new(),
        })
    }

    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn is_skipped(&self, path: &Path, name: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == path)
            || self.skip.iter().any(|p| p.matches(name))
    }
}

/// Human-readable byte count for summaries: exact below 1 KiB, otherwise
/// binary units with at most one decimal.
pub fn encode_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }

    if size.fract() == 0.0 {
        format!("{size:.0} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}

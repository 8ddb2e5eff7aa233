use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::system::error::CounterError;
use crate::system::ticker::Ticker;

/// Raw counter value as read from sysfs.
///
/// Wide enough for any unsigned 64-bit hardware counter as well as a signed
/// literal.
pub type CounterValue = i128;

/// Counter name -> cumulative value, all read during one pass.
pub type CounterSnapshot = HashMap<String, CounterValue>;

/// The set of counter files discovered under one or more counter roots
/// (e.g. `.../ports/1/counters` and `.../ports/1/hw_counters`).
#[derive(Debug, Clone)]
pub struct CounterSource {
    /// counter name -> file path
    counters: HashMap<String, PathBuf>,
}

impl CounterSource {
    /// Enumerate every counter file directly beneath each root.
    ///
    /// Subdirectories are skipped. A name seen under two roots is an error
    /// because snapshots are keyed by bare name.
    pub fn new<P: AsRef<Path>>(roots: &[P]) -> Result<Self, CounterError> {
        let mut counters: HashMap<String, PathBuf> = HashMap::new();

        for root in roots {
            let root = root.as_ref();
            let entries = fs::read_dir(root).map_err(|source| CounterError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })?;

            let mut found: Vec<(String, PathBuf)> = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| CounterError::RootUnreadable {
                    path: root.to_path_buf(),
                    source,
                })?;
                let path = entry.path();
                if path.is_dir() {
                    continue;
                }
                found.push((entry.file_name().to_string_lossy().into_owned(), path));
            }
            found.sort();

            info!(root = %root.display(), count = found.len(), "discovered counters");

            for (name, path) in found {
                if let Some(first) = counters.get(&name) {
                    return Err(CounterError::DuplicateCounterName {
                        name,
                        first: first.clone(),
                        second: path,
                    });
                }
                counters.insert(name, path);
            }
        }

        Ok(Self { counters })
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counters.contains_key(name)
    }

    /// Check that every name in `required` was discovered.
    pub fn require<'a, I>(&self, required: I) -> Result<(), CounterError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in required {
            if !self.contains(name) {
                return Err(CounterError::MissingTrackedCounter {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Read every known counter once. Fails on the first unreadable or
    /// unparseable file.
    pub fn read_all(&self) -> Result<CounterSnapshot, CounterError> {
        let mut snapshot = CounterSnapshot::with_capacity(self.counters.len());
        for (name, path) in &self.counters {
            snapshot.insert(name.clone(), read_counter(name, path)?);
        }
        debug!(count = snapshot.len(), "read counter snapshot");
        Ok(snapshot)
    }

    /// Turn this source into an endless stream of snapshots, one per
    /// `period`.
    pub fn periodic(self, period: Duration) -> Periodic {
        Periodic {
            source: self,
            ticker: Ticker::new(period),
        }
    }
}

/// Infinite iterator of snapshots paced by a [`Ticker`]. Never returns `None`.
#[derive(Debug)]
pub struct Periodic {
    source: CounterSource,
    ticker: Ticker,
}

impl Periodic {
    pub fn degraded_ticks(&self) -> u64 {
        self.ticker.degraded_ticks()
    }
}

impl Iterator for Periodic {
    type Item = Result<CounterSnapshot, CounterError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ticker.wait();
        Some(self.source.read_all())
    }
}

fn read_counter(name: &str, path: &Path) -> Result<CounterValue, CounterError> {
    let text = fs::read_to_string(path).map_err(|e| CounterError::CounterReadError {
        name: name.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_counter_literal(&text).map_err(|reason| CounterError::CounterReadError {
        name: name.to_string(),
        path: path.to_path_buf(),
        reason,
    })
}

/// Strict integer-literal parser for counter file contents.
///
/// Accepts surrounding whitespace, an optional sign, an optional `0x`/`0o`/`0b`
/// radix prefix and single `_` separators between digits. Anything else is
/// rejected.
pub fn parse_counter_literal(text: &str) -> Result<CounterValue, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty counter file".into());
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        Some("0o") | Some("0O") => (8, &unsigned[2..]),
        Some("0b") | Some("0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    if body.is_empty() {
        return Err(format!("not an integer literal: {:?}", trimmed));
    }
    if body.starts_with('_') || body.ends_with('_') || body.contains("__") {
        return Err(format!("misplaced digit separator in {:?}", trimmed));
    }

    let digits: String = body.chars().filter(|&c| c != '_').collect();
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("not an integer literal: {:?}", trimmed));
    }

    let magnitude = CounterValue::from_str_radix(&digits, radix)
        .map_err(|e| format!("{:?}: {}", trimmed, e))?;
    Ok(if negative { -magnitude } else { magnitude })
}

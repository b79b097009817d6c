//! Block count and missing-sprite reports.

use std::collections::HashMap;
use std::io::{self, Write};

/// Occurrence counts per display name, preserving first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct BlockCounts {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl BlockCounts {
    /// Count one occurrence of a name.
    pub fn add(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.order.push(name.to_owned());
                self.counts.insert(name.to_owned(), 1);
            }
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(name, count)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.counts[name]))
    }
}

fn stack_phrase(count: u64, stack_size: u64) -> String {
    format!("{} stack and {}", count / stack_size, count % stack_size)
}

/// Write the block counts as a semicolon-separated table with per-stack
/// breakdowns for 64- and 16-item stacks.
pub fn write_counts<W: Write>(mut writer: W, counts: &BlockCounts) -> io::Result<()> {
    write!(writer, "Block; Number; Stack x64; Stack x16")?;
    for (name, count) in counts.iter() {
        write!(
            writer,
            "\n{};{};{};{}",
            name,
            count,
            stack_phrase(count, 64),
            stack_phrase(count, 16),
        )?;
    }
    Ok(())
}

/// Write the missing-sprite entries, one per line.
pub fn write_missing<W: Write>(mut writer: W, missing: &[String]) -> io::Result<()> {
    for entry in missing {
        writeln!(writer, "{entry}")?;
    }
    Ok(())
}

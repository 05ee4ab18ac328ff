//! Line range value object

use serde::{Deserialize, Serialize};

/// Inclusive, 1-based line range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Builds a range, swapping the bounds if they arrive reversed
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Parses `12-20` or a single line `12`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.split_once('-') {
            Some((start, end)) => {
                let start = start.trim().parse().ok()?;
                let end = end.trim().parse().ok()?;
                Some(Self::new(start, end))
            }
            None => {
                let line = value.parse().ok()?;
                Some(Self::new(line, line))
            }
        }
    }

    pub fn intersects(&self, other: &LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_line() {
            write!(f, "#{}", self.start)
        } else {
            write!(f, "#{}-{}", self.start, self.end)
        }
    }
}

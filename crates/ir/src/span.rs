// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Source positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive source offsets of a segment in the original SQL text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Span {
    pub start: usize,
    pub stop: usize,
}

impl Span {
    pub const fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Smallest span covering both `self` and `other`
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            stop: self.stop.max(other.stop),
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_and_contains() {
        let a = Span::new(7, 12);
        let b = Span::new(20, 25);
        let covered = a.cover(b);

        assert_eq!(covered, Span::new(7, 25));
        assert!(covered.contains(&a));
        assert!(!a.contains(&b));
        assert_eq!(covered.to_string(), "7..=25");
    }
}

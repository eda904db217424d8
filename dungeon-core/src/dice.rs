//! Dice rolling.
//!
//! A pool is `count` dice with `sides` faces each, written `NdS` in dice
//! notation. Rolling sums independent uniform draws from `[1, sides]`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(i64),
    #[error("No dice specified")]
    NoDice,
}

/// A homogeneous pool of dice, e.g. `3d6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    pub count: i64,
    pub sides: i64,
}

impl DicePool {
    pub const fn new(count: i64, sides: i64) -> Self {
        Self { count, sides }
    }

    /// Parse `NdS` notation. The count may be omitted (`d20`).
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation = notation.trim().to_lowercase();
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let (count_str, sides_str) = notation
            .split_once('d')
            .ok_or_else(|| DiceError::InvalidNotation(notation.clone()))?;

        let count: i64 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.clone()))?
        };
        if count < 0 {
            return Err(DiceError::InvalidNotation(notation));
        }

        let sides: i64 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.clone()))?;
        if sides < 1 {
            return Err(DiceError::InvalidDieSize(sides));
        }

        Ok(Self { count, sides })
    }

    /// Smallest possible total.
    pub fn min(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.count
        }
    }

    /// Largest possible total.
    pub fn max(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.count.saturating_mul(self.sides)
        }
    }

    /// A pool with no dice or faceless dice always totals zero.
    pub fn is_empty(&self) -> bool {
        self.count <= 0 || self.sides <= 0
    }

    /// Roll the pool and return the sum.
    pub fn roll(&self) -> i64 {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> i64 {
        if self.is_empty() {
            return 0;
        }
        (0..self.count).fold(0i64, |total, _| {
            total.saturating_add(rng.gen_range(1..=self.sides))
        })
    }
}

impl FromStr for DicePool {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DicePool::parse(s)
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Sum of `count` rolls of a `sides`-faced die; zero when either is not positive.
pub fn roll(count: i64, sides: i64) -> i64 {
    DicePool::new(count, sides).roll()
}

/// [`roll`] with a specific RNG.
pub fn roll_with_rng<R: Rng>(count: i64, sides: i64, rng: &mut R) -> i64 {
    DicePool::new(count, sides).roll_with_rng(rng)
}

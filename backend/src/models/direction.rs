//! Compass approaches into the intersection.
//!
//! The canonical cycle order is North → East → South → West. Every scan that
//! needs a tie-break (priority, shortest-job, round robin) walks directions in
//! this order.

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four approaches, each owning a FIFO queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in canonical cycle order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Position in the canonical cycle (North = 0)
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Next direction in the cycle, wrapping West → North
    ///
    /// # Example
    /// ```
    /// use traffic_scheduler_core::Direction;
    ///
    /// assert_eq!(Direction::North.next(), Direction::East);
    /// assert_eq!(Direction::West.next(), Direction::North);
    /// ```
    pub fn next(self) -> Direction {
        Direction::ALL[(self.index() + 1) % Direction::ALL.len()]
    }

    /// Directions following `self` in cycle order, ending with `self`
    pub fn cycle_after(self) -> impl Iterator<Item = Direction> {
        let start = self.index();
        (1..=Direction::ALL.len()).map(move |offset| Direction::ALL[(start + offset) % Direction::ALL.len()])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            _ => Err(SimulationError::UnknownDirection(s.to_string())),
        }
    }
}

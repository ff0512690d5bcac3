//! Integer lines and the trajectories projectiles follow along them.

use crate::state::Position;

/// Straight line between two cells, sampled with rounded DDA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub start: Position,
    pub end: Position,
}

/// Integer division rounding half away from zero. `b` must be positive.
fn round_div(a: i32, b: i32) -> i32 {
    if a >= 0 {
        (2 * a + b) / (2 * b)
    } else {
        -((-2 * a + b) / (2 * b))
    }
}

impl Line {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Number of steps from start to end.
    pub fn length(&self) -> u32 {
        self.start.chebyshev_distance(self.end)
    }

    /// True when start and end coincide.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Cell at `step` along the line. Steps past the end keep extending it.
    pub fn coord_at(&self, step: u32) -> Position {
        let n = self.length() as i32;
        if n == 0 {
            return self.start;
        }
        let step = step as i32;
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        Position::new(
            self.start.x + round_div(dx * step, n),
            self.start.y + round_div(dy * step, n),
        )
    }

    /// Cells after `start` up to and including `end`.
    pub fn trajectory(self) -> Trajectory {
        Trajectory {
            line: self,
            step: 0,
            infinite: false,
        }
    }

    /// Cells after `start`, continuing past `end` without bound.
    pub fn infinite_trajectory(self) -> Trajectory {
        Trajectory {
            line: self,
            step: 0,
            infinite: true,
        }
    }
}

/// Resumable walk along a [`Line`].
///
/// Projectiles carry their trajectory by value so a later action can keep
/// walking from wherever the previous one stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trajectory {
    line: Line,
    step: u32,
    infinite: bool,
}

impl Trajectory {
    pub fn line(&self) -> Line {
        self.line
    }

    /// Last cell yielded, or the start if nothing has been yielded yet.
    pub fn current(&self) -> Position {
        self.line.coord_at(self.step)
    }
}

impl Iterator for Trajectory {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.line.is_point() {
            return None;
        }
        if !self.infinite && self.step >= self.line.length() {
            return None;
        }
        self.step += 1;
        Some(self.line.coord_at(self.step))
    }
}

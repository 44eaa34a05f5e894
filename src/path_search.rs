//! Shortest paths over a grid of entry costs where straight runs are bounded.
//!
//! A path moves one cell at a time in the four cardinal directions and pays the cost of each cell
//! it enters. It may never reverse, may not continue straight for more than `max_run` cells, and
//! must have gone straight for at least `min_run` cells before it turns or stops.
//!
//! Because the legal moves depend on how the path arrived at a cell, the search runs over
//! `(position, heading, run)` states instead of plain cells.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use aoc_framework::parsing::parse_digit_grid;
use aoc_framework::{DynamicResult, ParseData};
use nalgebra::{DMatrix, Point2, Vector2};
use thiserror::Error;

/// A cell coordinate: `x` is the column, `y` the row, both from the top left.
pub type Position = Point2<i32>;

/// An error configuring or running a path search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathSearchError {
    #[error(
        "invalid run limits (min {min_run}, max {max_run}): max must be positive and at least min"
    )]
    InvalidRunLimits { min_run: u8, max_run: u8 },

    #[error("{role} position {position} is outside the grid")]
    OutOfBounds {
        role: &'static str,
        position: Position,
    },

    #[error("accumulated path cost overflowed")]
    CostOverflow,
}

/// Bounds on how many cells a path travels in a straight line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    min_run: u8,
    max_run: u8,
}

impl RunLimits {
    /// Create limits, rejecting combinations no path could satisfy.
    ///
    /// # Errors
    ///
    /// [`PathSearchError::InvalidRunLimits`] if `max_run` is zero or below `min_run`.
    pub fn new(min_run: u8, max_run: u8) -> Result<Self, PathSearchError> {
        if max_run == 0 || min_run > max_run {
            return Err(PathSearchError::InvalidRunLimits { min_run, max_run });
        }
        Ok(Self { min_run, max_run })
    }

    /// Whether a path that has gone `run` cells straight may turn or stop.
    fn allows_turn(self, run: u8) -> bool {
        (self.min_run..=self.max_run).contains(&run)
    }
}

/// A unit step direction. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Heading {
    dx: i32,
    dy: i32,
}

impl Heading {
    const RIGHT: Self = Self { dx: 1, dy: 0 };
    const DOWN: Self = Self { dx: 0, dy: 1 };

    /// Rotate 90 degrees counterclockwise as seen on screen.
    fn turn_left(self) -> Self {
        Self {
            dx: self.dy,
            dy: -self.dx,
        }
    }

    /// Rotate 90 degrees clockwise as seen on screen.
    fn turn_right(self) -> Self {
        Self {
            dx: -self.dy,
            dy: self.dx,
        }
    }

    fn as_vector(self) -> Vector2<i32> {
        Vector2::new(self.dx, self.dy)
    }
}

/// A node of the search.
///
/// Two arrivals at the same cell are the same node only when they share heading and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchState {
    position: Position,
    heading: Heading,
    /// Cells travelled in a straight line along `heading`, 0 for the start before any move.
    run: u8,
}

impl SearchState {
    fn advance(self, heading: Heading, run: u8) -> Self {
        Self {
            position: self.position + heading.as_vector(),
            heading,
            run,
        }
    }

    /// States reachable with one move, not yet checked against the grid bounds.
    ///
    /// A start state (run 0) is always allowed to move straight, so the first move never waits on
    /// `min_run`.
    fn successors(self, limits: RunLimits) -> impl Iterator<Item = Self> {
        let straight =
            (self.run < limits.max_run).then(|| self.advance(self.heading, self.run + 1));
        let turns = limits.allows_turn(self.run).then(|| {
            [self.heading.turn_left(), self.heading.turn_right()]
                .map(|heading| self.advance(heading, 1))
        });
        straight.into_iter().chain(turns.into_iter().flatten())
    }
}

/// A queued state with its accumulated cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    /// Accumulated cost plus the remaining-cost estimate.
    priority: u32,
    /// Insertion order, so equal priorities pop first in first out.
    tie_breaker: u64,
    cost: u32,
    state: SearchState,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // flip both comparisons for a min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.tie_breaker.cmp(&self.tie_breaker))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_tie_breaker: u64,
}

impl Frontier {
    fn push(&mut self, priority: u32, cost: u32, state: SearchState) {
        self.heap.push(FrontierEntry {
            priority,
            tie_breaker: self.next_tie_breaker,
            cost,
            state,
        });
        self.next_tie_breaker += 1;
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }
}

fn manhattan_distance(a: Position, b: Position) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// An immutable grid where each cell holds the cost of entering it.
#[derive(Debug, Clone)]
pub struct CostGrid {
    cells: DMatrix<u8>,
    /// The cheapest cell, scaling the distance estimate so it never overestimates.
    min_cost: u8,
}

#[derive(Error, Debug)]
pub enum ParseCostGridError {
    #[error("grid dimension {0} is too large for a coordinate")]
    DimensionOverflow(usize),
}

impl ParseData for CostGrid {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let rows = parse_digit_grid(input)?;
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        for dimension in [width, height] {
            i32::try_from(dimension)
                .map_err(|_| ParseCostGridError::DimensionOverflow(dimension))?;
        }

        let cells = DMatrix::from_row_iterator(height, width, rows.into_iter().flatten());
        let min_cost = cells.iter().copied().min().unwrap_or(0);
        Ok(Self { cells, min_cost })
    }
}

impl CostGrid {
    /// The largest valid coordinate, `(xmax, ymax)`.
    pub fn bounds(&self) -> Position {
        // dimensions were checked to fit when parsing
        let xmax = i32::try_from(self.cells.ncols()).unwrap_or(i32::MAX) - 1;
        let ymax = i32::try_from(self.cells.nrows()).unwrap_or(i32::MAX) - 1;
        Position::new(xmax, ymax)
    }

    pub fn bottom_right(&self) -> Position {
        self.bounds()
    }

    /// The cost of entering `position`, or `None` outside the grid.
    pub fn cost(&self, position: Position) -> Option<u8> {
        let col = usize::try_from(position.x).ok()?;
        let row = usize::try_from(position.y).ok()?;
        self.cells.get((row, col)).copied()
    }

    /// Find the minimal total cost of a path from `start` to `goal` within `limits`.
    ///
    /// The cost of the start cell is not paid. Returns `Ok(None)` when no path satisfies the
    /// limits. A `start` equal to `goal` costs 0 whatever the limits.
    ///
    /// # Errors
    ///
    /// [`PathSearchError::OutOfBounds`] if `start` or `goal` is outside the grid, and
    /// [`PathSearchError::CostOverflow`] if a path cost exceeds `u32`.
    #[tracing::instrument(level = "debug", skip(self), ret)]
    pub fn min_total_cost(
        &self,
        start: Position,
        goal: Position,
        limits: RunLimits,
    ) -> Result<Option<u32>, PathSearchError> {
        for (role, position) in [("start", start), ("goal", goal)] {
            if self.cost(position).is_none() {
                return Err(PathSearchError::OutOfBounds { role, position });
            }
        }
        if start == goal {
            return Ok(Some(0));
        }

        let estimate = |position: Position| {
            manhattan_distance(position, goal).saturating_mul(u32::from(self.min_cost))
        };

        let mut best_costs: HashMap<SearchState, u32> = HashMap::new();
        let mut frontier = Frontier::default();

        // the start has no heading yet, so seed both canonical first moves
        for heading in [Heading::RIGHT, Heading::DOWN] {
            let state = SearchState {
                position: start,
                heading,
                run: 0,
            };
            best_costs.insert(state, 0);
            frontier.push(estimate(start), 0, state);
        }

        let mut expanded = 0usize;
        while let Some(FrontierEntry { cost, state, .. }) = frontier.pop() {
            if best_costs.get(&state).is_some_and(|&best| cost > best) {
                continue;
            }

            if state.position == goal && state.run >= limits.min_run {
                tracing::debug!(expanded, states = best_costs.len(), "goal reached");
                return Ok(Some(cost));
            }
            expanded += 1;

            for next in state.successors(limits) {
                let Some(entry_cost) = self.cost(next.position) else {
                    continue;
                };
                let next_cost = cost
                    .checked_add(u32::from(entry_cost))
                    .ok_or(PathSearchError::CostOverflow)?;

                if best_costs.get(&next).is_none_or(|&best| next_cost < best) {
                    best_costs.insert(next, next_cost);
                    frontier.push(
                        next_cost.saturating_add(estimate(next.position)),
                        next_cost,
                        next,
                    );
                }
            }
        }

        tracing::debug!(expanded, states = best_costs.len(), "frontier exhausted");
        Ok(None)
    }
}

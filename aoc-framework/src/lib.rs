//! Framework of traits and utilities for solving Advent of Code puzzles.
//!
//! A puzzle day is solved in up to three steps: parse the raw input once, then solve part one and
//! part two against the parsed data. Each step is a trait in this crate so the [`runner`] can time
//! and report them uniformly.
//!
//! # Quick Start
//!
//! 1. Define an input type and implement [`ParseData`]:
//!
//! ```
//! # use aoc_framework::{DynamicResult, ParseData};
//! # use aoc_framework::parsing::parse_digit_grid;
//! #
//! struct Heights(Vec<Vec<u8>>);
//!
//! impl ParseData for Heights {
//!     fn parse(input: &str) -> DynamicResult<Self> {
//!         Ok(Self(parse_digit_grid(input)?))
//!     }
//! }
//! ```
//!
//! 2. Implement [`Solution`] for a part:
//!
//! ```
//! # use aoc_framework::{DynamicResult, ParseData, PartOne, Solution};
//! # use aoc_framework::parsing::parse_digit_grid;
//! #
//! # struct Heights(Vec<Vec<u8>>);
//! # impl ParseData for Heights {
//! #     fn parse(input: &str) -> DynamicResult<Self> {
//! #         Ok(Self(parse_digit_grid(input)?))
//! #     }
//! # }
//! #
//! struct Tallest;
//!
//! impl Solution<PartOne> for Tallest {
//!     type Input = Heights;
//!     type Output = u8;
//!
//!     fn solve(input: &Self::Input) -> DynamicResult<u8> {
//!         Ok(input.0.iter().flatten().copied().max().unwrap_or(0))
//!     }
//! }
//! ```
//!
//! 3. Run it through the [`runner`] module, usually via
//!    [`#[solution_runner]`][runner::solution_runner].
//!
//! # Solutions over raw input
//!
//! Setting [`Solution::Input`] to `str` skips the parse step entirely:
//!
//! ```
//! use aoc_framework::{DynamicResult, PartOne, Solution};
//!
//! struct BlankLines;
//!
//! impl Solution<PartOne> for BlankLines {
//!     type Input = str;
//!     type Output = usize;
//!
//!     fn solve(input: &str) -> DynamicResult<usize> {
//!         Ok(input.lines().filter(|line| line.trim().is_empty()).count())
//!     }
//! }
//! ```

#![warn(clippy::pedantic)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::branches_sharing_code,
    clippy::collection_is_never_read,
    clippy::equatable_if_let,
    clippy::needless_collect,
    clippy::needless_pass_by_ref_mut,
    clippy::option_if_let_else,
    clippy::set_contains_or_insert,
    clippy::suboptimal_flops,
    clippy::suspicious_operation_groupings,
    clippy::trait_duplication_in_bounds,
    clippy::type_repetition_in_bounds,
    clippy::use_self,
    clippy::useless_let_if_seq
)]
#![deny(
    clippy::expect_used,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::unwrap_used
)]

use std::error::Error;
use std::fmt::Display;

// lets `#[solution_runner]` expansions resolve inside this crate's own tests
extern crate self as aoc_framework;

pub mod parsing;
pub mod runner;

mod private {
    /// Seals [`Part`][super::Part] so only [`PartOne`][super::PartOne] and
    /// [`PartTwo`][super::PartTwo] exist.
    pub trait Sealed {}
}

/// A boxed error that any solution step may return.
pub type DynamicError = Box<dyn Error + Send + Sync + 'static>;
/// A result whose error is a [`DynamicError`].
pub type DynamicResult<T> = Result<T, DynamicError>;

/// Which half of a day's puzzle is being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    One,
    Two,
}

impl Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One => write!(f, "Part 1"),
            Self::Two => write!(f, "Part 2"),
        }
    }
}

/// A marker for the part a [`Solution<P>`] answers.
pub trait Part: private::Sealed {
    /// The runtime identity of this marker.
    fn kind() -> PartKind;
}

/// Marks a [`Solution`] for part one.
pub struct PartOne;
impl private::Sealed for PartOne {}
impl Part for PartOne {
    fn kind() -> PartKind {
        PartKind::One
    }
}

/// Marks a [`Solution`] for part two.
pub struct PartTwo;
impl private::Sealed for PartTwo {}
impl Part for PartTwo {
    fn kind() -> PartKind {
        PartKind::Two
    }
}

/// Solves one [`Part`] of a day.
///
/// A single type may implement both `Solution<PartOne>` and `Solution<PartTwo>` when the parts
/// share an input type.
pub trait Solution<P: Part> {
    /// The data handed to [`Solution::solve`], either `str` or a [`ParseData`] type.
    type Input: ?Sized;

    /// The answer reported for the part.
    type Output: Display;

    /// Compute the answer.
    ///
    /// # Errors
    ///
    /// Input that parsed but cannot be answered (e.g. a puzzle precondition does not hold) is
    /// reported as a dynamically dispatched error.
    fn solve(input: &Self::Input) -> DynamicResult<Self::Output>;
}

/// Data built once from the raw puzzle input and shared by both parts.
pub trait ParseData {
    /// Build an instance from the raw input.
    ///
    /// # Errors
    ///
    /// Malformed input is reported as a dynamically dispatched error. Helpers in [`parsing`]
    /// attach the offending line number.
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized;
}

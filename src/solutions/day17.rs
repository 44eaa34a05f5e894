use aoc_framework::runner::solution_runner;
use aoc_framework::{DynamicResult, PartOne, PartTwo, Solution};

use crate::path_search::{CostGrid, Position, RunLimits};

#[solution_runner(
    name = "Day 17: Clumsy Crucible",
    parsed = CostGrid,
    part_one = Day17,
    part_two = Day17
)]
impl super::AdventOfCode2023<17> {}

/*
Input is a digit grid of heat lost when a crucible enters each city block. The crucible starts in
the top left block (its heat is not lost) and must reach the bottom right block.

Part 1: a crucible moves at most 3 blocks straight before turning, never reversing.
Part 2: an ultra crucible moves at least 4 and at most 10 blocks straight before turning or
stopping.
*/

/// No route through the city satisfies the crucible's movement limits.
#[derive(thiserror::Error, Debug)]
#[error("no path from {start} to {goal} with straight runs between {min_run} and {max_run}")]
struct NoPathFound {
    start: Position,
    goal: Position,
    min_run: u8,
    max_run: u8,
}

fn least_heat_loss(city: &CostGrid, min_run: u8, max_run: u8) -> DynamicResult<u32> {
    let start = Position::origin();
    let goal = city.bottom_right();
    let limits = RunLimits::new(min_run, max_run)?;

    let heat_loss = city
        .min_total_cost(start, goal, limits)?
        .ok_or(NoPathFound {
            start,
            goal,
            min_run,
            max_run,
        })?;
    Ok(heat_loss)
}

struct Day17;

impl Solution<PartOne> for Day17 {
    type Input = CostGrid;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        least_heat_loss(input, 0, 3)
    }
}

impl Solution<PartTwo> for Day17 {
    type Input = CostGrid;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        least_heat_loss(input, 4, 10)
    }
}

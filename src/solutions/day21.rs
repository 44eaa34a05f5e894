use std::collections::HashSet;
use std::num::TryFromIntError;

use aoc_framework::parsing::parse_input_lines;
use aoc_framework::runner::solution_runner;
use aoc_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use nalgebra::{Point2, Vector2};

#[solution_runner(
    name = "Day 21: Step Counter",
    parsed = GardenMap,
    part_one = Day21,
    part_two = Day21
)]
impl super::AdventOfCode2023<21> {}

/*
Input is a character grid mapping garden plots: `S` for a start position, `.` for plots, `#` for
rocks. The start also acts as a plot. The map repeats infinitely in every direction, though only the
original tile's start is a start.
*/

/// A single tile of a garden map that repeats across the plane.
#[derive(Debug)]
struct GardenMap {
    /// The number of columns in the tile.
    width: i64,
    /// The number of rows in the tile.
    height: i64,
    /// The positions of rocks within the tile.
    rocks: HashSet<Point2<i64>>,
    start: Point2<i64>,
}

#[derive(thiserror::Error, Debug)]
enum GardenMapError {
    #[error("too many rows or columns to represent as coordinates")]
    IndexOverflow(#[source] TryFromIntError),

    #[error("expected grid width to be {expected} across rows, but found row width {found}")]
    UnequalGridWidth { expected: i64, found: i64 },

    #[error("invalid character in grid: {0:?}")]
    InvalidChar(char),

    #[error("found another start point after {first}: {second}")]
    MultipleStarts {
        first: Point2<i64>,
        second: Point2<i64>,
    },

    #[error("failed to find a start point")]
    MissingStart,

    #[error("extrapolating needs a square map, found {width}x{height}")]
    NotSquare { width: i64, height: i64 },

    #[error("{steps} steps is not a whole number of {period}-step periods past {offset}")]
    MisalignedSteps { steps: u64, period: u64, offset: u64 },

    #[error("plot count overflowed")]
    CountOverflow,
}

impl ParseData for GardenMap {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let mut width_opt = None;
        let mut start_opt = None;
        let mut rocks = HashSet::new();

        let height = parse_input_lines(input, |line_index, line| {
            let y = i64::try_from(line_index).map_err(GardenMapError::IndexOverflow)?;
            let line_width =
                i64::try_from(line.chars().count()).map_err(GardenMapError::IndexOverflow)?;
            match width_opt {
                Some(expected) if expected != line_width => {
                    return Err(GardenMapError::UnequalGridWidth {
                        expected,
                        found: line_width,
                    });
                }
                Some(_) => {}
                None => width_opt = Some(line_width),
            }

            for (x, ch) in (0..).zip(line.chars()) {
                let point = Point2::new(x, y);
                match ch {
                    '.' => {}
                    '#' => {
                        rocks.insert(point);
                    }
                    'S' => {
                        if let Some(first) = start_opt {
                            return Err(GardenMapError::MultipleStarts {
                                first,
                                second: point,
                            });
                        }
                        start_opt = Some(point);
                    }
                    _ => return Err(GardenMapError::InvalidChar(ch)),
                }
            }

            Ok(())
        })
        .try_fold(0, |rows, line| line.map(|()| rows + 1))?;

        let start = start_opt.ok_or(GardenMapError::MissingStart)?;
        Ok(Self {
            width: width_opt.unwrap_or(0),
            height,
            rocks,
            start,
        })
    }
}

/*
Plots can be navigated cardinally as individual steps onto plots but not rocks. The path traveled
can be backtracked, so a plot first reached in `d` steps can be stood on again after any larger step
count of the same parity.

For part 1, count how many plots can be reached in exactly 64 steps.
*/

impl GardenMap {
    /// Whether a point on the infinite plane is a plot, wrapping it into the original tile.
    fn is_plot(&self, point: Point2<i64>) -> bool {
        let wrapped = Point2::new(point.x.rem_euclid(self.width), point.y.rem_euclid(self.height));
        !self.rocks.contains(&wrapped)
    }

    /// Plots reachable in exactly `n` steps, for every `n` from 0 through `max_steps`.
    fn reachable_counts(&self, max_steps: usize) -> Vec<u64> {
        // breadth-first search one distance layer at a time
        let mut visited = HashSet::from([self.start]);
        let mut layer = vec![self.start];
        let mut counts = Vec::with_capacity(max_steps + 1);
        // plots first reached at even and odd distances so far
        let mut parity_totals = [0u64; 2];

        for distance in 0..=max_steps {
            parity_totals[distance % 2] += layer.len() as u64;
            counts.push(parity_totals[distance % 2]);

            let mut next_layer = Vec::new();
            for point in layer {
                for direction in [
                    Vector2::x(),
                    Vector2::y(),
                    Vector2::x() * -1,
                    Vector2::y() * -1,
                ] {
                    let neighbor = point + direction;
                    if self.is_plot(neighbor) && visited.insert(neighbor) {
                        next_layer.push(neighbor);
                    }
                }
            }
            layer = next_layer;
        }

        counts
    }

    fn count_reachable(&self, steps: usize) -> u64 {
        self.reachable_counts(steps).last().copied().unwrap_or(0)
    }
}

struct Day21;

impl Solution<PartOne> for Day21 {
    type Input = GardenMap;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.count_reachable(64))
    }
}

/*
For part 2, scale up to 26501365 steps.

The start's row and column are clear of rocks, so the reachable region grows by a whole tile in each
direction every `width` steps. Sampled once per period, the count is a quadratic in the period index,
which three samples pin down exactly.
*/

impl GardenMap {
    const PART_TWO_STEPS: u64 = 26_501_365;

    /// Count plots reachable in exactly `steps` steps by fitting a quadratic to three periodic
    /// samples of a direct search.
    fn extrapolate_reachable(&self, steps: u64) -> Result<u64, GardenMapError> {
        if self.width != self.height {
            return Err(GardenMapError::NotSquare {
                width: self.width,
                height: self.height,
            });
        }
        let period = u64::try_from(self.width).map_err(GardenMapError::IndexOverflow)?;
        let offset = u64::try_from(self.start.x).map_err(GardenMapError::IndexOverflow)?;
        let periods = steps
            .checked_sub(offset)
            .filter(|past| past.is_multiple_of(period))
            .ok_or(GardenMapError::MisalignedSteps {
                steps,
                period,
                offset,
            })?;
        let periods = i128::from(periods / period);

        let sample_steps = |index: u64| usize::try_from(offset + index * period);
        let last_sample = sample_steps(2).map_err(GardenMapError::IndexOverflow)?;
        let counts = self.reachable_counts(last_sample);
        let mut samples = [0i128; 3];
        for (index, sample) in (0..).zip(&mut samples) {
            let at = sample_steps(index).map_err(GardenMapError::IndexOverflow)?;
            *sample = i128::from(counts[at]);
        }
        tracing::debug!(?samples, period, offset, "sampled reachable plots");

        // Newton forward differences: f(k) = f(0) + k Δ + k(k-1)/2 Δ²
        let [first, second, third] = samples;
        let difference = second - first;
        let second_difference = third - 2 * second + first;
        let total = periods
            .checked_mul(periods - 1)
            .map(|pairs| pairs / 2)
            .and_then(|pairs| pairs.checked_mul(second_difference))
            .and_then(|curve| periods.checked_mul(difference)?.checked_add(curve))
            .and_then(|growth| growth.checked_add(first))
            .ok_or(GardenMapError::CountOverflow)?;
        u64::try_from(total).map_err(|_| GardenMapError::CountOverflow)
    }
}

impl Solution<PartTwo> for Day21 {
    type Input = GardenMap;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.extrapolate_reachable(GardenMap::PART_TWO_STEPS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = r"...........
.....###.#.
.###.##..#.
..#.#...#..
....#.#....
.##..S####.
.##..#...#.
.......##..
.##.#.####.
.##..##.##.
...........
";

    const OPEN_INPUT: &str = r".....
.....
..S..
.....
.....
";

    #[test]
    fn count_plots_from_few_steps_for_example() -> DynamicResult<()> {
        let parsed = GardenMap::parse(EXAMPLE_INPUT)?;
        assert_eq!(parsed.reachable_counts(3), vec![1, 2, 4, 6]);
        assert_eq!(parsed.count_reachable(6), 16);
        Ok(())
    }

    #[test]
    fn count_plots_across_repeated_tiles_for_example() -> DynamicResult<()> {
        let parsed = GardenMap::parse(EXAMPLE_INPUT)?;
        let counts = parsed.reachable_counts(100);
        assert_eq!(counts[10], 50);
        assert_eq!(counts[50], 1594);
        assert_eq!(counts[100], 6536);
        Ok(())
    }

    #[test]
    fn extrapolation_matches_open_plane() -> DynamicResult<()> {
        let parsed = GardenMap::parse(OPEN_INPUT)?;
        // on an open plane, n steps reach (n + 1)^2 plots
        assert_eq!(parsed.extrapolate_reachable(2)?, 9);
        assert_eq!(parsed.extrapolate_reachable(7)?, 64);
        assert_eq!(parsed.extrapolate_reachable(52)?, 2809);
        Ok(())
    }

    #[test]
    fn extrapolation_agrees_with_direct_search() -> DynamicResult<()> {
        let parsed = GardenMap::parse(
            r".....
.#.#.
..S..
.#.#.
.....
",
        )?;
        let direct = parsed.count_reachable(27);
        assert_eq!(parsed.extrapolate_reachable(27)?, direct);
        Ok(())
    }

    #[test]
    fn extrapolation_rejects_misaligned_steps() -> DynamicResult<()> {
        let parsed = GardenMap::parse(OPEN_INPUT)?;
        assert!(matches!(
            parsed.extrapolate_reachable(10),
            Err(GardenMapError::MisalignedSteps {
                period: 5,
                offset: 2,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn extrapolation_needs_square_map() -> DynamicResult<()> {
        let parsed = GardenMap::parse("...\n.S.\n")?;
        assert!(matches!(
            parsed.extrapolate_reachable(1),
            Err(GardenMapError::NotSquare { .. })
        ));
        Ok(())
    }

    #[test]
    fn rejects_malformed_maps() {
        assert!(GardenMap::parse("...\n.S.\n..\n").is_err());
        assert!(GardenMap::parse("S.S\n").is_err());
        assert!(GardenMap::parse("...\n").is_err());
        assert!(GardenMap::parse(".x.\n.S.\n").is_err());
    }
}

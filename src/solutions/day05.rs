use std::cmp;

use aoc_framework::parsing::{InputScanner, parse_with_context};
use aoc_framework::runner::solution_runner;
use aoc_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};

#[solution_runner(
    name = "Day 5: If You Give A Seed A Fertilizer",
    parsed = Almanac,
    part_one = Day05,
    part_two = Day05
)]
impl super::AdventOfCode2023<5> {}

/*
Input is an almanac of blocks separated by blank lines. The first block is a `seeds: ` line of
space-separated numbers. Each following block is a `<source>-to-<destination> map:` header and lines
of three numbers: destination range start, source range start, range length. The maps chain in the
order given, each one's destination feeding the next one's source. Numbers outside every range of a
map pass through unchanged.
*/

/// A half-open range of almanac numbers, `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    start: u64,
    len: u64,
}

impl Interval {
    fn between(start: u64, end: u64) -> Self {
        Self {
            start,
            len: end - start,
        }
    }

    fn end(self) -> u64 {
        self.start + self.len
    }
}

/// Translates source numbers in `[source_start, source_start + len)` to the destination range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MapRule {
    source_start: u64,
    destination_start: u64,
    len: u64,
}

impl MapRule {
    fn source_end(self) -> u64 {
        self.source_start + self.len
    }

    fn contains(self, value: u64) -> bool {
        (self.source_start..self.source_end()).contains(&value)
    }

    /// Translate a number known to be within the source range.
    fn translate(self, value: u64) -> u64 {
        value - self.source_start + self.destination_start
    }
}

/// One map of the almanac, its rules non-empty, ordered by source start and never overlapping.
#[derive(Debug)]
struct Stage {
    name: String,
    rules: Vec<MapRule>,
}

#[derive(thiserror::Error, Debug)]
enum AlmanacError {
    #[error("expected input to start with a \"seeds: \" line")]
    MissingSeeds,

    #[error("expected a map header ending with \" map:\", found: {0:?}")]
    ExpectedMapHeader(String),

    #[error("expected three space-separated numbers as a map range, found: {0:?}")]
    ExpectedRangeFormat(String),

    #[error("range starting at {0} overflows")]
    RangeOverflow(u64),

    #[error("ranges in the {name} map overlap at {at}")]
    OverlappingRanges { name: String, at: u64 },

    #[error("almanac defines no maps")]
    NoMaps,

    #[error("expected seed ranges as start and length pairs, found {0} numbers")]
    OddSeedCount(usize),

    #[error("no seeds to locate")]
    NoSeeds,
}

impl Stage {
    fn new(name: String, mut rules: Vec<MapRule>) -> Result<Self, AlmanacError> {
        // empty rules map nothing
        rules.retain(|rule| rule.len > 0);
        rules.sort_unstable_by_key(|rule| rule.source_start);
        if let Some(pair) = rules
            .windows(2)
            .find(|pair| pair[0].source_end() > pair[1].source_start)
        {
            return Err(AlmanacError::OverlappingRanges {
                name,
                at: pair[1].source_start,
            });
        }
        Ok(Self { name, rules })
    }

    fn map_value(&self, value: u64) -> u64 {
        // the last rule starting at or before the value is the only candidate
        let after = self.rules.partition_point(|rule| rule.source_start <= value);
        after
            .checked_sub(1)
            .map(|index| self.rules[index])
            .filter(|rule| rule.contains(value))
            .map_or(value, |rule| rule.translate(value))
    }

    /// Map a whole interval, splitting it wherever a rule begins or ends.
    ///
    /// Pieces are appended to `mapped` in source order.
    fn map_interval(&self, interval: Interval, mapped: &mut Vec<Interval>) {
        let end = interval.end();
        let first = interval.start;
        let mut cursor = first;

        for rule in self.rules.iter().skip_while(|rule| rule.source_end() <= first) {
            if rule.source_start >= end {
                break;
            }
            if cursor < rule.source_start {
                mapped.push(Interval::between(cursor, rule.source_start));
                cursor = rule.source_start;
            }

            let covered_end = cmp::min(end, rule.source_end());
            mapped.push(Interval {
                start: rule.translate(cursor),
                len: covered_end - cursor,
            });
            cursor = covered_end;
        }

        if cursor < end {
            mapped.push(Interval::between(cursor, end));
        }
    }
}

#[derive(Debug)]
struct Almanac {
    seeds: Vec<u64>,
    stages: Vec<Stage>,
}

impl ParseData for Almanac {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let mut scanner = InputScanner::new(input);

        let seeds = scanner
            .next_item(|_, line| -> DynamicResult<Vec<u64>> {
                let list = line
                    .strip_prefix("seeds:")
                    .ok_or(AlmanacError::MissingSeeds)?;
                let seeds = list
                    .split_whitespace()
                    .map(parse_with_context)
                    .collect::<Result<_, _>>()?;
                Ok(seeds)
            })?
            .ok_or(AlmanacError::MissingSeeds)?;

        let mut stages = Vec::new();
        while scanner.skip_empty().is_some() {
            let name = scanner
                .next_in_sequence(|_, line| {
                    line.strip_suffix(" map:")
                        .map(str::to_owned)
                        .ok_or_else(|| AlmanacError::ExpectedMapHeader(line.to_owned()))
                })?
                .ok_or(AlmanacError::NoMaps)?;

            let rules = scanner.collect_sequence(|_, line| -> DynamicResult<_> {
                let values: Vec<u64> = line
                    .split_whitespace()
                    .map(parse_with_context)
                    .collect::<Result<_, _>>()?;
                let &[destination_start, source_start, len] = values.as_slice() else {
                    return Err(AlmanacError::ExpectedRangeFormat(line.to_owned()).into());
                };
                if source_start.checked_add(len).is_none()
                    || destination_start.checked_add(len).is_none()
                {
                    return Err(AlmanacError::RangeOverflow(source_start).into());
                }

                Ok(MapRule {
                    source_start,
                    destination_start,
                    len,
                })
            })?;

            stages.push(Stage::new(name, rules)?);
        }

        if stages.is_empty() {
            return Err(AlmanacError::NoMaps.into());
        }
        Ok(Self { seeds, stages })
    }
}

/*
For part 1, run every seed number through all maps and answer the lowest final location number.
*/

impl Almanac {
    fn locate(&self, seed: u64) -> u64 {
        self.stages
            .iter()
            .fold(seed, |value, stage| stage.map_value(value))
    }
}

struct Day05;

impl Solution<PartOne> for Day05 {
    type Input = Almanac;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let lowest = input
            .seeds
            .iter()
            .map(|&seed| input.locate(seed))
            .min()
            .ok_or(AlmanacError::NoSeeds)?;
        Ok(lowest)
    }
}

/*
For part 2, the seeds line is pairs of range start and range length. There are far too many seeds to
map one by one, so whole ranges are mapped, splitting wherever a map range begins or ends.
*/

impl Almanac {
    fn seed_intervals(&self) -> Result<Vec<Interval>, AlmanacError> {
        if !self.seeds.len().is_multiple_of(2) {
            return Err(AlmanacError::OddSeedCount(self.seeds.len()));
        }
        self.seeds
            .chunks_exact(2)
            .map(|pair| {
                let (start, len) = (pair[0], pair[1]);
                start
                    .checked_add(len)
                    .map(|_| Interval { start, len })
                    .ok_or(AlmanacError::RangeOverflow(start))
            })
            .filter(|interval| !matches!(interval, Ok(Interval { len: 0, .. })))
            .collect()
    }

    fn locate_intervals(&self, seeds: Vec<Interval>) -> Vec<Interval> {
        self.stages.iter().fold(seeds, |intervals, stage| {
            let mut mapped = Vec::with_capacity(intervals.len());
            for interval in intervals {
                stage.map_interval(interval, &mut mapped);
            }
            tracing::debug!(stage = %stage.name, intervals = mapped.len(), "mapped stage");
            mapped
        })
    }
}

impl Solution<PartTwo> for Day05 {
    type Input = Almanac;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let seeds = input.seed_intervals()?;
        let lowest = input
            .locate_intervals(seeds)
            .iter()
            .map(|interval| interval.start)
            .min()
            .ok_or(AlmanacError::NoSeeds)?;
        Ok(lowest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = r"seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    fn seed_to_soil() -> DynamicResult<Stage> {
        let rules = vec![
            MapRule {
                source_start: 98,
                destination_start: 50,
                len: 2,
            },
            MapRule {
                source_start: 50,
                destination_start: 52,
                len: 48,
            },
        ];
        Ok(Stage::new("seed-to-soil".to_owned(), rules)?)
    }

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let parsed = Almanac::parse(EXAMPLE_INPUT)?;
        let result = <Day05 as Solution<PartOne>>::solve(&parsed)?;
        assert_eq!(result, 35);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let parsed = Almanac::parse(EXAMPLE_INPUT)?;
        let result = <Day05 as Solution<PartTwo>>::solve(&parsed)?;
        assert_eq!(result, 46);
        Ok(())
    }

    #[test]
    fn example_seeds_locate_individually() -> DynamicResult<()> {
        let parsed = Almanac::parse(EXAMPLE_INPUT)?;
        let locations: Vec<_> = parsed.seeds.iter().map(|&seed| parsed.locate(seed)).collect();
        assert_eq!(locations, vec![82, 43, 86, 35]);
        Ok(())
    }

    #[test]
    fn map_value_passes_through_gaps() -> DynamicResult<()> {
        let stage = seed_to_soil()?;
        assert_eq!(stage.map_value(10), 10);
        assert_eq!(stage.map_value(53), 55);
        assert_eq!(stage.map_value(99), 51);
        assert_eq!(stage.map_value(100), 100);
        Ok(())
    }

    #[test]
    fn map_interval_splits_at_rule_edges() -> DynamicResult<()> {
        let stage = seed_to_soil()?;

        let mut mapped = Vec::new();
        stage.map_interval(Interval { start: 45, len: 15 }, &mut mapped);
        assert_eq!(
            mapped,
            vec![Interval { start: 45, len: 5 }, Interval { start: 52, len: 10 }]
        );

        mapped.clear();
        stage.map_interval(Interval { start: 95, len: 10 }, &mut mapped);
        assert_eq!(
            mapped,
            vec![
                Interval { start: 97, len: 3 },
                Interval { start: 50, len: 2 },
                Interval { start: 100, len: 5 },
            ]
        );
        Ok(())
    }

    #[test]
    fn overlapping_rules_are_rejected() {
        let rules = vec![
            MapRule {
                source_start: 0,
                destination_start: 10,
                len: 5,
            },
            MapRule {
                source_start: 4,
                destination_start: 20,
                len: 5,
            },
        ];
        let result = Stage::new("bad".to_owned(), rules);
        assert!(matches!(
            result,
            Err(AlmanacError::OverlappingRanges { at: 4, .. })
        ));
    }

    #[test]
    fn empty_rules_map_nothing() -> DynamicResult<()> {
        let parsed = Almanac::parse("seeds: 3 10\n\na-to-b map:\n0 5 0\n")?;
        assert!(parsed.stages[0].rules.is_empty());
        assert_eq!(<Day05 as Solution<PartOne>>::solve(&parsed)?, 3);
        assert_eq!(<Day05 as Solution<PartTwo>>::solve(&parsed)?, 3);
        Ok(())
    }

    #[test]
    fn map_interval_skips_rules_before_the_interval() -> DynamicResult<()> {
        let stage = seed_to_soil()?;
        let mut mapped = Vec::new();
        stage.map_interval(Interval { start: 98, len: 5 }, &mut mapped);
        assert_eq!(
            mapped,
            vec![Interval { start: 50, len: 2 }, Interval { start: 100, len: 3 }]
        );
        Ok(())
    }

    #[test]
    fn overflowing_seed_range_is_rejected() -> DynamicResult<()> {
        let parsed = Almanac::parse("seeds: 18446744073709551615 5\n\na-to-b map:\n0 1 1\n")?;
        assert!(matches!(
            parsed.seed_intervals(),
            Err(AlmanacError::RangeOverflow(u64::MAX))
        ));
        Ok(())
    }

    #[test]
    fn part_two_needs_paired_seeds() -> DynamicResult<()> {
        let parsed = Almanac::parse("seeds: 1 2 3\n\na-to-b map:\n0 1 1\n")?;
        let result = <Day05 as Solution<PartTwo>>::solve(&parsed);
        assert!(result.is_err_and(|error| error.is::<AlmanacError>()));
        Ok(())
    }
}

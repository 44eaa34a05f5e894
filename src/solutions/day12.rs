use std::collections::HashMap;

use aoc_framework::parsing::{parse_input_lines, parse_with_context};
use aoc_framework::runner::solution_runner;
use aoc_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;

#[solution_runner(
    name = "Day 12: Hot Springs",
    parsed = ConditionRecords,
    part_one = Day12,
    part_two = Day12
)]
impl super::AdventOfCode2023<12> {}

/*
Input is one condition record per line: a row of springs that are operational (`.`), damaged (`#`),
or unknown (`?`), a space, then the comma-separated sizes of each contiguous group of damaged
springs in order.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spring {
    Operational,
    Damaged,
    Unknown,
}

#[derive(thiserror::Error, Debug)]
enum RecordError {
    #[error("invalid spring character: {0:?}")]
    InvalidSpring(char),

    #[error("expected a space between the springs and the group sizes")]
    MissingSeparator,

    #[error("damaged group sizes must be positive")]
    EmptyGroup,

    #[error("sum of arrangement counts overflowed")]
    CountOverflow,
}

impl TryFrom<char> for Spring {
    type Error = RecordError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(Self::Operational),
            '#' => Ok(Self::Damaged),
            '?' => Ok(Self::Unknown),
            _ => Err(RecordError::InvalidSpring(value)),
        }
    }
}

#[derive(Debug, Clone)]
struct ConditionRecord {
    springs: Vec<Spring>,
    damaged_groups: Vec<usize>,
}

#[derive(Debug)]
struct ConditionRecords(Vec<ConditionRecord>);

impl ParseData for ConditionRecords {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let records = parse_input_lines(input, |_, line| -> DynamicResult<_> {
            let (springs_str, groups_str) = line
                .split_once(' ')
                .ok_or(RecordError::MissingSeparator)?;

            let springs = springs_str
                .chars()
                .map(Spring::try_from)
                .collect::<Result<_, _>>()?;
            let damaged_groups: Vec<usize> = groups_str
                .split(',')
                .map(parse_with_context)
                .collect::<Result<_, _>>()?;
            if damaged_groups.contains(&0) {
                return Err(RecordError::EmptyGroup.into());
            }

            Ok(ConditionRecord {
                springs,
                damaged_groups,
            })
        })
        .collect::<Result<_, _>>()?;

        Ok(Self(records))
    }
}

/*
For part 1, count the arrangements of operational and damaged springs that fit each record, and sum
the counts.
*/

/// Counts arrangements for one record, memoized on `(spring index, group index)`.
struct ArrangementCounter<'a> {
    springs: &'a [Spring],
    groups: &'a [usize],
    memo: HashMap<(usize, usize), u64>,
}

impl<'a> ArrangementCounter<'a> {
    fn new(record: &'a ConditionRecord) -> Self {
        Self {
            springs: &record.springs,
            groups: &record.damaged_groups,
            memo: HashMap::new(),
        }
    }

    /// Whether group `group_index` can be placed as damaged springs starting at `spring_index`,
    /// followed by the end of the row or a spring that can be operational.
    fn group_fits(&self, spring_index: usize, group_index: usize) -> bool {
        let Some(&size) = self.groups.get(group_index) else {
            return false;
        };
        let end = spring_index + size;
        end <= self.springs.len()
            && !self.springs[spring_index..end].contains(&Spring::Operational)
            && self.springs.get(end) != Some(&Spring::Damaged)
    }

    /// Arrangements of `springs[spring_index..]` matching `groups[group_index..]`.
    fn count(&mut self, spring_index: usize, group_index: usize) -> u64 {
        if spring_index >= self.springs.len() {
            return u64::from(group_index == self.groups.len());
        }
        if let Some(&known) = self.memo.get(&(spring_index, group_index)) {
            return known;
        }

        let spring = self.springs[spring_index];
        let mut arrangements = 0;
        if spring != Spring::Damaged {
            arrangements += self.count(spring_index + 1, group_index);
        }
        if spring != Spring::Operational && self.group_fits(spring_index, group_index) {
            // skip the group and the operational spring closing it
            let next_index = spring_index + self.groups[group_index] + 1;
            arrangements += self.count(next_index, group_index + 1);
        }

        self.memo.insert((spring_index, group_index), arrangements);
        arrangements
    }
}

impl ConditionRecord {
    fn arrangements(&self) -> u64 {
        ArrangementCounter::new(self).count(0, 0)
    }
}

fn sum_arrangements<'a>(
    records: impl Iterator<Item = &'a ConditionRecord>,
) -> DynamicResult<u64> {
    let sum = records
        .map(ConditionRecord::arrangements)
        .checked_sum()
        .ok_or(RecordError::CountOverflow)?;
    Ok(sum)
}

struct Day12;

impl Solution<PartOne> for Day12 {
    type Input = ConditionRecords;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        sum_arrangements(input.0.iter())
    }
}

/*
For part 2, unfold each record: the springs are repeated five times joined by `?`, and the group
sizes are repeated five times.
*/

impl ConditionRecord {
    fn unfold(&self, copies: usize) -> Self {
        let mut springs = Vec::with_capacity((self.springs.len() + 1) * copies);
        for copy in 0..copies {
            if copy > 0 {
                springs.push(Spring::Unknown);
            }
            springs.extend_from_slice(&self.springs);
        }

        Self {
            springs,
            damaged_groups: self.damaged_groups.repeat(copies),
        }
    }
}

impl Solution<PartTwo> for Day12 {
    type Input = ConditionRecords;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let unfolded: Vec<_> = input.0.iter().map(|record| record.unfold(5)).collect();
        sum_arrangements(unfolded.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = r"???.### 1,1,3
.??..??...?##. 1,1,3
?#?#?#?#?#?#?#? 1,3,1,6
????.#...#... 4,1,1
????.######..#####. 1,6,5
?###???????? 3,2,1
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let parsed = ConditionRecords::parse(EXAMPLE_INPUT)?;
        let result = <Day12 as Solution<PartOne>>::solve(&parsed)?;
        assert_eq!(result, 21);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let parsed = ConditionRecords::parse(EXAMPLE_INPUT)?;
        let result = <Day12 as Solution<PartTwo>>::solve(&parsed)?;
        assert_eq!(result, 525_152);
        Ok(())
    }

    #[test]
    fn counts_each_example_record() -> DynamicResult<()> {
        let parsed = ConditionRecords::parse(EXAMPLE_INPUT)?;
        let folded: Vec<_> = parsed.0.iter().map(ConditionRecord::arrangements).collect();
        assert_eq!(folded, vec![1, 4, 1, 1, 4, 10]);

        let unfolded: Vec<_> = parsed
            .0
            .iter()
            .map(|record| record.unfold(5).arrangements())
            .collect();
        assert_eq!(unfolded, vec![1, 16_384, 1, 16, 2_500, 506_250]);
        Ok(())
    }

    #[test]
    fn unfold_joins_copies_with_unknown() -> DynamicResult<()> {
        let parsed = ConditionRecords::parse(".# 1")?;
        let unfolded = parsed.0[0].unfold(2);
        assert_eq!(
            unfolded.springs,
            vec![
                Spring::Operational,
                Spring::Damaged,
                Spring::Unknown,
                Spring::Operational,
                Spring::Damaged,
            ]
        );
        assert_eq!(unfolded.damaged_groups, vec![1, 1]);
        Ok(())
    }

    #[test]
    fn impossible_record_has_no_arrangements() -> DynamicResult<()> {
        let parsed = ConditionRecords::parse("#.# 3")?;
        assert_eq!(parsed.0[0].arrangements(), 0);
        Ok(())
    }

    #[test]
    fn rejects_malformed_records() {
        assert!(ConditionRecords::parse("??x 1").is_err());
        assert!(ConditionRecords::parse("???").is_err());
        assert!(ConditionRecords::parse("??? 1,0").is_err());
    }
}

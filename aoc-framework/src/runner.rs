//! Running a day's solution and reporting each step.
//!
//! # Quick Start
//!
//! Annotate a struct or impl block with [`#[solution_runner]`][solution_runner]:
//!
//! ```
//! # use aoc_framework::runner::solution_runner;
//! # use aoc_framework::{DynamicResult, PartOne, Solution};
//! #
//! struct CountLines;
//!
//! impl Solution<PartOne> for CountLines {
//!     type Input = str;
//!     /* ... */
//! #    type Output = usize;
//! #    fn solve(input: &Self::Input) -> DynamicResult<usize> {
//! #        Ok(input.lines().count())
//! #    }
//! }
//!
//! #[solution_runner(name = "Line Count", part_one = CountLines)]
//! struct CountLinesRunner;
//! ```
//!
//! Every run is wrapped in a `tracing` span named `solution` carrying the solution name, so
//! subscriber output from inside a solver is attributed to its day.

use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::{DynamicResult, ParseData, Part, PartKind, PartOne, PartTwo, Solution};

// re-export procedural macro
pub use aoc_framework_macros::solution_runner;

/// Receives the events of running a solution, for display or collection.
pub trait OutputHandler {
    /// The solution is starting; called once with its display name.
    fn solution_name(&mut self, name: &str);

    /// Input parsing is starting.
    fn parse_start(&mut self);

    /// Input parsing finished, with its duration when timing was requested.
    fn parse_end(&mut self, duration_opt: Option<Duration>);

    /// A part is starting.
    fn part_start(&mut self, part: PartKind);

    /// A part produced its answer, with its duration when timing was requested.
    fn part_output(&mut self, part: PartKind, output: &dyn Display, duration_opt: Option<Duration>);
}

/// Evaluate `step`, measuring its wall time only when `timed` is set.
fn run_step<T>(timed: bool, step: impl FnOnce() -> T) -> (T, Option<Duration>) {
    if timed {
        let start = Instant::now();
        let result = step();
        (result, Some(start.elapsed()))
    } else {
        (step(), None)
    }
}

/// Solve one part and report its answer.
///
/// # Errors
///
/// Any error from the solution is propagated.
fn run_part<S, P>(
    input: &S::Input,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    P: Part,
    S: Solution<P>,
{
    let part = P::kind();
    handler.part_start(part);
    let (result, duration_opt) = run_step(timed, || S::solve(input));
    let output = result.inspect_err(|error| tracing::debug!(%part, %error, "part failed"))?;
    tracing::debug!(%part, %output, ?duration_opt, "part solved");
    handler.part_output(part, &output, duration_opt);
    Ok(())
}

/// Parse the input for a solution and report the parse step.
///
/// # Errors
///
/// Any error from parsing is propagated.
fn run_parse<D: ParseData>(
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<D> {
    handler.parse_start();
    let (result, duration_opt) = run_step(timed, || D::parse(input));
    let parsed = result.inspect_err(|error| tracing::debug!(%error, "input failed to parse"))?;
    tracing::debug!(input_len = input.len(), ?duration_opt, "input parsed");
    handler.parse_end(duration_opt);
    Ok(parsed)
}

/// Run part one of a solution over the raw input string.
///
/// # Errors
///
/// Any error from the solution is propagated.
pub fn solve_half_solution<S1>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    S1: Solution<PartOne, Input = str>,
{
    let _span = tracing::debug_span!("solution", solution = name).entered();
    handler.solution_name(name);
    run_part::<S1, PartOne>(input, handler, timed)
}

/// Run both parts of a solution over the raw input string.
///
/// # Errors
///
/// Any error from either part is propagated; part two does not run if part one fails.
pub fn solve_full_solution<S1, S2>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    S1: Solution<PartOne, Input = str>,
    S2: Solution<PartTwo, Input = str>,
{
    let _span = tracing::debug_span!("solution", solution = name).entered();
    handler.solution_name(name);
    run_part::<S1, PartOne>(input, handler, timed)?;
    run_part::<S2, PartTwo>(input, handler, timed)
}

/// Parse the input once, then run part one over the parsed data.
///
/// # Errors
///
/// Any error from parsing or the solution is propagated.
pub fn solve_parsed_half_solution<D, S1>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    D: ParseData,
    S1: Solution<PartOne, Input = D>,
{
    let _span = tracing::debug_span!("solution", solution = name).entered();
    handler.solution_name(name);
    let parsed = run_parse::<D>(input, handler, timed)?;
    run_part::<S1, PartOne>(&parsed, handler, timed)
}

/// Parse the input once, then run both parts over the parsed data.
///
/// # Errors
///
/// Any error from parsing or either part is propagated.
pub fn solve_parsed_full_solution<D, S1, S2>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    D: ParseData,
    S1: Solution<PartOne, Input = D>,
    S2: Solution<PartTwo, Input = D>,
{
    let _span = tracing::debug_span!("solution", solution = name).entered();
    handler.solution_name(name);
    let parsed = run_parse::<D>(input, handler, timed)?;
    run_part::<S1, PartOne>(&parsed, handler, timed)?;
    run_part::<S2, PartTwo>(&parsed, handler, timed)
}

/// A day's solution that can be run end to end.
///
/// Implemented by the [`solution_runner`] attribute macro.
pub trait SolutionRunner {
    /// Run the solution over `input`, reporting through `handler`.
    ///
    /// # Errors
    ///
    /// Any error from parsing or solving is propagated.
    fn run(input: &str, handler: &mut dyn OutputHandler, timed: bool) -> DynamicResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_input_lines;

    /// Records events as strings.
    #[derive(Default)]
    struct RecordingHandler(Vec<String>);

    impl OutputHandler for RecordingHandler {
        fn solution_name(&mut self, name: &str) {
            self.0.push(format!("name {name}"));
        }

        fn parse_start(&mut self) {
            self.0.push("parse start".to_owned());
        }

        fn parse_end(&mut self, duration_opt: Option<Duration>) {
            self.0.push(format!("parse end timed={}", duration_opt.is_some()));
        }

        fn part_start(&mut self, part: PartKind) {
            self.0.push(format!("{part} start"));
        }

        fn part_output(
            &mut self,
            part: PartKind,
            output: &dyn Display,
            duration_opt: Option<Duration>,
        ) {
            self.0
                .push(format!("{part} = {output} timed={}", duration_opt.is_some()));
        }
    }

    struct Numbers(Vec<u32>);

    impl ParseData for Numbers {
        fn parse(input: &str) -> DynamicResult<Self> {
            let values = parse_input_lines(input, |_, line| line.parse::<u32>())
                .collect::<Result<_, _>>()?;
            Ok(Self(values))
        }
    }

    struct Sum;

    impl Solution<PartOne> for Sum {
        type Input = Numbers;
        type Output = u32;

        fn solve(input: &Self::Input) -> DynamicResult<u32> {
            Ok(input.0.iter().sum())
        }
    }

    impl Solution<PartTwo> for Sum {
        type Input = Numbers;
        type Output = u32;

        fn solve(input: &Self::Input) -> DynamicResult<u32> {
            input
                .0
                .iter()
                .max()
                .copied()
                .ok_or_else(|| "no numbers".into())
        }
    }

    /// Works over the raw input: counts lines, then finds the longest.
    struct Lines;

    impl Solution<PartOne> for Lines {
        type Input = str;
        type Output = usize;

        fn solve(input: &Self::Input) -> DynamicResult<usize> {
            Ok(input.lines().count())
        }
    }

    impl Solution<PartTwo> for Lines {
        type Input = str;
        type Output = usize;

        fn solve(input: &Self::Input) -> DynamicResult<usize> {
            input
                .lines()
                .map(str::len)
                .max()
                .ok_or_else(|| "no lines".into())
        }
    }

    #[solution_runner(name = "Lines", part_one = Lines, part_two = Lines)]
    struct LinesRunner;

    #[solution_runner(name = "Line Count", part_one = Lines)]
    struct LineCountRunner;

    #[test]
    fn raw_full_solution_reports_both_parts() -> DynamicResult<()> {
        let mut handler = RecordingHandler::default();
        solve_full_solution::<Lines, Lines>("Lines", "ab\nabcd\n", &mut handler, false)?;
        assert_eq!(
            handler.0,
            vec![
                "name Lines",
                "Part 1 start",
                "Part 1 = 2 timed=false",
                "Part 2 start",
                "Part 2 = 4 timed=false",
            ]
        );
        Ok(())
    }

    #[test]
    fn raw_half_solution_reports_part_one() -> DynamicResult<()> {
        let mut handler = RecordingHandler::default();
        solve_half_solution::<Lines>("Lines", "a\nb\nc", &mut handler, true)?;
        assert_eq!(
            handler.0,
            vec!["name Lines", "Part 1 start", "Part 1 = 3 timed=true"]
        );
        Ok(())
    }

    #[test]
    fn raw_full_solution_stops_on_failing_part() {
        let mut handler = RecordingHandler::default();
        let result = solve_full_solution::<Lines, Lines>("Lines", "", &mut handler, false);
        assert!(result.is_err());
        assert_eq!(
            handler.0,
            vec![
                "name Lines",
                "Part 1 start",
                "Part 1 = 0 timed=false",
                "Part 2 start",
            ]
        );
    }

    #[test]
    fn macro_runners_over_raw_input() -> DynamicResult<()> {
        let mut handler = RecordingHandler::default();
        LinesRunner::run("xyz\n", &mut handler, false)?;
        assert_eq!(
            handler.0,
            vec![
                "name Lines",
                "Part 1 start",
                "Part 1 = 1 timed=false",
                "Part 2 start",
                "Part 2 = 3 timed=false",
            ]
        );

        let mut handler = RecordingHandler::default();
        LineCountRunner::run("xyz\n", &mut handler, false)?;
        assert_eq!(
            handler.0,
            vec!["name Line Count", "Part 1 start", "Part 1 = 1 timed=false"]
        );
        Ok(())
    }

    #[test]
    fn parsed_full_solution_reports_every_step() -> DynamicResult<()> {
        let mut handler = RecordingHandler::default();
        solve_parsed_full_solution::<Numbers, Sum, Sum>("Sum", "3\n4\n", &mut handler, true)?;
        assert_eq!(
            handler.0,
            vec![
                "name Sum",
                "parse start",
                "parse end timed=true",
                "Part 1 start",
                "Part 1 = 7 timed=true",
                "Part 2 start",
                "Part 2 = 4 timed=true",
            ]
        );
        Ok(())
    }

    #[test]
    fn failing_part_stops_the_run() {
        let mut handler = RecordingHandler::default();
        let result = solve_parsed_full_solution::<Numbers, Sum, Sum>("Sum", "", &mut handler, false);
        assert!(result.is_err());
        assert_eq!(handler.0.last().map(String::as_str), Some("Part 2 start"));
    }

    #[test]
    fn parse_failure_skips_parts() {
        let mut handler = RecordingHandler::default();
        let result =
            solve_parsed_half_solution::<Numbers, Sum>("Sum", "1\nnot a number", &mut handler, false);
        assert!(result.is_err());
        assert_eq!(handler.0, vec!["name Sum", "parse start"]);
    }
}

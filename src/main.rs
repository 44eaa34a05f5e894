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
#![deny(clippy::unwrap_used)]

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Error, Result};
use aoc_framework::PartKind;
use aoc_framework::runner::OutputHandler;
use clap::{ArgAction, Parser};
use tracing::Level;

mod path_search;
mod solutions;

/// Advent of Code 2023 solver for days 5, 12, 17, 20, and 21.
#[derive(Parser, Debug)]
struct Cli {
    /// The day's solution to run (e.g. 5, 17).
    day: u8,

    /// Sets an alternative input file to use over default input.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Measure and print the durations of parsing and solving parts.
    #[arg(short, long, action = ArgAction::SetTrue)]
    timed: bool,

    /// Minimum duration (in milliseconds) required to print timing.
    /// 0 = always print.
    #[arg(long, value_name = "NUMBER", default_value_t)]
    min_timing_ms: u64,

    /// Log solver internals to stderr.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Install a stderr subscriber, showing debug events only when verbose.
fn init_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_max_level(max_level)
        .init();
}

/// Read the puzzle input, from `inputs/dayNN.txt` unless another file is given.
fn read_input(day: u8, input_file: Option<&Path>) -> Result<String> {
    if let Some(path) = input_file {
        return fs::read_to_string(path)
            .with_context(|| format!("could not read input file at: {}", path.display()));
    }

    let path = PathBuf::from("inputs").join(format!("day{day:02}.txt"));
    fs::read_to_string(&path).with_context(|| {
        format!(
            "default input file missing: {}\n\n\
            please create the file or provide the input file argument",
            path.display()
        )
    })
}

/// Prints each step of a run to stdout.
struct CliOutputHandler {
    /// Durations shorter than this are not printed.
    min_duration: Duration,
}

/// Units for printing durations, largest first, with their size in seconds.
const DURATION_UNITS: [(&str, f64); 3] = [
    ("seconds", 1.0),
    ("milliseconds", 1e-3),
    ("microseconds", 1e-6),
];

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    DURATION_UNITS
        .iter()
        .find(|(_, scale)| seconds >= *scale)
        .map_or_else(
            || format!("{} nanoseconds", duration.as_nanos()),
            |(unit, scale)| format!("{:.3} {unit}", seconds / scale),
        )
}

impl CliOutputHandler {
    /// The formatted duration, if there is one at least the minimum.
    fn shown_duration(&self, duration_opt: Option<Duration>) -> Option<String> {
        duration_opt
            .filter(|duration| *duration >= self.min_duration)
            .map(format_duration)
    }
}

impl OutputHandler for CliOutputHandler {
    fn solution_name(&mut self, name: &str) {
        println!("= {name} =");
    }

    fn parse_start(&mut self) {}

    fn parse_end(&mut self, duration_opt: Option<Duration>) {
        if let Some(duration) = self.shown_duration(duration_opt) {
            println!("Input parsed in {duration}");
        }
    }

    fn part_start(&mut self, part: PartKind) {
        println!("-- {part} --");
    }

    fn part_output(
        &mut self,
        _part: PartKind,
        output: &dyn Display,
        duration_opt: Option<Duration>,
    ) {
        match self.shown_duration(duration_opt) {
            Some(duration) => println!("{output} ({duration})"),
            None => println!("{output}"),
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let input = read_input(args.day, args.input.as_deref())?;
    tracing::debug!(day = args.day, bytes = input.len(), "read puzzle input");

    let mut handler = CliOutputHandler {
        min_duration: Duration::from_millis(args.min_timing_ms),
    };
    solutions::run_day(args.day, &input, &mut handler, args.timed)
        .map_err(|dyn_error| Error::from_boxed(dyn_error).context("failed to run solution"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_use_the_largest_fitting_unit() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500 seconds");
        assert_eq!(format_duration(Duration::from_micros(2250)), "2.250 milliseconds");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.500 microseconds");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42 nanoseconds");
    }

    #[test]
    fn short_durations_are_hidden() {
        let handler = CliOutputHandler {
            min_duration: Duration::from_millis(5),
        };
        assert_eq!(handler.shown_duration(Some(Duration::from_millis(1))), None);
        assert_eq!(handler.shown_duration(None), None);
        assert!(handler.shown_duration(Some(Duration::from_millis(5))).is_some());
    }

    #[test]
    fn cli_parses_flags() -> Result<()> {
        let cli = Cli::try_parse_from(["advent-2023", "17", "-t", "-v", "-i", "city.txt"])?;
        assert_eq!(cli.day, 17);
        assert!(cli.timed && cli.verbose);
        assert_eq!(cli.input, Some(PathBuf::from("city.txt")));
        Ok(())
    }
}

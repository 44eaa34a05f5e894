use std::collections::{HashMap, HashSet, VecDeque};

use aoc_framework::parsing::parse_input_lines;
use aoc_framework::runner::solution_runner;
use aoc_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use regex::Regex;

#[solution_runner(
    name = "Day 20: Pulse Propagation",
    parsed = Network,
    part_one = Day20,
    part_two = Day20
)]
impl super::AdventOfCode2023<20> {}

/*
Input is a configuration of communication modules, one per line: a module name, " -> ", then a
comma-space-separated list of destination module names. The name is prefixed with `%` for a
flip-flop module or `&` for a conjunction module. The single unprefixed module is the broadcaster.

- A flip-flop starts off. It ignores high pulses. A low pulse toggles it, and it sends high if it
  turned on or low if it turned off.
- A conjunction remembers the latest pulse from each of its inputs, initially low. After updating
  its memory it sends low if every remembered pulse is high, otherwise high.
- The broadcaster sends every pulse it receives on to all its destinations.

Names that only appear as destinations receive pulses but never send any.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pulse {
    Low,
    High,
}

/// The behavior of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Module {
    FlipFlop { on: bool, toggled: bool },
    /// Remembered pulses keyed by input node index.
    Conjunction { memory: HashMap<usize, Pulse> },
    Broadcast { pending: Option<Pulse> },
}

impl Module {
    fn flip_flop() -> Self {
        Self::FlipFlop {
            on: false,
            toggled: false,
        }
    }

    fn conjunction() -> Self {
        Self::Conjunction {
            memory: HashMap::new(),
        }
    }

    fn broadcast() -> Self {
        Self::Broadcast { pending: None }
    }

    /// Take in a pulse. `source` is `None` for the button.
    fn on_receive(&mut self, pulse: Pulse, source: Option<usize>) {
        match self {
            Self::FlipFlop { on, toggled } => {
                if pulse == Pulse::Low {
                    *on = !*on;
                    *toggled = true;
                }
            }
            Self::Conjunction { memory } => {
                if let Some(source) = source {
                    memory.insert(source, pulse);
                }
            }
            Self::Broadcast { pending } => *pending = Some(pulse),
        }
    }

    /// The pulse sent in response to the last received one, if any.
    fn output(&mut self) -> Option<Pulse> {
        match self {
            Self::FlipFlop { on, toggled } => std::mem::take(toggled)
                .then_some(if *on { Pulse::High } else { Pulse::Low }),
            Self::Conjunction { memory } => {
                if memory.values().all(|&pulse| pulse == Pulse::High) {
                    Some(Pulse::Low)
                } else {
                    Some(Pulse::High)
                }
            }
            Self::Broadcast { pending } => pending.take(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    outputs: Vec<usize>,
    /// `None` for a destination-only sink.
    module: Option<Module>,
}

/// The wired modules, addressed by node index.
#[derive(Debug, Clone)]
struct Network {
    nodes: Vec<Node>,
    indices: HashMap<String, usize>,
    broadcaster: usize,
}

#[derive(thiserror::Error, Debug)]
enum NetworkError {
    #[error("expected a line like \"%name -> a, b\", found: {0:?}")]
    InvalidLine(String),

    #[error("module {0:?} is defined more than once")]
    DuplicateModule(String),

    #[error("module {0:?} has no type prefix and is not the broadcaster")]
    UntypedModule(String),

    #[error("no broadcaster module is defined")]
    MissingBroadcaster,

    #[error("expected exactly one conjunction module sending to {0:?}")]
    UnexpectedFeeder(&'static str),

    #[error("module {0:?} never sent a high pulse within {1} button presses")]
    NoCycleFound(String, u64),

    #[error("pulse count overflowed")]
    CountOverflow,
}

impl Network {
    const BROADCASTER_NAME: &'static str = "broadcaster";

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_owned(),
            outputs: Vec::new(),
            module: None,
        });
        self.indices.insert(name.to_owned(), index);
        index
    }

    /// Initialize every conjunction's memory with a low pulse from each of its inputs.
    fn wire_conjunction_inputs(&mut self) {
        let edges: Vec<(usize, usize)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(source, node)| node.outputs.iter().map(move |&target| (source, target)))
            .collect();

        for (source, target) in edges {
            if let Some(Module::Conjunction { memory }) = &mut self.nodes[target].module {
                memory.insert(source, Pulse::Low);
            }
        }
    }
}

impl ParseData for Network {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let line_format = Regex::new(r"^([%&]?)([a-z]+) -> ([a-z]+(?:, [a-z]+)*)$")?;

        let definitions = parse_input_lines(input, |_, line| {
            let captures = line_format
                .captures(line)
                .ok_or_else(|| NetworkError::InvalidLine(line.to_owned()))?;
            let (_, [prefix, name, outputs]) = captures.extract();

            let module = match (prefix, name) {
                ("%", _) => Module::flip_flop(),
                ("&", _) => Module::conjunction(),
                (_, Self::BROADCASTER_NAME) => Module::broadcast(),
                _ => return Err(NetworkError::UntypedModule(name.to_owned())),
            };
            let outputs: Vec<String> = outputs.split(", ").map(str::to_owned).collect();
            Ok((name.to_owned(), module, outputs))
        })
        .collect::<Result<Vec<_>, _>>()?;

        let mut network = Self {
            nodes: Vec::new(),
            indices: HashMap::new(),
            broadcaster: 0,
        };
        for (name, module, outputs) in definitions {
            let index = network.intern(&name);
            if network.nodes[index].module.is_some() {
                return Err(NetworkError::DuplicateModule(name).into());
            }
            let outputs = outputs.iter().map(|output| network.intern(output)).collect();
            network.nodes[index] = Node {
                name,
                outputs,
                module: Some(module),
            };
        }

        network.broadcaster = *network
            .indices
            .get(Self::BROADCASTER_NAME)
            .ok_or(NetworkError::MissingBroadcaster)?;
        network.wire_conjunction_inputs();

        Ok(network)
    }
}

/*
Pushing the button sends a single low pulse to the broadcaster. Pulses are processed in the order
they are sent, and all of them finish before the button can be pushed again.

For part 1, push the button 1000 times and multiply the total number of low pulses sent by the
total number of high pulses sent, counting the button's own pulse.
*/

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PulseCounts {
    low: u64,
    high: u64,
}

impl PulseCounts {
    fn record(&mut self, pulse: Pulse) {
        match pulse {
            Pulse::Low => self.low += 1,
            Pulse::High => self.high += 1,
        }
    }
}

impl Network {
    /// Push the button once and process pulses until the network settles.
    ///
    /// `on_send` observes every pulse a module sends, with the sending node index.
    fn push_button(&mut self, mut on_send: impl FnMut(usize, Pulse)) -> PulseCounts {
        let mut counts = PulseCounts::default();
        let mut queue = VecDeque::from([(None, self.broadcaster, Pulse::Low)]);

        while let Some((source, target, pulse)) = queue.pop_front() {
            counts.record(pulse);

            let node = &mut self.nodes[target];
            let Some(module) = node.module.as_mut() else {
                continue;
            };
            module.on_receive(pulse, source);
            if let Some(output) = module.output() {
                on_send(target, output);
                for &next in &node.outputs {
                    queue.push_back((Some(target), next, output));
                }
            }
        }

        counts
    }
}

struct Day20;

impl Solution<PartOne> for Day20 {
    type Input = Network;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut network = input.clone();
        let mut totals = PulseCounts::default();
        for _ in 0..1000 {
            let counts = network.push_button(|_, _| {});
            totals.low += counts.low;
            totals.high += counts.high;
        }
        tracing::debug!(?totals, "pulses after 1000 presses");

        let product = totals
            .low
            .checked_mul(totals.high)
            .ok_or(NetworkError::CountOverflow)?;
        Ok(product)
    }
}

/*
For part 2, find the fewest button presses before the module "rx" receives a low pulse.

A single conjunction feeds rx, so rx gets low only on a press where every input of that conjunction
last sent high. Each input is driven by an independent counter of flip-flops that sends high once per
cycle, so the answer is the least common multiple of the press counts on which each input first
sends high.
*/

fn greatest_common_divisor(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        greatest_common_divisor(b, a % b)
    }
}

fn least_common_multiple(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values.into_iter().try_fold(1u64, |lcm, value| {
        (lcm / greatest_common_divisor(lcm, value)).checked_mul(value)
    })
}

impl Network {
    const RX_NAME: &'static str = "rx";

    /// A bound on presses while waiting for every cycle to show itself.
    const MAX_PRESSES: u64 = 1_000_000;

    /// The input nodes of the single conjunction that feeds rx.
    fn rx_feeder_inputs(&self) -> Result<HashSet<usize>, NetworkError> {
        let &rx = self
            .indices
            .get(Self::RX_NAME)
            .ok_or(NetworkError::UnexpectedFeeder(Self::RX_NAME))?;

        let feeders: Vec<_> = self
            .nodes
            .iter()
            .filter(|node| node.outputs.contains(&rx))
            .collect();
        match feeders.as_slice() {
            [
                Node {
                    module: Some(Module::Conjunction { memory }),
                    ..
                },
            ] => Ok(memory.keys().copied().collect()),
            _ => Err(NetworkError::UnexpectedFeeder(Self::RX_NAME)),
        }
    }

    /// Press the button until each watched node has sent a high pulse, returning the press count
    /// of each one's first high pulse.
    fn first_high_presses(
        &mut self,
        watched: &HashSet<usize>,
    ) -> Result<HashMap<usize, u64>, NetworkError> {
        let mut first_high = HashMap::new();
        let mut presses = 0;
        while first_high.len() < watched.len() {
            if presses == Self::MAX_PRESSES {
                let waiting = watched
                    .iter()
                    .find(|index| !first_high.contains_key(*index))
                    .map(|&index| self.nodes[index].name.clone())
                    .unwrap_or_default();
                return Err(NetworkError::NoCycleFound(waiting, presses));
            }
            presses += 1;

            self.push_button(|sender, pulse| {
                if pulse == Pulse::High && watched.contains(&sender) {
                    first_high.entry(sender).or_insert(presses);
                }
            });
        }
        Ok(first_high)
    }
}

impl Solution<PartTwo> for Day20 {
    type Input = Network;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let watched = input.rx_feeder_inputs()?;
        let mut network = input.clone();
        let cycles = network.first_high_presses(&watched)?;
        for (&index, presses) in &cycles {
            tracing::debug!(module = %network.nodes[index].name, presses, "cycle found");
        }

        let presses =
            least_common_multiple(cycles.into_values()).ok_or(NetworkError::CountOverflow)?;
        Ok(presses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT_ONE: &str = r"broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a
";

    const EXAMPLE_INPUT_TWO: &str = r"broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output
";

    /// Two counters feeding rx through inverters: one cycles every 2 presses, the other every 4.
    const COUNTERS_INPUT: &str = r"broadcaster -> a, c
%a -> x
%c -> d
%d -> y
&x -> hub
&y -> hub
&hub -> rx
";

    #[test]
    fn part_one_solves_example_one() -> DynamicResult<()> {
        let parsed = Network::parse(EXAMPLE_INPUT_ONE)?;
        let result = <Day20 as Solution<PartOne>>::solve(&parsed)?;
        assert_eq!(result, 32_000_000);
        Ok(())
    }

    #[test]
    fn part_one_solves_example_two() -> DynamicResult<()> {
        let parsed = Network::parse(EXAMPLE_INPUT_TWO)?;
        let result = <Day20 as Solution<PartOne>>::solve(&parsed)?;
        assert_eq!(result, 11_687_500);
        Ok(())
    }

    #[test]
    fn single_press_of_example_one() -> DynamicResult<()> {
        let mut network = Network::parse(EXAMPLE_INPUT_ONE)?;
        let counts = network.push_button(|_, _| {});
        assert_eq!(counts, PulseCounts { low: 8, high: 4 });
        Ok(())
    }

    #[test]
    fn part_two_finds_counter_alignment() -> DynamicResult<()> {
        let parsed = Network::parse(COUNTERS_INPUT)?;
        let result = <Day20 as Solution<PartTwo>>::solve(&parsed)?;
        assert_eq!(result, 4);
        Ok(())
    }

    #[test]
    fn part_two_needs_rx() -> DynamicResult<()> {
        let parsed = Network::parse(EXAMPLE_INPUT_ONE)?;
        let result = <Day20 as Solution<PartTwo>>::solve(&parsed);
        assert!(result.is_err_and(|error| error.is::<NetworkError>()));
        Ok(())
    }

    #[test]
    fn flip_flop_toggles_only_on_low() {
        let mut module = Module::flip_flop();
        module.on_receive(Pulse::High, None);
        assert_eq!(module.output(), None);

        module.on_receive(Pulse::Low, None);
        assert_eq!(module.output(), Some(Pulse::High));
        module.on_receive(Pulse::Low, None);
        assert_eq!(module.output(), Some(Pulse::Low));
    }

    #[test]
    fn conjunction_sends_low_once_all_inputs_high() {
        let mut module = Module::Conjunction {
            memory: HashMap::from([(1, Pulse::Low), (2, Pulse::Low)]),
        };
        module.on_receive(Pulse::High, Some(1));
        assert_eq!(module.output(), Some(Pulse::High));
        module.on_receive(Pulse::High, Some(2));
        assert_eq!(module.output(), Some(Pulse::Low));
    }

    #[test]
    fn rejects_malformed_configuration() {
        assert!(Network::parse("broadcaster -> a\nx -> a\n").is_err());
        assert!(Network::parse("broadcaster -> a\n%a -> b\n%a -> c\n").is_err());
        assert!(Network::parse("%a -> b\n").is_err());
        assert!(Network::parse("broadcaster => a\n").is_err());
    }

    #[test]
    fn least_common_multiple_of_cycles() {
        assert_eq!(least_common_multiple([3, 4, 6]), Some(12));
        assert_eq!(least_common_multiple([u64::MAX, 2]), None);
    }
}

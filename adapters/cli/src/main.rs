#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Arena Warden over standard input and output.

mod protocol;

use std::io::{self, BufRead, Write};

use anyhow::{ensure, Context, Result};
use arena_warden_core::Archetype;
use arena_warden_system_behavior::{ChaseMode, DecisionPass, Profiles};
use arena_warden_world::{self as world, World};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use protocol::ProtocolReader;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Command-line arguments accepted by the decision engine.
#[derive(Debug, Parser)]
#[command(name = "arena-warden", about = "Per-turn hero decision engine")]
struct Args {
    /// Archetypes of the player's heroes, in roster order.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["defender", "attacker", "balanced"]
    )]
    roster: Vec<RosterArchetype>,
    /// How pursuing heroes approach targets they cannot cast on.
    #[arg(long, value_enum, default_value_t = Chase::Direct)]
    chase: Chase,
    /// Appends a short label to every emitted action.
    #[arg(long)]
    labels: bool,
    /// Minimum level written to stderr; overrides the global level from
    /// `RUST_LOG`, which defaults to `warn`.
    #[arg(long)]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RosterArchetype {
    Balanced,
    Defender,
    Attacker,
}

impl From<RosterArchetype> for Archetype {
    fn from(value: RosterArchetype) -> Self {
        match value {
            RosterArchetype::Balanced => Self::Balanced,
            RosterArchetype::Defender => Self::Defender,
            RosterArchetype::Attacker => Self::Attacker,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Chase {
    Direct,
    Intercept,
}

impl From<Chase> for ChaseMode {
    fn from(value: Chase) -> Self {
        match value {
            Chase::Direct => Self::Direct,
            Chase::Intercept => Self::Intercept,
        }
    }
}

/// Entry point for the Arena Warden command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&args, stdin.lock(), stdout.lock())
}

/// Builds the stderr filter: `RUST_LOG` when set, otherwise `warn`, with the
/// `--log-level` flag taking precedence over either.
fn log_filter(level: Option<tracing::Level>) -> EnvFilter {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    match level {
        Some(level) => filter.add_directive(level.into()),
        None => filter,
    }
}

/// Plays a full match: reads the header, then decides every turn until the
/// input ends.
fn run<R: BufRead, W: Write>(args: &Args, input: R, mut output: W) -> Result<()> {
    let mut reader = ProtocolReader::new(input);
    let header = reader
        .read_header()
        .context("failed to read match header")?;

    let roster: Vec<Archetype> = args.roster.iter().copied().map(Archetype::from).collect();
    ensure!(
        roster.len() == header.heroes_per_player,
        "roster lists {} heroes but the match assigns {}",
        roster.len(),
        header.heroes_per_player
    );
    let opponents = vec![Archetype::Balanced; header.heroes_per_player];

    let mut world = World::new(header.base, &roster, &opponents);
    let mut pass = DecisionPass::new(Profiles::new(args.chase.into()));
    tracing::info!(
        base = %header.base,
        heroes = header.heroes_per_player,
        "match started"
    );

    let mut events = Vec::new();
    let mut orders = Vec::new();
    while let Some(turn) = reader.read_turn().context("failed to read turn")? {
        events.clear();
        world::apply(&mut world, &turn, &mut events)
            .context("turn snapshot does not match the known rosters")?;
        for event in &events {
            tracing::debug!(?event, "world updated");
        }

        orders.clear();
        pass.run(&mut world, &mut orders);
        for order in &orders {
            writeln!(output, "{}", protocol::encode(&order.action, args.labels))
                .context("failed to write order")?;
        }
        output.flush().context("failed to flush orders")?;
    }

    tracing::info!(turns = world::query::turn(&world), "input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(args: &[&str], input: &str) -> Result<String> {
        let args = Args::parse_from(std::iter::once("arena-warden").chain(args.iter().copied()));
        let mut output = Vec::new();
        run(&args, input.as_bytes(), &mut output)?;
        Ok(String::from_utf8(output).expect("orders are utf-8"))
    }

    #[test]
    fn default_arguments_field_the_standard_roster() {
        let args = Args::parse_from(["arena-warden"]);
        assert_eq!(
            args.roster,
            vec![
                RosterArchetype::Defender,
                RosterArchetype::Attacker,
                RosterArchetype::Balanced,
            ]
        );
        assert_eq!(args.chase, Chase::Direct);
        assert!(!args.labels);
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn roster_and_chase_are_configurable() {
        let args = Args::parse_from([
            "arena-warden",
            "--roster",
            "balanced,balanced",
            "--chase",
            "intercept",
            "--labels",
            "--log-level",
            "debug",
        ]);
        assert_eq!(
            args.roster,
            vec![RosterArchetype::Balanced, RosterArchetype::Balanced]
        );
        assert_eq!(ChaseMode::from(args.chase), ChaseMode::Intercept);
        assert!(args.labels);
        assert_eq!(args.log_level, Some(tracing::Level::DEBUG));
    }

    #[test]
    fn each_turn_emits_one_line_per_hero() {
        let input = "0 0\n3\n\
                     3 0\n3 0\n3\n\
                     0 1 0 0 0 0 -1 0 0 -1 -1\n\
                     1 1 0 0 0 0 -1 0 0 -1 -1\n\
                     2 1 0 0 0 0 -1 0 0 -1 -1\n";

        let output = play(&[], input).expect("match plays");
        assert_eq!(output, "MOVE 2000 2000\nMOVE 8815 4500\nMOVE 1500 4700\n");
    }

    #[test]
    fn labels_follow_each_action() {
        let input = "0 0\n1\n3 0\n3 0\n1\n0 1 5000 900 0 0 -1 0 0 -1 -1\n";

        let output = play(&["--roster", "balanced", "--labels"], input).expect("match plays");
        assert_eq!(output, "WAIT idle\n");
    }

    #[test]
    fn roster_size_must_match_the_header() {
        let error = play(&["--roster", "defender"], "0 0\n3\n").expect_err("roster too short");
        assert!(error.to_string().contains("roster lists 1 heroes"));
    }

    #[test]
    fn unmatched_heroes_abort_the_match() {
        let input = "0 0\n1\n3 0\n3 0\n2\n\
                     0 1 0 0 0 0 -1 0 0 -1 -1\n\
                     1 1 0 0 0 0 -1 0 0 -1 -1\n";

        let error = play(&["--roster", "defender"], input).expect_err("second hero has no slot");
        assert!(error
            .chain()
            .any(|cause| cause.to_string().contains("does not match any roster slot")));
    }
}

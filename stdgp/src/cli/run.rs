// CLI entrypoint + option wiring.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use program_trees::{OpSpec, PrimitiveSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::args::Cli;
use crate::{next_generation, Candidate, Individual, IndividualConfig, Options};

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut options = Options::default();
    cli.options.apply_to(&mut options);
    let breeder = options.validate().context("invalid options")?;
    anyhow::ensure!(cli.n_terminals > 0, "n_terminals must be > 0");

    let primitives = build_primitives(&cli)?;
    let config = Arc::new(IndividualConfig {
        primitives,
        max_depth: options.max_depth,
        model_name: cli.model_name.clone(),
        fitness_type: cli.fitness_type.clone(),
    });

    let mut rng = StdRng::seed_from_u64(options.seed);
    // No fitness here: the initial order stands in for the ranking.
    let population: Vec<Individual> = (0..options.population_size)
        .map(|_| Individual::full(&mut rng, Arc::clone(&config)))
        .collect();
    log::info!(
        "initial population: {} individuals, max depth {}",
        population.len(),
        options.max_depth
    );

    let next = next_generation(&mut rng, &population, &breeder).context("failed to breed next generation")?;

    for (i, ind) in next.iter().take(cli.show).enumerate() {
        println!(
            "{i:>4}  size={:<4} depth={:<3} {}",
            ind.size(),
            ind.depth(),
            ind.to_string_tree()
        );
    }
    Ok(())
}

fn build_primitives(cli: &Cli) -> anyhow::Result<PrimitiveSet> {
    let ops: Vec<OpSpec> = match &cli.operators {
        None => ["+", "-", "*", "/"].iter().map(|n| OpSpec::new(*n, 2)).collect(),
        Some(tokens) => tokens.iter().map(|t| parse_op(t)).collect::<anyhow::Result<Vec<_>>>()?,
    };
    let terminals: Vec<String> = (0..cli.n_terminals).map(|i| format!("x{i}")).collect();
    PrimitiveSet::new(ops, terminals).context("invalid primitive set")
}

fn parse_op(token: &str) -> anyhow::Result<OpSpec> {
    let token = token.trim();
    match token.rsplit_once(':') {
        None => Ok(OpSpec::new(token, 2)),
        Some((name, arity)) => {
            let arity: u8 = arity
                .parse()
                .with_context(|| format!("invalid arity in operator token {token:?}"))?;
            if name.is_empty() {
                bail!("missing operator name in {token:?}");
            }
            Ok(OpSpec::new(name, arity))
        }
    }
}

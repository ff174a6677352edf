use std::fmt;

use rand::Rng;

use crate::individual::{Candidate, Individual};
use crate::random::bernoulli;
use crate::selection::{DoubleTournament, SelectionError};
use crate::variation::{subtree_crossover, subtree_mutation};

/// Validated breeding parameters, obtained from [`Options::validate`](crate::Options::validate).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Breeder {
    pub(crate) selector: DoubleTournament,
    pub(crate) crossover_probability: f64,
    pub(crate) population_size: usize,
    pub(crate) elitism_size: usize,
    pub(crate) limit_depth: usize,
    pub(crate) max_offspring_attempts: usize,
}

impl Breeder {
    pub fn selector(&self) -> &DoubleTournament {
        &self.selector
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn elitism_size(&self) -> usize {
        self.elitism_size
    }

    pub fn limit_depth(&self) -> usize {
        self.limit_depth
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreedingError {
    Selection(SelectionError),
    TooManyRejections { attempts: usize, limit_depth: usize },
}

impl fmt::Display for BreedingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreedingError::Selection(e) => write!(f, "{e}"),
            BreedingError::TooManyRejections { attempts, limit_depth } => write!(
                f,
                "{attempts} consecutive offspring batches exceeded the depth limit of {limit_depth}"
            ),
        }
    }
}

impl std::error::Error for BreedingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BreedingError::Selection(e) => Some(e),
            BreedingError::TooManyRejections { .. } => None,
        }
    }
}

impl From<SelectionError> for BreedingError {
    fn from(e: SelectionError) -> Self {
        BreedingError::Selection(e)
    }
}

/// The first `n` members of a best-to-worst population.
pub fn get_elite<C>(population: &[C], n: usize) -> &[C] {
    &population[..n.min(population.len())]
}

/// Keep the members whose depth is at most `limit`, preserving order.
pub fn discard_deep<C: Candidate>(population: impl IntoIterator<Item = C>, limit: usize) -> Vec<C> {
    population.into_iter().filter(|c| c.depth() <= limit).collect()
}

/// One Bernoulli draw picks crossover (two offspring) or mutation (one).
///
/// Offspring are returned unfiltered; callers apply [`discard_deep`] themselves.
pub fn get_offspring<R: Rng>(
    rng: &mut R,
    population: &[Individual],
    breeder: &Breeder,
) -> Result<Vec<Individual>, SelectionError> {
    if bernoulli(rng, breeder.crossover_probability) {
        subtree_crossover(rng, population, &breeder.selector)
    } else {
        subtree_mutation(rng, population, &breeder.selector)
    }
}

/// Breed the next population from a ranked one: the elite carried over, then
/// depth-filtered offspring until `population_size` members are collected.
///
/// The result is unranked; evaluating and sorting it is up to the caller.
pub fn next_generation<R: Rng>(
    rng: &mut R,
    population: &[Individual],
    breeder: &Breeder,
) -> Result<Vec<Individual>, BreedingError> {
    if population.is_empty() {
        return Err(SelectionError::EmptyPopulation.into());
    }

    let mut next: Vec<Individual> = get_elite(population, breeder.elitism_size).to_vec();
    next.truncate(breeder.population_size);

    let mut barren = 0usize;
    let mut discarded = 0usize;
    while next.len() < breeder.population_size {
        let offspring = get_offspring(rng, population, breeder)?;
        let produced = offspring.len();
        let kept = discard_deep(offspring, breeder.limit_depth);
        if kept.len() < produced {
            discarded += produced - kept.len();
            log::trace!(
                "discarded {} of {} offspring deeper than {}",
                produced - kept.len(),
                produced,
                breeder.limit_depth
            );
        }

        if kept.is_empty() {
            barren += 1;
            if barren >= breeder.max_offspring_attempts {
                return Err(BreedingError::TooManyRejections {
                    attempts: barren,
                    limit_depth: breeder.limit_depth,
                });
            }
            continue;
        }
        barren = 0;
        next.extend(kept);
    }
    next.truncate(breeder.population_size);

    log::debug!(
        "bred {} individuals ({} elite, {} offspring discarded for depth)",
        next.len(),
        breeder.elitism_size.min(population.len()),
        discarded
    );
    Ok(next)
}

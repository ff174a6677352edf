pub(crate) mod breeding;
pub(crate) mod individual;
pub(crate) mod options;
pub(crate) mod random;
pub(crate) mod selection;
pub(crate) mod variation;

#[cfg(feature = "cli")]
pub mod cli;

pub use breeding::{discard_deep, get_elite, get_offspring, next_generation, Breeder, BreedingError};
pub use individual::{Candidate, Individual, IndividualConfig};
pub use options::{Options, OptionsError};
pub use selection::{double_tournament, tournament, DoubleTournament, Mode, SelectionError, TieBreak};
pub use variation::{subtree_crossover, subtree_mutation};

pub use program_trees;

#[cfg(test)]
mod tests;

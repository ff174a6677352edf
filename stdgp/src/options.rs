use std::fmt;

use crate::breeding::Breeder;
use crate::selection::{DoubleTournament, Mode, SelectionError};

#[rustfmt::skip]
macro_rules! stdgp_options_spec {
    ($m:ident) => {
        $m! {
            values {
                seed:
                    (u64, 0, "seed"),
                population_size:
                    (usize, 500, "population-size"),
                tournament_size:
                    (usize, 5, "tournament-size"),
                fitness_tournament_size:
                    (usize, 7, "fitness-tournament-size"),
                parsimony_tournament_size:
                    (usize, 2, "parsimony-tournament-size"),
                crossover_probability:
                    (f64, 0.5, "crossover-probability"),
                elitism_size:
                    (usize, 1, "elitism-size"),
                max_depth:
                    (usize, 6, "max-depth"),
                limit_depth:
                    (usize, 17, "limit-depth"),
                max_offspring_attempts:
                    (usize, 1000, "max-offspring-attempts"),
            }
            flags {
                size_first:
                    (false, "size-first"),
            }
        }
    };
}

macro_rules! __define_options {
    (
        values { $( $name:ident: ($ty:ty, $default:expr, $cli_long:literal), )* }
        flags { $( $fname:ident: ($fdefault:expr, $cli_flong:literal), )* }
    ) => {
        #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        #[derive(Clone, Debug, PartialEq)]
        pub struct Options {
            $(pub $name: $ty,)*
            $(pub $fname: bool,)*
        }

        impl Default for Options {
            fn default() -> Self {
                Self {
                    $($name: $default,)*
                    $($fname: $fdefault,)*
                }
            }
        }
    };
}

stdgp_options_spec!(__define_options);

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    Selection(SelectionError),
    CrossoverProbability(f64),
    ZeroPopulationSize,
    EliteExceedsPopulation { elitism_size: usize, population_size: usize },
    ZeroMaxDepth,
    ZeroLimitDepth,
    ZeroOffspringAttempts,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Selection(e) => write!(f, "{e}"),
            OptionsError::CrossoverProbability(p) => {
                write!(f, "crossover_probability must be within [0, 1] (got {p})")
            }
            OptionsError::ZeroPopulationSize => write!(f, "population_size must be > 0"),
            OptionsError::EliteExceedsPopulation {
                elitism_size,
                population_size,
            } => write!(
                f,
                "elitism_size ({elitism_size}) must not exceed population_size ({population_size})"
            ),
            OptionsError::ZeroMaxDepth => write!(f, "max_depth must be > 0"),
            OptionsError::ZeroLimitDepth => write!(f, "limit_depth must be > 0"),
            OptionsError::ZeroOffspringAttempts => write!(f, "max_offspring_attempts must be > 0"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptionsError::Selection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SelectionError> for OptionsError {
    fn from(e: SelectionError) -> Self {
        OptionsError::Selection(e)
    }
}

impl Options {
    pub fn mode(&self) -> Mode {
        Mode::from_switch(self.size_first)
    }

    /// Check every parameter once, up front, and build the breeding configuration.
    pub fn validate(&self) -> Result<Breeder, OptionsError> {
        let selector = DoubleTournament::new(
            self.fitness_tournament_size,
            self.parsimony_tournament_size,
            self.tournament_size,
            self.mode(),
        )?;
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(OptionsError::CrossoverProbability(self.crossover_probability));
        }
        if self.population_size == 0 {
            return Err(OptionsError::ZeroPopulationSize);
        }
        if self.elitism_size > self.population_size {
            return Err(OptionsError::EliteExceedsPopulation {
                elitism_size: self.elitism_size,
                population_size: self.population_size,
            });
        }
        if self.max_depth == 0 {
            return Err(OptionsError::ZeroMaxDepth);
        }
        if self.limit_depth == 0 {
            return Err(OptionsError::ZeroLimitDepth);
        }
        if self.max_offspring_attempts == 0 {
            return Err(OptionsError::ZeroOffspringAttempts);
        }

        Ok(Breeder {
            selector,
            crossover_probability: self.crossover_probability,
            population_size: self.population_size,
            elitism_size: self.elitism_size,
            limit_depth: self.limit_depth,
            max_offspring_attempts: self.max_offspring_attempts,
        })
    }
}

#[cfg(feature = "cli")]
pub(crate) mod cli_args {
    use clap::Args;

    use super::Options;

    macro_rules! __define_options_args {
        (
            values { $( $name:ident: ($ty:ty, $default:expr, $cli_long:literal), )* }
            flags { $( $fname:ident: ($fdefault:expr, $cli_flong:literal), )* }
        ) => {
            #[derive(Args, Debug, Clone, Default)]
            pub struct OptionsArgs {
                $(
                    #[arg(long = $cli_long)]
                    pub $name: Option<$ty>,
                )*

                $(
                    #[arg(long = $cli_flong)]
                    pub $fname: bool,
                )*
            }

            impl OptionsArgs {
                pub fn apply_to(&self, opt: &mut Options) {
                    $(
                        if let Some(v) = self.$name {
                            opt.$name = v;
                        }
                    )*

                    $(
                        if self.$fname {
                            opt.$fname = true;
                        }
                    )*
                }
            }
        };
    }

    stdgp_options_spec!(__define_options_args);
}

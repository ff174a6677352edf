use std::fmt;

use rand::Rng;

use crate::individual::Candidate;
use crate::random::{sample_without_replacement, usize_range};

/// Which pressure the double tournament applies first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Fitness sub-tournaments, then a size tournament among a sample of their winners.
    #[default]
    FitnessFirst,
    /// Size sub-tournaments, then a fitness tournament among a sample of their winners.
    SizeFirst,
}

impl Mode {
    pub fn from_switch(size_first: bool) -> Self {
        if size_first {
            Mode::SizeFirst
        } else {
            Mode::FitnessFirst
        }
    }

    /// How equal sizes are resolved in this mode's size tournament.
    ///
    /// The two modes deliberately differ; changing either alters selection statistics.
    pub fn size_tie_break(self) -> TieBreak {
        match self {
            Mode::FitnessFirst => TieBreak::Random,
            Mode::SizeFirst => TieBreak::FirstOccurrence,
        }
    }
}

/// Policy for choosing among candidates that share the minimum size.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TieBreak {
    /// One uniform draw over the tied positions (drawn even when only one position ties).
    Random,
    /// The earliest tied position; consumes no randomness.
    FirstOccurrence,
}

impl TieBreak {
    /// Position in `sizes` of a minimum, resolved by this policy.
    pub(crate) fn pick<R: Rng>(self, rng: &mut R, sizes: &[usize]) -> usize {
        let min = *sizes.iter().min().expect("size tournament needs at least one candidate");
        match self {
            TieBreak::Random => {
                let ties: Vec<usize> = sizes
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &s)| (s == min).then_some(i))
                    .collect();
                ties[usize_range(rng, 0..ties.len())]
            }
            TieBreak::FirstOccurrence => sizes
                .iter()
                .position(|&s| s == min)
                .expect("minimum is present"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    EmptyPopulation,
    ZeroTournamentSize,
    ZeroFitnessTournaments,
    ZeroParsimonyTournaments,
    ModeMismatch { mode: Mode, sf: usize, sp: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::EmptyPopulation => write!(f, "cannot select from an empty population"),
            SelectionError::ZeroTournamentSize => write!(f, "tournament size must be >= 1"),
            SelectionError::ZeroFitnessTournaments => write!(f, "fitness tournament size (sf) must be >= 1"),
            SelectionError::ZeroParsimonyTournaments => write!(f, "parsimony tournament size (sp) must be >= 1"),
            SelectionError::ModeMismatch {
                mode: Mode::FitnessFirst,
                sf,
                sp,
            } => write!(
                f,
                "switch == false requires sp <= sf (got sf={sf}, sp={sp}); \
                 the switch needs to be turned to true in order to proceed"
            ),
            SelectionError::ModeMismatch {
                mode: Mode::SizeFirst,
                sf,
                sp,
            } => write!(
                f,
                "switch == true requires sp >= sf (got sf={sf}, sp={sp}); \
                 the switch needs to be turned to false in order to proceed"
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

fn tournament_index<R: Rng>(rng: &mut R, len: usize, n: usize) -> usize {
    (0..n)
        .map(|_| usize_range(rng, 0..len))
        .min()
        .expect("tournament size is at least 1")
}

/// Draw `n` indices uniformly with replacement and return the member at the smallest one.
///
/// `population` must be ordered best to worst.
pub fn tournament<'a, R: Rng, C>(rng: &mut R, population: &'a [C], n: usize) -> Result<&'a C, SelectionError> {
    if population.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    if n == 0 {
        return Err(SelectionError::ZeroTournamentSize);
    }
    Ok(&population[tournament_index(rng, population.len(), n)])
}

/// Intermediate state of one double tournament, recorded for inspection in tests.
#[derive(Clone, Debug, Default)]
pub(crate) struct SelectionTrace {
    pub winners: Vec<usize>,
    pub sampled: Vec<usize>,
}

/// A validated double tournament configuration.
///
/// `fitness_size` (sf) and `parsimony_size` (sp) are the number of
/// first-stage tournaments and the size of the second-stage sample, depending
/// on the mode; `tournament_size` (n) is the number of draws per first-stage
/// tournament.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DoubleTournament {
    fitness_size: usize,
    parsimony_size: usize,
    tournament_size: usize,
    mode: Mode,
}

impl DoubleTournament {
    pub fn new(
        fitness_size: usize,
        parsimony_size: usize,
        tournament_size: usize,
        mode: Mode,
    ) -> Result<Self, SelectionError> {
        if tournament_size == 0 {
            return Err(SelectionError::ZeroTournamentSize);
        }
        if fitness_size == 0 {
            return Err(SelectionError::ZeroFitnessTournaments);
        }
        if parsimony_size == 0 {
            return Err(SelectionError::ZeroParsimonyTournaments);
        }
        let consistent = match mode {
            Mode::FitnessFirst => parsimony_size <= fitness_size,
            Mode::SizeFirst => parsimony_size >= fitness_size,
        };
        if !consistent {
            return Err(SelectionError::ModeMismatch {
                mode,
                sf: fitness_size,
                sp: parsimony_size,
            });
        }
        Ok(Self {
            fitness_size,
            parsimony_size,
            tournament_size,
            mode,
        })
    }

    pub fn fitness_size(&self) -> usize {
        self.fitness_size
    }

    pub fn parsimony_size(&self) -> usize {
        self.parsimony_size
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn select<'a, R: Rng, C: Candidate>(&self, rng: &mut R, population: &'a [C]) -> Result<&'a C, SelectionError> {
        Ok(&population[self.select_index(rng, population)?])
    }

    pub fn select_index<R: Rng, C: Candidate>(&self, rng: &mut R, population: &[C]) -> Result<usize, SelectionError> {
        self.run(rng, population, None)
    }

    pub(crate) fn run<R: Rng, C: Candidate>(
        &self,
        rng: &mut R,
        population: &[C],
        trace: Option<&mut SelectionTrace>,
    ) -> Result<usize, SelectionError> {
        if population.is_empty() {
            return Err(SelectionError::EmptyPopulation);
        }
        let (winners, sampled, chosen) = match self.mode {
            Mode::FitnessFirst => self.fitness_first(rng, population),
            Mode::SizeFirst => self.size_first(rng, population),
        };
        if let Some(trace) = trace {
            trace.winners = winners;
            trace.sampled = sampled;
        }
        Ok(chosen)
    }

    fn fitness_first<R: Rng, C: Candidate>(&self, rng: &mut R, population: &[C]) -> (Vec<usize>, Vec<usize>, usize) {
        let len = population.len();
        let winners: Vec<usize> = (0..self.fitness_size)
            .map(|_| tournament_index(rng, len, self.tournament_size))
            .collect();

        let sampled = sample_without_replacement(rng, &winners, self.parsimony_size);
        let sizes: Vec<usize> = sampled.iter().map(|&i| population[i].size()).collect();
        let pos = self.mode.size_tie_break().pick(rng, &sizes);
        let chosen = sampled[pos];
        (winners, sampled, chosen)
    }

    fn size_first<R: Rng, C: Candidate>(&self, rng: &mut R, population: &[C]) -> (Vec<usize>, Vec<usize>, usize) {
        let len = population.len();
        let tie_break = self.mode.size_tie_break();
        let winners: Vec<usize> = (0..self.parsimony_size)
            .map(|_| {
                let candidates: Vec<usize> = (0..self.tournament_size).map(|_| usize_range(rng, 0..len)).collect();
                let sizes: Vec<usize> = candidates.iter().map(|&i| population[i].size()).collect();
                candidates[tie_break.pick(rng, &sizes)]
            })
            .collect();

        let sampled = sample_without_replacement(rng, &winners, self.fitness_size);
        let chosen = *sampled.iter().min().expect("fitness sample is non-empty");
        (winners, sampled, chosen)
    }
}

/// One-shot double tournament from raw parameters.
///
/// An `(sf, sp, size_first)` combination that contradicts the mode is a
/// misconfigured bloat-control policy and panics before any draw; the other
/// configuration problems are returned as errors.
pub fn double_tournament<'a, R: Rng, C: Candidate>(
    rng: &mut R,
    population: &'a [C],
    sf: usize,
    sp: usize,
    n: usize,
    size_first: bool,
) -> Result<&'a C, SelectionError> {
    let selector = match DoubleTournament::new(sf, sp, n, Mode::from_switch(size_first)) {
        Ok(selector) => selector,
        Err(e @ SelectionError::ModeMismatch { .. }) => panic!("{e}"),
        Err(e) => return Err(e),
    };
    selector.select(rng, population)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{DoubleTournament, Mode, SelectionError, TieBreak};

    #[test]
    fn validation_rejects_zero_sizes_before_mode_checks() {
        assert_eq!(
            DoubleTournament::new(3, 2, 0, Mode::FitnessFirst),
            Err(SelectionError::ZeroTournamentSize)
        );
        assert_eq!(
            DoubleTournament::new(0, 0, 2, Mode::FitnessFirst),
            Err(SelectionError::ZeroFitnessTournaments)
        );
        assert_eq!(
            DoubleTournament::new(2, 0, 2, Mode::FitnessFirst),
            Err(SelectionError::ZeroParsimonyTournaments)
        );
    }

    #[test]
    fn validation_enforces_mode_relationship() {
        assert!(DoubleTournament::new(3, 3, 2, Mode::FitnessFirst).is_ok());
        assert!(DoubleTournament::new(3, 3, 2, Mode::SizeFirst).is_ok());
        assert_eq!(
            DoubleTournament::new(2, 3, 2, Mode::FitnessFirst),
            Err(SelectionError::ModeMismatch {
                mode: Mode::FitnessFirst,
                sf: 2,
                sp: 3
            })
        );
        assert_eq!(
            DoubleTournament::new(3, 2, 2, Mode::SizeFirst),
            Err(SelectionError::ModeMismatch {
                mode: Mode::SizeFirst,
                sf: 3,
                sp: 2
            })
        );
    }

    #[test]
    fn first_occurrence_ignores_rng() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            assert_eq!(TieBreak::FirstOccurrence.pick(&mut rng, &[4, 2, 9, 2, 2]), 1);
        }
    }

    #[test]
    fn random_tie_break_visits_every_tied_position() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 5];
        for _ in 0..200 {
            let p = TieBreak::Random.pick(&mut rng, &[4, 2, 9, 2, 2]);
            assert!(matches!(p, 1 | 3 | 4));
            seen[p] = true;
        }
        assert!(seen[1] && seen[3] && seen[4]);
    }
}

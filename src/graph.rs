/*!

The seeded handshake-graph generator.

Every individual tries to shake hands with exactly `degree` distinct others. The construction
is greedy, so it can strand a few people below the target degree when the remaining people
have no valid pairing left; those ids are reported in `Generation::failed_ids` and the
population is still usable.

*/

use crate::{
    debug, define_rng, info,
    injection::{InjectedError, inject_errors},
    people::Population,
    random::{RngStreams, SeededRng},
    PersonId,
};
use serde::{Deserialize, Serialize};

define_rng!(ContactRng);
define_rng!(ErrorRng);
define_rng!(AvatarRng);

/// The result of one generator run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub population: Population,
    /// People whose degree could not be completed, in the order they were given up on.
    pub failed_ids: Vec<PersonId>,
    /// The seed the run was built from, so it can be replayed exactly.
    pub seed: i64,
    pub injected_errors: Vec<InjectedError>,
}

impl Generation {
    /// True when every individual reached the target degree before error injection.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// The display name of individual `idx`: the names are cycled, and from the second pass
/// onwards the pass number is appended.
#[must_use]
pub fn name_for<S: AsRef<str>>(names: &[S], idx: usize) -> String {
    if names.is_empty() {
        return format!("Person {idx}");
    }
    let base = names[idx % names.len()].as_ref();
    let pass = idx / names.len();
    if pass == 0 {
        base.to_string()
    } else {
        format!("{base} {}", pass + 1)
    }
}

/// Clamps an error rate into `[0, 1]`; NaN becomes 0.
#[must_use]
pub fn clamp_error_rate(error_rate: f64) -> f64 {
    if error_rate.is_nan() {
        0.0
    } else {
        error_rate.clamp(0.0, 1.0)
    }
}

/// Generates a population of `population_size` people with `degree` handshakes each, then
/// injects errors at `error_rate`. The same arguments always give the same result.
pub fn generate<S: AsRef<str>>(
    population_size: usize,
    degree: usize,
    names: &[S],
    error_rate: f64,
    seed: i64,
) -> Generation {
    let mut streams = RngStreams::with_seed(seed);
    let mut population = Population::with_size(population_size, |idx| name_for(names, idx));

    let failed_ids =
        streams.sample::<ContactRng, _>(|rng| make_handshakes(&mut population, degree, rng));
    streams.sample::<AvatarRng, _>(|rng| assign_avatar_seeds(&mut population, rng));

    let error_rate = clamp_error_rate(error_rate);
    let injected_errors = streams.sample::<ErrorRng, _>(|rng| {
        inject_errors(&mut population, population_size, degree, error_rate, rng)
    });

    info!(
        "generated {} people with degree {} from seed {}: {} fails, {} injected errors",
        population_size,
        degree,
        seed,
        failed_ids.len(),
        injected_errors.len()
    );

    Generation {
        population,
        failed_ids,
        seed,
        injected_errors,
    }
}

/// Builds the handshake edges in place and returns the ids that could not reach `degree`.
pub fn make_handshakes(
    population: &mut Population,
    degree: usize,
    rng: &mut SeededRng,
) -> Vec<PersonId> {
    let mut fails = Vec::new();
    if degree == 0 || population.is_empty() {
        return fails;
    }

    // Everyone still short of `degree`, kept in ascending id order.
    let mut remaining: Vec<PersonId> = population
        .ids()
        .filter(|id| population.degree(*id) < degree)
        .collect();

    while !remaining.is_empty() {
        let a = remaining[rng.next_int(remaining.len())];
        let candidates: Vec<PersonId> = match population.get(a) {
            Some(person) => remaining
                .iter()
                .copied()
                .filter(|b| *b != a && !person.has_contact(*b))
                .collect(),
            None => Vec::new(),
        };

        match rng.choose(&candidates) {
            Some(&b) => {
                population.add_contact(a, b);
                remaining.retain(|id| population.degree(*id) < degree);
            }
            None => {
                debug!("no handshake partners left for {a}");
                fails.push(a);
                remaining.retain(|id| *id != a);
            }
        }
    }

    fails
}

fn assign_avatar_seeds(population: &mut Population, rng: &mut SeededRng) {
    for person in population.iter_mut() {
        person.avatar_seed = rng.next_u32();
    }
}

/// How often a complete handshake graph was produced over a batch of seeds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub trials: usize,
    pub complete: usize,
}

impl CompletionRate {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.complete as f64 / self.trials as f64
        }
    }
}

/// Runs the generator `trials` times with seeds `base_seed, base_seed + 1, ...` and counts
/// the runs in which every individual reached `degree`.
#[must_use]
pub fn estimate_completion_rate(
    trials: usize,
    population_size: usize,
    degree: usize,
    base_seed: i64,
) -> CompletionRate {
    let names: [&str; 0] = [];
    let mut seed = base_seed;
    let mut complete = 0;
    for _ in 0..trials {
        if generate(population_size, degree, &names, 0.0, seed).is_complete() {
            complete += 1;
        }
        seed = seed.wrapping_add(1);
    }
    debug!("{complete} of {trials} runs complete for {population_size} people, degree {degree}");
    CompletionRate { trials, complete }
}

/*!

Error injection: perturbs a freshly generated handshake graph to mimic the messy data a class
hands in. A fixed share of people each get exactly one kind of error:

 - `Erase`: the record disappears; partners still list the id (a one-sided submission).
 - `Truncate`: a few handshakes are dropped from the end of the person's own list.
 - `Corrupt`: the list is replaced by random ids, which may be missing, repeated, or the
   person themselves.

These are simulation inputs, not failures, and nothing here can fail.

*/

use crate::{debug, people::Population, random::SeededRng, PersonId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum ErrorKind {
    Erase,
    Truncate,
    Corrupt,
}

impl ErrorKind {
    const ALL: [ErrorKind; 3] = [ErrorKind::Erase, ErrorKind::Truncate, ErrorKind::Corrupt];
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct InjectedError {
    pub target: PersonId,
    pub kind: ErrorKind,
}

/// The number of people hit at `error_rate`: `round(population_size * error_rate)`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn error_count(population_size: usize, error_rate: f64) -> usize {
    let count = (population_size as f64 * error_rate).round();
    if count.is_nan() || count <= 0.0 {
        0
    } else {
        (count as usize).min(population_size)
    }
}

/// Injects errors into `population` in place and returns what was done, in injection order.
/// `error_rate` is expected to be already clamped to `[0, 1]`.
pub fn inject_errors(
    population: &mut Population,
    population_size: usize,
    degree: usize,
    error_rate: f64,
    rng: &mut SeededRng,
) -> Vec<InjectedError> {
    let count = error_count(population_size, error_rate);

    // Partial Fisher-Yates: the first `count` slots end up as a uniform sample without
    // replacement.
    let mut ids: Vec<usize> = (0..population_size).collect();
    for slot in 0..count {
        let pick = slot + rng.next_int(population_size - slot);
        ids.swap(slot, pick);
    }

    let mut injected = Vec::with_capacity(count);
    for &idx in &ids[..count] {
        let target = PersonId(idx);
        let kind = ErrorKind::ALL[rng.next_int(ErrorKind::ALL.len())];
        match kind {
            ErrorKind::Erase => {
                population.remove(target);
            }
            ErrorKind::Truncate => {
                if let Some(person) = population.get_mut(target) {
                    let len = person.contacts.len();
                    let dropped = rng.next_int(degree.min(len) + 1);
                    person.contacts.truncate(len - dropped);
                }
            }
            ErrorKind::Corrupt => {
                if let Some(person) = population.get_mut(target) {
                    person.contacts = (0..degree)
                        .map(|_| PersonId(rng.next_int(population_size)))
                        .collect();
                }
            }
        }
        debug!("injected {kind:?} error into {target}");
        injected.push(InjectedError { target, kind });
    }

    injected
}

/*!

Individuals and the population that holds them.

A `Population` is stored the way a property column is: a `Vec<Option<Individual>>` indexed by
`PersonId`. A `None` slot is a record that is missing (erased by error injection), which is
"no data for this person" rather than an error.

*/

use crate::PersonId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Compartment {
    Susceptible,
    Infectious,
    Removed,
}

impl Compartment {
    /// Position in the one-way `S -> I -> R` ordering.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Compartment::Susceptible => 0,
            Compartment::Infectious => 1,
            Compartment::Removed => 2,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Compartment::Susceptible => 'S',
            Compartment::Infectious => 'I',
            Compartment::Removed => 'R',
        }
    }
}

impl Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub id: PersonId,
    pub name: String,
    /// People this individual shook hands with, in the order the handshakes happen.
    pub contacts: Vec<PersonId>,
    pub compartment: Compartment,
    /// Steps spent infectious; only meaningful while `compartment` is `Infectious`.
    pub infected_time: usize,
    pub initial_infection_time: Option<usize>,
    /// Stable per-person number for the presentation layer's avatar generator.
    pub avatar_seed: u32,
}

impl Individual {
    #[must_use]
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Individual {
            id,
            name: name.into(),
            contacts: Vec::new(),
            compartment: Compartment::Susceptible,
            infected_time: 0,
            initial_infection_time: None,
            avatar_seed: 0,
        }
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn has_contact(&self, other: PersonId) -> bool {
        self.contacts.contains(&other)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    individuals: Vec<Option<Individual>>,
}

impl Population {
    /// Creates `size` susceptible individuals with no contacts, named by `name_of`.
    pub fn with_size(size: usize, mut name_of: impl FnMut(usize) -> String) -> Self {
        Population {
            individuals: (0..size)
                .map(|idx| Some(Individual::new(PersonId(idx), name_of(idx))))
                .collect(),
        }
    }

    /// The number of ids ever allocated, including missing records.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.individuals.len()
    }

    /// The number of records actually present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, person_id: PersonId) -> bool {
        self.get(person_id).is_some()
    }

    #[must_use]
    pub fn get(&self, person_id: PersonId) -> Option<&Individual> {
        self.individuals.get(person_id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, person_id: PersonId) -> Option<&mut Individual> {
        self.individuals.get_mut(person_id.0).and_then(Option::as_mut)
    }

    /// Erases a record, leaving its slot empty. Returns the removed record, if any.
    pub fn remove(&mut self, person_id: PersonId) -> Option<Individual> {
        self.individuals.get_mut(person_id.0).and_then(Option::take)
    }

    /// Adds the symmetric contact `(a, b)`. Does nothing if either record is missing.
    pub fn add_contact(&mut self, a: PersonId, b: PersonId) {
        if !(self.contains(a) && self.contains(b)) {
            return;
        }
        if let Some(person) = self.get_mut(a) {
            person.contacts.push(b);
        }
        if let Some(person) = self.get_mut(b) {
            person.contacts.push(a);
        }
    }

    #[must_use]
    pub fn degree(&self, person_id: PersonId) -> usize {
        self.get(person_id).map_or(0, Individual::degree)
    }

    /// Present individuals in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.individuals.iter_mut().flatten()
    }

    /// Ids of present individuals in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.iter().map(|person| person.id)
    }

    /// Ids of present individuals in the given compartment, in ascending order.
    #[must_use]
    pub fn ids_in(&self, compartment: Compartment) -> Vec<PersonId> {
        self.iter()
            .filter(|person| person.compartment == compartment)
            .map(|person| person.id)
            .collect()
    }

    #[must_use]
    pub fn count_in(&self, compartment: Compartment) -> usize {
        self.iter()
            .filter(|person| person.compartment == compartment)
            .count()
    }

    /// The display name of `person_id`, or a placeholder for a missing record.
    #[must_use]
    pub fn name_of(&self, person_id: PersonId) -> String {
        match self.get(person_id) {
            Some(person) => person.name.clone(),
            None => format!("#{person_id}"),
        }
    }
}

/*!

The handshake epidemic: a discrete-step SIR state machine over a generated population.

Each step, everyone who is infectious at the start of the step (taken in ascending id order)
ages by one step and then either recovers, when their infectious period is over or they have
no handshakes left, or enacts their next handshake. A handshake from an infectious person to
a susceptible one infects them, and the newly infected person forgets every handshake of
theirs up to and including the one with whoever infected them.

`simulate` takes the population by value. Handshakes are consumed from a queue owned by the
run, so the contact lists on the returned population are untouched and a generated population
can be cloned and re-simulated with other parameters.

*/

use crate::{
    debug,
    event::{Event, EventKind, NoTransmissionReason},
    info,
    people::{Compartment, Population},
    trace, warn, PersonId,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Compartment sizes at the end of one step.
#[derive(Debug, Default, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SirCounts {
    pub s: usize,
    pub i: usize,
    pub r: usize,
}

impl SirCounts {
    #[must_use]
    pub fn of(population: &Population) -> Self {
        let mut counts = SirCounts::default();
        for person in population.iter() {
            match person.compartment {
                Compartment::Susceptible => counts.s += 1,
                Compartment::Infectious => counts.i += 1,
                Compartment::Removed => counts.r += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.s + self.i + self.r
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// One sample per step; index 0 is the state right after seeding.
    pub time_series: Vec<SirCounts>,
    pub events: Vec<Event>,
    /// The step at which no one was infectious any more.
    pub end_time: usize,
    /// Final compartments and infection times. Contact lists are as they were passed in.
    pub population: Population,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub end_time: usize,
    pub peak_infectious: usize,
    pub peak_time: usize,
    /// Initial infections plus onward transmissions.
    pub total_infections: usize,
    pub final_susceptible: usize,
    pub final_removed: usize,
    pub attack_rate: f64,
}

impl SimulationOutput {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> Summary {
        let (peak_time, peak_infectious) = self
            .time_series
            .iter()
            .enumerate()
            .fold((0, 0), |best, (t, counts)| {
                if counts.i > best.1 { (t, counts.i) } else { best }
            });
        let total_infections = self
            .population
            .iter()
            .filter(|person| person.initial_infection_time.is_some())
            .count();
        let last = self.time_series.last().copied().unwrap_or_default();
        let present = self.population.len();
        let attack_rate = if present == 0 {
            0.0
        } else {
            total_infections as f64 / present as f64
        };

        Summary {
            end_time: self.end_time,
            peak_infectious,
            peak_time,
            total_infections,
            final_susceptible: last.s,
            final_removed: last.r,
            attack_rate,
        }
    }
}

/// Runs the epidemic to completion. See the module documentation for the rules.
///
/// Ids in `initial_vaccinated` or `initial_infectives` that are not in the population are
/// logged and ignored. Anyone listed in both is vaccinated and never infected.
#[must_use]
pub fn simulate(
    population: Population,
    infectious_period: usize,
    initial_infectives: &[PersonId],
    initial_vaccinated: &[PersonId],
) -> SimulationOutput {
    let mut simulation = Simulation::new(population, infectious_period);
    simulation.seed(initial_infectives, initial_vaccinated);
    simulation.run();

    let output = simulation.into_output();
    info!("epidemic ended at t = {}", output.end_time);
    output
}

struct Simulation {
    population: Population,
    infectious_period: usize,
    /// Handshakes not yet enacted, indexed by `PersonId`.
    pending: Vec<VecDeque<PersonId>>,
    events: Vec<Event>,
    time_series: Vec<SirCounts>,
    t: usize,
}

impl Simulation {
    fn new(population: Population, infectious_period: usize) -> Self {
        let pending = (0..population.capacity())
            .map(|idx| {
                population
                    .get(PersonId(idx))
                    .map(|person| person.contacts.iter().copied().collect())
                    .unwrap_or_default()
            })
            .collect();

        Simulation {
            population,
            infectious_period,
            pending,
            events: Vec::new(),
            time_series: Vec::new(),
            t: 0,
        }
    }

    /// Keeps the ids that exist, dropping repeats and anything in `exclude`.
    fn present_ids(
        &self,
        ids: &[PersonId],
        exclude: &FxHashSet<PersonId>,
        role: &str,
    ) -> Vec<PersonId> {
        let mut seen = FxHashSet::default();
        ids.iter()
            .copied()
            .filter(|id| {
                if !self.population.contains(*id) {
                    warn!("ignoring {role} {id}: no such person in the population");
                    return false;
                }
                !exclude.contains(id) && seen.insert(*id)
            })
            .collect()
    }

    fn seed(&mut self, initial_infectives: &[PersonId], initial_vaccinated: &[PersonId]) {
        let vaccinated = self.present_ids(initial_vaccinated, &FxHashSet::default(), "vaccinee");
        let vaccinated_set: FxHashSet<PersonId> = vaccinated.iter().copied().collect();
        let infectives = self.present_ids(initial_infectives, &vaccinated_set, "initial infective");

        if !vaccinated.is_empty() {
            for person_id in &vaccinated {
                if let Some(person) = self.population.get_mut(*person_id) {
                    person.compartment = Compartment::Removed;
                }
            }
            self.record(EventKind::InitialVaccination { people: vaccinated });
        }

        if !infectives.is_empty() {
            for person_id in &infectives {
                if let Some(person) = self.population.get_mut(*person_id) {
                    person.compartment = Compartment::Infectious;
                    person.infected_time = 0;
                    person.initial_infection_time = Some(0);
                }
            }
            self.record(EventKind::InitialInfection { people: infectives });
        }

        self.time_series.push(SirCounts::of(&self.population));
    }

    fn run(&mut self) {
        while self.population.count_in(Compartment::Infectious) > 0 {
            self.t += 1;
            for person_id in self.population.ids_in(Compartment::Infectious) {
                self.advance(person_id);
            }
            let counts = SirCounts::of(&self.population);
            debug!("t={}: S={} I={} R={}", self.t, counts.s, counts.i, counts.r);
            self.time_series.push(counts);
        }
    }

    /// One step for an infectious person: age them, then recover or shake the next hand.
    fn advance(&mut self, person_id: PersonId) {
        let Some(person) = self.population.get_mut(person_id) else {
            warn!("t={}: cannot advance missing person {person_id}", self.t);
            return;
        };
        person.infected_time += 1;
        let period_over = person.infected_time > self.infectious_period;

        let next_contact = if period_over {
            None
        } else {
            self.pending[person_id.0].pop_front()
        };

        match next_contact {
            Some(contact_id) => self.handshake(person_id, contact_id),
            None => self.recover(person_id),
        }
    }

    fn recover(&mut self, person_id: PersonId) {
        if let Some(person) = self.population.get_mut(person_id) {
            person.compartment = Compartment::Removed;
            self.record(EventKind::Recovery { person: person_id });
        }
    }

    fn handshake(&mut self, person_id: PersonId, contact_id: PersonId) {
        let Some(contact) = self.population.get(contact_id) else {
            warn!(
                "t={}: {} shakes hands with {contact_id}, who has no record; skipping",
                self.t,
                self.population.name_of(person_id)
            );
            return;
        };
        let contact_status = contact.compartment;
        let source_status = self
            .population
            .get(person_id)
            .map(|person| person.compartment);

        self.record(EventKind::Handshake {
            person: person_id,
            contact: contact_id,
        });

        let reason = match (source_status, contact_status) {
            (Some(Compartment::Infectious), Compartment::Susceptible) => {
                self.infect(contact_id, person_id);
                return;
            }
            (Some(Compartment::Infectious), Compartment::Infectious) => {
                NoTransmissionReason::ContactInfectious
            }
            (Some(Compartment::Infectious), Compartment::Removed) => {
                NoTransmissionReason::ContactRemoved
            }
            _ => NoTransmissionReason::SourceNotInfectious,
        };
        self.record(EventKind::HandshakeNoTransmission {
            person: person_id,
            contact: contact_id,
            reason,
        });
    }

    fn infect(&mut self, person_id: PersonId, source_id: PersonId) {
        let Some(person) = self.population.get_mut(person_id) else {
            return;
        };
        person.compartment = Compartment::Infectious;
        person.infected_time = 0;
        person.initial_infection_time = Some(self.t);
        self.record(EventKind::Infection {
            person: person_id,
            source: source_id,
        });

        // The newly infected person's own handshakes up to the one with their source have
        // effectively already happened.
        let pending = &mut self.pending[person_id.0];
        match pending.iter().position(|id| *id == source_id) {
            Some(position) => {
                pending.drain(..=position);
            }
            None => pending.clear(),
        }
    }

    fn record(&mut self, kind: EventKind) {
        let event = Event::new(self.t, kind, &self.population);
        trace!("t={}: {}", event.t, event.message);
        self.events.push(event);
    }

    fn into_output(self) -> SimulationOutput {
        SimulationOutput {
            time_series: self.time_series,
            events: self.events,
            end_time: self.t,
            population: self.population,
        }
    }
}

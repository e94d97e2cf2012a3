use crate::{people::Population, PersonId};
use serde::{Deserialize, Serialize};

/// Why a handshake did not pass the infection on.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum NoTransmissionReason {
    ContactInfectious,
    ContactRemoved,
    SourceNotInfectious,
}

/// How a renderer should style an event's message.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageClass {
    Info,
    Infection,
    Recovery,
    NoTransmission,
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    InitialVaccination {
        people: Vec<PersonId>,
    },
    InitialInfection {
        people: Vec<PersonId>,
    },
    Infection {
        person: PersonId,
        source: PersonId,
    },
    Recovery {
        person: PersonId,
    },
    Handshake {
        person: PersonId,
        contact: PersonId,
    },
    HandshakeNoTransmission {
        person: PersonId,
        contact: PersonId,
        reason: NoTransmissionReason,
    },
}

impl EventKind {
    #[must_use]
    pub fn class(&self) -> MessageClass {
        match self {
            EventKind::InitialVaccination { .. }
            | EventKind::InitialInfection { .. }
            | EventKind::Handshake { .. } => MessageClass::Info,
            EventKind::Infection { .. } => MessageClass::Infection,
            EventKind::Recovery { .. } => MessageClass::Recovery,
            EventKind::HandshakeNoTransmission { .. } => MessageClass::NoTransmission,
        }
    }

    /// Every person the event is about, in a fixed order.
    #[must_use]
    pub fn subjects(&self) -> Vec<PersonId> {
        match self {
            EventKind::InitialVaccination { people } | EventKind::InitialInfection { people } => {
                people.clone()
            }
            EventKind::Infection { person, source } => vec![*person, *source],
            EventKind::Recovery { person } => vec![*person],
            EventKind::Handshake { person, contact }
            | EventKind::HandshakeNoTransmission {
                person, contact, ..
            } => vec![*person, *contact],
        }
    }
}

/// One entry of the event log.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Event {
    pub t: usize,
    pub kind: EventKind,
    pub message: String,
    pub class: MessageClass,
}

impl Event {
    /// Builds an event, rendering its message with the names in `population`.
    #[must_use]
    pub fn new(t: usize, kind: EventKind, population: &Population) -> Self {
        let message = describe(&kind, population);
        let class = kind.class();
        Event {
            t,
            kind,
            message,
            class,
        }
    }
}

fn describe(kind: &EventKind, population: &Population) -> String {
    let name = |id: &PersonId| population.name_of(*id);
    match kind {
        EventKind::InitialVaccination { people } => {
            let verb = if people.len() == 1 { "is" } else { "are" };
            format!("{} {verb} vaccinated.", join_names(people, population))
        }
        EventKind::InitialInfection { people } => {
            let names = join_names(people, population);
            if people.len() == 1 {
                format!("The initial infective is {names}.")
            } else {
                format!("The initial infectives are {names}.")
            }
        }
        EventKind::Infection { person, .. } => format!("{} is now infected!", name(person)),
        EventKind::Recovery { person } => format!("{} is now recovered.", name(person)),
        EventKind::Handshake { person, contact } => {
            format!("{} shakes hands with {}.", name(person), name(contact))
        }
        EventKind::HandshakeNoTransmission {
            person,
            contact,
            reason,
        } => match reason {
            NoTransmissionReason::ContactInfectious => {
                format!("... but {} is already infected.", name(contact))
            }
            NoTransmissionReason::ContactRemoved => {
                format!("... but {} is already recovered.", name(contact))
            }
            NoTransmissionReason::SourceNotInfectious => {
                format!("... but {} is not infectious.", name(person))
            }
        },
    }
}

/// "A", "A and B", "A, B and C".
fn join_names(people: &[PersonId], population: &Population) -> String {
    let names: Vec<String> = people.iter().map(|id| population.name_of(*id)).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population() -> Population {
        let names = ["Ann", "Bo", "Cy"];
        Population::with_size(3, |idx| names[idx].to_string())
    }

    #[test]
    fn messages_use_names() {
        let population = population();
        let event = Event::new(
            3,
            EventKind::Handshake {
                person: PersonId(0),
                contact: PersonId(2),
            },
            &population,
        );
        assert_eq!(event.message, "Ann shakes hands with Cy.");
        assert_eq!(event.class, MessageClass::Info);
        assert_eq!(event.t, 3);

        let event = Event::new(
            3,
            EventKind::HandshakeNoTransmission {
                person: PersonId(0),
                contact: PersonId(1),
                reason: NoTransmissionReason::ContactRemoved,
            },
            &population,
        );
        assert_eq!(event.message, "... but Bo is already recovered.");
        assert_eq!(event.class, MessageClass::NoTransmission);
    }

    #[test]
    fn group_messages() {
        let population = population();
        let one = Event::new(
            0,
            EventKind::InitialInfection {
                people: vec![PersonId(1)],
            },
            &population,
        );
        assert_eq!(one.message, "The initial infective is Bo.");

        let three = Event::new(
            0,
            EventKind::InitialVaccination {
                people: vec![PersonId(0), PersonId(1), PersonId(2)],
            },
            &population,
        );
        assert_eq!(three.message, "Ann, Bo and Cy are vaccinated.");

        let single = Event::new(
            0,
            EventKind::InitialVaccination {
                people: vec![PersonId(2)],
            },
            &population,
        );
        assert_eq!(single.message, "Cy is vaccinated.");
    }

    #[test]
    fn subjects_and_classes() {
        let kind = EventKind::Infection {
            person: PersonId(2),
            source: PersonId(0),
        };
        assert_eq!(kind.subjects(), vec![PersonId(2), PersonId(0)]);
        assert_eq!(kind.class(), MessageClass::Infection);
        assert_eq!(
            EventKind::Recovery { person: PersonId(1) }.class(),
            MessageClass::Recovery
        );
    }

    #[test]
    fn serializes_with_a_type_tag() {
        let kind = EventKind::Recovery { person: PersonId(4) };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"type":"Recovery","person":4}"#);
    }
}

use crate::{
    error::HandshakeError,
    graph::{clamp_error_rate, generate, Generation},
    simulation::{simulate, SimulationOutput},
    warn, PersonId,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to generate a population and run one epidemic over it.
///
/// Missing fields take their default; unknown fields are an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    pub population_size: usize,
    /// Handshakes per person.
    pub degree: usize,
    /// Steps a person stays infectious.
    pub infectious_period: usize,
    /// Share of people whose handshake data is damaged, in `[0, 1]`.
    pub error_rate: f64,
    pub seed: i64,
    /// Display names, cycled when there are fewer names than people.
    pub names: Vec<String>,
    pub initial_infectives: Vec<PersonId>,
    pub initial_vaccinated: Vec<PersonId>,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            population_size: 100,
            degree: 5,
            infectious_period: 4,
            error_rate: 0.0,
            seed: 42,
            names: Vec::new(),
            initial_infectives: vec![PersonId(2)],
            initial_vaccinated: Vec::new(),
        }
    }
}

impl Params {
    pub fn from_json_str(json: &str) -> Result<Self, HandshakeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HandshakeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|error| {
            HandshakeError::ParameterError(format!(
                "could not read parameters from {}: {error}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Clamps out-of-range values rather than rejecting them.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let clamped = clamp_error_rate(self.error_rate);
        if clamped.to_bits() != self.error_rate.to_bits() {
            warn!("error_rate {} clamped to {clamped}", self.error_rate);
            self.error_rate = clamped;
        }
        if self.degree >= self.population_size && self.population_size > 0 {
            warn!(
                "degree {} cannot be reached with {} people; everyone will fall short",
                self.degree, self.population_size
            );
        }
        self
    }

    #[must_use]
    pub fn generate(&self) -> Generation {
        generate(
            self.population_size,
            self.degree,
            &self.names,
            self.error_rate,
            self.seed,
        )
    }

    /// Runs the epidemic on a copy of `generation`'s population.
    #[must_use]
    pub fn simulate(&self, generation: &Generation) -> SimulationOutput {
        simulate(
            generation.population.clone(),
            self.infectious_period,
            &self.initial_infectives,
            &self.initial_vaccinated,
        )
    }
}

/*!

The Handshake Game: an SIR epidemic played out over a seeded, randomly generated handshake
graph.

 - [`generate`] builds a population in which everyone shakes hands with a fixed number of
   others, then damages a share of the records to mimic messy class data.
 - [`simulate`] replays the epidemic step by step over (a copy of) that population and returns
   the S/I/R time series and the full event log.

The same arguments always produce the same population and the same epidemic.

```rust
use handshake_sir::{generate, simulate, PersonId};

let generation = generate(6, 2, &["P"], 0.0, 42);
let output = simulate(generation.population.clone(), 2, &[PersonId::new(0)], &[]);
assert_eq!((output.time_series[0].s, output.time_series[0].i), (5, 1));
```

*/

pub mod error;
pub mod event;
pub mod graph;
mod hashing;
pub mod injection;
pub mod logging;
pub mod params;
pub mod people;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

pub use error::HandshakeError;
pub use graph::{generate, Generation};
pub use log::{debug, error, info, trace, warn};
pub use simulation::{simulate, SimulationOutput};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        PersonId(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for PersonId {
    fn from(index: usize) -> Self {
        PersonId(index)
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

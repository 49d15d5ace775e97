//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend accepts: qubit count, gate names
//! (OpenQASM 3 naming) and the shot limit. Backends build them once at
//! construction and hand out a reference.

use qsearch_ir::STANDARD_GATE_NAMES;
use serde::{Deserialize, Serialize};

/// Hardware or simulator capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags such as `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Default shot limit for simulators.
    pub const SIMULATOR_MAX_SHOTS: u32 = 100_000;

    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::standard(),
            max_shots: Self::SIMULATOR_MAX_SHOTS,
            is_simulator: true,
            features: vec!["statevector".into(), "terminal_measurement".into()],
        }
    }

    /// Check whether a feature flag is advertised.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate names a backend can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Supported gate names.
    pub gates: Vec<String>,
}

impl GateSet {
    /// Every gate in the circuit IR.
    pub fn standard() -> Self {
        Self {
            gates: STANDARD_GATE_NAMES.iter().map(|g| (*g).to_string()).collect(),
        }
    }

    /// Build a gate set from explicit names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            gates: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }
}

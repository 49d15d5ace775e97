//! Grover circuit assembly and execution.

use qsearch_hal::{Backend, ExecutionResult, HalError, ValidationResult};
use qsearch_ir::{Circuit, ClbitId, IrResult, QubitId};
use tracing::{debug, info, instrument};

use crate::error::{GroverError, GroverResult};
use crate::oracle::{Oracle, build_oracle};

/// Oracle + diffusion rounds applied by [`grover_circuit`].
///
/// Fixed at one regardless of register width, so the success probability
/// falls off for wider registers (see [`theoretical_success_probability`]).
pub const GROVER_ITERATIONS: usize = 1;

/// Assemble the Grover circuit around `oracle`.
///
/// Layout: `num_qubits` search qubits followed by the ancilla, and one
/// classical bit per search qubit. Search qubit `i` is measured into
/// classical bit `i`.
pub fn grover_circuit(oracle: &Oracle, num_qubits: u32) -> GroverResult<Circuit> {
    if oracle.num_qubits() != num_qubits {
        return Err(GroverError::QubitCountMismatch {
            oracle: oracle.num_qubits(),
            requested: num_qubits,
        });
    }

    let ancilla = oracle.ancilla();
    let search: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
    let all: Vec<QubitId> = search.iter().copied().chain([ancilla]).collect();
    let diffusion = diffusion(num_qubits)?;

    let mut circuit = Circuit::with_size("grover", num_qubits + 1, num_qubits);
    for &q in &search {
        circuit.h(q)?;
    }
    circuit.h(ancilla)?;

    for _ in 0..GROVER_ITERATIONS {
        circuit.compose(oracle.circuit(), &all)?;
        circuit.compose(&diffusion, &all)?;
    }

    for &q in &search {
        circuit.measure(q, ClbitId(q.0))?;
    }

    debug!(
        num_qubits,
        depth = circuit.depth(),
        ops = circuit.num_ops(),
        "built grover circuit"
    );
    Ok(circuit)
}

/// Inversion about the mean over the search register, ancilla last.
fn diffusion(num_qubits: u32) -> IrResult<Circuit> {
    let search: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
    let ancilla = QubitId(num_qubits);

    let mut circuit = Circuit::with_size("diffusion", num_qubits + 1, 0);
    for &q in &search {
        circuit.h(q)?;
    }
    for &q in &search {
        circuit.x(q)?;
    }
    circuit.h(ancilla)?.mcx(&search, ancilla)?.h(ancilla)?;
    for &q in &search {
        circuit.x(q)?;
    }
    for &q in &search {
        circuit.h(q)?;
    }
    Ok(circuit)
}

/// Probability that [`grover_circuit`] measures the marked bit-string.
///
/// The ancilla enters the oracle in |+⟩ rather than |−⟩, so one round is
/// weaker than the textbook `sin²(3θ)`. With `D = 2^N` the exact value is
/// `((D − 2)² + 4(D − 1)²) / D³`: 0.625 for two qubits.
pub fn theoretical_success_probability(num_qubits: u32) -> f64 {
    let d = 2f64.powi(num_qubits as i32);
    ((d - 2.0).powi(2) + 4.0 * (d - 1.0).powi(2)) / d.powi(3)
}

/// A finished search: the circuit that ran and what the backend measured.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The executed circuit.
    pub circuit: Circuit,
    /// Backend result.
    pub result: ExecutionResult,
    /// The index the oracle marked.
    pub marked_index: u64,
    /// Number of search qubits.
    pub num_qubits: u32,
}

impl SearchOutcome {
    /// The bit-string the marked index is measured as.
    pub fn expected_bitstring(&self) -> String {
        format!("{:0width$b}", self.marked_index, width = self.num_qubits as usize)
    }

    /// Whether the most frequent outcome is the marked index.
    pub fn found(&self) -> bool {
        self.result
            .counts
            .most_frequent()
            .is_some_and(|(bits, _)| bits == self.expected_bitstring())
    }

    /// Fraction of shots that hit the marked index.
    pub fn success_rate(&self) -> f64 {
        let total = self.result.counts.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.result.counts.get(&self.expected_bitstring()) as f64 / total as f64
    }
}

/// Build the oracle and Grover circuit, run it once on `backend`, and wait for counts.
#[instrument(skip(backend), fields(backend = backend.name()))]
pub async fn search(
    backend: &dyn Backend,
    num_qubits: u32,
    marked_index: u64,
    shots: u32,
) -> GroverResult<SearchOutcome> {
    let oracle = build_oracle(num_qubits, marked_index)?;
    let circuit = grover_circuit(&oracle, num_qubits)?;

    let max = backend.capabilities().num_qubits;
    if circuit.num_qubits() > max as usize {
        return Err(HalError::CircuitTooLarge {
            qubits: circuit.num_qubits(),
            max,
        }
        .into());
    }
    if let ValidationResult::Invalid { reasons } = backend.validate(&circuit).await? {
        return Err(HalError::InvalidCircuit(reasons.join("; ")).into());
    }

    let job_id = backend.submit(&circuit, shots).await?;
    info!(%job_id, shots, "submitted grover circuit");

    let result = backend.wait(&job_id).await?;
    info!(
        %job_id,
        outcomes = result.counts.len(),
        elapsed_ms = result.execution_time_ms,
        "search finished"
    );

    Ok(SearchOutcome {
        circuit,
        result,
        marked_index,
        num_qubits,
    })
}

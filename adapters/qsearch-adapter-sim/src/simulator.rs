//! Simulator backend implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument};
use uuid::Uuid;

use qsearch_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use qsearch_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Largest qubit limit accepted from configuration.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Evolves a statevector once per job and draws every shot from the final
/// distribution. Only terminal measurement is supported: a gate may not act
/// on a qubit after that qubit has been measured.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Submitted jobs.
    jobs: Mutex<FxHashMap<JobId, SimJob>>,
    /// Sampling RNG.
    rng: Mutex<StdRng>,
    /// Seed the RNG was created from, if any.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, None)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(BackendConfig::new("simulator"), max_qubits, None)
    }

    /// Create a simulator whose sampling is reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, Some(seed))
    }

    fn build(config: BackendConfig, max_qubits: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut capabilities = Capabilities::simulator(max_qubits);
        capabilities.name.clone_from(&config.name);

        Self {
            config,
            capabilities,
            jobs: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
            seed,
        }
    }

    /// Maximum number of qubits this simulator accepts.
    pub fn max_qubits(&self) -> u32 {
        self.capabilities.num_qubits
    }

    fn jobs(&self) -> MutexGuard<'_, FxHashMap<JobId, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Collect every reason `circuit` cannot run here.
    fn check_circuit(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.max_qubits() as usize {
            reasons.push(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits()
            ));
        }

        let mut measured = FxHashSet::default();
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => measured.extend(inst.qubits.iter().copied()),
                InstructionKind::Gate(gate) => {
                    if !self.capabilities.gate_set.contains(gate.name()) {
                        reasons.push(format!("Unsupported gate '{}'", gate.name()));
                    }
                    if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                        reasons.push(format!(
                            "Gate '{}' acts on {} after it was measured",
                            gate.name(),
                            q
                        ));
                    }
                }
            }
        }

        reasons
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        debug!("Starting simulation: {} qubits, {} shots", num_qubits, shots);

        let mut sv = Statevector::new(num_qubits);
        for inst in circuit.instructions() {
            sv.apply(inst);
        }
        let sampler = sv.sampler();
        let readout = Readout::from_circuit(circuit);

        let mut counts = Counts::new();
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for _ in 0..shots {
                let outcome = sampler.sample(&mut *rng);
                counts.insert(readout.bitstring(outcome), 1);
            }
        }

        let elapsed = start.elapsed();
        debug!(
            "Simulation completed in {:?} ({} distinct outcomes)",
            elapsed,
            counts.len()
        );

        let mut result = ExecutionResult::new(counts, shots)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata("backend", serde_json::json!(self.config.name));
        if let Some(seed) = self.seed {
            result = result.with_metadata("seed", serde_json::json!(seed));
        }
        result
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a sampled basis state onto a classical bit-string.
struct Readout {
    /// `(qubit, clbit)` pairs in measurement order; later pairs overwrite.
    pairs: Vec<(usize, usize)>,
    width: usize,
}

impl Readout {
    fn from_circuit(circuit: &Circuit) -> Self {
        let pairs: Vec<_> = circuit
            .instructions()
            .iter()
            .filter(|inst| inst.is_measure())
            .flat_map(|inst| {
                inst.qubits
                    .iter()
                    .zip(&inst.clbits)
                    .map(|(q, c)| (q.index(), c.index()))
            })
            .collect();

        if pairs.is_empty() {
            let n = circuit.num_qubits();
            return Self {
                pairs: (0..n).map(|q| (q, q)).collect(),
                width: n,
            };
        }

        Self {
            pairs,
            width: circuit.num_clbits(),
        }
    }

    /// Bit-string with classical bit 0 rightmost.
    fn bitstring(&self, outcome: usize) -> String {
        let mut bits = vec![b'0'; self.width];
        for &(qubit, clbit) in &self.pairs {
            bits[self.width - 1 - clbit] = if (outcome >> qubit) & 1 == 1 { b'1' } else { b'0' };
        }
        bits.into_iter().map(char::from).collect()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::from_reasons(self.check_circuit(circuit)))
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let max_shots = self.capabilities.max_shots;
        if shots == 0 || shots > max_shots {
            return Err(HalError::InvalidShots {
                requested: shots,
                max: max_shots,
            });
        }

        if circuit.num_qubits() > self.max_qubits() as usize {
            return Err(HalError::CircuitTooLarge {
                qubits: circuit.num_qubits(),
                max: self.max_qubits(),
            });
        }
        let reasons = self.check_circuit(circuit);
        if !reasons.is_empty() {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots, self.config.name.clone());
        self.jobs().insert(
            job_id.clone(),
            SimJob {
                job,
                result: None,
            },
        );
        debug!("Submitted job: {}", job_id);

        if let Some(sim_job) = self.jobs().get_mut(&job_id) {
            sim_job.job.transition(JobStatus::Running)?;
        }

        let result = self.run_simulation(circuit, shots);

        let mut jobs = self.jobs();
        let sim_job = jobs
            .get_mut(&job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;
        sim_job.job.transition(JobStatus::Completed)?;
        sim_job.result = Some(result);

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(job_id)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let sim_job = jobs
            .get(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;

        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled(job_id.clone())),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (status, _) => Err(HalError::JobNotReady {
                job_id: job_id.clone(),
                status: status.clone(),
            }),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs();
        let sim_job = jobs
            .get_mut(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;

        if sim_job.job.status.is_terminal() {
            debug!("Job {} already {}, nothing to cancel", job_id, sim_job.job.status);
            return Ok(());
        }
        sim_job.job.transition(JobStatus::Cancelled)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(n) if (1..=u64::from(MAX_SUPPORTED_QUBITS)).contains(&n) => n as u32,
            Some(n) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits must be between 1 and {MAX_SUPPORTED_QUBITS}, got {n}"
                )));
            }
        };
        let seed = config.extra_u64("seed")?;

        Ok(Self::build(config, max_qubits, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsearch_ir::{ClbitId, QubitId};

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(caps.max_shots, 100_000);
        assert!(caps.gate_set.contains("mcx"));
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::with_seed(11);

        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.wait(&job_id).await.unwrap();
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert_eq!(result.metadata["seed"], 11);
    }

    #[tokio::test]
    async fn test_bitstring_rightmost_is_clbit_zero() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("x0", 3, 3);
        circuit.x(QubitId(0)).unwrap().measure_all().unwrap();

        let job_id = backend.submit(&circuit, 50).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("001"), 50);
    }

    #[tokio::test]
    async fn test_partial_measurement_projects_onto_clbits() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("partial", 3, 2);
        circuit
            .x(QubitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(1))
            .unwrap();

        let job_id = backend.submit(&circuit, 20).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("01"), 20);
        assert_eq!(result.counts.len(), 1);
    }

    #[tokio::test]
    async fn test_unmeasured_circuit_reports_all_qubits() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("bare", 2, 0);
        circuit.x(QubitId(1)).unwrap();

        let job_id = backend.submit(&circuit, 10).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("10"), 10);
    }

    #[tokio::test]
    async fn test_same_seed_same_counts() {
        let circuit = Circuit::ghz(3).unwrap();

        let a = SimulatorBackend::with_seed(5);
        let b = SimulatorBackend::with_seed(5);
        let ra = a.wait(&a.submit(&circuit, 256).await.unwrap()).await.unwrap();
        let rb = b.wait(&b.submit(&circuit, 256).await.unwrap()).await.unwrap();

        assert_eq!(ra.counts, rb.counts);
        assert_eq!(ra.counts.total_shots(), 256);
    }

    #[tokio::test]
    async fn test_rejects_invalid_shots() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();

        assert!(matches!(
            backend.submit(&circuit, 0).await,
            Err(HalError::InvalidShots { .. })
        ));
        assert!(matches!(
            backend.submit(&circuit, 100_001).await,
            Err(HalError::InvalidShots { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_oversized_circuit() {
        let backend = SimulatorBackend::with_max_qubits(2);
        let circuit = Circuit::ghz(3).unwrap();

        let validation = backend.validate(&circuit).await.unwrap();
        assert!(!validation.is_valid());
        assert!(matches!(
            backend.submit(&circuit, 10).await,
            Err(HalError::CircuitTooLarge { qubits: 3, max: 2 })
        ));
    }

    #[tokio::test]
    async fn test_rejects_gate_after_measurement() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();

        match backend.validate(&circuit).await.unwrap() {
            ValidationResult::Invalid { reasons } => {
                assert!(reasons[0].contains("after it was measured"));
            }
            ValidationResult::Valid => panic!("expected invalid circuit"),
        }
        assert!(matches!(
            backend.submit(&circuit, 10).await,
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let id = JobId::new("missing");
        assert!(matches!(
            backend.status(&id).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&id).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_completed_job_keeps_result() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&Circuit::bell().unwrap(), 8).await.unwrap();

        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert_eq!(backend.result(&job_id).await.unwrap().shots, 8);
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("sim-12")
            .with_extra("max_qubits", serde_json::json!(12))
            .with_extra("seed", serde_json::json!(99));
        let backend = SimulatorBackend::from_config(config).unwrap();

        assert_eq!(backend.name(), "sim-12");
        assert_eq!(backend.max_qubits(), 12);
        assert_eq!(backend.seed, Some(99));

        let config = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(64));
        assert!(matches!(
            SimulatorBackend::from_config(config),
            Err(HalError::Configuration(_))
        ));
    }
}

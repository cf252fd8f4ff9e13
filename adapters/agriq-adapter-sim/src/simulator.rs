//! Simulator backend implementation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use agriq_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, Measurements, ValidationResult,
};
use agriq_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

const DEFAULT_MAX_QUBITS: u32 = 20;

struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator.
///
/// The state is evolved once per job and every shot samples the final
/// distribution, so measurements must be the last operation on their qubit.
/// Circuits with a reset are evolved once per shot instead. Jobs finish
/// inside `submit` and are dropped once `result` has handed out their outcome.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    rng: Mutex<StdRng>,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Simulator with up to 20 qubits and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Simulator with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(StdRng::from_entropy()),
            seed: None,
        }
    }

    /// Fix the sampling seed; runs with the same seed and job order repeat.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self.seed = Some(seed);
        if !self.capabilities.features.iter().any(|f| f == "seeded") {
            self.capabilities = self.capabilities.with_feature("seeded");
        }
        self
    }

    /// The fixed seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn max_qubits(&self) -> u32 {
        self.capabilities.num_qubits
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the limit of {}",
                self.capabilities.max_shots
            )));
        }
        Ok(())
    }

    fn check_circuit(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.max_qubits() as usize {
            reasons.push(format!(
                "circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits()
            ));
        }

        let unbound = circuit.parameter_names();
        if !unbound.is_empty() {
            reasons.push(format!("unbound parameters: {}", unbound.join(", ")));
        }

        let mut measured = FxHashSet::default();
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => measured.extend(inst.qubits.iter().copied()),
                InstructionKind::Barrier => {}
                InstructionKind::Gate(gate) => {
                    if !self.capabilities.gate_set.contains(gate.name()) {
                        reasons.push(format!("unsupported gate '{}'", gate.name()));
                    }
                    if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                        reasons.push(format!("'{}' acts on {q} after it was measured", inst.name()));
                    }
                }
                InstructionKind::Reset => {
                    if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                        reasons.push(format!("'reset' acts on {q} after it was measured"));
                    }
                }
            }
        }

        reasons
    }

    /// Evolve the circuit and sample `shots` outcomes.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            circuit.num_qubits(),
            shots
        );

        let mut readout: Vec<(usize, usize)> = Vec::new();
        let mut ops = Vec::new();
        for inst in circuit.instructions() {
            if inst.is_measure() {
                readout.extend(
                    inst.qubits
                        .iter()
                        .zip(&inst.clbits)
                        .map(|(q, c)| (q.index(), c.index())),
                );
            } else {
                ops.push(inst);
            }
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let evolve = |rng: &mut StdRng| -> HalResult<Statevector> {
            let mut sv = Statevector::new(circuit.num_qubits());
            for inst in &ops {
                sv.apply(inst, rng)?;
            }
            Ok(sv)
        };

        // A reset collapses its qubit, so each shot needs its own trajectory.
        let outcomes = if ops.iter().any(|inst| matches!(inst.kind, InstructionKind::Reset)) {
            debug!("circuit contains resets, evolving per shot");
            (0..shots)
                .map(|_| {
                    let sv = evolve(&mut *rng)?;
                    Ok(sv.sample(1, &mut *rng)?[0])
                })
                .collect::<HalResult<Vec<_>>>()?
        } else {
            evolve(&mut *rng)?.sample(shots as usize, &mut *rng)?
        };
        drop(rng);

        let mut counts = Counts::new();
        let mut measurements = Measurements::new();
        for outcome in outcomes {
            let bits = classical_bits(outcome, &readout, circuit);
            counts.insert(bitstring(&bits), 1);
            if readout.is_empty() {
                continue;
            }
            for reg in circuit.registers() {
                measurements.push_shot(&reg.name, reg.clbits.iter().map(|c| bits[c.index()]).collect());
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(counts, shots)
            .with_measurements(measurements)
            .with_execution_time(elapsed.as_millis() as u64))
    }

    fn update<T>(&self, job_id: &JobId, f: impl FnOnce(&mut SimJob) -> T) -> HalResult<T> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get_mut(&job_id.0)
            .map(f)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }
}

/// Classical register contents for one sampled basis state.
///
/// Without any measurement the qubits themselves are read out.
fn classical_bits(outcome: usize, readout: &[(usize, usize)], circuit: &Circuit) -> Vec<u8> {
    let bit = |q: usize| ((outcome >> q) & 1) as u8;
    if readout.is_empty() {
        return (0..circuit.num_qubits()).map(bit).collect();
    }
    let mut bits = vec![0u8; circuit.num_clbits()];
    for &(q, c) in readout {
        bits[c] = bit(q);
    }
    bits
}

/// Bit 0 is the left-most character.
fn bitstring(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect()
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
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
        let reasons = self.check_circuit(circuit);
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_shots(shots)?;
        if circuit.num_qubits() > self.max_qubits() as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits()
            )));
        }
        self.validate(circuit).await?.into_result()?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            jobs.insert(
                job_id.0.clone(),
                SimJob {
                    job: Job::new(job_id.clone(), circuit.name(), shots),
                    result: None,
                },
            );
        }
        debug!("Submitted job: {}", job_id);

        self.update(&job_id, |j| j.job.transition(JobStatus::Running))?;
        let outcome = self.run_simulation(circuit, shots);
        self.update(&job_id, |j| match outcome {
            Ok(result) => {
                info!(job = %job_id, shots, "job completed");
                j.result = Some(result);
                j.job.transition(JobStatus::Completed);
            }
            Err(e) => j.job.transition(JobStatus::Failed(e.to_string())),
        })?;

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.update(job_id, |j| j.job.status.clone())
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !entry.job.status.is_terminal() {
            return Err(HalError::JobFailed(format!(
                "job {} has no result yet ({})",
                entry.job.id, entry.job.status
            )));
        }

        let SimJob { job, result } = jobs
            .remove(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (job.status, result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg)),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::JobFailed(format!(
                "job {} finished without a result ({status})",
                job.id
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.update(job_id, |j| j.job.transition(JobStatus::Cancelled))
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.get_u64("max_qubits")? {
            Some(n) => u32::try_from(n).map_err(|_| {
                HalError::Configuration(format!("max_qubits {n} is out of range"))
            })?,
            None => DEFAULT_MAX_QUBITS,
        };

        let mut backend = Self::with_max_qubits(max_qubits);
        if let Some(seed) = config.get_u64("seed")? {
            backend = backend.with_seed(seed);
        }
        backend.capabilities.name.clone_from(&config.name);
        backend.config = config;
        Ok(backend)
    }
}

//! Statevector simulation engine.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use num_complex::Complex64;
use rand::Rng;

use qsearch_ir::{Instruction, InstructionKind, StandardGate};

/// A 2x2 operation applied to the target of a (possibly controlled) gate.
#[derive(Debug, Clone, Copy)]
enum Kernel {
    X,
    Y,
    H,
    Phase(Complex64),
}

/// A statevector over `n` qubits; basis index bit `q` is qubit `q`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// Apply an instruction. Measurements leave the state untouched; outcomes
    /// are drawn from the final distribution.
    pub fn apply(&mut self, instruction: &Instruction) {
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return;
        };

        let control_mask = instruction
            .controls()
            .iter()
            .fold(0usize, |mask, q| mask | (1 << q.index()));

        let Some(target) = instruction.targets().first().map(|q| q.index()) else {
            return;
        };

        let kernel = match gate {
            StandardGate::X | StandardGate::CX | StandardGate::Mcx { .. } => Kernel::X,
            StandardGate::Y => Kernel::Y,
            StandardGate::H => Kernel::H,
            StandardGate::S => Kernel::Phase(Complex64::from_polar(1.0, FRAC_PI_2)),
            StandardGate::Sdg => Kernel::Phase(Complex64::from_polar(1.0, -FRAC_PI_2)),
            StandardGate::T => Kernel::Phase(Complex64::from_polar(1.0, FRAC_PI_4)),
            StandardGate::Tdg => Kernel::Phase(Complex64::from_polar(1.0, -FRAC_PI_4)),
        };

        self.apply_kernel(control_mask, target, kernel);
    }

    /// Apply `kernel` to `target` on every basis pair whose control bits are all set.
    fn apply_kernel(&mut self, control_mask: usize, target: usize, kernel: Kernel) {
        let tgt_mask = 1 << target;
        let i_val = Complex64::new(0.0, 1.0);

        for i in 0..self.amplitudes.len() {
            if i & tgt_mask != 0 || i & control_mask != control_mask {
                continue;
            }
            let j = i | tgt_mask;
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];

            match kernel {
                Kernel::X => self.amplitudes.swap(i, j),
                Kernel::Y => {
                    self.amplitudes[i] = -i_val * b;
                    self.amplitudes[j] = i_val * a;
                }
                Kernel::H => {
                    self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                    self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
                }
                Kernel::Phase(phase) => self.amplitudes[j] = phase * b,
            }
        }
    }

    /// Build a sampler over the current probability distribution.
    pub fn sampler(&self) -> Sampler {
        let mut total = 0.0;
        let cumulative = self
            .amplitudes
            .iter()
            .map(|a| {
                total += a.norm_sqr();
                total
            })
            .collect();
        Sampler { cumulative }
    }
}

/// Draws basis-state indices from a fixed distribution.
pub struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    /// Draw one basis-state index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.r#gen::<f64>() * total;
        let idx = self.cumulative.partition_point(|&c| c <= r);
        idx.min(self.cumulative.len().saturating_sub(1))
    }
}

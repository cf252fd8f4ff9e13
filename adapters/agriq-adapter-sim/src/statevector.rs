//! Statevector simulation engine.
//!
//! Qubit `k` is bit `k` of an amplitude index. Every gate reduces to a 2x2
//! matrix on one target qubit, optionally conditioned on a set of control
//! qubits; `Swap` is the only permutation kernel.

use std::f64::consts::FRAC_1_SQRT_2;

use agriq_hal::{HalError, HalResult};
use agriq_ir::{Instruction, InstructionKind, ParameterExpression, StandardGate};
use num_complex::Complex64;
use rand::Rng;

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Amplitudes of an `n`-qubit pure state.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// The all-zero state `|0...0⟩`.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply one instruction. Measurements and barriers leave the state alone.
    ///
    /// A reset collapses its qubit, so `rng` decides which branch survives.
    pub fn apply<R: Rng + ?Sized>(&mut self, instruction: &Instruction, rng: &mut R) -> HalResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        match &instruction.kind {
            InstructionKind::Gate(gate) => self.apply_gate(&gate.kind, &qubits),
            InstructionKind::Reset => qubits.iter().try_for_each(|&q| self.reset(q, rng)),
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    /// Apply a standard gate to `qubits`, controls first.
    pub fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> HalResult<()> {
        match gate {
            StandardGate::I => {}
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CX => self.apply_controlled(&qubits[..1], qubits[1], &pauli_x()),
            StandardGate::CY => self.apply_controlled(&qubits[..1], qubits[1], &pauli_y()),
            StandardGate::CZ => self.apply_controlled(&qubits[..1], qubits[1], &diagonal(ONE, -ONE)),
            StandardGate::CH => self.apply_controlled(&qubits[..1], qubits[1], &hadamard()),
            StandardGate::CRz(theta) => {
                self.apply_controlled(&qubits[..1], qubits[1], &rz(angle(theta)?));
            }
            StandardGate::CP(theta) => {
                self.apply_controlled(&qubits[..1], qubits[1], &phase(angle(theta)?));
            }
            StandardGate::CCX => self.apply_controlled(&qubits[..2], qubits[2], &pauli_x()),
            single => {
                let matrix = single_qubit_matrix(single)?;
                self.apply_controlled(&[], qubits[0], &matrix);
            }
        }
        Ok(())
    }

    /// Apply `matrix` to `target` on the subspace where every control is 1.
    fn apply_controlled(&mut self, controls: &[usize], target: usize, matrix: &Matrix2) {
        let ctrl_mask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & ctrl_mask == ctrl_mask {
                let j = i | tgt_mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = matrix[0][0] * a + matrix[0][1] * b;
                self.amplitudes[j] = matrix[1][0] * a + matrix[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1 << q1, 1 << q2);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                self.amplitudes.swap(i, (i & !m1) | m2);
            }
        }
    }

    /// Measure `qubit`, keep the sampled branch, and flip it to `|0⟩` if it read 1.
    ///
    /// Over many runs this reproduces the statistics of a reset on an
    /// entangled qubit; a single run follows one trajectory.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> HalResult<()> {
        let mask = 1 << qubit;
        let total = self.norm_sqr();
        if !(total.is_finite() && total > 0.0) {
            return Err(HalError::InvalidCircuit(format!(
                "reset of q{qubit} on a state with norm {total}"
            )));
        }
        let p_one = self.probability_one(qubit);
        let keep_one = rng.r#gen::<f64>() * total < p_one;
        let kept = if keep_one { p_one } else { total - p_one };

        let scale = kept.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let one = std::mem::replace(&mut self.amplitudes[i | mask], ZERO);
                let survivor = if keep_one { one } else { self.amplitudes[i] };
                self.amplitudes[i] = survivor / scale;
            }
        }
        Ok(())
    }

    fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Draw `shots` basis states from the final distribution.
    ///
    /// Fails when the amplitudes carry no probability mass.
    pub fn sample<R: Rng + ?Sized>(&self, shots: usize, rng: &mut R) -> HalResult<Vec<usize>> {
        let mut cumulative = Vec::with_capacity(self.amplitudes.len());
        let mut total = 0.0;
        for amp in &self.amplitudes {
            total += amp.norm_sqr();
            cumulative.push(total);
        }
        if !(total.is_finite() && total > 0.0) {
            return Err(HalError::InvalidCircuit(format!(
                "cannot sample a state with norm {total}"
            )));
        }
        let last = self.amplitudes.len() - 1;

        Ok((0..shots)
            .map(|_| {
                let r = rng.r#gen::<f64>() * total;
                cumulative.partition_point(|&c| c <= r).min(last)
            })
            .collect())
    }
}

fn angle(param: &ParameterExpression) -> HalResult<f64> {
    let value = param
        .as_f64()
        .ok_or_else(|| HalError::InvalidCircuit(format!("unbound parameter '{param}'")))?;
    if !value.is_finite() {
        return Err(HalError::InvalidCircuit(format!("angle '{param}' is {value}")));
    }
    Ok(value)
}

fn single_qubit_matrix(gate: &StandardGate) -> HalResult<Matrix2> {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    let half = Complex64::new(0.5, 0.5);
    let half_conj = half.conj();
    Ok(match gate {
        StandardGate::I => diagonal(ONE, ONE),
        StandardGate::X => pauli_x(),
        StandardGate::Y => pauli_y(),
        StandardGate::Z => diagonal(ONE, -ONE),
        StandardGate::H => hadamard(),
        StandardGate::S => phase(FRAC_PI_2),
        StandardGate::Sdg => phase(-FRAC_PI_2),
        StandardGate::T => phase(FRAC_PI_4),
        StandardGate::Tdg => phase(-FRAC_PI_4),
        StandardGate::SX => [[half, half_conj], [half_conj, half]],
        StandardGate::SXdg => [[half_conj, half], [half, half_conj]],
        StandardGate::Rx(theta) => {
            let (s, c) = (angle(theta)? / 2.0).sin_cos();
            [[c.into(), -I * s], [-I * s, c.into()]]
        }
        StandardGate::Ry(theta) => {
            let (s, c) = (angle(theta)? / 2.0).sin_cos();
            [[c.into(), (-s).into()], [s.into(), c.into()]]
        }
        StandardGate::Rz(theta) => rz(angle(theta)?),
        StandardGate::P(theta) => phase(angle(theta)?),
        StandardGate::U(theta, phi, lambda) => {
            let (s, c) = (angle(theta)? / 2.0).sin_cos();
            let (phi, lambda) = (angle(phi)?, angle(lambda)?);
            [
                [c.into(), -Complex64::from_polar(s, lambda)],
                [
                    Complex64::from_polar(s, phi),
                    Complex64::from_polar(c, phi + lambda),
                ],
            ]
        }
        other => {
            return Err(HalError::InvalidCircuit(format!(
                "'{}' is not a single-qubit gate",
                other.name()
            )));
        }
    })
}

fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Matrix2 {
    [[ZERO, -I], [I, ZERO]]
}

fn hadamard() -> Matrix2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn diagonal(a: Complex64, b: Complex64) -> Matrix2 {
    [[a, ZERO], [ZERO, b]]
}

fn phase(theta: f64) -> Matrix2 {
    diagonal(ONE, Complex64::from_polar(1.0, theta))
}

fn rz(theta: f64) -> Matrix2 {
    diagonal(
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn run(num_qubits: usize, gates: &[(StandardGate, &[usize])]) -> Statevector {
        let mut sv = Statevector::new(num_qubits);
        for (gate, qubits) in gates {
            sv.apply_gate(gate, qubits).unwrap();
        }
        sv
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        assert!(sv.amplitudes()[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_bell_state() {
        let sv = run(2, &[(StandardGate::H, &[0]), (StandardGate::CX, &[0, 1])]);
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes()[0], h));
        assert!(approx_eq(sv.amplitudes()[1], ZERO));
        assert!(approx_eq(sv.amplitudes()[2], ZERO));
        assert!(approx_eq(sv.amplitudes()[3], h));
    }

    #[test]
    fn test_rx_pi_flips() {
        let sv = run(1, &[(StandardGate::Rx(PI.into()), &[0])]);
        assert!((sv.probability_one(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ry_probability() {
        let theta = 0.8;
        let sv = run(1, &[(StandardGate::Ry(theta.into()), &[0])]);
        let expected = (theta / 2.0).sin().powi(2);
        assert!((sv.probability_one(0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_h_then_rx_zero_is_balanced() {
        let sv = run(1, &[(StandardGate::H, &[0]), (StandardGate::Rx(0.0.into()), &[0])]);
        assert!((sv.probability_one(0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sv = run(1, &[(StandardGate::SX, &[0]), (StandardGate::SX, &[0])]);
        assert!(approx_eq(sv.amplitudes()[1], ONE));
    }

    #[test]
    fn test_u_matches_ry() {
        let a = run(1, &[(StandardGate::U(0.7.into(), 0.0.into(), 0.0.into()), &[0])]);
        let b = run(1, &[(StandardGate::Ry(0.7.into()), &[0])]);
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(approx_eq(*x, *y));
        }
    }

    #[test]
    fn test_swap_and_toffoli() {
        let sv = run(2, &[(StandardGate::X, &[0]), (StandardGate::Swap, &[0, 1])]);
        assert!(approx_eq(sv.amplitudes()[0b10], ONE));

        let sv = run(
            3,
            &[
                (StandardGate::X, &[0]),
                (StandardGate::X, &[1]),
                (StandardGate::CCX, &[0, 1, 2]),
            ],
        );
        assert!(approx_eq(sv.amplitudes()[0b111], ONE));
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sv = run(1, &[(StandardGate::X, &[0])]);
        sv.reset(0, &mut rng).unwrap();
        assert!(approx_eq(sv.amplitudes()[0], ONE));
    }

    #[test]
    fn test_reset_minus_state() {
        // |-> has cancelling amplitudes; every trajectory still ends in |0>.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let mut sv = run(1, &[(StandardGate::H, &[0]), (StandardGate::Z, &[0])]);
            sv.reset(0, &mut rng).unwrap();
            assert!((sv.amplitudes()[0].norm() - 1.0).abs() < 1e-12);
            assert_eq!(sv.probability_one(0), 0.0);
        }
    }

    #[test]
    fn test_reset_entangled_keeps_partner_marginal() {
        let mut rng = StdRng::seed_from_u64(5);
        let trials = 2000;
        let mut ones = 0;
        for _ in 0..trials {
            let mut sv = run(
                2,
                &[
                    (StandardGate::H, &[0]),
                    (StandardGate::H, &[1]),
                    (StandardGate::CZ, &[0, 1]),
                ],
            );
            sv.reset(0, &mut rng).unwrap();
            assert!(sv.probability_one(0).abs() < 1e-12);
            assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
            ones += (sv.sample(1, &mut rng).unwrap()[0] >> 1) & 1;
        }
        let marginal = ones as f64 / trials as f64;
        assert!((marginal - 0.5).abs() < 0.05, "marginal {marginal}");
    }

    #[test]
    fn test_zero_norm_state_rejected() {
        let sv = Statevector {
            amplitudes: vec![ZERO; 2],
            num_qubits: 1,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(sv.sample(4, &mut rng), Err(HalError::InvalidCircuit(_))));

        let mut sv = sv;
        assert!(sv.reset(0, &mut rng).is_err());
    }

    #[test]
    fn test_symbolic_angle_rejected() {
        let mut sv = Statevector::new(1);
        let err = sv
            .apply_gate(&StandardGate::Rx("x".into()), &[0])
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let mut sv = Statevector::new(1);
        let err = sv
            .apply_gate(&StandardGate::Ry(f64::NAN.into()), &[0])
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
        assert!(sv.apply_gate(&StandardGate::Rz(f64::INFINITY.into()), &[0]).is_err());
    }

    #[test]
    fn test_sample_deterministic_state() {
        let sv = run(1, &[(StandardGate::X, &[0])]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sv.sample(100, &mut rng).unwrap().iter().all(|&s| s == 1));
    }

    #[test]
    fn test_sample_is_seeded() {
        let sv = run(2, &[(StandardGate::H, &[0]), (StandardGate::H, &[1])]);
        let a = sv.sample(64, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = sv.sample(64, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|&s| s < 4));
    }
}

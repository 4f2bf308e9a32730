// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A minimal constraint-system builder and witness solver.
//!
//! The constraint system proper — its data type and witness solver — is an
//! external collaborator this crate only consumes through [`solve`]'s
//! output shape. This module supplies a small, in-scope-for-testing
//! implementation of that collaborator: enough to build the fixed
//! three-wire gate shape, wire up copy constraints, and exercise an
//! optional in-circuit (BSB22-style) commitment slot end to end.

use ark_ff::{FftField, Zero};
use ark_poly::EvaluationDomain;
use hashbrown::HashMap;

use crate::error::Error;
use crate::keys::CommitmentInfo;
use crate::poly::Polynomial;
use crate::util::Domains;

/// A witness variable: an opaque handle into [`ConstraintSystem`]'s
/// variable map. Two wire slots bound to the same `Variable` are enforced
/// equal by the permutation argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum WireKind {
    L,
    R,
    O,
}

struct GateRow<F> {
    ql: F,
    qr: F,
    qm: F,
    qo: F,
    qk: F,
    qcp: F,
    l: F,
    r: F,
    o: F,
}

/// The solved, padded witness and selector columns a [`ConstraintSystem`]
/// produces, ready for the prover to interpolate and commit.
///
/// `qk` is the circuit's fixed selector alone, with no public input baked in:
/// it is the same polynomial on every call regardless of which public values
/// the witness carries. `public_input_rows`/`public_inputs` name where and
/// what to subtract from it, a step the prover (not this solver) performs
/// fresh for every proof; see `Prover::prove`'s Qk-completion step.
pub struct Solved<F: FftField> {
    pub l: Polynomial<F>,
    pub r: Polynomial<F>,
    pub o: Polynomial<F>,
    pub ql: Polynomial<F>,
    pub qr: Polynomial<F>,
    pub qm: Polynomial<F>,
    pub qo: Polynomial<F>,
    pub qk: Polynomial<F>,
    pub qcp: Option<Polynomial<F>>,
    pub sigma1: Vec<F>,
    pub sigma2: Vec<F>,
    pub sigma3: Vec<F>,
    pub public_input_rows: Vec<usize>,
    pub public_inputs: Vec<F>,
}

/// A builder for a fixed three-wire (L, R, O) gate circuit.
pub struct ConstraintSystem<F: FftField> {
    rows: Vec<GateRow<F>>,
    occurrences: HashMap<Variable, Vec<(WireKind, usize)>>,
    next_var: u64,
    public_inputs: Vec<(usize, F)>,
    commitment_info: Option<CommitmentInfo>,
    pi2_values: Option<Vec<F>>,
    commitment_slot: Option<(usize, WireKind)>,
}

impl<F: FftField> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FftField> ConstraintSystem<F> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            occurrences: HashMap::new(),
            next_var: 0,
            public_inputs: Vec::new(),
            commitment_info: None,
            pi2_values: None,
            commitment_slot: None,
        }
    }

    pub fn alloc(&mut self) -> Variable {
        let v = Variable(self.next_var);
        self.next_var += 1;
        v
    }

    /// Appends a gate row `ql*l + qr*r + qm*l*r + qo*o + qk + qcp*pi2 = 0`
    /// and binds each wire value to its variable for the permutation
    /// argument. `qcp` should be zero unless this row is the designated
    /// commitment slot.
    #[allow(clippy::too_many_arguments)]
    pub fn gate(
        &mut self,
        ql: F,
        qr: F,
        qm: F,
        qo: F,
        qk: F,
        l: (Variable, F),
        r: (Variable, F),
        o: (Variable, F),
    ) {
        let row = self.rows.len();
        self.occurrences.entry(l.0).or_default().push((WireKind::L, row));
        self.occurrences.entry(r.0).or_default().push((WireKind::R, row));
        self.occurrences.entry(o.0).or_default().push((WireKind::O, row));
        self.rows.push(GateRow {
            ql,
            qr,
            qm,
            qo,
            qk,
            qcp: F::zero(),
            l: l.1,
            r: r.1,
            o: o.1,
        });
    }

    /// Marks gate row `row`'s public input as `value`. `Qk` itself is left
    /// untouched here (it stays the circuit's fixed, witness-independent
    /// selector); [`crate::prover::Prover::prove`] completes a fresh copy of
    /// `Qk` with this value on every call.
    pub fn set_public_input(&mut self, row: usize, value: F) {
        self.public_inputs.push((row, value));
    }

    /// Declares an in-circuit commitment slot: `row`'s `O` wire will be
    /// overwritten with the hash of the BSB22 commitment once the prover
    /// computes it, and `Qcp` at that row is set to one.
    pub fn declare_commitment(&mut self, row: usize, hint_id: u64, pi2_values: Vec<F>) {
        self.commitment_info = Some(CommitmentInfo {
            hint_id,
            committed_size: pi2_values.len(),
        });
        self.pi2_values = Some(pi2_values);
        self.commitment_slot = Some((row, WireKind::O));
        self.rows[row].qcp = F::one();
    }

    pub fn commitment_info(&self) -> Option<CommitmentInfo> {
        self.commitment_info
    }

    pub fn pi2_values(&self) -> Option<&[F]> {
        self.pi2_values.as_deref()
    }

    /// Writes the prover's hashed commitment value into the designated
    /// slot. Must be called before [`ConstraintSystem::solve`] if
    /// [`ConstraintSystem::declare_commitment`] was used.
    pub fn set_commitment_result(&mut self, value: F) {
        if let Some((row, kind)) = self.commitment_slot {
            match kind {
                WireKind::L => self.rows[row].l = value,
                WireKind::R => self.rows[row].r = value,
                WireKind::O => self.rows[row].o = value,
            }
        }
    }

    /// Pads to `domains.n()` rows with disjoint fresh variables (so padding
    /// rows never enter another row's permutation cycle), then produces the
    /// Lagrange-`D0` wire, selector, and permutation columns.
    pub fn solve(&mut self, domains: &Domains<F>) -> Result<Solved<F>, Error> {
        let n = domains.n();
        if self.rows.len() > n {
            return Err(Error::InvalidConfiguration(format!(
                "{} gates do not fit in a domain of size {}",
                self.rows.len(),
                n
            )));
        }
        while self.rows.len() < n {
            let pad = self.alloc();
            self.gate(
                F::zero(),
                F::zero(),
                F::zero(),
                F::zero(),
                F::zero(),
                (pad, F::zero()),
                (pad, F::zero()),
                (pad, F::zero()),
            );
        }

        let mut l = Vec::with_capacity(n);
        let mut r = Vec::with_capacity(n);
        let mut o = Vec::with_capacity(n);
        let mut ql = Vec::with_capacity(n);
        let mut qr = Vec::with_capacity(n);
        let mut qm = Vec::with_capacity(n);
        let mut qo = Vec::with_capacity(n);
        let mut qk = Vec::with_capacity(n);
        let mut qcp = Vec::with_capacity(n);
        let mut any_qcp = false;
        for row in &self.rows {
            l.push(row.l);
            r.push(row.r);
            o.push(row.o);
            ql.push(row.ql);
            qr.push(row.qr);
            qm.push(row.qm);
            qo.push(row.qo);
            qk.push(row.qk);
            qcp.push(row.qcp);
            any_qcp |= !row.qcp.is_zero();
        }

        let (sigma1, sigma2, sigma3) = self.compute_permutation(domains);

        let public_input_rows = self.public_inputs.iter().map(|(r, _)| *r).collect();
        let public_inputs = self.public_inputs.iter().map(|(_, v)| *v).collect();

        Ok(Solved {
            l: Polynomial::from_lagrange_d0(l),
            r: Polynomial::from_lagrange_d0(r),
            o: Polynomial::from_lagrange_d0(o),
            ql: Polynomial::from_lagrange_d0(ql),
            qr: Polynomial::from_lagrange_d0(qr),
            qm: Polynomial::from_lagrange_d0(qm),
            qo: Polynomial::from_lagrange_d0(qo),
            qk: Polynomial::from_lagrange_d0(qk),
            qcp: if any_qcp {
                Some(Polynomial::from_lagrange_d0(qcp))
            } else {
                None
            },
            sigma1,
            sigma2,
            sigma3,
            public_input_rows,
            public_inputs,
        })
    }

    /// Builds the three permutation columns: each column starts at the
    /// identity `(omega^i, u*omega^i, u^2*omega^i)` and every variable's
    /// occurrences are linked into a cycle, the standard PLONK copy
    /// constraint construction.
    fn compute_permutation(&self, domains: &Domains<F>) -> (Vec<F>, Vec<F>, Vec<F>) {
        let n = domains.n();
        let u = domains.shift;
        let u2 = u * u;
        let generator = domains.small.group_gen();

        let identity_of = |kind: WireKind, i: usize| -> F {
            let root = generator.pow([i as u64]);
            match kind {
                WireKind::L => root,
                WireKind::R => u * root,
                WireKind::O => u2 * root,
            }
        };

        let mut sigma1 = vec![F::zero(); n];
        let mut sigma2 = vec![F::zero(); n];
        let mut sigma3 = vec![F::zero(); n];
        for i in 0..n {
            sigma1[i] = identity_of(WireKind::L, i);
            sigma2[i] = identity_of(WireKind::R, i);
            sigma3[i] = identity_of(WireKind::O, i);
        }

        let write = |sigma1: &mut [F], sigma2: &mut [F], sigma3: &mut [F], kind: WireKind, i: usize, value: F| {
            match kind {
                WireKind::L => sigma1[i] = value,
                WireKind::R => sigma2[i] = value,
                WireKind::O => sigma3[i] = value,
            }
        };

        for occurrences in self.occurrences.values() {
            if occurrences.len() < 2 {
                continue;
            }
            for j in 0..occurrences.len() {
                let (kind, i) = occurrences[j];
                let (next_kind, next_i) = occurrences[(j + 1) % occurrences.len()];
                let value = identity_of(next_kind, next_i);
                write(&mut sigma1, &mut sigma2, &mut sigma3, kind, i, value);
            }
        }

        (sigma1, sigma2, sigma3)
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The proof value type: commitments, evaluations, and the two KZG
//! opening proofs the verifier checks.

use ark_ec::PairingEngine;
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// Scalar evaluations bound into the transcript and checked against the
/// batched opening.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Default(bound = ""), Eq(bound = ""), PartialEq(bound = ""))]
pub struct ProofEvaluations<F: ark_ff::Field> {
    pub l: F,
    pub r: F,
    pub o: F,
    /// `Qcp(zeta)`, present only when the circuit declares an in-circuit
    /// commitment slot.
    pub qcp: Option<F>,
    /// `Z(u * zeta)`.
    pub z_shifted: F,
    pub s1: F,
    pub s2: F,
    /// `r(zeta)`, the claimed evaluation of the linearization polynomial.
    /// The verifier never has `r(X)` itself; it reconstructs a commitment
    /// to it and checks that commitment opens to this value.
    pub lin: F,
    /// `h(zeta) = h1(zeta) + zeta^(n+2)*h2(zeta) + zeta^(2(n+2))*h3(zeta)`,
    /// the folded quotient evaluation.
    pub h: F,
}

/// `[L] || [R] || [O] || [Z] || [h1] || [h2] || [h3] || optional [PI2] ||
/// batch-opening-proof || z-shifted-opening-proof`, matching the wire
/// encoding this protocol commits to serializing bit-exactly.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Eq(bound = ""), PartialEq(bound = ""))]
pub struct Proof<E: PairingEngine> {
    pub comm_l: Commitment<E>,
    pub comm_r: Commitment<E>,
    pub comm_o: Commitment<E>,
    pub comm_z: Commitment<E>,
    pub comm_h1: Commitment<E>,
    pub comm_h2: Commitment<E>,
    pub comm_h3: Commitment<E>,
    pub comm_pi2: Option<Commitment<E>>,

    pub evaluations: ProofEvaluations<E::Fr>,

    /// Commitment to the witness polynomial for the batched single-point
    /// opening at `zeta` of `{folded h, linearization, L, R, O, S1, S2,
    /// Qcp}`. The verifier never receives a standalone commitment to the
    /// linearization polynomial; it reconstructs one homomorphically from
    /// the verification key's selector/permutation commitments (see
    /// `verifier.rs`).
    pub w_zeta: Commitment<E>,
    /// Commitment to the witness polynomial for the opening of `Z` at
    /// `u * zeta`.
    pub w_zeta_shifted: Commitment<E>,
}

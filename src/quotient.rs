// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Combines the gate, permutation, and boundary identities into the
//! quotient polynomial and splits it into three degree-bounded chunks.

use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::{FftField, One, PrimeField, Zero};
use ark_poly::EvaluationDomain;
use ark_poly_commit::kzg10::Commitment;
use rayon::prelude::*;

use crate::identity;
use crate::poly::{Basis, Polynomial};
use crate::util::Domains;

/// All the coset-evaluated inputs the quotient identity needs, pre-aligned
/// in [`Layout::Regular`] on the extended domain.
pub struct QuotientInputs<'a, F: FftField> {
    pub l: &'a Polynomial<F>,
    pub r: &'a Polynomial<F>,
    pub o: &'a Polynomial<F>,
    pub z: &'a Polynomial<F>,
    pub z_shifted: &'a Polynomial<F>,
    pub ql: &'a Polynomial<F>,
    pub qr: &'a Polynomial<F>,
    pub qm: &'a Polynomial<F>,
    pub qo: &'a Polynomial<F>,
    pub qk: &'a Polynomial<F>,
    pub qcp: Option<&'a Polynomial<F>>,
    pub pi2: Option<&'a Polynomial<F>>,
    pub sigma1: &'a Polynomial<F>,
    pub sigma2: &'a Polynomial<F>,
    pub sigma3: &'a Polynomial<F>,
    pub l1: &'a Polynomial<F>,
}

pub struct QuotientBuilder;

impl QuotientBuilder {
    /// Builds `t(X) = IC + alpha*IO + alpha^2*IB` on the coset, divides by
    /// `Z_D0`, and splits the result into three canonical chunks of size
    /// `n + 2` each: `(h1, h2, h3)`.
    pub fn build<F: FftField>(
        inputs: &QuotientInputs<F>,
        beta: F,
        gamma: F,
        alpha: F,
        domains: &Domains<F>,
    ) -> (Polynomial<F>, Polynomial<F>, Polynomial<F>) {
        let n = domains.n();
        let u = domains.shift;
        let u2 = u * u;
        let alpha2 = alpha * alpha;

        let k = domains.extended.size();
        let generator = domains.extended.group_gen();
        let layout = inputs.l.layout();

        // Per-row identity positions and the inverse of Z_D0 at each, folded
        // in as ordinary rows so the gate/permutation/boundary combiner below
        // never needs the row index directly.
        let id1_evals: Vec<F> = (0..k).into_par_iter().map(|i| u * generator.pow([i as u64])).collect();
        let id1 = Polynomial::with_tags(id1_evals, Basis::LagrangeCosetD1, layout);
        let id2 = id1.scale(u);
        let id3 = id1.scale(u2);
        let vanishing_inv = Polynomial::with_tags(
            id1.as_evals()
                .into_par_iter()
                .map(|p| (p.pow([n as u64]) - F::one()).inverse().expect("zeta outside D0 is checked upstream"))
                .collect(),
            Basis::LagrangeCosetD1,
            layout,
        );
        let zero = Polynomial::with_tags(vec![F::zero(); k], Basis::LagrangeCosetD1, layout);
        let qcp = inputs.qcp.cloned().unwrap_or_else(|| zero.clone());
        let pi2 = inputs.pi2.cloned().unwrap_or_else(|| zero.clone());

        let rows = [
            inputs.l.clone(),
            inputs.r.clone(),
            inputs.o.clone(),
            inputs.z.clone(),
            inputs.z_shifted.clone(),
            inputs.ql.clone(),
            inputs.qr.clone(),
            inputs.qm.clone(),
            inputs.qo.clone(),
            inputs.qk.clone(),
            qcp,
            pi2,
            inputs.sigma1.clone(),
            inputs.sigma2.clone(),
            inputs.sigma3.clone(),
            inputs.l1.clone(),
            id1,
            id2,
            id3,
            vanishing_inv,
        ];

        let t_poly = identity::combine(&rows, |row| {
            let [l, r, o, z, z_shifted, ql, qr, qm, qo, qk, qcp, pi2, sigma1, sigma2, sigma3, l1, id1, id2, id3, vanishing_inv] =
                <[F; 20]>::try_from(row).expect("combine passes exactly one value per input row");

            let ic = ql * l + qr * r + qm * l * r + qo * o + qk + qcp * pi2;

            let io = z * (l + beta * id1 + gamma) * (r + beta * id2 + gamma) * (o + beta * id3 + gamma)
                - z_shifted * (l + beta * sigma1 + gamma) * (r + beta * sigma2 + gamma) * (o + beta * sigma3 + gamma);

            let ib = (z - F::one()) * l1;

            (ic + alpha * io + alpha2 * ib) * vanishing_inv
        })
        .to_regular();

        let canonical = t_poly.coset_to_canonical(&domains.extended);

        split_into_chunks(canonical, n + 2)
    }
}

fn split_into_chunks<F: FftField>(
    poly: Polynomial<F>,
    chunk_size: usize,
) -> (Polynomial<F>, Polynomial<F>, Polynomial<F>) {
    let coeffs = poly.as_evals();
    let mut chunks = coeffs.chunks(chunk_size);
    let h1 = chunks.next().unwrap_or(&[]).to_vec();
    let h2 = chunks.next().unwrap_or(&[]).to_vec();
    let h3 = chunks.next().unwrap_or(&[]).to_vec();
    (
        Polynomial::from_canonical(h1),
        Polynomial::from_canonical(h2),
        Polynomial::from_canonical(h3),
    )
}

/// `h(zeta) = h1(zeta) + zeta^(n+2)*h2(zeta) + zeta^(2(n+2))*h3(zeta)`,
/// the folding law both the prover and the verifier rely on.
pub fn fold_evaluations<F: FftField>(n: usize, h1: F, h2: F, h3: F, zeta: F) -> F {
    let step = zeta.pow([(n + 2) as u64]);
    h1 + step * h2 + step * step * h3
}

/// Coefficient-form analogue of [`fold_evaluations`], used by the prover to
/// build the single folded-`h` polynomial it batch-opens.
pub fn fold_canonical<F: FftField>(
    n: usize,
    h1: &Polynomial<F>,
    h2: &Polynomial<F>,
    h3: &Polynomial<F>,
    zeta: F,
) -> Polynomial<F> {
    let step = zeta.pow([(n + 2) as u64]);
    h1.add(&h2.scale(step)).add(&h3.scale(step * step))
}

/// Commitment-level analogue of [`fold_canonical`], used by the verifier:
/// `Comm(h) = Comm(h1) + zeta^(n+2)*Comm(h2) + zeta^(2(n+2))*Comm(h3)`, via
/// the KZG commitment homomorphism.
pub fn fold_commitments<E: PairingEngine>(
    n: usize,
    comm_h1: &Commitment<E>,
    comm_h2: &Commitment<E>,
    comm_h3: &Commitment<E>,
    zeta: E::Fr,
) -> Commitment<E> {
    let step = zeta.pow([(n + 2) as u64]);
    let mut acc = comm_h1.0.into_projective();
    acc += comm_h2.0.mul(step.into_repr());
    acc += comm_h3.0.mul((step * step).into_repr());
    Commitment(acc.into_affine())
}

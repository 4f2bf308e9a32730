// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Domain bookkeeping shared across the prover and verifier pipelines.

use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::{FftField, PrimeField, Zero};
use ark_poly::univariate::DensePolynomial;
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain, UVPolynomial};
use ark_poly_commit::kzg10::{Commitment, Powers, Randomness, KZG10};

use crate::error::Error;
use crate::poly::Polynomial;

/// The pair of domains a proof is built over: the small domain `D0` (size
/// `n`, the padded gate count) and the extended coset domain `D1` (size
/// `k*n`, used to evaluate the quotient without wraparound). `shift` is the
/// coset generator `u` that both separates the wire columns in the
/// permutation argument and offsets `D1` from `D0`.
#[derive(Clone)]
pub struct Domains<F: FftField> {
    pub small: GeneralEvaluationDomain<F>,
    pub extended: GeneralEvaluationDomain<F>,
    pub shift: F,
}

impl<F: FftField> Domains<F> {
    /// `n` is the number of gates (rounded up to a power of two by the
    /// underlying domain constructor); `extension_factor` is `k` (4 or 8 in
    /// practice).
    pub fn new(n: usize, extension_factor: usize) -> Result<Self, Error> {
        let small = GeneralEvaluationDomain::<F>::new(n).ok_or(
            Error::InvalidEvalDomainSize {
                log_size_of_group: (usize::BITS - n.leading_zeros()),
                adacity: F::TWO_ADICITY,
            },
        )?;
        let extended = GeneralEvaluationDomain::<F>::new(small.size() * extension_factor)
            .ok_or(Error::InvalidEvalDomainSize {
                log_size_of_group: (usize::BITS
                    - (small.size() * extension_factor).leading_zeros()),
                adacity: F::TWO_ADICITY,
            })?;
        Ok(Self {
            small,
            extended,
            shift: F::GENERATOR,
        })
    }

    pub fn n(&self) -> usize {
        self.small.size()
    }

    /// `L1(point)`, the first Lagrange basis polynomial of `D0` evaluated
    /// outside the domain: `(point^n - 1) / (n * (point - 1))`.
    pub fn evaluate_l1(&self, point: F) -> F {
        let n = F::from(self.n() as u64);
        let numerator = point.pow([self.n() as u64]) - F::one();
        let denominator = n * (point - F::one());
        numerator * denominator.inverse().expect("zeta != 1 is checked by the caller")
    }

    /// `Z_D0(point) = point^n - 1`.
    pub fn evaluate_vanishing(&self, point: F) -> F {
        point.pow([self.n() as u64]) - F::one()
    }
}

/// Evaluates the Lagrange basis polynomial weights for a public input
/// vector, i.e. `PI(zeta) = sum_i w_i * L_i(zeta)`, via the standard
/// barycentric formula. `n` is the size of `D0`.
pub fn evaluate_public_input<F: FftField>(
    public_input: &[F],
    domain: &GeneralEvaluationDomain<F>,
    zeta: F,
) -> F {
    if public_input.is_empty() {
        return F::zero();
    }
    let n = domain.size();
    let zeta_n_minus_one = zeta.pow([n as u64]) - F::one();
    if zeta_n_minus_one.is_zero() {
        return F::zero();
    }
    let n_inv = domain.size_as_field_element().inverse().unwrap();

    let mut denominators = Vec::with_capacity(public_input.len());
    let mut root_pow = F::one();
    for _ in 0..public_input.len() {
        denominators.push(zeta - root_pow);
        root_pow *= domain.group_gen();
    }
    ark_ff::fields::batch_inversion(&mut denominators);

    let mut root_pow = F::one();
    let mut acc = F::zero();
    for (w, inv) in public_input.iter().zip(denominators.iter()) {
        acc += *w * root_pow * inv;
        root_pow *= domain.group_gen();
    }
    acc * zeta_n_minus_one * n_inv
}

/// Combines a list of evaluations and their commitments with increasing
/// powers of `challenge` (`v^0, v^1, ...`), returning the evaluation and
/// the commitment of the combined polynomial. Relies on KZG's commitment
/// homomorphism: `Comm(sum_i v^i p_i) = sum_i v^i Comm(p_i)`.
pub fn linear_combination<E: PairingEngine>(
    evals: &[E::Fr],
    commitments: &[Commitment<E>],
    challenge: E::Fr,
) -> (Commitment<E>, E::Fr) {
    assert_eq!(evals.len(), commitments.len());
    let mut eval_acc = E::Fr::zero();
    let mut comm_acc = <E::G1Affine as AffineCurve>::Projective::zero();
    let mut power = E::Fr::one();
    for (eval, comm) in evals.iter().zip(commitments.iter()) {
        eval_acc += *eval * power;
        comm_acc += comm.0.mul(power.into_repr());
        power *= challenge;
    }
    (Commitment(comm_acc.into_affine()), eval_acc)
}

/// Combines commitments with arbitrary, independently-chosen scalars (as
/// opposed to [`linear_combination`]'s increasing powers of one challenge).
/// Used by the verifier to reconstruct a commitment to the linearization
/// polynomial from the verification key's selector and permutation
/// commitments plus the proof's `[Z]` and optional `[PI2]`.
pub fn msm_combine<E: PairingEngine>(terms: &[(E::Fr, &Commitment<E>)]) -> Commitment<E> {
    let mut acc = <E::G1Affine as AffineCurve>::Projective::zero();
    for (scalar, comm) in terms {
        acc += comm.0.mul(scalar.into_repr());
    }
    Commitment(acc.into_affine())
}

/// Polynomial-level analogue of [`linear_combination`]: the prover combines
/// the actual canonical polynomials (not just their commitments) with the
/// same challenge powers so it can open the combination directly.
pub fn linear_combination_polys<F: FftField>(polys: &[&Polynomial<F>], challenge: F) -> Polynomial<F> {
    let mut acc = Polynomial::from_canonical(Vec::new());
    let mut power = F::one();
    for poly in polys {
        acc = acc.add(&poly.scale(power));
        power *= challenge;
    }
    acc
}

/// Commits to a canonical polynomial with no KZG-level hiding (blinding is
/// applied explicitly in canonical form upstream, per [`Polynomial::blind`]).
pub fn commit<E: PairingEngine>(
    powers: &Powers<E>,
    poly: &Polynomial<E::Fr>,
) -> Result<Commitment<E>, Error> {
    let dense = DensePolynomial::from_coefficients_vec(poly.as_evals());
    let (commitment, _) = KZG10::<E, DensePolynomial<E::Fr>>::commit(powers, &dense, None, None)?;
    Ok(commitment)
}

/// Opens a canonical polynomial at `point`, returning the commitment to
/// the KZG witness polynomial (what this crate stores as a proof element).
pub fn open<E: PairingEngine>(
    powers: &Powers<E>,
    poly: &Polynomial<E::Fr>,
    point: E::Fr,
) -> Result<Commitment<E>, Error> {
    let dense = DensePolynomial::from_coefficients_vec(poly.as_evals());
    let empty_randomness = Randomness::empty();
    let proof = KZG10::<E, DensePolynomial<E::Fr>>::open(powers, &dense, point, &empty_randomness)?;
    Ok(Commitment(proof.w))
}

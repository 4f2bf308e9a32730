// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Builds the linearization polynomial `r(X)`.
//!
//! The prover builds this polynomial in full (it has every canonical
//! polynomial the formula references) and evaluates it at `zeta` directly;
//! the verifier never builds it, and instead reconstructs a commitment to it
//! via [`crate::util::msm_combine`] using the same scalar coefficients
//! computed here (see `verifier.rs`).

use ark_ff::FftField;
use rayon::prelude::*;

use crate::poly::Polynomial;

/// Canonical-form selector/permutation polynomials the linearization draws
/// on, plus the already-committed `Z`.
pub struct LinearizationPolys<'a, F: FftField> {
    pub ql: &'a Polynomial<F>,
    pub qr: &'a Polynomial<F>,
    pub qm: &'a Polynomial<F>,
    pub qo: &'a Polynomial<F>,
    pub qk: &'a Polynomial<F>,
    pub qcp: Option<&'a Polynomial<F>>,
    pub pi2: Option<&'a Polynomial<F>>,
    pub s3: &'a Polynomial<F>,
    pub z: &'a Polynomial<F>,
}

/// The scalar evaluations at `zeta` (and `s1(zeta)`, `s2(zeta)`) feeding the
/// linearization formula.
pub struct LinearizationEvals<F: FftField> {
    pub l: F,
    pub r: F,
    pub o: F,
    pub qcp: F,
    pub z_shifted: F,
    pub s1: F,
    pub s2: F,
}

impl<F: FftField> LinearizationEvals<F> {
    /// The scalar coefficients of the `S3(X)` and `Z(X)` terms of `r(X)`:
    /// `(perm_inner_coeff, z_coeff)`. Shared verbatim by the prover (to
    /// build `r(X)`) and the verifier (to reconstruct a commitment to it).
    pub fn permutation_coefficients(&self, alpha: F, beta: F, gamma: F, zeta: F, u: F, l1_zeta: F) -> (F, F) {
        let u2 = u * u;
        let perm_inner_coeff = alpha
            * beta
            * (self.l + beta * self.s1 + gamma)
            * (self.r + beta * self.s2 + gamma)
            * self.z_shifted;
        let z_scalar_term = alpha
            * (self.l + beta * zeta + gamma)
            * (self.r + beta * u * zeta + gamma)
            * (self.o + beta * u2 * zeta + gamma);
        let z_coeff = alpha * alpha * l1_zeta - z_scalar_term;
        (perm_inner_coeff, z_coeff)
    }
}

pub struct Linearizer;

impl Linearizer {
    /// `r(X)` per the formula in the module header, evaluated
    /// coefficientwise in parallel over the longest input polynomial.
    #[allow(clippy::too_many_arguments)]
    pub fn build<F: FftField>(
        polys: &LinearizationPolys<F>,
        evals: &LinearizationEvals<F>,
        alpha: F,
        beta: F,
        gamma: F,
        zeta: F,
        u: F,
        l1_zeta: F,
    ) -> Polynomial<F> {
        let (perm_inner_coeff, z_coeff) =
            evals.permutation_coefficients(alpha, beta, gamma, zeta, u, l1_zeta);

        let mut terms: Vec<(F, &Polynomial<F>)> = vec![
            (evals.l, polys.ql),
            (evals.r, polys.qr),
            (evals.l * evals.r, polys.qm),
            (evals.o, polys.qo),
            (F::one(), polys.qk),
            (perm_inner_coeff, polys.s3),
            (z_coeff, polys.z),
        ];
        if let Some(pi2) = polys.pi2 {
            terms.push((evals.qcp, pi2));
        }

        combine_canonical(&terms)
    }
}

/// `sum_i scalar_i * poly_i`, computed coefficientwise in parallel over the
/// longest input.
fn combine_canonical<F: FftField>(terms: &[(F, &Polynomial<F>)]) -> Polynomial<F> {
    let max_len = terms.iter().map(|(_, p)| p.len()).max().unwrap_or(0);
    let materialized: Vec<(F, Vec<F>)> = terms
        .iter()
        .map(|(scalar, poly)| (*scalar, poly.as_evals()))
        .collect();

    let out: Vec<F> = (0..max_len)
        .into_par_iter()
        .map(|i| {
            materialized.iter().fold(F::zero(), |acc, (scalar, coeffs)| {
                acc + coeffs.get(i).copied().unwrap_or_else(F::zero) * *scalar
            })
        })
        .collect();

    Polynomial::from_canonical(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::Zero;

    #[test]
    fn combine_canonical_sums_scaled_polynomials() {
        let a = Polynomial::from_canonical(vec![Fr::from(1u64), Fr::from(2u64)]);
        let b = Polynomial::from_canonical(vec![Fr::from(10u64)]);
        let out = combine_canonical(&[(Fr::from(2u64), &a), (Fr::from(3u64), &b)]);
        assert_eq!(
            out.as_evals(),
            vec![Fr::from(2u64) * Fr::from(1u64) + Fr::from(3u64) * Fr::from(10u64), Fr::from(4u64)]
        );
    }

    #[test]
    fn empty_term_list_yields_empty_polynomial() {
        let out: Polynomial<Fr> = combine_canonical(&[]);
        assert!(out.is_empty() || out.as_evals().iter().all(|c| c.is_zero()));
    }

    #[test]
    fn permutation_coefficients_match_hand_expansion() {
        let evals = LinearizationEvals {
            l: Fr::from(2u64),
            r: Fr::from(3u64),
            o: Fr::from(4u64),
            qcp: Fr::from(0u64),
            z_shifted: Fr::from(5u64),
            s1: Fr::from(6u64),
            s2: Fr::from(7u64),
        };
        let (alpha, beta, gamma, zeta, u, l1_zeta) = (
            Fr::from(2u64),
            Fr::from(3u64),
            Fr::from(5u64),
            Fr::from(11u64),
            Fr::from(13u64),
            Fr::from(1u64),
        );
        let (perm_inner_coeff, z_coeff) =
            evals.permutation_coefficients(alpha, beta, gamma, zeta, u, l1_zeta);
        let expected_inner = alpha * beta * (evals.l + beta * evals.s1 + gamma) * (evals.r + beta * evals.s2 + gamma) * evals.z_shifted;
        assert_eq!(perm_inner_coeff, expected_inner);
        let u2 = u * u;
        let expected_scalar = alpha
            * (evals.l + beta * zeta + gamma)
            * (evals.r + beta * u * zeta + gamma)
            * (evals.o + beta * u2 * zeta + gamma);
        assert_eq!(z_coeff, alpha * alpha * l1_zeta - expected_scalar);
    }
}

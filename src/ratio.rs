// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Builds the grand-product permutation polynomial `Z`.

use ark_ff::{fields::batch_inversion, FftField, Zero};
use ark_poly::EvaluationDomain;

use crate::error::Error;
use crate::poly::Polynomial;
use crate::util::Domains;

/// Builds `Z` on `D0` from wire evaluations, the permutation `(sigma1,
/// sigma2, sigma3)`, and challenges `(beta, gamma)`. See the module
/// invariant in [`build`].
pub struct RatioBuilder;

impl RatioBuilder {
    /// `Z(omega^i) = prod_{j<i} numerator_j / denominator_j`, with
    /// `Z(omega^0) = 1`. Returns the canonical form of `Z`.
    ///
    /// Aborts with [`Error::PermutationRatioMismatch`] if any denominator
    /// is zero, or if the accumulated product over the full domain does
    /// not close to `1` — both indicate a malformed permutation or a
    /// witness that does not satisfy the copy constraints.
    pub fn build<F: FftField>(
        l: &Polynomial<F>,
        r: &Polynomial<F>,
        o: &Polynomial<F>,
        sigma1: &[F],
        sigma2: &[F],
        sigma3: &[F],
        beta: F,
        gamma: F,
        domains: &Domains<F>,
    ) -> Result<Polynomial<F>, Error> {
        let n = domains.n();
        let l = l.as_evals();
        let r = r.as_evals();
        let o = o.as_evals();
        debug_assert_eq!(l.len(), n);
        debug_assert_eq!(r.len(), n);
        debug_assert_eq!(o.len(), n);
        debug_assert_eq!(sigma1.len(), n);
        debug_assert_eq!(sigma2.len(), n);
        debug_assert_eq!(sigma3.len(), n);

        let u = domains.shift;
        let u2 = u * u;
        let generator = domains.small.group_gen();

        let mut numerators = Vec::with_capacity(n);
        let mut denominators = Vec::with_capacity(n);
        let mut root_pow = F::one();
        for j in 0..n {
            let numerator = (l[j] + beta * root_pow + gamma)
                * (r[j] + beta * u * root_pow + gamma)
                * (o[j] + beta * u2 * root_pow + gamma);
            let denominator = (l[j] + beta * sigma1[j] + gamma)
                * (r[j] + beta * sigma2[j] + gamma)
                * (o[j] + beta * sigma3[j] + gamma);
            numerators.push(numerator);
            denominators.push(denominator);
            root_pow *= generator;
        }

        if denominators.iter().any(|d| d.is_zero()) {
            return Err(Error::PermutationRatioMismatch);
        }
        batch_inversion(&mut denominators);

        let mut z = Vec::with_capacity(n);
        let mut acc = F::one();
        for j in 0..n {
            z.push(acc);
            acc *= numerators[j] * denominators[j];
        }
        if acc != F::one() {
            return Err(Error::PermutationRatioMismatch);
        }

        Ok(Polynomial::from_lagrange_d0(z).to_canonical(&domains.small))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;

    fn trivial_domains() -> Domains<Fr> {
        Domains::new(4, 4).unwrap()
    }

    #[test]
    fn identity_permutation_closes() {
        let domains = trivial_domains();
        let n = domains.n();
        let generator = domains.small.group_gen();
        let u = domains.shift;
        let u2 = u * u;

        let l: Vec<Fr> = (0..n).map(|i| Fr::from(i as u64 + 1)).collect();
        let r = l.clone();
        let o = l.clone();

        let mut root_pow = Fr::from(1u64);
        let mut sigma1 = Vec::with_capacity(n);
        let mut sigma2 = Vec::with_capacity(n);
        let mut sigma3 = Vec::with_capacity(n);
        for _ in 0..n {
            sigma1.push(root_pow);
            sigma2.push(u * root_pow);
            sigma3.push(u2 * root_pow);
            root_pow *= generator;
        }

        let beta = Fr::from(3u64);
        let gamma = Fr::from(5u64);
        let l_poly = Polynomial::from_lagrange_d0(l);
        let r_poly = Polynomial::from_lagrange_d0(r);
        let o_poly = Polynomial::from_lagrange_d0(o);

        let z = RatioBuilder::build(
            &l_poly, &r_poly, &o_poly, &sigma1, &sigma2, &sigma3, beta, gamma, &domains,
        )
        .unwrap();
        assert_eq!(z.evaluate(Fr::from(0u64)) != Fr::from(0u64), true);
    }

    #[test]
    fn broken_permutation_is_rejected() {
        let domains = trivial_domains();
        let n = domains.n();
        let generator = domains.small.group_gen();

        let l: Vec<Fr> = (0..n).map(|i| Fr::from(i as u64 + 1)).collect();
        let r: Vec<Fr> = (0..n).map(|i| Fr::from(i as u64 + 100)).collect();
        let o: Vec<Fr> = (0..n).map(|i| Fr::from(i as u64 + 200)).collect();

        // sigma wired as the identity permutation on L only; R, O wires are
        // unrelated to L/R/O contents, so the product will not close.
        let mut root_pow = Fr::from(1u64);
        let mut sigma1 = Vec::with_capacity(n);
        for _ in 0..n {
            sigma1.push(root_pow);
            root_pow *= generator;
        }
        let sigma2 = sigma1.clone();
        let sigma3 = sigma1.clone();

        let beta = Fr::from(3u64);
        let gamma = Fr::from(5u64);
        let result = RatioBuilder::build(
            &Polynomial::from_lagrange_d0(l),
            &Polynomial::from_lagrange_d0(r),
            &Polynomial::from_lagrange_d0(o),
            &sigma1,
            &sigma2,
            &sigma3,
            beta,
            gamma,
            &domains,
        );
        assert!(matches!(result, Err(Error::PermutationRatioMismatch)));
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A polynomial tagged with its basis and layout, with explicit,
//! idempotent conversions between the two.
//!
//! A [`Polynomial`] wraps an `Arc<Vec<F>>` so that a *shallow clone* (the
//! derived [`Clone`] impl) is a cheap reference-count bump that shares the
//! underlying buffer; [`Polynomial::into_owned`] performs a *deep clone*
//! that materializes a fresh, uniquely-owned buffer for mutation (blinding,
//! basis conversion).

use ark_ff::{FftField, UniformRand};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use rand_core::RngCore;
use std::sync::Arc;

/// Which basis a [`Polynomial`]'s buffer is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Evaluations on the small domain `D0`.
    LagrangeD0,
    /// Evaluations on the extended coset `u * D1`.
    LagrangeCosetD1,
    /// Coefficient form.
    Canonical,
}

/// Physical ordering of a [`Polynomial`]'s buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Regular,
    BitReversed,
}

/// A tagged polynomial buffer.
///
/// `rotation` implements `shift(k)` on `LagrangeD0` polynomials without
/// copying: index `i` of the logical (shifted) polynomial reads physical
/// index `(i + rotation) % len`.
#[derive(Clone)]
pub struct Polynomial<F: FftField> {
    data: Arc<Vec<F>>,
    rotation: usize,
    basis: Basis,
    layout: Layout,
}

impl<F: FftField> Polynomial<F> {
    pub fn from_canonical(coeffs: Vec<F>) -> Self {
        Self {
            data: Arc::new(coeffs),
            rotation: 0,
            basis: Basis::Canonical,
            layout: Layout::Regular,
        }
    }

    pub fn from_lagrange_d0(evals: Vec<F>) -> Self {
        Self {
            data: Arc::new(evals),
            rotation: 0,
            basis: Basis::LagrangeD0,
            layout: Layout::Regular,
        }
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The buffer with `rotation` applied, i.e. the logical contents of
    /// this polynomial in its current basis/layout.
    pub fn as_evals(&self) -> Vec<F> {
        if self.rotation == 0 {
            return self.data.as_ref().clone();
        }
        let len = self.data.len();
        (0..len).map(|i| self.data[(i + self.rotation) % len]).collect()
    }

    /// A uniquely-owned copy with `rotation` resolved to zero.
    pub fn into_owned(&self) -> Self {
        Self {
            data: Arc::new(self.as_evals()),
            rotation: 0,
            basis: self.basis,
            layout: self.layout,
        }
    }

    /// Cyclic shift by `k` positions. Only meaningful on `LagrangeD0`
    /// polynomials; shares the buffer (shallow).
    pub fn shift(&self, k: usize) -> Self {
        debug_assert_eq!(self.basis, Basis::LagrangeD0);
        let len = self.data.len();
        Self {
            data: self.data.clone(),
            rotation: (self.rotation + k) % len.max(1),
            basis: self.basis,
            layout: self.layout,
        }
    }

    /// `shift(k)` in canonical basis: `p(X) -> p(generator^k * X)`, done by
    /// scaling coefficient `i` by `generator^(k*i)`. Used to prepare `Z(u*X)`
    /// for coset evaluation without re-interpolating.
    pub fn shift_canonical(&self, generator: F) -> Self {
        debug_assert_eq!(self.basis, Basis::Canonical);
        let mut power = F::one();
        let coeffs = self
            .as_evals()
            .iter()
            .map(|c| {
                let term = *c * power;
                power *= generator;
                term
            })
            .collect();
        Self::from_canonical(coeffs)
    }

    /// `toCanonical(D)`: inverse FFT from `LagrangeD0` to `Canonical`.
    pub fn to_canonical(&self, domain: &GeneralEvaluationDomain<F>) -> Self {
        debug_assert_eq!(self.basis, Basis::LagrangeD0);
        let coeffs = domain.ifft(&self.as_evals());
        Self::from_canonical(coeffs)
    }

    /// `toLagrangeCoset(D1)`: canonical to evaluations on the `u`-coset of
    /// `D1`, produced in bit-reversed layout.
    pub fn to_lagrange_coset(&self, extended: &GeneralEvaluationDomain<F>) -> Self {
        debug_assert_eq!(self.basis, Basis::Canonical);
        let mut coeffs = self.as_evals();
        coeffs.resize(extended.size(), F::zero());
        let evals = extended.coset_fft(&coeffs);
        Self {
            data: Arc::new(bit_reverse_permute(evals)),
            rotation: 0,
            basis: Basis::LagrangeCosetD1,
            layout: Layout::BitReversed,
        }
    }

    /// Inverse of [`Polynomial::to_lagrange_coset`]: coset evaluations back
    /// to canonical form. Requires [`Layout::Regular`] (call
    /// [`Polynomial::to_regular`] first).
    pub fn coset_to_canonical(&self, extended: &GeneralEvaluationDomain<F>) -> Self {
        debug_assert_eq!(self.basis, Basis::LagrangeCosetD1);
        debug_assert_eq!(self.layout, Layout::Regular);
        let coeffs = extended.coset_ifft(&self.as_evals());
        Self::from_canonical(coeffs)
    }

    pub fn to_regular(&self) -> Self {
        match self.layout {
            Layout::Regular => self.clone(),
            Layout::BitReversed => Self {
                data: Arc::new(bit_reverse_permute(self.as_evals())),
                rotation: 0,
                basis: self.basis,
                layout: Layout::Regular,
            },
        }
    }

    pub fn to_bit_reversed(&self) -> Self {
        match self.layout {
            Layout::BitReversed => self.clone(),
            Layout::Regular => Self {
                data: Arc::new(bit_reverse_permute(self.as_evals())),
                rotation: 0,
                basis: self.basis,
                layout: Layout::BitReversed,
            },
        }
    }

    /// `blind(b)`: adds `sum_{i=0..=b} r_i * (X^n - 1) * X^i` to a
    /// canonical polynomial over a domain of size `n`. Must be called in
    /// canonical basis with zero rotation.
    pub fn blind<R: RngCore>(
        &self,
        degree: usize,
        domain: &GeneralEvaluationDomain<F>,
        rng: &mut R,
    ) -> Self {
        debug_assert_eq!(self.basis, Basis::Canonical);
        debug_assert_eq!(self.rotation, 0);
        let n = domain.size();
        let mut coeffs = self.as_evals();
        coeffs.resize(coeffs.len().max(n + degree + 1), F::zero());
        for i in 0..=degree {
            let r = F::rand(rng);
            coeffs[i] -= r;
            coeffs[n + i] += r;
        }
        Self::from_canonical(coeffs)
    }

    /// `evaluate(zeta)`: Horner evaluation. Requires canonical, regular,
    /// unrotated form.
    pub fn evaluate(&self, point: F) -> F {
        debug_assert_eq!(self.basis, Basis::Canonical);
        debug_assert_eq!(self.layout, Layout::Regular);
        debug_assert_eq!(self.rotation, 0);
        self.data
            .iter()
            .rev()
            .fold(F::zero(), |acc, coeff| acc * point + *coeff)
    }

    pub fn scale(&self, s: F) -> Self {
        Self {
            data: Arc::new(self.as_evals().iter().map(|c| *c * s).collect()),
            rotation: 0,
            basis: self.basis,
            layout: self.layout,
        }
    }

    /// Rewraps a freshly-computed buffer with explicit basis/layout tags.
    /// Used by the identity combiner, which produces output rows directly
    /// rather than through one of the named conversions above.
    pub(crate) fn with_tags(data: Vec<F>, basis: Basis, layout: Layout) -> Self {
        Self {
            data: Arc::new(data),
            rotation: 0,
            basis,
            layout,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.basis, other.basis);
        let (a, b) = (self.as_evals(), other.as_evals());
        let len = a.len().max(b.len());
        let mut out = vec![F::zero(); len];
        for (i, v) in a.iter().enumerate() {
            out[i] += *v;
        }
        for (i, v) in b.iter().enumerate() {
            out[i] += *v;
        }
        Self {
            data: Arc::new(out),
            rotation: 0,
            basis: self.basis,
            layout: self.layout,
        }
    }
}

/// Reorders a buffer (length a power of two) by reversing the bits of each
/// index. Its own inverse.
fn bit_reverse_permute<F: Clone>(mut v: Vec<F>) -> Vec<F> {
    let len = v.len();
    if len <= 1 {
        return v;
    }
    let log_len = len.trailing_zeros();
    for i in 0..len {
        let j = (i as u32).reverse_bits() >> (u32::BITS - log_len);
        let j = j as usize;
        if i < j {
            v.swap(i, j);
        }
    }
    v
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{One, Zero};

    fn domain(n: usize) -> GeneralEvaluationDomain<Fr> {
        GeneralEvaluationDomain::new(n).unwrap()
    }

    #[test]
    fn canonical_lagrange_roundtrip() {
        let d = domain(8);
        let coeffs: Vec<Fr> = (0..8).map(|i| Fr::from(i as u64 + 1)).collect();
        let p = Polynomial::from_canonical(coeffs.clone());
        let evals = d.fft(&coeffs);
        let lag = Polynomial::from_lagrange_d0(evals);
        let back = lag.to_canonical(&d);
        assert_eq!(back.as_evals(), p.as_evals());
    }

    #[test]
    fn bit_reverse_is_involution() {
        let v: Vec<Fr> = (0..16).map(|i| Fr::from(i as u64)).collect();
        let once = bit_reverse_permute(v.clone());
        let twice = bit_reverse_permute(once);
        assert_eq!(v, twice);
    }

    #[test]
    fn shift_rotates_evaluations() {
        let evals: Vec<Fr> = (0..4).map(|i| Fr::from(i as u64)).collect();
        let p = Polynomial::from_lagrange_d0(evals.clone());
        let shifted = p.shift(1);
        let got = shifted.as_evals();
        assert_eq!(got, vec![evals[1], evals[2], evals[3], evals[0]]);
    }

    #[test]
    fn evaluate_constant_polynomial() {
        let p = Polynomial::from_canonical(vec![Fr::one()]);
        assert_eq!(p.evaluate(Fr::zero()), Fr::one());
        assert_eq!(p.evaluate(Fr::from(7u64)), Fr::one());
    }
}

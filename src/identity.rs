// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Evaluates a pointwise combiner over several aligned coset polynomials.

use ark_ff::FftField;
use rayon::prelude::*;

use crate::poly::{Basis, Layout, Polynomial};

/// Applies `combiner` row-by-row to `inputs`, all of which must be in
/// [`Basis::LagrangeCosetD1`] with identical length and layout. `combiner`
/// receives the `i`-th evaluation of each input, in order.
///
/// Partitioned across disjoint index ranges via `rayon`; no allocation
/// beyond the output buffer.
pub fn combine<F, G>(inputs: &[Polynomial<F>], combiner: G) -> Polynomial<F>
where
    F: FftField,
    G: Fn(&[F]) -> F + Sync,
{
    assert!(!inputs.is_empty(), "combine requires at least one input");
    let len = inputs[0].len();
    for p in inputs {
        debug_assert_eq!(p.basis(), Basis::LagrangeCosetD1);
        debug_assert_eq!(p.len(), len);
        debug_assert_eq!(p.layout(), inputs[0].layout());
    }

    let materialized: Vec<Vec<F>> = inputs.iter().map(|p| p.as_evals()).collect();
    let out: Vec<F> = (0..len)
        .into_par_iter()
        .map(|i| {
            let row: Vec<F> = materialized.iter().map(|col| col[i]).collect();
            combiner(&row)
        })
        .collect();

    Polynomial::with_tags(out, Basis::LagrangeCosetD1, inputs[0].layout())
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{One, Zero};

    #[test]
    fn combines_rowwise() {
        let a = Polynomial::with_tags(vec![Fr::one(), Fr::from(2u64)], Basis::LagrangeCosetD1, Layout::Regular);
        let b = Polynomial::with_tags(vec![Fr::from(3u64), Fr::from(4u64)], Basis::LagrangeCosetD1, Layout::Regular);
        let out = combine(&[a, b], |row| row[0] * row[1]);
        assert_eq!(out.as_evals(), vec![Fr::from(3u64), Fr::from(8u64)]);
    }

    #[test]
    #[should_panic]
    fn mismatched_length_panics() {
        let a = Polynomial::with_tags(vec![Fr::one()], Basis::LagrangeCosetD1, Layout::Regular);
        let b = Polynomial::with_tags(vec![Fr::zero(), Fr::zero()], Basis::LagrangeCosetD1, Layout::Regular);
        combine(&[a, b], |row| row[0] + row[1]);
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Proving and verifying key material.

use ark_ec::PairingEngine;
use ark_ff::{One, Zero};
use ark_poly_commit::kzg10::{Commitment, Powers, VerifierKey};

use crate::error::Error;
use crate::poly::Polynomial;
use crate::util::{commit, Domains};
use crate::witness::ConstraintSystem;

/// Metadata describing an in-circuit (BSB22) commitment slot. Only present
/// when the constraint system declares one; its absence means the prover
/// allocates no `PI2` polynomial and the transcript binds nothing extra for
/// it.
#[derive(Clone, Copy, Debug)]
pub struct CommitmentInfo {
    /// The solver hint id the committed value is fed back through.
    pub hint_id: u64,
    /// Number of committed witness entries.
    pub committed_size: usize,
}

/// Everything the prover needs: canonical and Lagrange-coset forms of the
/// selectors and permutation polynomials, both domains, and the KZG
/// committer key.
pub struct ProvingKey<E: PairingEngine> {
    pub ql: Polynomial<E::Fr>,
    pub qr: Polynomial<E::Fr>,
    pub qm: Polynomial<E::Fr>,
    pub qo: Polynomial<E::Fr>,
    pub qk: Polynomial<E::Fr>,
    pub qcp: Option<Polynomial<E::Fr>>,

    pub s1: Polynomial<E::Fr>,
    pub s2: Polynomial<E::Fr>,
    pub s3: Polynomial<E::Fr>,

    /// Raw permutation images on `D0`, indexed `0..n`, as consumed by
    /// [`crate::ratio::RatioBuilder`].
    pub sigma1_evals: Vec<E::Fr>,
    pub sigma2_evals: Vec<E::Fr>,
    pub sigma3_evals: Vec<E::Fr>,

    pub ql_coset: Polynomial<E::Fr>,
    pub qr_coset: Polynomial<E::Fr>,
    pub qm_coset: Polynomial<E::Fr>,
    pub qo_coset: Polynomial<E::Fr>,
    pub qk_coset: Polynomial<E::Fr>,
    pub qcp_coset: Option<Polynomial<E::Fr>>,
    pub s1_coset: Polynomial<E::Fr>,
    pub s2_coset: Polynomial<E::Fr>,
    pub s3_coset: Polynomial<E::Fr>,
    pub l1_coset: Polynomial<E::Fr>,

    pub domains: Domains<E::Fr>,
    pub commitment_info: Option<CommitmentInfo>,

    pub powers: Powers<'static, E>,
    pub verifier_key: VerifierKey<E>,
}

/// Everything the verifier needs. Every circuit-fixed polynomial is
/// carried only as a commitment: the verifier never runs an FFT or a
/// Horner evaluation over a full-length polynomial.
/// Instead it reconstructs the commitment to the linearization polynomial
/// `r(X)` via the KZG commitment's homomorphism (scaling each of these
/// commitments by a publicly-known scalar and summing), and relies on the
/// batched opening to prove that reconstructed commitment's evaluation at
/// `zeta` equals the prover's claimed `r(zeta)`.
pub struct VerifyingKey<E: PairingEngine> {
    pub comm_ql: Commitment<E>,
    pub comm_qr: Commitment<E>,
    pub comm_qm: Commitment<E>,
    pub comm_qo: Commitment<E>,
    pub comm_qk: Commitment<E>,
    pub comm_qcp: Option<Commitment<E>>,

    pub comm_s1: Commitment<E>,
    pub comm_s2: Commitment<E>,
    pub comm_s3: Commitment<E>,

    pub domains: Domains<E::Fr>,
    pub shift: E::Fr,
    pub commitment_info: Option<CommitmentInfo>,

    pub verifier_key: VerifierKey<E>,
}

impl<E: PairingEngine> VerifyingKey<E> {
    pub fn n(&self) -> usize {
        self.domains.n()
    }
}

impl<E: PairingEngine> ProvingKey<E> {
    /// Preprocesses a constraint system's fixed (witness-independent) part
    /// into a matching prover/verifier key pair: interpolates every
    /// selector and permutation column, commits each, and pre-computes the
    /// `D1`-coset forms the quotient stage needs. Grounded on the
    /// teacher's `StandardComposer::preprocess_shared`.
    pub fn setup(
        cs: &mut ConstraintSystem<E::Fr>,
        powers: Powers<'static, E>,
        verifier_key: VerifierKey<E>,
        domains: Domains<E::Fr>,
    ) -> Result<(ProvingKey<E>, VerifyingKey<E>), Error> {
        let solved = cs.solve(&domains)?;

        let ql = solved.ql.to_canonical(&domains.small);
        let qr = solved.qr.to_canonical(&domains.small);
        let qm = solved.qm.to_canonical(&domains.small);
        let qo = solved.qo.to_canonical(&domains.small);
        let qk = solved.qk.to_canonical(&domains.small);
        let qcp = solved.qcp.as_ref().map(|p| p.to_canonical(&domains.small));

        let s1 = Polynomial::from_lagrange_d0(solved.sigma1.clone()).to_canonical(&domains.small);
        let s2 = Polynomial::from_lagrange_d0(solved.sigma2.clone()).to_canonical(&domains.small);
        let s3 = Polynomial::from_lagrange_d0(solved.sigma3.clone()).to_canonical(&domains.small);

        let mut l1_evals = vec![E::Fr::zero(); domains.n()];
        l1_evals[0] = E::Fr::one();
        let l1 = Polynomial::from_lagrange_d0(l1_evals).to_canonical(&domains.small);

        let comm_ql = commit(&powers, &ql)?;
        let comm_qr = commit(&powers, &qr)?;
        let comm_qm = commit(&powers, &qm)?;
        let comm_qo = commit(&powers, &qo)?;
        let comm_qk = commit(&powers, &qk)?;
        let comm_qcp = qcp.as_ref().map(|p| commit(&powers, p)).transpose()?;
        let comm_s1 = commit(&powers, &s1)?;
        let comm_s2 = commit(&powers, &s2)?;
        let comm_s3 = commit(&powers, &s3)?;

        let ql_coset = ql.to_lagrange_coset(&domains.extended).to_regular();
        let qr_coset = qr.to_lagrange_coset(&domains.extended).to_regular();
        let qm_coset = qm.to_lagrange_coset(&domains.extended).to_regular();
        let qo_coset = qo.to_lagrange_coset(&domains.extended).to_regular();
        let qk_coset = qk.to_lagrange_coset(&domains.extended).to_regular();
        let qcp_coset = qcp.as_ref().map(|p| p.to_lagrange_coset(&domains.extended).to_regular());
        let s1_coset = s1.to_lagrange_coset(&domains.extended).to_regular();
        let s2_coset = s2.to_lagrange_coset(&domains.extended).to_regular();
        let s3_coset = s3.to_lagrange_coset(&domains.extended).to_regular();
        let l1_coset = l1.to_lagrange_coset(&domains.extended).to_regular();

        let commitment_info = cs.commitment_info();
        let shift = domains.shift;
        let pk_domains = domains.clone();

        let pk = ProvingKey {
            ql,
            qr,
            qm,
            qo,
            qk,
            qcp,
            s1,
            s2,
            s3,
            sigma1_evals: solved.sigma1,
            sigma2_evals: solved.sigma2,
            sigma3_evals: solved.sigma3,
            ql_coset,
            qr_coset,
            qm_coset,
            qo_coset,
            qk_coset,
            qcp_coset,
            s1_coset,
            s2_coset,
            s3_coset,
            l1_coset,
            domains: pk_domains,
            commitment_info,
            powers,
            verifier_key: verifier_key.clone(),
        };

        let vk = VerifyingKey {
            comm_ql,
            comm_qr,
            comm_qm,
            comm_qo,
            comm_qk,
            comm_qcp,
            comm_s1,
            comm_s2,
            comm_s3,
            domains,
            shift,
            commitment_info,
            verifier_key,
        };

        Ok((pk, vk))
    }
}

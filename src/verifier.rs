// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Re-derives the transcript challenges, reconstructs the linearization and
//! folded-quotient commitments homomorphically, and checks the batched KZG
//! opening plus the final polynomial identity.

use ark_ec::PairingEngine;
use ark_ff::{One, Zero};
use ark_poly_commit::kzg10::{self, Commitment, KZG10};
use ark_poly::univariate::DensePolynomial;
use rand_core::RngCore;

use crate::error::Error;
use crate::keys::VerifyingKey;
use crate::linearization::LinearizationEvals;
use crate::proof::Proof;
use crate::quotient::fold_commitments;
use crate::transcript::{derive_nondegenerate_zeta, Label, Transcript};
use crate::util::{evaluate_public_input, linear_combination, msm_combine};

/// A stateless driver over a [`VerifyingKey`]; all mutable state lives in
/// the transcript built fresh for each call to [`Verifier::verify`].
pub struct Verifier;

impl Verifier {
    /// Re-derives every challenge, reconstructs the linearization and
    /// folded-`h` commitments via the KZG commitment homomorphism, and
    /// checks the batched opening at `zeta` together with the opening of
    /// `Z` at `u * zeta` and the final field identity.
    #[tracing::instrument(skip_all)]
    pub fn verify<E: PairingEngine, R: RngCore>(
        vk: &VerifyingKey<E>,
        proof: &Proof<E>,
        public_inputs: &[E::Fr],
        rng: &mut R,
    ) -> Result<(), Error> {
        let domains = &vk.domains;
        let n = domains.n();
        let u = vk.shift;

        let mut transcript = Transcript::<E::Fr>::new(b"plonk-core.prove");

        for value in public_inputs {
            transcript.bind_scalar(Label::Gamma, value)?;
        }
        transcript.bind_commitment(Label::Gamma, &proof.comm_l)?;
        transcript.bind_commitment(Label::Gamma, &proof.comm_r)?;
        transcript.bind_commitment(Label::Gamma, &proof.comm_o)?;
        let gamma = transcript.challenge(Label::Gamma)?;
        let beta = transcript.challenge(Label::Beta)?;

        transcript.bind_commitment(Label::Alpha, &proof.comm_z)?;
        let alpha = transcript.challenge(Label::Alpha)?;

        transcript.bind_commitment(Label::Zeta, &proof.comm_h1)?;
        transcript.bind_commitment(Label::Zeta, &proof.comm_h2)?;
        transcript.bind_commitment(Label::Zeta, &proof.comm_h3)?;
        let zeta = derive_nondegenerate_zeta(&mut transcript, domains)?;

        let evals = &proof.evaluations;
        if evals.qcp.is_some() != vk.comm_qcp.is_some() {
            return Err(Error::InvalidConfiguration(
                "proof's commitment-slot usage does not match the verifying key".into(),
            ));
        }

        let l1_zeta = domains.evaluate_l1(zeta);
        let pi_zeta = evaluate_public_input(public_inputs, &domains.small, zeta);

        let linearization_evals = LinearizationEvals {
            l: evals.l,
            r: evals.r,
            o: evals.o,
            qcp: evals.qcp.unwrap_or_else(E::Fr::zero),
            z_shifted: evals.z_shifted,
            s1: evals.s1,
            s2: evals.s2,
        };
        let (perm_inner_coeff, z_coeff) =
            linearization_evals.permutation_coefficients(alpha, beta, gamma, zeta, u, l1_zeta);

        // Reconstruct a commitment to the linearization polynomial from the
        // verifying key's selector/permutation commitments plus the
        // proof's own `[Z]` (and optional `[PI2]`), via the same public
        // scalars the prover used to build `r(X)` directly.
        let mut lin_terms: Vec<(E::Fr, &Commitment<E>)> = vec![
            (evals.l, &vk.comm_ql),
            (evals.r, &vk.comm_qr),
            (evals.l * evals.r, &vk.comm_qm),
            (evals.o, &vk.comm_qo),
            (E::Fr::one(), &vk.comm_qk),
            (perm_inner_coeff, &vk.comm_s3),
            (z_coeff, &proof.comm_z),
        ];
        if let (Some(qcp_eval), Some(comm_pi2)) = (evals.qcp, proof.comm_pi2.as_ref()) {
            lin_terms.push((qcp_eval, comm_pi2));
        }
        let comm_lin = msm_combine(&lin_terms);

        let comm_h_folded = fold_commitments(n, &proof.comm_h1, &proof.comm_h2, &proof.comm_h3, zeta);

        // Batch at zeta: {folded h, linearization, L, R, O, S1, S2, Qcp},
        // reusing zeta itself as the aggregation challenge.
        let mut batch_evals: Vec<E::Fr> = vec![evals.h, evals.lin, evals.l, evals.r, evals.o, evals.s1, evals.s2];
        let mut batch_comms: Vec<Commitment<E>> = vec![
            comm_h_folded,
            comm_lin,
            proof.comm_l,
            proof.comm_r,
            proof.comm_o,
            vk.comm_s1,
            vk.comm_s2,
        ];
        if let (Some(qcp_eval), Some(comm_qcp)) = (evals.qcp, vk.comm_qcp) {
            batch_evals.push(qcp_eval);
            batch_comms.push(comm_qcp);
        }
        let (comm_combined, eval_combined) = linear_combination(&batch_evals, &batch_comms, zeta);

        let opening_proof = kzg10::Proof {
            w: proof.w_zeta.0,
            random_v: None,
        };
        let shifted_opening_proof = kzg10::Proof {
            w: proof.w_zeta_shifted.0,
            random_v: None,
        };

        match KZG10::<E, DensePolynomial<E::Fr>>::batch_check(
            &vk.verifier_key,
            &[comm_combined, proof.comm_z],
            &[zeta, zeta * u],
            &[eval_combined, evals.z_shifted],
            &[opening_proof, shifted_opening_proof],
            rng,
        ) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(Error::OpeningVerificationFailure),
        }

        let vanishing = domains.evaluate_vanishing(zeta);
        if evals.lin + pi_zeta - vanishing * evals.h != E::Fr::zero() {
            return Err(Error::PolynomialIdentityMismatch);
        }

        Ok(())
    }
}

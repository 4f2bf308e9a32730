// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Orchestrates the full proving pipeline: solve, commit wires, derive
//! challenges, build the permutation and quotient polynomials, linearize,
//! and batch-open.

use ark_ec::PairingEngine;
use ark_ff::{PrimeField, Zero};
use ark_poly::EvaluationDomain;
use rand_core::RngCore;

use crate::error::Error;
use crate::keys::ProvingKey;
use crate::linearization::{LinearizationEvals, LinearizationPolys, Linearizer};
use crate::poly::Polynomial;
use crate::proof::{Proof, ProofEvaluations};
use crate::quotient::{fold_canonical, QuotientBuilder, QuotientInputs};
use crate::ratio::RatioBuilder;
use crate::transcript::{derive_nondegenerate_zeta, Label, Transcript};
use crate::util::{commit, linear_combination_polys, open};
use crate::witness::ConstraintSystem;

/// The linear progression a single proof attempt moves through. Checked only
/// under `debug_assertions`: `Prover::prove` is the sole public entry point
/// and already calls the stages in order, so out-of-order transitions are
/// unreachable from safe external code; this guards against a future
/// reordering bug within the pipeline itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ProverState {
    Init,
    WiresCommitted,
    GammaBeta,
    ZCommitted,
    Alpha,
    QuotientCommitted,
    Zeta,
    Evals,
    Linearized,
    BatchOpened,
    Done,
}

impl ProverState {
    fn transition(&mut self, next: ProverState) {
        debug_assert!(next > *self, "state machine moved backward or skipped a stage");
        *self = next;
    }
}

/// A stateless driver over a [`ProvingKey`]; all mutable state lives in the
/// constraint system and the transcript built fresh for each call to
/// [`Prover::prove`].
pub struct Prover;

impl Prover {
    /// Runs the full pipeline of steps 1-16. Returns the proof and the
    /// public input vector bound into the transcript (so the caller, and
    /// the verifier, agree on exactly what was proved).
    #[tracing::instrument(skip_all)]
    pub fn prove<E: PairingEngine, R: RngCore>(
        pk: &ProvingKey<E>,
        cs: &mut ConstraintSystem<E::Fr>,
        rng: &mut R,
    ) -> Result<(Proof<E>, Vec<E::Fr>), Error> {
        let domains = &pk.domains;
        let n = domains.n();
        let generator = domains.small.group_gen();
        let u = domains.shift;

        let mut state = ProverState::Init;
        let mut transcript = Transcript::<E::Fr>::new(b"plonk-core.prove");

        // Step 2: optional in-circuit (BSB22) commitment hook.
        let (pi2_canon, comm_pi2) = if let Some(_info) = cs.commitment_info() {
            let values = cs
                .pi2_values()
                .ok_or_else(|| Error::InvalidConfiguration("commitment declared without values".into()))?
                .to_vec();
            let mut padded = values;
            padded.resize(n, E::Fr::zero());
            let pi2_canon = Polynomial::from_lagrange_d0(padded).to_canonical(&domains.small);
            let commitment = commit(&pk.powers, &pi2_canon)?;
            let hashed = hash_commitment_to_field::<E>(&commitment);
            cs.set_commitment_result(hashed);
            (Some(pi2_canon), Some(commitment))
        } else {
            (None, None)
        };

        // Step 3.
        let solved = cs.solve(domains)?;

        // Step 4: interpolate, blind, commit the wires.
        let l_canon = solved.l.to_canonical(&domains.small).blind(1, &domains.small, rng);
        let r_canon = solved.r.to_canonical(&domains.small).blind(1, &domains.small, rng);
        let o_canon = solved.o.to_canonical(&domains.small).blind(1, &domains.small, rng);
        let comm_l = commit(&pk.powers, &l_canon)?;
        let comm_r = commit(&pk.powers, &r_canon)?;
        let comm_o = commit(&pk.powers, &o_canon)?;
        state.transition(ProverState::WiresCommitted);

        // Step 5: bind public witness and wire commitments, derive gamma
        // then beta.
        for value in &solved.public_inputs {
            transcript.bind_scalar(Label::Gamma, value)?;
        }
        transcript.bind_commitment(Label::Gamma, &comm_l)?;
        transcript.bind_commitment(Label::Gamma, &comm_r)?;
        transcript.bind_commitment(Label::Gamma, &comm_o)?;
        let gamma = transcript.challenge(Label::Gamma)?;
        let beta = transcript.challenge(Label::Beta)?;
        state.transition(ProverState::GammaBeta);

        // Step 6: build Z, blind, commit.
        let z_canon = RatioBuilder::build(
            &solved.l,
            &solved.r,
            &solved.o,
            &solved.sigma1,
            &solved.sigma2,
            &solved.sigma3,
            beta,
            gamma,
            domains,
        )?
        .blind(2, &domains.small, rng);
        let comm_z = commit(&pk.powers, &z_canon)?;
        state.transition(ProverState::ZCommitted);

        // Step 7.
        transcript.bind_commitment(Label::Alpha, &comm_z)?;
        let alpha = transcript.challenge(Label::Alpha)?;
        state.transition(ProverState::Alpha);

        // Step 8: complete a local copy of Qk with the current witness's
        // public inputs. Qk in `pk` stays the circuit's fixed, uncompleted
        // selector, so the same proving/verifying key pair stays valid
        // across different satisfying witnesses of the same circuit.
        let mut qk_evals = solved.qk.as_evals();
        for (&row, &value) in solved.public_input_rows.iter().zip(solved.public_inputs.iter()) {
            qk_evals[row] -= value;
        }
        let qk_canon = Polynomial::from_lagrange_d0(qk_evals).to_canonical(&domains.small);
        let qk_coset = qk_canon.to_lagrange_coset(&domains.extended).to_regular();

        // Step 9: transform the participating polynomials to the D1 coset.
        let l_coset = l_canon.to_lagrange_coset(&domains.extended).to_regular();
        let r_coset = r_canon.to_lagrange_coset(&domains.extended).to_regular();
        let o_coset = o_canon.to_lagrange_coset(&domains.extended).to_regular();
        let z_coset = z_canon.to_lagrange_coset(&domains.extended).to_regular();
        let z_shifted_coset = z_canon
            .shift_canonical(generator)
            .to_lagrange_coset(&domains.extended)
            .to_regular();
        let pi2_coset = pi2_canon.as_ref().map(|p| p.to_lagrange_coset(&domains.extended).to_regular());

        // Step 10: quotient.
        let inputs = QuotientInputs {
            l: &l_coset,
            r: &r_coset,
            o: &o_coset,
            z: &z_coset,
            z_shifted: &z_shifted_coset,
            ql: &pk.ql_coset,
            qr: &pk.qr_coset,
            qm: &pk.qm_coset,
            qo: &pk.qo_coset,
            qk: &qk_coset,
            qcp: pk.qcp_coset.as_ref(),
            pi2: pi2_coset.as_ref(),
            sigma1: &pk.s1_coset,
            sigma2: &pk.s2_coset,
            sigma3: &pk.s3_coset,
            l1: &pk.l1_coset,
        };
        let (h1, h2, h3) = QuotientBuilder::build(&inputs, beta, gamma, alpha, domains);
        let comm_h1 = commit(&pk.powers, &h1)?;
        let comm_h2 = commit(&pk.powers, &h2)?;
        let comm_h3 = commit(&pk.powers, &h3)?;
        state.transition(ProverState::QuotientCommitted);

        // Step 11: derive zeta, re-deriving past the negligible-probability
        // degenerate evaluation points the module notes call out.
        transcript.bind_commitment(Label::Zeta, &comm_h1)?;
        transcript.bind_commitment(Label::Zeta, &comm_h2)?;
        transcript.bind_commitment(Label::Zeta, &comm_h3)?;
        let zeta = derive_nondegenerate_zeta(&mut transcript, domains)?;
        state.transition(ProverState::Zeta);

        // Step 12: evaluate.
        let l_eval = l_canon.evaluate(zeta);
        let r_eval = r_canon.evaluate(zeta);
        let o_eval = o_canon.evaluate(zeta);
        let qcp_eval = pk.qcp.as_ref().map(|p| p.evaluate(zeta)).unwrap_or_else(E::Fr::zero);
        let s1_eval = pk.s1.evaluate(zeta);
        let s2_eval = pk.s2.evaluate(zeta);
        let z_shifted_eval = z_canon.evaluate(zeta * u);
        state.transition(ProverState::Evals);

        // Step 13: linearization.
        let l1_zeta = domains.evaluate_l1(zeta);
        let linearization_polys = LinearizationPolys {
            ql: &pk.ql,
            qr: &pk.qr,
            qm: &pk.qm,
            qo: &pk.qo,
            qk: &qk_canon,
            qcp: pk.qcp.as_ref(),
            pi2: pi2_canon.as_ref(),
            s3: &pk.s3,
            z: &z_canon,
        };
        let linearization_evals = LinearizationEvals {
            l: l_eval,
            r: r_eval,
            o: o_eval,
            qcp: qcp_eval,
            z_shifted: z_shifted_eval,
            s1: s1_eval,
            s2: s2_eval,
        };
        let r_poly = Linearizer::build(
            &linearization_polys,
            &linearization_evals,
            alpha,
            beta,
            gamma,
            zeta,
            u,
            l1_zeta,
        );
        let lin_eval = r_poly.evaluate(zeta);
        state.transition(ProverState::Linearized);

        // Step 14: fold h.
        let h_folded = fold_canonical(n, &h1, &h2, &h3, zeta);
        let h_folded_eval = h_folded.evaluate(zeta);

        // Step 15: batch-open at zeta, reusing zeta itself as the
        // aggregation challenge.
        let mut polys_at_zeta: Vec<&Polynomial<E::Fr>> =
            vec![&h_folded, &r_poly, &l_canon, &r_canon, &o_canon, &pk.s1, &pk.s2];
        if let Some(qcp) = pk.qcp.as_ref() {
            polys_at_zeta.push(qcp);
        }
        let combined = linear_combination_polys(&polys_at_zeta, zeta);
        let w_zeta = open(&pk.powers, &combined, zeta)?;
        let w_zeta_shifted = open(&pk.powers, &z_canon, zeta * u)?;
        state.transition(ProverState::BatchOpened);

        let evaluations = ProofEvaluations {
            l: l_eval,
            r: r_eval,
            o: o_eval,
            qcp: pk.qcp.as_ref().map(|_| qcp_eval),
            z_shifted: z_shifted_eval,
            s1: s1_eval,
            s2: s2_eval,
            lin: lin_eval,
            h: h_folded_eval,
        };
        state.transition(ProverState::Done);

        Ok((
            Proof {
                comm_l,
                comm_r,
                comm_o,
                comm_z,
                comm_h1,
                comm_h2,
                comm_h3,
                comm_pi2,
                evaluations,
                w_zeta,
                w_zeta_shifted,
            },
            solved.public_inputs,
        ))
    }
}

/// Hashes a KZG commitment down to a field element via the transcript's own
/// hash function, for the BSB22 hook (step 2).
fn hash_commitment_to_field<E: PairingEngine>(commitment: &ark_poly_commit::kzg10::Commitment<E>) -> E::Fr {
    use ark_serialize::CanonicalSerialize;
    let mut bytes = Vec::new();
    commitment
        .0
        .serialize(&mut bytes)
        .expect("commitment serialization cannot fail");
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"plonk-core.bsb22.commitment");
    hasher.update(&bytes);
    let digest = hasher.finalize();
    E::Fr::from_le_bytes_mod_order(digest.as_bytes())
}

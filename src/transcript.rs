// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A labeled Fiat-Shamir transcript.
//!
//! Every challenge the prover and verifier derive is produced from this
//! transcript so that the protocol stays non-interactive. Unlike a bare
//! `merlin::Transcript`, this one enforces the label-ordering contract the
//! protocol relies on: challenges must be produced in the order their labels
//! were declared, binding to a label after its challenge has been computed is
//! rejected, and repeated calls to `challenge` for the same label are
//! idempotent (memoized) rather than re-hashing.

use ark_ff::{One, PrimeField, Zero};
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::CanonicalSerialize;
use blake3::Hasher;
use std::io::Read;
use std::marker::PhantomData;

use crate::error::Error;
use crate::util::Domains;

/// Re-deriving `zeta` past this many draws is treated as a misconfigured
/// domain rather than bad luck: each draw's chance of landing on a
/// degenerate point is about `n / |F|`.
const MAX_ZETA_ATTEMPTS: usize = 8;

/// The four challenge labels this protocol derives, in the order they must
/// be produced. Reordering or renaming a variant changes the protocol;
/// appending new labels after `Zeta` is backward compatible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Label {
    /// Permutation argument randomizer.
    Gamma,
    /// Permutation argument randomizer.
    Beta,
    /// Quotient-combination randomizer.
    Alpha,
    /// Evaluation point.
    Zeta,
}

const LABEL_ORDER: [Label; 4] =
    [Label::Gamma, Label::Beta, Label::Alpha, Label::Zeta];

impl Label {
    fn index(self) -> usize {
        LABEL_ORDER.iter().position(|l| *l == self).unwrap()
    }

    fn as_str(self) -> &'static str {
        match self {
            Label::Gamma => "gamma",
            Label::Beta => "beta",
            Label::Alpha => "alpha",
            Label::Zeta => "zeta",
        }
    }
}

/// A labeled, order-enforcing Fiat-Shamir transcript over BLAKE3.
pub struct Transcript<F: PrimeField> {
    /// Running absorb state, updated by every `bind`.
    hasher: Hasher,
    /// Index into `LABEL_ORDER` of the next label allowed to be bound to or
    /// challenged. Advances only when `challenge` is called.
    cursor: usize,
    /// Memoized challenges, one slot per label.
    computed: [Option<F>; 4],
    __: PhantomData<F>,
}

impl<F: PrimeField> Transcript<F> {
    /// Builds a new transcript with a fixed domain-separation tag.
    pub fn new(domain_tag: &'static [u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(b"plonk-core.transcript.v1");
        hasher.update(domain_tag);
        Self {
            hasher,
            cursor: 0,
            computed: [None; 4],
            __: PhantomData,
        }
    }

    fn check_bindable(&self, label: Label) -> Result<(), Error> {
        if label.index() < self.cursor {
            return Err(Error::TranscriptMisuse(
                "bind after the owning label's challenge was computed",
            ));
        }
        Ok(())
    }

    /// Binds raw bytes under `label`. Fails if `label`'s challenge has
    /// already been computed (its buffer is frozen).
    pub fn bind_bytes(
        &mut self,
        label: Label,
        bytes: &[u8],
    ) -> Result<(), Error> {
        self.check_bindable(label)?;
        self.hasher.update(b"item:");
        self.hasher.update(label.as_str().as_bytes());
        self.hasher.update(b":len:");
        self.hasher.update(&(bytes.len() as u64).to_be_bytes());
        self.hasher.update(b":data:");
        self.hasher.update(bytes);
        Ok(())
    }

    /// Binds a KZG commitment (compressed encoding) under `label`.
    pub fn bind_commitment<E: ark_ec::PairingEngine<Fr = F>>(
        &mut self,
        label: Label,
        commitment: &Commitment<E>,
    ) -> Result<(), Error> {
        let mut bytes = Vec::new();
        commitment
            .0
            .serialize(&mut bytes)
            .map_err(|_| Error::CommitmentFailure("serialize commitment".into()))?;
        self.bind_bytes(label, &bytes)
    }

    /// Binds a field element under `label`.
    pub fn bind_scalar(&mut self, label: Label, scalar: &F) -> Result<(), Error> {
        let mut bytes = Vec::new();
        scalar
            .serialize(&mut bytes)
            .map_err(|_| Error::CommitmentFailure("serialize scalar".into()))?;
        self.bind_bytes(label, &bytes)
    }

    /// Derives the field challenge for `label`.
    ///
    /// Fails with `TranscriptMisuse` if an earlier label (in declared order)
    /// has not yet produced its challenge. Idempotent: a second call for the
    /// same label returns the memoized value without re-hashing.
    pub fn challenge(&mut self, label: Label) -> Result<F, Error> {
        let idx = label.index();
        if let Some(c) = self.computed[idx] {
            return Ok(c);
        }
        if idx != self.cursor {
            return Err(Error::TranscriptMisuse(
                "challenge requested out of declared label order",
            ));
        }

        let mut h = self.hasher.clone();
        h.update(b"challenge:");
        h.update(label.as_str().as_bytes());
        let mut xof = h.finalize_xof();
        let mut buf = [0u8; 64];
        xof.read_exact(&mut buf).expect("xof read never fails");
        let challenge = F::from_le_bytes_mod_order(&buf);

        self.hasher.update(b"derived:");
        self.hasher.update(label.as_str().as_bytes());
        self.hasher.update(challenge_bytes(&challenge));

        self.computed[idx] = Some(challenge);
        self.cursor = idx + 1;
        Ok(challenge)
    }

    /// Re-derives a fresh challenge for `label`, which must already have
    /// produced one. The hasher has already absorbed the rejected draw (via
    /// the `derived:` update in [`Transcript::challenge`]), so the new draw
    /// differs from it without needing a separate retry counter.
    pub fn rederive(&mut self, label: Label) -> Result<F, Error> {
        let idx = label.index();
        if self.computed[idx].is_none() {
            return Err(Error::TranscriptMisuse(
                "rederive called before the label's first challenge",
            ));
        }
        self.computed[idx] = None;
        self.cursor = idx;
        self.challenge(label)
    }
}

/// Derives `zeta` from `transcript`, re-deriving while it lands on a
/// degenerate evaluation point: `1` (the identity of `D0`) or a root of
/// `D0`'s vanishing polynomial. Both the prover and verifier call this, so
/// they walk the same re-derivation schedule and agree on the accepted
/// value.
pub fn derive_nondegenerate_zeta<F: PrimeField>(
    transcript: &mut Transcript<F>,
    domains: &Domains<F>,
) -> Result<F, Error> {
    let mut zeta = transcript.challenge(Label::Zeta)?;
    let mut attempts = 0;
    while zeta.is_one() || domains.evaluate_vanishing(zeta).is_zero() {
        attempts += 1;
        if attempts >= MAX_ZETA_ATTEMPTS {
            return Err(Error::InvalidConfiguration(
                "zeta repeatedly collided with a degenerate evaluation point".into(),
            ));
        }
        zeta = transcript.rederive(Label::Zeta)?;
    }
    Ok(zeta)
}

fn challenge_bytes<F: PrimeField>(f: &F) -> Vec<u8> {
    let mut bytes = Vec::new();
    f.serialize(&mut bytes).expect("field serialization cannot fail");
    bytes
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::UniformRand;

    #[test]
    fn challenges_are_memoized() {
        let mut t = Transcript::<Fr>::new(b"test");
        t.bind_bytes(Label::Gamma, b"hello").unwrap();
        let a = t.challenge(Label::Gamma).unwrap();
        let b = t.challenge(Label::Gamma).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bind_after_challenge_is_rejected() {
        let mut t = Transcript::<Fr>::new(b"test");
        t.bind_bytes(Label::Gamma, b"hello").unwrap();
        t.challenge(Label::Gamma).unwrap();
        assert!(t.bind_bytes(Label::Gamma, b"late").is_err());
    }

    #[test]
    fn challenge_out_of_order_is_rejected() {
        let mut t = Transcript::<Fr>::new(b"test");
        assert!(t.challenge(Label::Beta).is_err());
    }

    #[test]
    fn rederive_changes_the_challenge() {
        let mut t = Transcript::<Fr>::new(b"test");
        t.bind_bytes(Label::Gamma, b"hello").unwrap();
        let first = t.challenge(Label::Gamma).unwrap();
        let second = t.rederive(Label::Gamma).unwrap();
        assert_ne!(first, second);
        assert_eq!(t.challenge(Label::Gamma).unwrap(), second);
    }

    #[test]
    fn rederive_before_first_challenge_is_rejected() {
        let mut t = Transcript::<Fr>::new(b"test");
        assert!(t.rederive(Label::Gamma).is_err());
    }

    #[test]
    fn derive_nondegenerate_zeta_matches_plain_challenge_when_not_degenerate() {
        let domains = Domains::<Fr>::new(4, 4).unwrap();
        let mut t1 = Transcript::<Fr>::new(b"test");
        t1.bind_bytes(Label::Gamma, b"x").unwrap();
        t1.challenge(Label::Gamma).unwrap();
        t1.challenge(Label::Beta).unwrap();
        t1.challenge(Label::Alpha).unwrap();
        let plain = t1.challenge(Label::Zeta).unwrap();

        let mut t2 = Transcript::<Fr>::new(b"test");
        t2.bind_bytes(Label::Gamma, b"x").unwrap();
        t2.challenge(Label::Gamma).unwrap();
        t2.challenge(Label::Beta).unwrap();
        t2.challenge(Label::Alpha).unwrap();
        let nondegenerate = derive_nondegenerate_zeta(&mut t2, &domains).unwrap();

        if !plain.is_one() && !domains.evaluate_vanishing(plain).is_zero() {
            assert_eq!(plain, nondegenerate);
        }
    }

    #[test]
    fn different_bound_bytes_yield_different_challenges() {
        let mut t1 = Transcript::<Fr>::new(b"test");
        t1.bind_bytes(Label::Gamma, b"a").unwrap();
        let a = t1.challenge(Label::Gamma).unwrap();

        let mut t2 = Transcript::<Fr>::new(b"test");
        t2.bind_bytes(Label::Gamma, b"b").unwrap();
        let b = t2.challenge(Label::Gamma).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn same_schedule_is_deterministic() {
        let r = Fr::rand(&mut rand::thread_rng());
        let run = || {
            let mut t = Transcript::<Fr>::new(b"test");
            t.bind_bytes(Label::Gamma, b"x").unwrap();
            t.bind_scalar(Label::Gamma, &r).unwrap();
            t.challenge(Label::Gamma).unwrap()
        };
        assert_eq!(run(), run());
    }
}

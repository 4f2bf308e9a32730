// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A collection of all possible errors encountered in the PLONK core.

/// Defines all possible errors that can be encountered in the prover and
/// verifier pipelines.
#[derive(Debug)]
pub enum Error {
    /// The witness solver failed, or returned an assignment inconsistent with
    /// the constraint system (wire-length mismatch, unresolved variable,
    /// etc).
    InvalidWitness(String),

    /// The proving/verifying key does not match the circuit it is being used
    /// with (domain size, selector length, or permutation size mismatch).
    InvalidConfiguration(String),

    /// `Z(omega^n) != 1` while building the permutation ratio polynomial:
    /// either the permutation is malformed or the witness does not satisfy
    /// the copy constraints.
    PermutationRatioMismatch,

    /// An underlying KZG operation (commit / open / batch open) failed.
    CommitmentFailure(String),

    /// A transcript label was bound to after its challenge was already
    /// computed, or a challenge was requested out of the declared label
    /// order.
    TranscriptMisuse(&'static str),

    /// The verifier's final field identity
    /// `r(zeta) + PI(zeta) - Z_D0(zeta) * h(zeta) = 0` did not hold.
    PolynomialIdentityMismatch,

    /// A KZG opening (batched or single) failed its pairing check.
    OpeningVerificationFailure,

    // --- Preprocessing / configuration errors (teacher-derived) ---
    /// The lengths of the wire or selector polynomials are inconsistent.
    MismatchedPolyLen,

    /// An `EvaluationDomain` of the requested size could not be constructed.
    InvalidEvalDomainSize {
        /// Requested log-size of the domain.
        log_size_of_group: u32,
        /// Two-adicity available in the scalar field.
        adacity: u32,
    },

    /// Polynomial commitment scheme error, forwarded from `ark-poly-commit`.
    PCError {
        /// The underlying error.
        error: ark_poly_commit::error::Error,
    },
}

impl From<ark_poly_commit::error::Error> for Error {
    fn from(error: ark_poly_commit::error::Error) -> Self {
        Self::PCError { error }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWitness(msg) => {
                write!(f, "invalid witness: {}", msg)
            }
            Self::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            Self::PermutationRatioMismatch => {
                write!(f, "permutation ratio polynomial does not close (Z(omega^n) != 1)")
            }
            Self::CommitmentFailure(msg) => {
                write!(f, "commitment scheme failure: {}", msg)
            }
            Self::TranscriptMisuse(msg) => {
                write!(f, "transcript misuse: {}", msg)
            }
            Self::PolynomialIdentityMismatch => {
                write!(f, "final polynomial identity check failed")
            }
            Self::OpeningVerificationFailure => {
                write!(f, "KZG opening verification failed")
            }
            Self::MismatchedPolyLen => {
                write!(f, "the lengths of the wires/selectors are not the same")
            }
            Self::InvalidEvalDomainSize {
                log_size_of_group,
                adacity,
            } => write!(
                f,
                "log-size of the evaluation domain group > two-adicity: {:?} > {:?}",
                log_size_of_group, adacity
            ),
            Self::PCError { error } => write!(f, "{:?}", error),
        }
    }
}

impl std::error::Error for Error {}

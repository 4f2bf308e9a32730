// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! `plonk-core` implements the polynomial-identity machinery of a PLONK
//! zero-knowledge proof system: wire and permutation polynomials, the
//! quotient pipeline, the Fiat-Shamir transcript, the linearization
//! polynomial, and batched KZG opening/verification.
//!
//! The constraint system and its witness solver, the field/FFT
//! arithmetic, the pairing group, and the KZG primitives themselves are
//! consumed as collaborators (`ark-ff`, `ark-poly`, `ark-ec`,
//! `ark-poly-commit`) rather than reimplemented here. [`witness`]
//! supplies a minimal constraint-system builder sufficient to drive the
//! prover and verifier end to end in tests; real front ends are expected
//! to supply their own.
//!
//! ```text
//! witness -> wire polynomials -> commitments -> (gamma, beta)
//!   -> permutation ratio Z -> commitment -> alpha
//!   -> quotient h = h1 + X^(n+2) h2 + X^(2(n+2)) h3 -> commitments
//!   -> zeta -> evaluations -> linearization -> batched opening
//! ```

#![deny(rust_2018_idioms)]
#![deny(unused_imports)]
#![deny(unused_extern_crates)]
#![forbid(unsafe_code)]

pub mod error;
pub mod identity;
pub mod keys;
pub mod linearization;
pub mod poly;
pub mod proof;
pub mod prover;
pub mod quotient;
pub mod ratio;
pub mod transcript;
pub mod util;
pub mod verifier;
pub mod witness;

pub use error::Error;
pub use keys::{ProvingKey, VerifyingKey};
pub use proof::Proof;
pub use prover::Prover;
pub use util::Domains;
pub use verifier::Verifier;

// Copyright 2026 The MWEB Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! secp256k1 arithmetic, tagged hashing, Pedersen commitments and
//! bulletproof range proofs underlying the MWEB cryptographic core.
//!
//! This crate intentionally does not bind to the C `libsecp256k1-zkp`
//! library: the bulletproof transcript and ChaCha20 PRF schedule are
//! specified down to the byte, which only makes sense to honor with a
//! from-scratch implementation. See `DESIGN.md` at the workspace root.

pub mod bulletproof;
pub mod error;
pub mod field;
pub mod generators;
pub mod hash;
pub mod pedersen;
pub mod point;
pub mod scalar;
pub mod schnorr;

pub use error::{Error, Result};
pub use point::Point;
pub use scalar::Scalar;

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

//! Logging and low-level utilities shared across the MWEB crypto crates.
//! Factors out the handful of cross-cutting concerns (logging setup,
//! locking, hex encoding) so the crypto-heavy crates can stay focused.

pub mod hex;
pub mod logger;

pub use parking_lot::{Mutex, RwLock};

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

//! MWEB key derivation: the BIP32 scan/spend key tree, stealth addresses,
//! blinding-factor bookkeeping, and the recovered `Coin` record.

pub mod bip32;
pub mod blind;
pub mod coin;
pub mod error;
pub mod keychain;
pub mod stealth;

pub use bip32::MwebKeyTree;
pub use blind::{BlindSum, BlindingFactor};
pub use coin::Coin;
pub use error::{Error, Result};
pub use keychain::{FullKeyChain, KeyChain, ViewKeyChain};
pub use stealth::StealthAddress;

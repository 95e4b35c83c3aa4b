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

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("key derivation seed is too short")]
	InvalidSeed,

	#[error("no spend key available for a view-only keychain")]
	NoSpendKey,

	#[error("requested address index has no stealth address")]
	UnknownIndex,

	#[error(transparent)]
	Secp(#[from] mweb_secp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

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

//! Transaction building and validation on top of `mweb_core`'s data model
//! and `mweb_keychain`'s stealth addressing (§4.8, §4.9): the only crate in
//! the workspace that depends on both.

pub mod build;
pub mod error;
pub mod validate;

pub use build::{
	build_transaction, select_inputs, AvailableCoin, BuildConfig, BuildRequest, OutputRequest,
	PegoutRequest,
};
pub use error::{BuildError, BuildResult, VerifyError, VerifyResult};
pub use validate::validate_transaction;

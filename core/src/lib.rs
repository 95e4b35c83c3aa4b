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

//! The MWEB data model, wire serialization and the outer Litecoin
//! transaction envelope.

pub mod error;
pub mod outer;
pub mod ser;
pub mod transaction;

pub use error::{Error, Result};
pub use outer::{read_outer_transaction, write_outer_transaction, LegacyTxBytes, OuterTransaction};
pub use ser::{deserialize, serialize, Readable, Reader, Writeable, Writer};
pub use transaction::{
	Committed, CommittedError, Input, InputFeatures, Kernel, KernelFeatures, Output,
	OutputFeatures, OutputMessage, Pegout, Transaction, TxBody,
};

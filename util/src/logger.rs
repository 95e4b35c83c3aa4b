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

//! Minimal logging setup shared by tests and downstream binaries.
//!
//! Grounded on `grin_util`'s logger module, trimmed down to what a library
//! crate actually needs: there is no daemon here to roll log files for, so
//! the `log4rs` file-appender machinery the teacher carries is dropped in
//! favor of a plain `env_logger` backend.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the global logger once per process, deferring to `RUST_LOG`
/// for level configuration. Safe to call repeatedly; only the first call
/// has any effect.
pub fn init() {
	INIT.call_once(|| {
		let _ = env_logger::builder().is_test(false).try_init();
	});
}

/// Like [`init`], but configured for test output (timestamps disabled,
/// written to the test harness's captured stdout).
pub fn init_test() {
	INIT.call_once(|| {
		let _ = env_logger::builder().is_test(true).try_init();
	});
}

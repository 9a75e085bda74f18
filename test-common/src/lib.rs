// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod callback;
mod security;
mod transport;

pub use callback::{CallbackRecord, RecordingCallback};
pub use security::TestSecurityProvider;
pub use transport::{ScriptedResponse, StatusCall, TestTransport, TransportLog};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

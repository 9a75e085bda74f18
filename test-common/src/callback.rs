// Copyright (c) Microsoft. All rights reserved.

use std::any::Any;
use std::sync::{Arc, Mutex};

use aziot_provisioning_client_async::{Error, RegistrationCallback, RegistrationResult};

pub type CallbackRecord = Arc<Mutex<Vec<(RegistrationResult, Option<Error>)>>>;

/// Registration callback that appends every invocation to a shared record.
#[derive(Default)]
pub struct RecordingCallback {
    outcomes: CallbackRecord,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn outcomes(&self) -> CallbackRecord {
        self.outcomes.clone()
    }
}

impl RegistrationCallback for RecordingCallback {
    fn run(
        &mut self,
        result: RegistrationResult,
        error: Option<Error>,
        _context: Option<&(dyn Any + Send)>,
    ) {
        self.outcomes
            .lock()
            .expect("callback record poisoned")
            .push((result, error));
    }
}

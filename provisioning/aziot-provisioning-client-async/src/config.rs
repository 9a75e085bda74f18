// Copyright (c) Microsoft. All rights reserved.

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::model::{LifecycleStatus, RegistrationResult};
use crate::security::SecurityProvider;

/// Receives the outcome of a provisioning run. Invoked exactly once per run,
/// whether the device was assigned, the service rejected it, or the run hit
/// an internal error.
pub trait RegistrationCallback: Send {
    fn run(
        &mut self,
        result: RegistrationResult,
        error: Option<Error>,
        context: Option<&(dyn Any + Send)>,
    );
}

impl<F> RegistrationCallback for F
where
    F: FnMut(RegistrationResult, Option<Error>, Option<&(dyn Any + Send)>) + Send,
{
    fn run(
        &mut self,
        result: RegistrationResult,
        error: Option<Error>,
        context: Option<&(dyn Any + Send)>,
    ) {
        (self)(result, error, context);
    }
}

/// Configuration for one provisioning task.
///
/// The security provider and registration callback are required; the task
/// constructor rejects a config without them. Everything else is optional.
#[derive(Default)]
pub struct ProvisioningClientConfig {
    pub security_provider: Option<Arc<dyn SecurityProvider>>,
    pub registration_callback: Option<Box<dyn RegistrationCallback>>,

    /// Opaque value handed back to the registration callback.
    pub registration_callback_context: Option<Box<dyn Any + Send>>,

    /// Custom payload forwarded to the service with the registration request.
    pub payload: Option<serde_json::Value>,

    /// Stable identifier for this client, used in the task log descriptor
    /// and as the connection id once the transport is open. Symmetric key
    /// enrollments leave this unset until registration executes.
    pub unique_identifier: Option<String>,

    /// Observer for coarse state transitions while the task runs.
    pub status_sink: Option<Box<dyn Fn(LifecycleStatus) + Send>>,
}

impl ProvisioningClientConfig {
    #[must_use]
    pub fn new(
        security_provider: Arc<dyn SecurityProvider>,
        registration_callback: Box<dyn RegistrationCallback>,
    ) -> Self {
        ProvisioningClientConfig {
            security_provider: Some(security_provider),
            registration_callback: Some(registration_callback),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);

        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Box<dyn Any + Send>) -> Self {
        self.registration_callback_context = Some(context);

        self
    }

    #[must_use]
    pub fn with_unique_identifier(mut self, unique_identifier: String) -> Self {
        self.unique_identifier = Some(unique_identifier);

        self
    }

    #[must_use]
    pub fn with_status_sink(mut self, sink: Box<dyn Fn(LifecycleStatus) + Send>) -> Self {
        self.status_sink = Some(sink);

        self
    }
}

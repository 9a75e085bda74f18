// Copyright (c) Microsoft. All rights reserved.

mod register;
mod status;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthorizationCtx;
use crate::config::{ProvisioningClientConfig, RegistrationCallback};
use crate::error::{Error, HubError};
use crate::model::{LifecycleStatus, ProvisioningStatus, RegistrationResult, RegistrationState};
use crate::security::SecurityProvider;
use crate::transport::{ProvisioningTransport, RequestData};

use register::RegisterStep;
use status::StatusStep;

const MAX_TIME_TO_WAIT_FOR_REGISTRATION: Duration = Duration::from_millis(1_000_000);
const MAX_TIME_TO_WAIT_FOR_STATUS_UPDATE: Duration = Duration::from_millis(10_000);

const TASK_LOG_NAME: &str = "azure-iot-sdk-ProvisioningTask";
const PENDING_CONNECTION_ID: &str = "PendingConnectionId";

/// Single-shot state machine that drives one device registration.
///
/// `run` opens the transport, registers, polls the operation until the
/// service reaches a terminal status, and reports the outcome through the
/// registration callback exactly once. Nothing survives past `run`; a fresh
/// task is needed for another attempt.
pub struct ProvisioningTask {
    security_provider: Arc<dyn SecurityProvider>,
    registration_callback: Box<dyn RegistrationCallback>,
    callback_context: Option<Box<dyn Any + Send>>,
    payload: Option<serde_json::Value>,
    unique_identifier: Option<String>,
    status_sink: Option<Box<dyn Fn(LifecycleStatus) + Send>>,
    transport: Box<dyn ProvisioningTransport>,
    authorization: AuthorizationCtx,
}

impl ProvisioningTask {
    pub fn new(
        mut config: ProvisioningClientConfig,
        transport: Box<dyn ProvisioningTransport>,
    ) -> Result<Self, Error> {
        let security_provider = config
            .security_provider
            .take()
            .ok_or(Error::InvalidArgument("security provider"))?;
        let registration_callback = config
            .registration_callback
            .take()
            .ok_or(Error::InvalidArgument("registration callback"))?;

        Ok(ProvisioningTask {
            security_provider,
            registration_callback,
            callback_context: config.registration_callback_context,
            payload: config.payload,
            unique_identifier: config.unique_identifier,
            status_sink: config.status_sink,
            transport,
            authorization: AuthorizationCtx::new(),
        })
    }

    /// Executes the full state machine once. The registration callback is
    /// invoked exactly once before this returns, and the transport is closed
    /// on every exit path.
    pub async fn run(mut self) {
        let outcome = self.execute().await;

        let (result, error) = match outcome {
            Ok(result) => (result, None),
            Err(err) => {
                let lifecycle_status = match &err {
                    Error::Hub(hub) => match hub.status {
                        ProvisioningStatus::Disabled => LifecycleStatus::Disabled,
                        _ => LifecycleStatus::Failed,
                    },
                    _ => LifecycleStatus::Error,
                };
                self.emit_status(lifecycle_status);
                (RegistrationResult::terminal(lifecycle_status), Some(err))
            }
        };

        self.registration_callback
            .run(result, error, self.callback_context.as_deref());

        if let Err(err) = self.transport.close().await {
            log::warn!("failed to close the provisioning transport: {}", err);
        }
    }

    async fn execute(&mut self) -> Result<RegistrationResult, Error> {
        self.emit_status(LifecycleStatus::Unauthenticated);

        // The task has no connection associated with it yet.
        log::info!(
            "[{}] opening the connection to the device provisioning service...",
            self.descriptor(PENDING_CONNECTION_ID)
        );

        let request = self.request_data()?;
        self.transport.open(&request).await?;

        // A symmetric key enrollment has no connection of its own until the
        // registration request goes out.
        let connection_id = self
            .unique_identifier
            .clone()
            .unwrap_or_else(|| PENDING_CONNECTION_ID.to_owned());
        log::info!(
            "[{}] connection opened, sending the initial device registration request",
            self.descriptor(&connection_id)
        );

        let register = RegisterStep::new(
            self.security_provider.as_ref(),
            self.payload.as_ref(),
            self.transport.as_mut(),
            &mut self.authorization,
        );
        let mut operation =
            match tokio::time::timeout(MAX_TIME_TO_WAIT_FOR_REGISTRATION, register.execute()).await
            {
                Ok(operation) => operation?,
                Err(_) => return Err(Error::Timeout("register")),
            };

        let mut status = operation.status.ok_or_else(|| {
            Error::authentication("service did not return a status for the registration request")
        })?;
        let mut operation_id = operation.operation_id.take().ok_or_else(|| {
            Error::authentication("operation id could not be retrieved")
        })?;

        self.emit_status(LifecycleStatus::Authenticated);
        log::info!("current provisioning status: {}", status);
        log::info!("waiting for the device provisioning service to provision this device...");

        loop {
            match status {
                ProvisioningStatus::Unassigned | ProvisioningStatus::Assigning => {
                    self.emit_status(LifecycleStatus::Assigning);
                    log::trace!(
                        "polling the device provisioning service for the registration status..."
                    );

                    // The transport dictates the poll cadence, including
                    // ahead of the very first status query.
                    let retry_interval = self.transport.retry_interval();
                    if !retry_interval.is_zero() {
                        tokio::time::sleep(retry_interval).await;
                    }

                    let step = StatusStep::new(
                        &operation_id,
                        self.transport.as_mut(),
                        &self.authorization,
                    );
                    operation = match tokio::time::timeout(
                        MAX_TIME_TO_WAIT_FOR_STATUS_UPDATE,
                        step.execute(),
                    )
                    .await
                    {
                        Ok(operation) => operation?,
                        Err(_) => return Err(Error::Timeout("status")),
                    };

                    status = operation.status.ok_or_else(|| {
                        Error::authentication(
                            "service did not return a status for the status request",
                        )
                    })?;
                    if let Some(id) = operation.operation_id.take() {
                        operation_id = id;
                    }
                    log::info!("current provisioning status: {}", status);
                }

                ProvisioningStatus::Assigned => {
                    return self
                        .complete_assignment(operation.registration_state.take())
                        .await;
                }

                ProvisioningStatus::Failed | ProvisioningStatus::Disabled => {
                    let (message, code) = operation
                        .registration_state
                        .take()
                        .map_or((None, None), |state| (state.error_message, state.error_code));
                    log::error!(
                        "the device provisioning service ended the registration with status {}: {}",
                        status,
                        message.as_deref().unwrap_or("no error message")
                    );
                    return Err(Error::Hub(HubError {
                        status,
                        message,
                        code,
                    }));
                }
            }
        }
    }

    async fn complete_assignment(
        &self,
        state: Option<RegistrationState>,
    ) -> Result<RegistrationResult, Error> {
        let state = state.ok_or_else(|| {
            Error::authentication("assigned registration is missing its registration state")
        })?;

        if state.assigned_hub.as_deref().map_or(true, str::is_empty)
            || state.device_id.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::authentication(
                "could not retrieve the assigned hub or device id from an assigned registration",
            ));
        }

        if let Some(tpm) = self.security_provider.as_tpm() {
            let authentication_key = state
                .tpm
                .as_ref()
                .map_or("", |key| key.authentication_key.as_str());
            if authentication_key.is_empty() {
                return Err(Error::authentication(
                    "could not retrieve the authentication key from an assigned registration",
                ));
            }

            let engine = base64::engine::general_purpose::STANDARD;
            let authentication_key = base64::Engine::decode(&engine, authentication_key)
                .map_err(|err| {
                    Error::authentication(format!("malformed tpm authentication key: {}", err))
                })?;

            tpm.activate_identity_key(&authentication_key).await?;
            log::info!("imported the service authentication key into the tpm");
        }

        self.emit_status(LifecycleStatus::Assigned);
        log::info!("the device provisioning service assigned the device successfully");

        Ok(RegistrationResult::assigned(state))
    }

    fn request_data(&self) -> Result<RequestData, Error> {
        Ok(RequestData {
            registration_id: self.security_provider.registration_id()?,
            ssl_context: self.security_provider.ssl_context()?,
            is_x509: self.security_provider.attestation() == crate::security::AttestationKind::X509,
            payload: self.payload.clone(),
        })
    }

    fn descriptor(&self, connection_id: &str) -> String {
        format!(
            "{}-{}-Cxn{}-{}",
            self.transport.host_name(),
            self.unique_identifier.as_deref().unwrap_or_default(),
            connection_id,
            TASK_LOG_NAME
        )
    }

    fn emit_status(&self, status: LifecycleStatus) {
        if let Some(sink) = &self.status_sink {
            sink(status);
        }
    }
}

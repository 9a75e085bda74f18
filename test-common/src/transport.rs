// Copyright (c) Microsoft. All rights reserved.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aziot_provisioning_client_async::{AuthorizationCtx, Error, ProvisioningTransport, RequestData};

/// Scripted reply for a single transport request.
pub enum ScriptedResponse {
    Body(Vec<u8>),
    Error(&'static str),
    Delayed(Duration, Vec<u8>),
}

/// One observed operation status query.
pub struct StatusCall {
    pub operation_id: String,
    pub sas_token: Option<String>,
    pub at: tokio::time::Instant,
}

/// Everything the transport observed, kept behind a shared handle so tests
/// can assert on it after the task has consumed the transport.
#[derive(Default)]
pub struct TransportLog {
    pub opens: usize,
    pub closes: usize,
    pub open_registration_ids: Vec<String>,
    pub open_is_x509: Vec<bool>,
    pub register_instants: Vec<tokio::time::Instant>,
    pub status_calls: Vec<StatusCall>,
}

/// In-memory transport that replays scripted register and status responses.
pub struct TestTransport {
    host_name: String,
    retry_interval: Duration,
    sas_token: Option<String>,
    open_failure: Option<&'static str>,
    register_response: Option<ScriptedResponse>,
    status_responses: VecDeque<ScriptedResponse>,
    log: Arc<Mutex<TransportLog>>,
}

impl TestTransport {
    pub fn new(host_name: &str) -> Self {
        TestTransport {
            host_name: host_name.to_owned(),
            retry_interval: Duration::from_secs(2),
            sas_token: None,
            open_failure: None,
            register_response: None,
            status_responses: VecDeque::new(),
            log: Arc::default(),
        }
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;

        self
    }

    /// Token the register exchange deposits into the authorization context,
    /// mimicking a SAS handshake.
    pub fn with_sas_token(mut self, sas_token: &str) -> Self {
        self.sas_token = Some(sas_token.to_owned());

        self
    }

    pub fn with_open_failure(mut self, message: &'static str) -> Self {
        self.open_failure = Some(message);

        self
    }

    pub fn with_register_response(mut self, response: ScriptedResponse) -> Self {
        self.register_response = Some(response);

        self
    }

    pub fn with_status_response(mut self, response: ScriptedResponse) -> Self {
        self.status_responses.push_back(response);

        self
    }

    pub fn log(&self) -> Arc<Mutex<TransportLog>> {
        self.log.clone()
    }
}

async fn resolve(response: Option<ScriptedResponse>, kind: &str) -> Result<Vec<u8>, Error> {
    match response {
        Some(ScriptedResponse::Body(body)) => Ok(body),
        Some(ScriptedResponse::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            Ok(body)
        }
        Some(ScriptedResponse::Error(message)) => Err(Error::transport(message)),
        None => Err(Error::transport(format!(
            "no scripted {} response left",
            kind
        ))),
    }
}

#[async_trait::async_trait]
impl ProvisioningTransport for TestTransport {
    async fn open(&mut self, request: &RequestData) -> Result<(), Error> {
        {
            let mut log = self.log.lock().expect("transport log poisoned");
            log.opens += 1;
            log.open_registration_ids
                .push(request.registration_id.clone());
            log.open_is_x509.push(request.is_x509);
        }

        match self.open_failure {
            Some(message) => Err(Error::transport(message)),
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), Error> {
        self.log.lock().expect("transport log poisoned").closes += 1;

        Ok(())
    }

    fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    fn host_name(&self) -> &str {
        &self.host_name
    }

    async fn register(
        &mut self,
        _request: &RequestData,
        authorization: &mut AuthorizationCtx,
    ) -> Result<Vec<u8>, Error> {
        if let Some(sas_token) = &self.sas_token {
            authorization.sas_token = Some(sas_token.clone());
        }

        self.log
            .lock()
            .expect("transport log poisoned")
            .register_instants
            .push(tokio::time::Instant::now());

        resolve(self.register_response.take(), "register").await
    }

    async fn operation_status(
        &mut self,
        operation_id: &str,
        authorization: &AuthorizationCtx,
    ) -> Result<Vec<u8>, Error> {
        self.log
            .lock()
            .expect("transport log poisoned")
            .status_calls
            .push(StatusCall {
                operation_id: operation_id.to_owned(),
                sas_token: authorization.sas_token.clone(),
                at: tokio::time::Instant::now(),
            });

        resolve(self.status_responses.pop_front(), "status").await
    }
}

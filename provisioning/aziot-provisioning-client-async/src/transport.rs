// Copyright (c) Microsoft. All rights reserved.

use crate::auth::AuthorizationCtx;
use crate::error::Error;

/// What a transport needs to establish a session and register the device.
pub struct RequestData {
    pub registration_id: String,
    pub ssl_context: openssl::ssl::SslConnector,
    pub is_x509: bool,
    pub payload: Option<serde_json::Value>,
}

/// Protocol contract the provisioning task drives. Implementations exist per
/// protocol (MQTT, AMQP, HTTP); the task is oblivious to which one it holds.
///
/// The task serializes all calls: `open`, then one `register`, then any
/// number of `operation_status` queries, then `close`. Responses are raw
/// bytes; the task parses them as registration envelopes.
#[async_trait::async_trait]
pub trait ProvisioningTransport: Send {
    /// Establishes the session. May block; a failure aborts the run.
    async fn open(&mut self, request: &RequestData) -> Result<(), Error>;

    /// Idempotent teardown. Must succeed on a transport that was never
    /// opened.
    async fn close(&mut self) -> Result<(), Error>;

    /// Service-suggested delay between status polls. Read by the task before
    /// every status attempt; the task never overrides it.
    fn retry_interval(&self) -> std::time::Duration;

    /// Host this transport is bound to, for the task log descriptor.
    fn host_name(&self) -> &str;

    /// Sends the registration request. Any SAS token or derived key material
    /// the exchange produces is deposited into `authorization` for the
    /// status queries to reuse.
    async fn register(
        &mut self,
        request: &RequestData,
        authorization: &mut AuthorizationCtx,
    ) -> Result<Vec<u8>, Error>;

    /// Queries the state of a pending registration operation.
    async fn operation_status(
        &mut self,
        operation_id: &str,
        authorization: &AuthorizationCtx,
    ) -> Result<Vec<u8>, Error>;
}

// Copyright (c) Microsoft. All rights reserved.

use crate::auth::AuthorizationCtx;
use crate::error::Error;
use crate::model::RegistrationOperationStatus;
use crate::security::{AttestationKind, SecurityProvider};
use crate::transport::{ProvisioningTransport, RequestData};

/// One-shot registration request.
///
/// Builds the request from the security provider, hands the authorization
/// context to the transport so the exchange can deposit whatever SAS token
/// or derived material the follow-up status queries will authenticate with,
/// and parses the reply. Retrying is the driver's decision, never this
/// step's.
pub(super) struct RegisterStep<'a> {
    security_provider: &'a dyn SecurityProvider,
    payload: Option<&'a serde_json::Value>,
    transport: &'a mut dyn ProvisioningTransport,
    authorization: &'a mut AuthorizationCtx,
}

impl<'a> RegisterStep<'a> {
    pub(super) fn new(
        security_provider: &'a dyn SecurityProvider,
        payload: Option<&'a serde_json::Value>,
        transport: &'a mut dyn ProvisioningTransport,
        authorization: &'a mut AuthorizationCtx,
    ) -> Self {
        RegisterStep {
            security_provider,
            payload,
            transport,
            authorization,
        }
    }

    pub(super) async fn execute(self) -> Result<RegistrationOperationStatus, Error> {
        let request = RequestData {
            registration_id: self.security_provider.registration_id()?,
            ssl_context: self.security_provider.ssl_context()?,
            is_x509: self.security_provider.attestation() == AttestationKind::X509,
            payload: self.payload.cloned(),
        };

        log::trace!("sending the device registration request...");
        let body = self.transport.register(&request, self.authorization).await?;

        let operation = serde_json::from_slice(&body)
            .map_err(|err| Error::authentication(format!("malformed registration response: {}", err)))?;

        Ok(operation)
    }
}

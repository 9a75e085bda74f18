// Copyright (c) Microsoft. All rights reserved.

use crate::auth::AuthorizationCtx;
use crate::error::Error;
use crate::model::RegistrationOperationStatus;
use crate::transport::ProvisioningTransport;

/// One-shot query for the state of a pending registration operation,
/// authenticated with whatever the register exchange left in the
/// authorization context. No retry of its own.
pub(super) struct StatusStep<'a> {
    operation_id: &'a str,
    transport: &'a mut dyn ProvisioningTransport,
    authorization: &'a AuthorizationCtx,
}

impl<'a> StatusStep<'a> {
    pub(super) fn new(
        operation_id: &'a str,
        transport: &'a mut dyn ProvisioningTransport,
        authorization: &'a AuthorizationCtx,
    ) -> Self {
        StatusStep {
            operation_id,
            transport,
            authorization,
        }
    }

    pub(super) async fn execute(self) -> Result<RegistrationOperationStatus, Error> {
        let body = self
            .transport
            .operation_status(self.operation_id, self.authorization)
            .await?;

        let operation = serde_json::from_slice(&body)
            .map_err(|err| Error::authentication(format!("malformed status response: {}", err)))?;

        Ok(operation)
    }
}

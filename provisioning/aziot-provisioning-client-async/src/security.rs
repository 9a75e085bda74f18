// Copyright (c) Microsoft. All rights reserved.

use crate::error::Error;

/// How a security provider attests the device to the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttestationKind {
    SymmetricKey,
    Tpm,
    X509,
}

/// Source of the device identity and TLS material used for registration.
///
/// The provider's primitives (key storage, TPM operations, certificate
/// chains) live outside this crate; the task only consumes this interface.
pub trait SecurityProvider: Send + Sync {
    fn registration_id(&self) -> Result<String, Error>;

    fn ssl_context(&self) -> Result<openssl::ssl::SslConnector, Error>;

    fn attestation(&self) -> AttestationKind;

    /// The TPM extension of this provider, if it has one. TPM providers
    /// return themselves so the task can hand over the service-issued
    /// authentication key once the device is assigned.
    fn as_tpm(&self) -> Option<&dyn TpmSecurityProvider> {
        None
    }
}

#[async_trait::async_trait]
pub trait TpmSecurityProvider: SecurityProvider {
    /// Imports the decoded authentication key delivered by the service on an
    /// assigned registration. Called exactly once per successful run.
    async fn activate_identity_key(&self, key: &[u8]) -> Result<(), Error>;
}

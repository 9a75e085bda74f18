// Copyright (c) Microsoft. All rights reserved.

use std::sync::{Arc, Mutex};

use aziot_provisioning_client_async::{
    AttestationKind, Error, SecurityProvider, TpmSecurityProvider,
};

/// Security provider double covering all three attestation kinds. The TPM
/// variant records every activated key so tests can assert on the exact
/// bytes and on call ordering.
pub struct TestSecurityProvider {
    registration_id: String,
    attestation: AttestationKind,
    activation_failure: Option<&'static str>,
    activations: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl TestSecurityProvider {
    pub fn new(registration_id: &str, attestation: AttestationKind) -> Self {
        TestSecurityProvider {
            registration_id: registration_id.to_owned(),
            attestation,
            activation_failure: None,
            activations: Arc::default(),
        }
    }

    pub fn with_activation_failure(mut self, message: &'static str) -> Self {
        self.activation_failure = Some(message);

        self
    }

    pub fn activations(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        self.activations.clone()
    }
}

impl SecurityProvider for TestSecurityProvider {
    fn registration_id(&self) -> Result<String, Error> {
        Ok(self.registration_id.clone())
    }

    fn ssl_context(&self) -> Result<openssl::ssl::SslConnector, Error> {
        let builder = openssl::ssl::SslConnector::builder(openssl::ssl::SslMethod::tls())
            .map_err(Error::security_provider)?;

        Ok(builder.build())
    }

    fn attestation(&self) -> AttestationKind {
        self.attestation
    }

    fn as_tpm(&self) -> Option<&dyn TpmSecurityProvider> {
        if self.attestation == AttestationKind::Tpm {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait::async_trait]
impl TpmSecurityProvider for TestSecurityProvider {
    async fn activate_identity_key(&self, key: &[u8]) -> Result<(), Error> {
        if let Some(message) = self.activation_failure {
            return Err(Error::security_provider(message));
        }

        self.activations
            .lock()
            .expect("activation log poisoned")
            .push(key.to_vec());

        Ok(())
    }
}

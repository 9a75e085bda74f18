// Copyright (c) Microsoft. All rights reserved.

use std::borrow::Cow;

use crate::model::ProvisioningStatus;

#[derive(Debug)]
pub enum Error {
    /// A required constructor argument was not provided. The only error that
    /// is raised synchronously instead of through the registration callback.
    InvalidArgument(&'static str),

    /// The service reply could not be retrieved or understood: missing or
    /// unparseable response, missing operation id or status, an assigned
    /// registration without a hub or device id, or a bad TPM key.
    Authentication(Cow<'static, str>),

    /// The service ended the registration with a terminal failure.
    Hub(HubError),

    /// Surfaced from the provisioning transport.
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Surfaced from the security provider.
    SecurityProvider(Box<dyn std::error::Error + Send + Sync>),

    /// The named step exceeded its deadline.
    Timeout(&'static str),
}

impl Error {
    pub(crate) fn authentication<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Error::Authentication(message.into())
    }

    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    pub fn security_provider<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::SecurityProvider(err.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(name) => {
                write!(f, "required parameter {:?} was not provided", name)
            }
            Error::Authentication(message) => write!(f, "{}, authentication failure", message),
            Error::Hub(_) => f.write_str("device provisioning service rejected the registration"),
            Error::Transport(_) => f.write_str("provisioning transport error"),
            Error::SecurityProvider(_) => f.write_str("security provider error"),
            Error::Timeout(step) => write!(f, "{} request timed out", step),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidArgument(_) | Error::Authentication(_) | Error::Timeout(_) => None,
            Error::Hub(err) => Some(err),
            Error::Transport(err) | Error::SecurityProvider(err) => Some(&**err),
        }
    }
}

/// Terminal failure reported by the service, carrying whatever error message
/// and error code the registration state held.
#[derive(Debug)]
pub struct HubError {
    pub status: ProvisioningStatus,
    pub message: Option<String>,
    pub code: Option<i32>,
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.as_deref().unwrap_or("no error message");
        match self.code {
            Some(code) => write!(
                f,
                "registration ended with status {}: {} (error code {})",
                self.status, message, code
            ),
            None => write!(
                f,
                "registration ended with status {}: {}",
                self.status, message
            ),
        }
    }
}

impl std::error::Error for HubError {}

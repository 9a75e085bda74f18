// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::default_trait_access,
    clippy::let_and_return,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod security;
pub mod task;
pub mod transport;

pub use auth::AuthorizationCtx;
pub use config::{ProvisioningClientConfig, RegistrationCallback};
pub use error::{Error, HubError};
pub use model::{
    LifecycleStatus, ProvisioningStatus, RegistrationOperationStatus, RegistrationResult,
    RegistrationState, Substatus, TpmAuthKey,
};
pub use security::{AttestationKind, SecurityProvider, TpmSecurityProvider};
pub use task::ProvisioningTask;
pub use transport::{ProvisioningTransport, RequestData};

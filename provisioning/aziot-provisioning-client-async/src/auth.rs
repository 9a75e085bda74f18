// Copyright (c) Microsoft. All rights reserved.

/// Credentials produced while registering and reused by the status polls.
///
/// The register request may hand back a SAS token or derived key material
/// that the follow-up operation status queries must authenticate with. The
/// driver owns one of these per run and threads it through both steps, one
/// step at a time, so there is never concurrent access.
#[derive(Debug, Default)]
pub struct AuthorizationCtx {
    pub sas_token: Option<String>,
    pub key_material: Option<Vec<u8>>,
}

impl AuthorizationCtx {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }
}

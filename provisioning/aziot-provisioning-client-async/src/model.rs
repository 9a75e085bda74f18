// Copyright (c) Microsoft. All rights reserved.

use crate::error::Error;

/// Enrollment status reported by the service. The wire value is a lowercase
/// string; anything else is a parse error, never a default.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    Unassigned,
    Assigning,
    Assigned,
    Failed,
    Disabled,
}

impl ProvisioningStatus {
    /// Whether this status ends the poll loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            ProvisioningStatus::Unassigned | ProvisioningStatus::Assigning
        )
    }
}

impl std::fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProvisioningStatus::Unassigned => "unassigned",
            ProvisioningStatus::Assigning => "assigning",
            ProvisioningStatus::Assigned => "assigned",
            ProvisioningStatus::Failed => "failed",
            ProvisioningStatus::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ProvisioningStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "unassigned" => Ok(ProvisioningStatus::Unassigned),
            "assigning" => Ok(ProvisioningStatus::Assigning),
            "assigned" => Ok(ProvisioningStatus::Assigned),
            "failed" => Ok(ProvisioningStatus::Failed),
            "disabled" => Ok(ProvisioningStatus::Disabled),
            _ => Err(Error::authentication(format!(
                "invalid provisioning status {:?}",
                s
            ))),
        }
    }
}

/// Coarse client state surfaced to the embedder through the status sink and
/// the registration result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleStatus {
    Unauthenticated,
    Authenticated,
    Assigning,
    Assigned,
    Failed,
    Disabled,
    Error,
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleStatus::Unauthenticated => "unauthenticated",
            LifecycleStatus::Authenticated => "authenticated",
            LifecycleStatus::Assigning => "assigning",
            LifecycleStatus::Assigned => "assigned",
            LifecycleStatus::Failed => "failed",
            LifecycleStatus::Disabled => "disabled",
            LifecycleStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Substatus for assigned devices. Possible values include -
/// 'initialAssignment':  Device has been assigned to an IoT hub for the first time,
/// 'deviceDataMigrated': Device has been assigned to a different IoT hub and its
///                       device data was migrated from the previously assigned IoT hub,
/// 'deviceDataReset':    Device has been assigned to a different IoT hub and its device
///                       data was populated from the initial state stored in the enrollment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Substatus {
    InitialAssignment,
    DeviceDataMigrated,
    DeviceDataReset,
}

/// TPM section of an assigned registration state.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TpmAuthKey {
    /// Base64-encoded authentication key to import into the TPM.
    pub authentication_key: String,
}

/// Device registration status nested inside a service reply.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationState {
    /// The registration ID is alphanumeric, lowercase, and may contain hyphens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,

    /// Assigned Azure IoT Hub.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_hub: Option<String>,

    /// Device ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Custom payload returned by the enrollment, passed through opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub substatus: Option<Substatus>,

    /// Registration create date time (in UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time_utc: Option<String>,

    /// Last updated date time (in UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_date_time_utc: Option<String>,

    /// The entity tag associated with the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Error message, present on failed and disabled registrations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Error code, present on failed and disabled registrations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tpm: Option<TpmAuthKey>,
}

/// Parsed service reply for both the register and the operation status
/// requests. The operation id is required after register and validated by
/// the driver; status replies may omit it.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOperationStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProvisioningStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_state: Option<RegistrationState>,
}

/// What the registration callback receives. For non-assigned terminals the
/// hub, device id, and payload are absent and `lifecycle_status` encodes the
/// reason.
#[derive(Clone, Debug)]
pub struct RegistrationResult {
    pub assigned_hub: Option<String>,
    pub device_id: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub lifecycle_status: LifecycleStatus,

    pub registration_id: Option<String>,
    pub substatus: Option<Substatus>,
    pub created_date_time_utc: Option<String>,
    pub last_updated_date_time_utc: Option<String>,
    pub etag: Option<String>,
}

impl RegistrationResult {
    pub(crate) fn assigned(state: RegistrationState) -> Self {
        RegistrationResult {
            assigned_hub: state.assigned_hub,
            device_id: state.device_id,
            payload: state.payload,
            lifecycle_status: LifecycleStatus::Assigned,
            registration_id: state.registration_id,
            substatus: state.substatus,
            created_date_time_utc: state.created_date_time_utc,
            last_updated_date_time_utc: state.last_updated_date_time_utc,
            etag: state.etag,
        }
    }

    pub(crate) fn terminal(lifecycle_status: LifecycleStatus) -> Self {
        RegistrationResult {
            assigned_hub: None,
            device_id: None,
            payload: None,
            lifecycle_status,
            registration_id: None,
            substatus: None,
            created_date_time_utc: None,
            last_updated_date_time_utc: None,
            etag: None,
        }
    }
}

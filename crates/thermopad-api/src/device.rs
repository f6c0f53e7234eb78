//! Typed per-device operations
//!
//! [`DeviceClient`] binds an [`ApiClient`] to one device identifier and
//! exposes the operations the rest of the system needs: status fetch,
//! setpoint and power control, and the claimed-device listing. It also
//! implements the [`DeviceApi`] port so the refresh coordinator can be
//! tested against a fake.
//!
//! Control writes verify the echoed payload: the API responds with the
//! updated control fields, and a mismatch is logged as a warning (the
//! device may apply the change asynchronously).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use thermopad_core::domain::{Celsius, ClaimedDevice, ControlState, DeviceId, DeviceStatus, PowerState};
use thermopad_core::ports::DeviceApi;

use crate::client::{ApiClient, ApiRequest};
use crate::ApiError;

/// Attempt budget for read operations; a transient failure falls back to
/// cached data immediately rather than blocking the poll loop
const READ_ATTEMPTS: usize = 1;

/// Attempt budget for control writes
const CONTROL_ATTEMPTS: usize = 2;

/// Typed client for a single claimed device
#[derive(Clone)]
pub struct DeviceClient {
    api: Arc<ApiClient>,
    device_id: DeviceId,
}

impl DeviceClient {
    /// Binds `api` to the device with the given identifier
    pub fn new(api: Arc<ApiClient>, device_id: DeviceId) -> Self {
        debug!(device_id = %device_id, base_url = api.base_url(), "Initialized device client");
        Self { api, device_id }
    }

    /// The bound device identifier
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// The underlying API client
    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Fetches the status document for the bound device
    ///
    /// A fail-soft empty payload deserializes into an empty
    /// [`DeviceStatus`]; callers check [`DeviceStatus::is_empty`] and keep
    /// their cached state.
    pub async fn device_status(&self) -> Result<DeviceStatus, ApiError> {
        let request = ApiRequest::new(Method::GET, self.device_path()).max_attempts(READ_ATTEMPTS);
        let value = self.api.execute(&request).await?;

        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Sets the temperature setpoint, returning the echoed control payload
    pub async fn set_temperature(&self, target: Celsius) -> Result<ControlState, ApiError> {
        debug!(device_id = %self.device_id, %target, "Setting temperature");

        let request = ApiRequest::new(Method::PATCH, self.device_path())
            .body(json!({ "set_temperature_c": target.value() }))
            .max_attempts(CONTROL_ATTEMPTS);
        let echo = self.control_write(&request).await?;

        match echo.set_temperature_c {
            Some(t) if t == target.value() => {
                info!(device_id = %self.device_id, %target, "Temperature setpoint confirmed");
            }
            Some(t) => {
                warn!(
                    device_id = %self.device_id,
                    requested = target.value(),
                    echoed = t,
                    "Temperature may not have been applied"
                );
            }
            None => {
                warn!(
                    device_id = %self.device_id,
                    %target,
                    "Empty response while setting temperature"
                );
            }
        }

        Ok(echo)
    }

    /// Switches thermal control between active and standby
    pub async fn set_power(&self, state: PowerState) -> Result<ControlState, ApiError> {
        debug!(device_id = %self.device_id, %state, "Setting power state");

        let request = ApiRequest::new(Method::PATCH, self.device_path())
            .body(json!({ "thermal_control_status": state.as_str() }))
            .max_attempts(CONTROL_ATTEMPTS);
        let echo = self.control_write(&request).await?;

        match echo.thermal_control_status {
            Some(s) if s == state => {
                info!(device_id = %self.device_id, %state, "Power state confirmed");
            }
            Some(s) => {
                warn!(
                    device_id = %self.device_id,
                    requested = %state,
                    echoed = %s,
                    "Power state may not have been applied"
                );
            }
            None => {
                warn!(
                    device_id = %self.device_id,
                    %state,
                    "Empty response while setting power state"
                );
            }
        }

        Ok(echo)
    }

    /// Lists all devices claimed by the configured token
    pub async fn list_claimed_devices(&self) -> Result<Vec<ClaimedDevice>, ApiError> {
        self.api.list_claimed_devices().await
    }

    fn device_path(&self) -> String {
        format!("devices/{}", self.device_id)
    }

    /// Issues a control PATCH and parses the (possibly empty) echo
    async fn control_write(&self, request: &ApiRequest) -> Result<ControlState, ApiError> {
        let value = self.api.execute(request).await?;

        match value {
            Value::Object(ref map) if map.is_empty() => Ok(ControlState::default()),
            value => {
                serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl DeviceApi for DeviceClient {
    async fn device_status(&self) -> anyhow::Result<DeviceStatus> {
        Ok(DeviceClient::device_status(self).await?)
    }

    async fn set_temperature(&self, target: Celsius) -> anyhow::Result<ControlState> {
        Ok(DeviceClient::set_temperature(self, target).await?)
    }

    async fn set_power(&self, state: PowerState) -> anyhow::Result<ControlState> {
        Ok(DeviceClient::set_power(self, state).await?)
    }

    async fn list_claimed_devices(&self) -> anyhow::Result<Vec<ClaimedDevice>> {
        Ok(DeviceClient::list_claimed_devices(self).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DeviceClient {
        let api = Arc::new(ApiClient::new("http://localhost:8080", "tok").unwrap());
        DeviceClient::new(api, DeviceId::new("dev-1").unwrap())
    }

    #[test]
    fn test_device_path_embeds_id() {
        assert_eq!(client().device_path(), "devices/dev-1");
    }

    #[test]
    fn test_clone_shares_api_client() {
        let client = client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.api(), clone.api()));
    }
}

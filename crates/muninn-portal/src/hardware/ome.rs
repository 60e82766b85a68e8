/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Aggregated hardware inventory sync through an OpenManage-style service.
//!
//! Fetches the device list in one call, matches each device to a stored
//! host (by management IP first, then by case-insensitive hostname) and
//! updates hardware metadata only: service tag, model and health. Capacity
//! fields owned by the primary reconciliation path are never touched.
//! A second call pulls the active alert list and raises alerts per host.

use muninn_models::models::alerts::{NewAlert, SEVERITY_CRITICAL, SEVERITY_WARNING, SOURCE_OPENMANAGE};
use muninn_models::models::audit_logs::{ACTION_OME_SYNC_FAILED, ACTION_OME_SYNC_SUCCESS};
use muninn_models::models::physical_hosts::PhysicalHost;
use muninn_models::models::NewAuditLog;
use muninn_utils::logging::prelude::*;
use muninn_utils::Settings;
use serde::Deserialize;

use crate::dal::DAL;
use crate::utils::encryption;

const AUDIT_TARGET: &str = "OpenManage";

#[derive(Deserialize)]
struct OmeList<T> {
    #[serde(default)]
    value: Vec<T>,
}

#[derive(Deserialize, Default)]
struct OmeDevice {
    #[serde(rename = "DeviceName", default)]
    device_name: Option<String>,
    #[serde(rename = "DeviceServiceTag", default)]
    service_tag: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<serde_json::Value>,
    #[serde(rename = "DeviceManagement", default)]
    management: Vec<OmeManagement>,
}

#[derive(Deserialize, Default)]
struct OmeManagement {
    #[serde(rename = "NetworkAddress", default)]
    network_address: Option<String>,
}

#[derive(Deserialize, Default)]
struct OmeAlert {
    #[serde(rename = "MachineAddress", default)]
    machine_address: Option<String>,
    #[serde(rename = "MessageId", default)]
    message_id: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "SeverityType", default)]
    severity_type: Option<serde_json::Value>,
}

/// Maps the aggregator's numeric status codes onto the stored health
/// strings: 1000 is healthy, 3000 critical, everything else degraded.
pub fn ome_health(status: &str) -> &'static str {
    if status.contains("1000") {
        "OK"
    } else if status.contains("3000") {
        "Critical"
    } else {
        "Warning"
    }
}

/// Matches a reported device to a stored host: management IP wins, with a
/// case-insensitive hostname match as fallback.
pub fn match_device_to_host<'a>(
    hosts: &'a [PhysicalHost],
    mgmt_ip: Option<&str>,
    device_name: Option<&str>,
) -> Option<&'a PhysicalHost> {
    if let Some(ip) = mgmt_ip {
        if let Some(host) = hosts.iter().find(|h| h.idrac_ip.as_deref() == Some(ip)) {
            return Some(host);
        }
    }
    device_name.and_then(|name| {
        hosts
            .iter()
            .find(|h| h.hostname.eq_ignore_ascii_case(name))
    })
}

/// Runs one aggregated hardware inventory sync. Skips silently when no OME
/// endpoint is configured.
pub async fn run_hardware_inventory_sync(dal: &DAL, settings: &Settings) {
    let portal = match dal.portal_settings().get_or_create() {
        Ok(portal) => portal,
        Err(e) => {
            error!("Failed to load portal settings: {:?}", e);
            return;
        }
    };

    if !portal.ome_configured() {
        info!("OME sync skipped: no URL/username configured.");
        return;
    }

    let base_url = portal
        .ome_url
        .as_deref()
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string();
    let username = portal.ome_username.clone().unwrap_or_default();
    let password = portal
        .ome_password_encrypted
        .as_deref()
        .map(encryption::decrypt_string)
        .transpose()
        .unwrap_or_else(|e| {
            warn!("Failed to decrypt OME password: {}", e);
            None
        })
        .unwrap_or_default();

    info!("Connecting to OME: {}", base_url);

    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            settings.hardware.request_timeout_seconds,
        ))
        .danger_accept_invalid_certs(!settings.hardware.verify_tls)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create OME HTTP client: {}", e);
            return;
        }
    };

    if let Err(e) = sync_from_ome(dal, &client, &base_url, &username, &password).await {
        warn!("OpenManage sync failed: {}", e);
        if let Ok(entry) = NewAuditLog::new(ACTION_OME_SYNC_FAILED, AUDIT_TARGET) {
            let _ = dal.audit_logs().create(&entry.with_details(e));
        }
    }
}

async fn sync_from_ome(
    dal: &DAL,
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<(), String> {
    let hosts = dal.physical_hosts().list().map_err(|e| e.to_string())?;

    // Device inventory
    let resp = client
        .get(format!("{}/api/DeviceService/Devices", base_url))
        .basic_auth(username, Some(password))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.status().is_success() {
        return Err(format!("device list returned HTTP {}", resp.status()));
    }

    let devices: OmeList<OmeDevice> = resp.json().await.map_err(|e| e.to_string())?;
    let mut synced_count = 0usize;

    for device in &devices.value {
        let mgmt_ip = device
            .management
            .first()
            .and_then(|m| m.network_address.as_deref());

        let Some(host) = match_device_to_host(&hosts, mgmt_ip, device.device_name.as_deref())
        else {
            continue;
        };

        let status = device
            .status
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let result = dal.physical_hosts().update_hardware_info(
            host.id,
            device.service_tag.as_deref().unwrap_or_default(),
            device.model.as_deref().unwrap_or_default(),
            ome_health(&status),
        );
        match result {
            Ok(_) => synced_count += 1,
            Err(e) => error!("[{}] Failed to update hardware info: {:?}", host.hostname, e),
        }
    }

    info!("OME sync: updated {} hosts.", synced_count);
    let entry = NewAuditLog::new(ACTION_OME_SYNC_SUCCESS, AUDIT_TARGET)
        .map_err(|e| e.to_string())?
        .with_details(format!("Updated {} hosts from OME.", synced_count));
    dal.audit_logs().create(&entry).map_err(|e| e.to_string())?;

    // Active alerts
    let resp = client
        .get(format!(
            "{}/api/AlertService/Alerts?$filter=SeverityType ne 'Normal'",
            base_url
        ))
        .basic_auth(username, Some(password))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.status().is_success() {
        return Err(format!("alert list returned HTTP {}", resp.status()));
    }

    let alerts: OmeList<OmeAlert> = resp.json().await.map_err(|e| e.to_string())?;
    for alert in &alerts.value {
        let host = alert
            .machine_address
            .as_deref()
            .and_then(|ip| hosts.iter().find(|h| h.idrac_ip.as_deref() == Some(ip)));
        let Some(host) = host else { continue };

        let severity_type = alert
            .severity_type
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let severity = if severity_type.contains("Critical") {
            SEVERITY_CRITICAL
        } else {
            SEVERITY_WARNING
        };

        let new_alert = NewAlert::for_host(
            SOURCE_OPENMANAGE,
            host.id,
            alert.message_id.as_deref().unwrap_or("OME Alert"),
            alert.message.as_deref().unwrap_or("Hardware Alert"),
            severity,
        )
        .map_err(|e| e.to_string())?;

        if let Err(e) = dal.alerts().create_or_get(&new_alert) {
            error!("[{}] Failed to raise OME alert: {:?}", host.hostname, e);
        }
    }

    Ok(())
}

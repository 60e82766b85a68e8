/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Direct Redfish health polling against BMC endpoints.
//!
//! For every host with a known BMC address: open a session, query system
//! health, raise an alert on Warning/Critical. One host's unreachable BMC
//! must not stop the poll of the remaining hosts, so every per-host failure
//! is swallowed and logged.

use muninn_models::models::alerts::{NewAlert, SOURCE_REDFISH};
use muninn_models::models::audit_logs::ACTION_HARDWARE_ISSUE_DETECTED;
use muninn_models::models::physical_hosts::PhysicalHost;
use muninn_models::models::NewAuditLog;
use muninn_utils::logging::prelude::*;
use muninn_utils::Settings;
use serde_json::{json, Value};

use super::{map_health, HealthState};
use crate::dal::DAL;

/// Polls every host with a known BMC address once.
pub async fn run_hardware_health_poll(dal: &DAL, settings: &Settings) {
    let hosts = match dal.physical_hosts().list_with_bmc() {
        Ok(hosts) => hosts,
        Err(e) => {
            error!("Failed to list hosts for hardware poll: {:?}", e);
            return;
        }
    };

    info!("Starting Redfish hardware poll for {} hosts.", hosts.len());

    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            settings.hardware.request_timeout_seconds,
        ))
        .danger_accept_invalid_certs(!settings.hardware.verify_tls)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Redfish HTTP client: {}", e);
            return;
        }
    };

    for host in hosts {
        if let Err(e) = poll_host(dal, &client, settings, &host).await {
            debug!("[{}] Redfish poll failed: {}", host.hostname, e);
        }
    }
}

async fn poll_host(
    dal: &DAL,
    client: &reqwest::Client,
    settings: &Settings,
    host: &PhysicalHost,
) -> Result<(), String> {
    let idrac_ip = host.idrac_ip.as_deref().unwrap_or_default();
    let base = format!("https://{}", idrac_ip);

    // Session login; the token authenticates the health query and the
    // Location header identifies the session for cleanup.
    let login = client
        .post(format!("{}/redfish/v1/SessionService/Sessions", base))
        .json(&json!({
            "UserName": settings.hardware.idrac_username,
            "Password": settings.hardware.idrac_password,
        }))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !login.status().is_success() {
        return Err(format!("session login returned {}", login.status()));
    }

    let token = login
        .headers()
        .get("X-Auth-Token")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .ok_or("session response missing X-Auth-Token")?;
    let session_uri = login
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let result = query_health(client, &base, &token).await;

    // Logout is best-effort; a dangling session must not fail the poll.
    if let Some(uri) = session_uri {
        let url = if uri.starts_with("http") {
            uri
        } else {
            format!("{}{}", base, uri)
        };
        let _ = client
            .delete(url)
            .header("X-Auth-Token", &token)
            .send()
            .await;
    }

    let health = result?;
    if let Some(severity) = health.alert_severity() {
        info!("[{}] Health issue: {}", host.hostname, health.as_str());

        let alert = NewAlert::for_host(
            SOURCE_REDFISH,
            host.id,
            &format!("System Health: {}", health.as_str()),
            &format!("Global system status reported as {}", health.as_str()),
            severity,
        )
        .map_err(|e| e.to_string())?;
        dal.alerts().create_or_get(&alert).map_err(|e| e.to_string())?;

        let entry = NewAuditLog::new(ACTION_HARDWARE_ISSUE_DETECTED, &host.hostname)
            .map_err(|e| e.to_string())?
            .with_details(format!("Redfish reported health: {}", health.as_str()));
        dal.audit_logs().create(&entry).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Queries system health, trying the Dell-specific system path first and
/// falling back to the generic one.
async fn query_health(
    client: &reqwest::Client,
    base: &str,
    token: &str,
) -> Result<HealthState, String> {
    for path in [
        "/redfish/v1/Systems/System.Embedded.1",
        "/redfish/v1/Systems/1",
    ] {
        let resp = client
            .get(format!("{}{}", base, path))
            .header("X-Auth-Token", token)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if resp.status().is_success() {
            let body: Value = resp.json().await.map_err(|e| e.to_string())?;
            let health = body["Status"]["Health"].as_str().unwrap_or("Unknown");
            return Ok(map_health(health));
        }
    }

    Err("no system resource answered".to_string())
}

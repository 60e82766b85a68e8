/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Cost accounting engine.
//!
//! A pure, side-effect-free formula layer over already-persisted inventory:
//!
//! 1. Host power cost = (Watts/1000) * 24h * 30d * cost-per-kWh * PUE
//! 2. Host total cost = amortization + power cost
//! 3. Cost per vCPU = host total / host CPU count (0 when CPU count is 0)
//! 4. Instance cost = cost per vCPU * instance vCPUs (flavor lookup,
//!    defaulting to 1 vCPU when the flavor is unknown)
//!
//! Monetary outputs are rounded to 2 decimal places only at the point of
//! externalization; intermediate accumulation keeps full precision so
//! rounding error cannot compound across many instances.

use std::collections::HashMap;

use muninn_models::models::cost_profiles::CostProfile;
use muninn_models::models::instances::Instance;
use muninn_models::models::physical_hosts::PhysicalHost;
use muninn_models::models::portal_settings::PortalSettings;
use uuid::Uuid;

use crate::dal::DAL;

/// Everything the pure cost functions need from storage: the settings
/// singleton, cost profiles by id, and the (cluster, flavor name) -> vCPUs
/// index.
pub struct CostContext {
    pub settings: PortalSettings,
    pub profiles: HashMap<Uuid, CostProfile>,
    pub flavor_vcpus: HashMap<(Uuid, String), i32>,
}

impl CostContext {
    /// Assembles a context from the inventory store.
    pub fn load(dal: &DAL) -> Result<Self, diesel::result::Error> {
        let settings = dal.portal_settings().get_or_create()?;
        let profiles = dal
            .cost_profiles()
            .list()?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let flavor_vcpus = dal.flavors().vcpu_index()?;

        Ok(CostContext {
            settings,
            profiles,
            flavor_vcpus,
        })
    }

    fn profile_for(&self, host: &PhysicalHost) -> Option<&CostProfile> {
        host.cost_profile_id.and_then(|id| self.profiles.get(&id))
    }

    /// Resolves an instance's vCPU count from its denormalized flavor name
    /// within the host's cluster; unknown flavors count as 1 vCPU.
    fn vcpus_for(&self, instance: &Instance, cluster_id: Uuid) -> i32 {
        self.flavor_vcpus
            .get(&(cluster_id, instance.flavor_name.clone()))
            .copied()
            .unwrap_or(1)
    }
}

/// Monthly cost breakdown for one physical host, rounded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct HostCostBreakdown {
    pub power_cost: f64,
    pub amortization: f64,
    pub total_cost: f64,
}

/// Per-project cost aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCost {
    pub project_id: String,
    pub instance_count: usize,
    pub vcpus: i32,
    pub total_cost: f64,
}

/// The full project cost report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCostReport {
    /// Projects sorted descending by total cost.
    pub projects: Vec<ProjectCost>,
    pub total_monthly: f64,
    pub projected_yearly: f64,
}

/// Cost aggregate for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCostSummary {
    pub total_monthly: f64,
    pub host_count: usize,
    pub instance_count: usize,
    pub avg_per_instance: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Full-precision monthly cost of running one host on a given profile.
fn host_total_unrounded(profile: &CostProfile, settings: &PortalSettings) -> f64 {
    let power_cost = (profile.average_watts as f64 / 1000.0)
        * 24.0
        * 30.0
        * settings.electricity_cost
        * settings.pue;
    profile.monthly_amortization + power_cost
}

/// Monthly cost breakdown for a host. Absent when the host has no cost
/// profile assigned; hardware cost accounting is best-effort.
pub fn host_monthly_cost(host: &PhysicalHost, ctx: &CostContext) -> Option<HostCostBreakdown> {
    let profile = ctx.profile_for(host)?;

    let power_cost = (profile.average_watts as f64 / 1000.0)
        * 24.0
        * 30.0
        * ctx.settings.electricity_cost
        * ctx.settings.pue;

    Some(HostCostBreakdown {
        power_cost: round2(power_cost),
        amortization: profile.monthly_amortization,
        total_cost: round2(profile.monthly_amortization + power_cost),
    })
}

/// Full-precision monthly cost of one instance, or absent when the instance
/// has no host or its host has no cost profile.
fn instance_cost_unrounded(
    instance: &Instance,
    host: Option<&PhysicalHost>,
    ctx: &CostContext,
) -> Option<f64> {
    let host = host?;
    let profile = ctx.profile_for(host)?;

    // Defined as exactly 0 to avoid division by zero.
    if host.cpu_count == 0 {
        return Some(0.0);
    }

    let cost_per_vcpu = host_total_unrounded(profile, &ctx.settings) / host.cpu_count as f64;
    let vcpus = ctx.vcpus_for(instance, host.cluster_id);
    Some(cost_per_vcpu * vcpus as f64)
}

/// Monthly cost of one instance, rounded to cents. Absent when the instance
/// has no host or its host has no cost profile.
pub fn instance_monthly_cost(
    instance: &Instance,
    host: Option<&PhysicalHost>,
    ctx: &CostContext,
) -> Option<f64> {
    instance_cost_unrounded(instance, host, ctx).map(round2)
}

/// Groups all instances by project, summing monthly cost per project
/// (absent costs count as 0). Projects are sorted descending by total cost;
/// the yearly projection is exactly twelve times the rounded monthly total.
pub fn project_costs(
    rows: &[(Instance, Option<PhysicalHost>)],
    ctx: &CostContext,
) -> ProjectCostReport {
    struct Acc {
        instance_count: usize,
        vcpus: i32,
        total: f64,
    }

    let mut projects: HashMap<String, Acc> = HashMap::new();
    let mut total_monthly = 0.0f64;

    for (instance, host) in rows {
        let cost = instance_cost_unrounded(instance, host.as_ref(), ctx).unwrap_or(0.0);
        let vcpus = host
            .as_ref()
            .map(|h| ctx.vcpus_for(instance, h.cluster_id))
            .unwrap_or(0);

        let acc = projects.entry(instance.project_id.clone()).or_insert(Acc {
            instance_count: 0,
            vcpus: 0,
            total: 0.0,
        });
        acc.instance_count += 1;
        acc.vcpus += vcpus;
        acc.total += cost;
        total_monthly += cost;
    }

    let mut projects: Vec<ProjectCost> = projects
        .into_iter()
        .map(|(project_id, acc)| ProjectCost {
            project_id,
            instance_count: acc.instance_count,
            vcpus: acc.vcpus,
            total_cost: round2(acc.total),
        })
        .collect();
    projects.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_monthly = round2(total_monthly);
    ProjectCostReport {
        projects,
        total_monthly,
        projected_yearly: total_monthly * 12.0,
    }
}

/// Aggregates monthly cost over one cluster's instances.
pub fn cluster_cost(
    hosts: &[PhysicalHost],
    rows: &[(Instance, Option<PhysicalHost>)],
    ctx: &CostContext,
) -> ClusterCostSummary {
    let mut total = 0.0f64;
    let mut instance_count = 0usize;

    for (instance, host) in rows {
        total += instance_cost_unrounded(instance, host.as_ref(), ctx).unwrap_or(0.0);
        instance_count += 1;
    }

    let avg_per_instance = if instance_count > 0 {
        round2(total / instance_count as f64)
    } else {
        0.0
    };

    ClusterCostSummary {
        total_monthly: round2(total),
        host_count: hosts.len(),
        instance_count,
        avg_per_instance,
    }
}

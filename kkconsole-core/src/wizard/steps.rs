//! Step tables and gating predicates
//!
//! Each operation owns a static table of steps. A step's gate decides
//! whether the document satisfies the requirements for leaving that step;
//! gates are pure and evaluated on demand, never cached.

use super::operation::OperationOptions;
use crate::spec::{SpecDocument, ROLE_ETCD, ROLE_MASTER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Hosts,
    Etcd,
    Cluster,
    Network,
    Storage,
    Registry,
    KubeSphere,
    Nodes,
    NodeSelection,
    Review,
    Confirm,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Hosts => "Hosts",
            WizardStep::Etcd => "ETCD",
            WizardStep::Cluster => "Cluster",
            WizardStep::Network => "Network",
            WizardStep::Storage => "Storage",
            WizardStep::Registry => "Image registry",
            WizardStep::KubeSphere => "KubeSphere",
            WizardStep::Nodes => "Nodes",
            WizardStep::NodeSelection => "Node selection",
            WizardStep::Review => "Review",
            WizardStep::Confirm => "Confirm",
        }
    }
}

/// Requirement for leaving a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    /// At least one host and one master
    HostsWithMaster,
    /// At least one etcd member
    EtcdAssigned,
    /// Cluster name, Kubernetes version, container manager and namespace
    InstallClusterSettings,
    /// Network plugin and both CIDRs
    NetworkSettings,
    /// A companion version is chosen when KubeSphere is enabled
    KubeSphereVersion,
    /// Cluster name, Kubernetes version and container manager
    UpgradeClusterSettings,
    /// The inventory grew beyond its size at wizard creation
    NewHostsAdded,
    /// A delete target is chosen and present in the inventory
    TargetNodeSelected,
}

pub struct GateContext<'a> {
    pub document: &'a SpecDocument,
    pub options: &'a OperationOptions,
}

impl Gate {
    pub fn passes(&self, ctx: &GateContext<'_>) -> bool {
        let doc = ctx.document;
        match self {
            Gate::Open => true,
            Gate::HostsWithMaster => {
                doc.seq_len("spec.hosts") > 0 && doc.seq_len(&role_path(ROLE_MASTER)) > 0
            }
            Gate::EtcdAssigned => doc.seq_len(&role_path(ROLE_ETCD)) > 0,
            Gate::InstallClusterSettings => {
                Gate::UpgradeClusterSettings.passes(ctx)
                    && !ctx.options.kubekey_namespace.is_empty()
            }
            Gate::NetworkSettings => {
                doc.has_text("spec.network.plugin")
                    && doc.has_text("spec.network.kubePodsCIDR")
                    && doc.has_text("spec.network.kubeServiceCIDR")
            }
            Gate::KubeSphereVersion => {
                !ctx.options.kubesphere_enabled || !ctx.options.kubesphere_version.is_empty()
            }
            Gate::UpgradeClusterSettings => {
                doc.has_text("metadata.name")
                    && doc.has_text("spec.kubernetes.version")
                    && doc.has_text("spec.kubernetes.containerManager")
            }
            Gate::NewHostsAdded => doc.seq_len("spec.hosts") > ctx.options.baseline_host_count,
            Gate::TargetNodeSelected => match &ctx.options.target_node {
                Some(target) => host_names(doc).any(|name| name == target),
                None => false,
            },
        }
    }
}

fn role_path(role: &str) -> String {
    format!("spec.roleGroups.{}", role)
}

fn host_names(doc: &SpecDocument) -> impl Iterator<Item = &str> {
    doc.get("spec.hosts")
        .and_then(|v| v.as_sequence())
        .into_iter()
        .flatten()
        .filter_map(|host| host.get("name").and_then(|n| n.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    pub step: WizardStep,
    pub gate: Gate,
}

const fn step(step: WizardStep, gate: Gate) -> StepDef {
    StepDef { step, gate }
}

pub const INSTALL_STEPS: &[StepDef] = &[
    step(WizardStep::Hosts, Gate::HostsWithMaster),
    step(WizardStep::Etcd, Gate::EtcdAssigned),
    step(WizardStep::Cluster, Gate::InstallClusterSettings),
    step(WizardStep::Network, Gate::NetworkSettings),
    step(WizardStep::Storage, Gate::Open),
    step(WizardStep::Registry, Gate::Open),
    step(WizardStep::KubeSphere, Gate::KubeSphereVersion),
    step(WizardStep::Confirm, Gate::Open),
];

pub const UPGRADE_STEPS: &[StepDef] = &[
    step(WizardStep::Cluster, Gate::UpgradeClusterSettings),
    step(WizardStep::Registry, Gate::Open),
    step(WizardStep::KubeSphere, Gate::Open),
    step(WizardStep::Storage, Gate::Open),
    step(WizardStep::Confirm, Gate::Open),
];

pub const ADD_NODE_STEPS: &[StepDef] = &[
    step(WizardStep::Nodes, Gate::NewHostsAdded),
    step(WizardStep::Confirm, Gate::Open),
];

pub const DELETE_NODE_STEPS: &[StepDef] = &[
    step(WizardStep::NodeSelection, Gate::TargetNodeSelected),
    step(WizardStep::Confirm, Gate::Open),
];

pub const DELETE_CLUSTER_STEPS: &[StepDef] = &[
    step(WizardStep::Review, Gate::Open),
    step(WizardStep::Confirm, Gate::Open),
];

//! Plain-text rendering for terminal output

use kkconsole_core::spec::{ClusterSummary, SpecDocument};
use kkconsole_core::wizard::Wizard;
use std::fmt::Write;

/// One row per cluster
pub fn cluster_table(clusters: &[SpecDocument]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>5} {:<10} {:<12} {:<10} {:<8} {:<7}",
        "NAME", "NODES", "VERSION", "RUNTIME", "NETWORK", "STORAGE", "RENEW"
    );
    for doc in clusters {
        let s = ClusterSummary::from_document(doc);
        let _ = writeln!(
            out,
            "{:<20} {:>5} {:<10} {:<12} {:<10} {:<8} {:<7}",
            s.name,
            s.node_count,
            s.kubernetes_version,
            s.container_manager,
            s.network_plugin,
            yes_no(s.storage_enabled),
            yes_no(s.auto_renew_certs),
        );
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// What is about to be submitted, shown before confirmation
pub fn operation_summary(wizard: &Wizard) -> String {
    let doc = wizard.document();
    let mut out = String::new();
    let _ = writeln!(out, "Operation:  {}", wizard.kind());
    let _ = writeln!(out, "Cluster:    {}", doc.name());
    if let Some(version) = doc.get_str("spec.kubernetes.version") {
        let runtime = doc
            .get_str("spec.kubernetes.containerManager")
            .unwrap_or_default();
        let _ = writeln!(out, "Kubernetes: {} ({})", version, runtime);
    }
    let ks = wizard.options().effective_kubesphere_version();
    if !ks.is_empty() {
        let _ = writeln!(out, "KubeSphere: {}", ks);
    }
    if let Some(target) = &wizard.options().target_node {
        let _ = writeln!(out, "Remove:     {}", target);
    }

    if let Ok(hosts) = doc.hosts() {
        let _ = writeln!(out, "Hosts:");
        for host in hosts {
            let roles = doc.roles_of(&host.name).unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<16} {:<16} {}",
                host.name,
                host.address,
                roles.join(",")
            );
        }
    }
    out
}

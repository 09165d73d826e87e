//! Kubernetes version helpers used by the install and upgrade wizards

use super::SpecDocument;
use crate::error::ConsoleResult;
use std::cmp::Ordering;

pub const VERSION_PATH: &str = "spec.kubernetes.version";
pub const CONTAINER_MANAGER_PATH: &str = "spec.kubernetes.containerManager";
pub const CLUSTER_NAME_PATH: &str = "spec.kubernetes.clusterName";

/// First release that dropped dockershim
pub const DOCKERLESS_SINCE: &str = "v1.24.0";

/// Compare two `v`-prefixed dotted versions numerically.
///
/// Missing or non-numeric components count as zero, so `v1.24` equals
/// `v1.24.0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parts = |v: &str| -> Vec<u64> {
        v.trim_start_matches('v')
            .split('.')
            .map(|p| p.parse().unwrap_or(0))
            .collect()
    };
    let (pa, pb) = (parts(a), parts(b));
    let len = pa.len().max(pb.len());
    for i in 0..len {
        let x = pa.get(i).copied().unwrap_or(0);
        let y = pb.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Version options strictly newer than the cluster's current version
pub fn upgrade_targets(options: &[String], current: &str) -> Vec<String> {
    options
        .iter()
        .filter(|v| compare_versions(v, current) == Ordering::Greater)
        .cloned()
        .collect()
}

/// Whether docker may still be selected as the container manager
pub fn docker_supported(version: &str) -> bool {
    compare_versions(version, DOCKERLESS_SINCE) == Ordering::Less
}

pub fn container_manager_allowed(version: &str, manager: &str) -> bool {
    match manager {
        "docker" => docker_supported(version),
        "containerd" => true,
        _ => false,
    }
}

impl SpecDocument {
    /// Pick a Kubernetes version. The container manager is cleared because
    /// its valid choices depend on the version.
    pub fn select_kubernetes_version(&mut self, version: &str) -> ConsoleResult<()> {
        self.set(VERSION_PATH, version)?;
        self.set(CONTAINER_MANAGER_PATH, "")
    }

    /// Rename the cluster; KubeKey keeps the name in two places
    pub fn rename_cluster(&mut self, name: &str) -> ConsoleResult<()> {
        self.set(CLUSTER_NAME_PATH, name)?;
        self.set("metadata.name", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("v1.22.12", "v1.21.5"), Ordering::Greater);
        assert_eq!(compare_versions("v1.9.0", "v1.10.0"), Ordering::Less);
        assert_eq!(compare_versions("v1.24", "v1.24.0"), Ordering::Equal);
    }

    #[test]
    fn test_upgrade_targets_are_strictly_newer() {
        let options: Vec<String> = ["v1.21.5", "v1.22.12", "v1.20.10", "v1.23.10"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(upgrade_targets(&options, "v1.21.5"), vec!["v1.22.12", "v1.23.10"]);
    }

    #[test]
    fn test_docker_cutoff() {
        assert!(docker_supported("v1.23.10"));
        assert!(!docker_supported("v1.24.0"));
        assert!(!container_manager_allowed("v1.26.5", "docker"));
        assert!(container_manager_allowed("v1.26.5", "containerd"));
        assert!(!container_manager_allowed("v1.26.5", "podman"));
    }

    #[test]
    fn test_select_version_clears_container_manager() {
        let mut doc = SpecDocument::from_yaml(
            "spec:\n  kubernetes:\n    version: v1.21.5\n    containerManager: docker\n",
        )
        .unwrap();
        doc.select_kubernetes_version("v1.24.9").unwrap();

        assert_eq!(doc.get_str(VERSION_PATH), Some("v1.24.9"));
        assert!(!doc.has_text(CONTAINER_MANAGER_PATH));
    }

    #[test]
    fn test_rename_cluster_updates_both_fields() {
        let mut doc = SpecDocument::from_yaml("metadata:\n  name: old\n").unwrap();
        doc.rename_cluster("prod").unwrap();
        assert_eq!(doc.name(), "prod");
        assert_eq!(doc.get_str(CLUSTER_NAME_PATH), Some("prod"));
    }
}

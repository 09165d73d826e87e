//! One-line view of a cluster for the cluster list

use super::SpecDocument;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub name: String,
    pub node_count: usize,
    pub kubernetes_version: String,
    pub auto_renew_certs: bool,
    pub network_plugin: String,
    pub container_manager: String,
    pub storage_enabled: bool,
}

impl ClusterSummary {
    pub fn from_document(doc: &SpecDocument) -> Self {
        let text = |path: &str| doc.get_str(path).unwrap_or_default().to_string();
        Self {
            name: doc.name().to_string(),
            node_count: doc.seq_len("spec.hosts"),
            kubernetes_version: text("spec.kubernetes.version"),
            auto_renew_certs: doc
                .get("spec.kubernetes.autoRenewCerts")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            network_plugin: text("spec.network.plugin"),
            container_manager: text("spec.kubernetes.containerManager"),
            storage_enabled: doc.get("spec.storage.openebs").is_some(),
        }
    }
}

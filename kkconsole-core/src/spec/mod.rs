//! Cluster specification model
//!
//! `ClusterSpecification` is the typed shape of the document KubeKey
//! consumes; `SpecDocument` is the path-addressed tree the wizards edit.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

pub mod addons;
pub mod document;
pub mod host;
pub mod kubernetes;
pub mod summary;

pub use document::SpecDocument;
pub use host::{Host, SshCredential, ROLE_ETCD, ROLE_MASTER, ROLE_WORKER};
pub use summary::ClusterSummary;

pub const API_VERSION: &str = "kubekey.kubesphere.io/v1alpha2";
pub const KIND_CLUSTER: &str = "Cluster";
pub const BACKEND_LABEL: &str = "type.kubekey.kubesphere.io/backend";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSpecification {
    pub api_version: String,
    pub kind: String,
    pub metadata: ClusterMetadata,
    pub spec: ClusterSpec,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSpec {
    pub hosts: Vec<Host>,
    pub role_groups: BTreeMap<String, Vec<String>>,
    pub control_plane_endpoint: ControlPlaneEndpoint,
    pub kubernetes: KubernetesConfig,
    pub etcd: EtcdConfig,
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub registry: RegistryConfig,
    pub addons: Vec<Addon>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlPlaneEndpoint {
    pub domain: String,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesConfig {
    pub version: String,
    pub container_manager: String,
    pub cluster_name: String,
    pub auto_renew_certs: bool,
    pub masquerade_all: bool,
    pub max_pods: u32,
    pub node_cidr_mask_size: u32,
    pub proxy_mode: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcdConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub plugin: String,
    #[serde(rename = "kubePodsCIDR")]
    pub kube_pods_cidr: String,
    #[serde(rename = "kubeServiceCIDR")]
    pub kube_service_cidr: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openebs: Option<OpenEbsConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenEbsConfig {
    pub base_path: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    pub registry_mirrors: Vec<String>,
    pub insecure_registries: Vec<String>,
    pub private_registry: String,
    pub namespace_override: String,
}

/// Optional component deployed after the cluster comes up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Addon {
    pub name: String,
    pub namespace: String,
    /// Chart or manifest sources, passed through verbatim
    #[serde(skip_serializing_if = "Value::is_null")]
    pub sources: Value,
}

impl ClusterSpecification {
    /// Document a fresh install wizard starts from
    pub fn install_defaults() -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(BACKEND_LABEL.to_string(), "true".to_string());

        let role_groups = [ROLE_ETCD, ROLE_MASTER, ROLE_WORKER]
            .into_iter()
            .map(|role| (role.to_string(), Vec::new()))
            .collect();

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND_CLUSTER.to_string(),
            metadata: ClusterMetadata {
                name: "cluster.local".to_string(),
                labels,
            },
            spec: ClusterSpec {
                hosts: Vec::new(),
                role_groups,
                control_plane_endpoint: ControlPlaneEndpoint {
                    domain: "lb.kubesphere.local".to_string(),
                    address: String::new(),
                    port: 6443,
                },
                kubernetes: KubernetesConfig {
                    version: "v1.21.5".to_string(),
                    container_manager: "docker".to_string(),
                    cluster_name: "cluster.local".to_string(),
                    auto_renew_certs: true,
                    masquerade_all: false,
                    max_pods: 110,
                    node_cidr_mask_size: 24,
                    proxy_mode: "ipvs".to_string(),
                },
                etcd: EtcdConfig {
                    kind: "kubekey".to_string(),
                },
                network: NetworkConfig {
                    plugin: "calico".to_string(),
                    kube_pods_cidr: "10.233.64.0/18".to_string(),
                    kube_service_cidr: "10.233.0.0/18".to_string(),
                },
                storage: StorageConfig {
                    openebs: Some(OpenEbsConfig {
                        base_path: "/var/openebs/local".to_string(),
                    }),
                },
                registry: RegistryConfig::default(),
                addons: Vec::new(),
            },
        }
    }
}

//! Lifecycle operations and their wire parameters

use super::steps::{StepDef, ADD_NODE_STEPS, DELETE_CLUSTER_STEPS, DELETE_NODE_STEPS, INSTALL_STEPS, UPGRADE_STEPS};
use crate::config::WizardConfig;
use std::fmt;

/// Line appended when the streaming endpoint cannot be reached
pub const TRANSPORT_FAILURE_LINE: &str = "与后端建立连接失败，请检查kk console状态";

/// Literal lines exchanged with the backend for one operation.
///
/// `succeeded` and `failed` are the sentinels the backend sends as the
/// final message; `started` is appended locally when the stream opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMessages {
    pub started: &'static str,
    pub succeeded: &'static str,
    pub failed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Install,
    AddNode,
    DeleteNode,
    DeleteCluster,
    UpgradeCluster,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Install,
        OperationKind::AddNode,
        OperationKind::DeleteNode,
        OperationKind::DeleteCluster,
        OperationKind::UpgradeCluster,
    ];

    /// Path of the streaming endpoint on the backend
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            OperationKind::Install => "createCluster",
            OperationKind::AddNode => "addNode",
            OperationKind::DeleteNode => "deleteNode",
            OperationKind::DeleteCluster => "deleteCluster",
            OperationKind::UpgradeCluster => "upgradeCluster",
        }
    }

    pub fn messages(&self) -> OperationMessages {
        match self {
            OperationKind::Install => OperationMessages {
                started: "安装开始，请勿进行其他操作！",
                succeeded: "安装集群成功",
                failed: "安装集群失败",
            },
            OperationKind::AddNode => OperationMessages {
                started: "增加节点开始，请勿进行其他操作！",
                succeeded: "增加节点成功",
                failed: "增加节点失败",
            },
            OperationKind::DeleteNode => OperationMessages {
                started: "删除节点开始，请勿进行其他操作！",
                succeeded: "删除节点成功",
                failed: "删除节点失败",
            },
            OperationKind::DeleteCluster => OperationMessages {
                started: "删除集群开始，请勿进行其他操作！",
                succeeded: "删除集群成功",
                failed: "删除集群失败",
            },
            OperationKind::UpgradeCluster => OperationMessages {
                started: "升级集群开始，请勿进行其他操作！",
                succeeded: "升级集群成功",
                failed: "升级集群失败",
            },
        }
    }

    pub fn steps(&self) -> &'static [StepDef] {
        match self {
            OperationKind::Install => INSTALL_STEPS,
            OperationKind::AddNode => ADD_NODE_STEPS,
            OperationKind::DeleteNode => DELETE_NODE_STEPS,
            OperationKind::DeleteCluster => DELETE_CLUSTER_STEPS,
            OperationKind::UpgradeCluster => UPGRADE_STEPS,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Install => "install",
            OperationKind::AddNode => "add-node",
            OperationKind::DeleteNode => "delete-node",
            OperationKind::DeleteCluster => "delete-cluster",
            OperationKind::UpgradeCluster => "upgrade-cluster",
        };
        f.write_str(name)
    }
}

/// Operation parameters that travel as query parameters, not in the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOptions {
    /// Deploy KubeSphere alongside the cluster
    pub kubesphere_enabled: bool,
    pub kubesphere_version: String,
    pub kubekey_namespace: String,
    /// Node targeted by delete-node
    pub target_node: Option<String>,
    /// Inventory size when the wizard was created; add-node must grow it
    pub baseline_host_count: usize,
}

impl OperationOptions {
    pub fn for_kind(kind: OperationKind, config: &WizardConfig) -> Self {
        let mut options = Self {
            kubekey_namespace: config.kubekey_namespace.clone(),
            ..Self::default()
        };
        if kind == OperationKind::UpgradeCluster {
            options.kubesphere_enabled = true;
            options.kubesphere_version = config.kubesphere_version.clone();
        }
        options
    }

    /// Companion version as sent to the backend; empty when disabled
    pub fn effective_kubesphere_version(&self) -> &str {
        if self.kubesphere_enabled {
            &self.kubesphere_version
        } else {
            ""
        }
    }
}

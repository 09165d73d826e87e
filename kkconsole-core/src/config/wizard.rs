//! Defaults applied to newly created wizards

use super::defaults::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Namespace the backend runs KubeKey jobs in
    pub kubekey_namespace: String,

    /// Companion KubeSphere version preselected by the upgrade wizard
    pub kubesphere_version: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            kubekey_namespace: DEFAULT_KUBEKEY_NAMESPACE.to_string(),
            kubesphere_version: DEFAULT_KUBESPHERE_VERSION.to_string(),
        }
    }
}

//! Host inventory and role-group management
//!
//! Hosts live in `spec.hosts`; role groups in `spec.roleGroups` map a role
//! name to the list of host names holding it. Every inventory operation
//! edits the raw YAML in place: only the targeted entry and the affected
//! group members change, and keys `Host` does not model are kept.

use super::SpecDocument;
use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashSet};

pub const HOSTS_PATH: &str = "spec.hosts";
pub const ROLE_GROUPS_PATH: &str = "spec.roleGroups";

pub const ROLE_MASTER: &str = "master";
pub const ROLE_WORKER: &str = "worker";
pub const ROLE_ETCD: &str = "etcd";

/// How the backend authenticates to a host over SSH
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SshCredential {
    Password(String),
    /// Private key material
    PrivateKey(String),
    /// Path to a private key file on the backend machine
    PrivateKeyPath(String),
}

impl Default for SshCredential {
    fn default() -> Self {
        SshCredential::Password(String::new())
    }
}

/// One managed machine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "HostRecord", into = "HostRecord")]
pub struct Host {
    pub name: String,
    pub address: String,
    pub internal_address: String,
    pub port: Option<u16>,
    pub user: String,
    pub credential: SshCredential,
    pub arch: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl Host {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        internal_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            internal_address: internal_address.into(),
            user: "root".to_string(),
            ..Self::default()
        }
    }

    pub fn with_credential(mut self, credential: SshCredential) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Wire shape of a host: credentials are three optional sibling fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HostRecord {
    name: String,
    address: String,
    internal_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arch: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

impl From<HostRecord> for Host {
    fn from(record: HostRecord) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        // password, then key material, then key path
        let credential = if let Some(password) = present(record.password) {
            SshCredential::Password(password)
        } else if let Some(key) = present(record.private_key) {
            SshCredential::PrivateKey(key)
        } else if let Some(path) = present(record.private_key_path) {
            SshCredential::PrivateKeyPath(path)
        } else {
            SshCredential::default()
        };

        Host {
            name: record.name,
            address: record.address,
            internal_address: record.internal_address,
            port: record.port,
            user: record.user,
            credential,
            arch: record.arch,
            labels: record.labels,
        }
    }
}

impl From<Host> for HostRecord {
    fn from(host: Host) -> Self {
        let mut record = HostRecord {
            name: host.name,
            address: host.address,
            internal_address: host.internal_address,
            port: host.port,
            user: host.user,
            arch: host.arch,
            labels: host.labels,
            ..HostRecord::default()
        };
        match host.credential {
            SshCredential::Password(p) => record.password = Some(p),
            SshCredential::PrivateKey(k) => record.private_key = Some(k),
            SshCredential::PrivateKeyPath(p) => record.private_key_path = Some(p),
        }
        record
    }
}

const CREDENTIAL_KEYS: [&str; 3] = ["password", "privateKey", "privateKeyPath"];
const OPTIONAL_KEYS: [&str; 3] = ["port", "arch", "labels"];

fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}

fn group_contains(members: &Value, name: &str) -> bool {
    members
        .as_sequence()
        .map_or(false, |seq| seq.iter().any(|m| m.as_str() == Some(name)))
}

fn purge_from_groups(groups: &mut Mapping, name: &str) {
    for (_, members) in groups.iter_mut() {
        if let Some(seq) = members.as_sequence_mut() {
            seq.retain(|m| m.as_str() != Some(name));
        }
    }
}

fn assign_roles(groups: &mut Mapping, name: &str, roles: &[&str]) -> ConsoleResult<()> {
    for role in roles {
        let members = groups
            .entry(Value::String((*role).to_string()))
            .or_insert(Value::Null);
        if members.is_null() {
            *members = Value::Sequence(Vec::new());
        }
        if group_contains(members, name) {
            continue;
        }
        match members.as_sequence_mut() {
            Some(seq) => seq.push(Value::String(name.to_string())),
            None => {
                return Err(ConsoleError::inventory(format!(
                    "role group '{}' is not a list",
                    role
                )))
            }
        }
    }
    Ok(())
}

/// Overlay the fields of `host` onto an existing entry.
///
/// Keys the host does not model are kept. Credential keys are only
/// replaced when the credential itself changed.
fn merge_entry(existing: &Value, host: Host) -> ConsoleResult<Value> {
    let previous: Option<Host> = serde_yaml::from_value(existing.clone()).ok();
    let credential_changed = previous.map_or(true, |p| p.credential != host.credential);

    let Value::Mapping(update) = serde_yaml::to_value(host)? else {
        return Err(ConsoleError::internal("host did not serialize to a mapping"));
    };
    let mut merged = existing.as_mapping().cloned().unwrap_or_default();

    for key in OPTIONAL_KEYS {
        if !update.contains_key(key) {
            merged.remove(key);
        }
    }
    if credential_changed {
        for key in CREDENTIAL_KEYS {
            merged.remove(key);
        }
    }
    for (key, value) in update {
        let is_credential = key
            .as_str()
            .map_or(false, |k| CREDENTIAL_KEYS.contains(&k));
        if is_credential && !credential_changed {
            continue;
        }
        // no new empty fields on an entry that never had them
        if value.as_str() == Some("") && !merged.contains_key(&key) {
            continue;
        }
        merged.insert(key, value);
    }
    Ok(Value::Mapping(merged))
}

impl SpecDocument {
    pub fn hosts(&self) -> ConsoleResult<Vec<Host>> {
        Ok(self.get_typed(HOSTS_PATH)?.unwrap_or_default())
    }

    pub fn host(&self, name: &str) -> ConsoleResult<Option<Host>> {
        Ok(self.hosts()?.into_iter().find(|h| h.name == name))
    }

    /// Role name to member names. Null groups read as empty.
    pub fn role_groups(&self) -> ConsoleResult<BTreeMap<String, Vec<String>>> {
        let groups = self.role_group_mapping()?;
        let mut out = BTreeMap::new();
        for (role, members) in &groups {
            let Some(role) = role.as_str() else { continue };
            let names = match members {
                Value::Null => Vec::new(),
                Value::Sequence(seq) => seq
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect(),
                _ => {
                    return Err(ConsoleError::inventory(format!(
                        "role group '{}' is not a list",
                        role
                    )))
                }
            };
            out.insert(role.to_string(), names);
        }
        Ok(out)
    }

    pub fn role_members(&self, role: &str) -> ConsoleResult<Vec<String>> {
        Ok(self.role_groups()?.remove(role).unwrap_or_default())
    }

    /// Roles the named host currently holds
    pub fn roles_of(&self, name: &str) -> ConsoleResult<Vec<String>> {
        Ok(self
            .role_groups()?
            .into_iter()
            .filter(|(_, members)| members.iter().any(|m| m == name))
            .map(|(role, _)| role)
            .collect())
    }

    /// Append a host and assign it to `roles`. Existing entries are untouched.
    pub fn add_host(&mut self, host: Host, roles: &[&str]) -> ConsoleResult<()> {
        if host.name.is_empty() {
            return Err(ConsoleError::inventory("host name must not be empty"));
        }
        let mut entries = self.host_entries()?;
        if entries.iter().any(|e| entry_name(e) == Some(host.name.as_str())) {
            return Err(ConsoleError::DuplicateHost { name: host.name });
        }

        let mut groups = self.role_group_mapping()?;
        assign_roles(&mut groups, &host.name, roles)?;

        tracing::debug!(host = %host.name, ?roles, "adding host");
        entries.push(serde_yaml::to_value(host)?);
        self.write_inventory(entries, groups)
    }

    /// Replace the host named `original` with `host` and reassign its roles.
    ///
    /// Only the targeted entry changes, and fields it carries that `Host`
    /// does not model are kept. The original name is removed from every
    /// role group, then the new name is added to each group in `roles`.
    pub fn edit_host(&mut self, original: &str, host: Host, roles: &[&str]) -> ConsoleResult<()> {
        if host.name.is_empty() {
            return Err(ConsoleError::inventory("host name must not be empty"));
        }
        let mut entries = self.host_entries()?;
        if host.name != original
            && entries
                .iter()
                .any(|e| entry_name(e) == Some(host.name.as_str()))
        {
            return Err(ConsoleError::DuplicateHost { name: host.name });
        }
        let index = entries
            .iter()
            .position(|e| entry_name(e) == Some(original))
            .ok_or_else(|| ConsoleError::HostNotFound {
                name: original.to_string(),
            })?;

        let mut groups = self.role_group_mapping()?;
        purge_from_groups(&mut groups, original);
        assign_roles(&mut groups, &host.name, roles)?;

        tracing::debug!(original, host = %host.name, ?roles, "editing host");
        let merged = merge_entry(&entries[index], host)?;
        entries[index] = merged;
        self.write_inventory(entries, groups)
    }

    /// Remove a host from the inventory and from every role group
    pub fn delete_host(&mut self, name: &str) -> ConsoleResult<Host> {
        let mut entries = self.host_entries()?;
        let index = entries
            .iter()
            .position(|e| entry_name(e) == Some(name))
            .ok_or_else(|| ConsoleError::HostNotFound {
                name: name.to_string(),
            })?;
        let removed: Host = serde_yaml::from_value(entries.remove(index))?;

        let mut groups = self.role_group_mapping()?;
        purge_from_groups(&mut groups, name);

        tracing::debug!(host = name, "deleting host");
        self.write_inventory(entries, groups)?;
        Ok(removed)
    }

    /// Check host name uniqueness and that every role member exists
    pub fn validate_inventory(&self) -> ConsoleResult<()> {
        let hosts = self.hosts()?;
        let mut names = HashSet::new();
        for host in &hosts {
            if !names.insert(host.name.as_str()) {
                return Err(ConsoleError::DuplicateHost {
                    name: host.name.clone(),
                });
            }
        }

        for (role, members) in self.role_groups()? {
            if let Some(missing) = members.iter().find(|m| !names.contains(m.as_str())) {
                return Err(ConsoleError::inventory(format!(
                    "role group '{}' references unknown host '{}'",
                    role, missing
                )));
            }
        }
        Ok(())
    }

    fn host_entries(&self) -> ConsoleResult<Vec<Value>> {
        match self.get(HOSTS_PATH) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(seq)) => Ok(seq.clone()),
            Some(_) => Err(ConsoleError::inventory(format!("'{}' is not a list", HOSTS_PATH))),
        }
    }

    fn role_group_mapping(&self) -> ConsoleResult<Mapping> {
        match self.get(ROLE_GROUPS_PATH) {
            None | Some(Value::Null) => Ok(Mapping::new()),
            Some(Value::Mapping(map)) => Ok(map.clone()),
            Some(_) => Err(ConsoleError::inventory(format!(
                "'{}' is not a mapping",
                ROLE_GROUPS_PATH
            ))),
        }
    }

    fn write_inventory(&mut self, entries: Vec<Value>, groups: Mapping) -> ConsoleResult<()> {
        self.set(HOSTS_PATH, Value::Sequence(entries))?;
        if self.get(ROLE_GROUPS_PATH).is_some() || !groups.is_empty() {
            self.set(ROLE_GROUPS_PATH, Value::Mapping(groups))?;
        }
        Ok(())
    }
}

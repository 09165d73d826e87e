//! Host lists supplied on the command line
//!
//! A hosts file is a YAML sequence of host entries in the cluster document
//! format, each with an extra `roles` list:
//!
//! ```yaml
//! - name: node3
//!   address: 172.16.0.4
//!   internalAddress: 172.16.0.4
//!   password: secret
//!   roles: [worker]
//! ```

use kkconsole_core::error::{ConsoleError, ConsoleResult};
use kkconsole_core::spec::{Host, SpecDocument};
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub host: Host,
    pub roles: Vec<String>,
}

pub fn parse_host_entries(text: &str) -> ConsoleResult<Vec<HostEntry>> {
    let entries: Vec<Value> = serde_yaml::from_str(text)?;
    entries.into_iter().map(parse_entry).collect()
}

fn parse_entry(mut entry: Value) -> ConsoleResult<HostEntry> {
    let map = entry
        .as_mapping_mut()
        .ok_or_else(|| ConsoleError::inventory("host entry must be a mapping"))?;
    let roles = match map.remove("roles") {
        Some(roles) => serde_yaml::from_value(roles)?,
        None => Vec::new(),
    };
    let host: Host = serde_yaml::from_value(entry)?;
    Ok(HostEntry { host, roles })
}

/// Add every entry to the document, stopping at the first rejected host
pub fn add_entries(doc: &mut SpecDocument, entries: Vec<HostEntry>) -> ConsoleResult<usize> {
    let count = entries.len();
    for entry in entries {
        let roles: Vec<&str> = entry.roles.iter().map(String::as_str).collect();
        doc.add_host(entry.host, &roles)?;
    }
    doc.validate_inventory()?;
    Ok(count)
}

//! Add-on list editing

use super::{Addon, SpecDocument};
use crate::error::{ConsoleError, ConsoleResult};

pub const ADDONS_PATH: &str = "spec.addons";

impl SpecDocument {
    pub fn addons(&self) -> ConsoleResult<Vec<Addon>> {
        Ok(self.get_typed(ADDONS_PATH)?.unwrap_or_default())
    }

    /// Append an add-on; names are unique within the list
    pub fn add_addon(&mut self, addon: Addon) -> ConsoleResult<()> {
        let mut addons = self.addons()?;
        if addon.name.is_empty() {
            return Err(ConsoleError::inventory("add-on name must not be empty"));
        }
        if addons.iter().any(|a| a.name == addon.name) {
            return Err(ConsoleError::inventory(format!(
                "add-on '{}' already exists",
                addon.name
            )));
        }
        addons.push(addon);
        self.set_typed(ADDONS_PATH, &addons)
    }

    /// Remove an add-on by name, returning whether it was present
    pub fn remove_addon(&mut self, name: &str) -> ConsoleResult<bool> {
        let mut addons = self.addons()?;
        let before = addons.len();
        addons.retain(|a| a.name != name);
        if addons.len() == before {
            return Ok(false);
        }
        self.set_typed(ADDONS_PATH, &addons)?;
        Ok(true)
    }
}

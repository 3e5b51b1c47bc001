use log::debug;
use serde::Serialize;

use crate::config::{Role, RoleRule};

/// Columns chosen for each semantic role. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    pub date: Option<String>,
    pub channel: Option<String>,
    pub service: Option<String>,
}

impl ResolvedSchema {
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Date => self.date.as_deref(),
            Role::Channel => self.channel.as_deref(),
            Role::Service => self.service.as_deref(),
        }
    }

    fn slot(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Date => &mut self.date,
            Role::Channel => &mut self.channel,
            Role::Service => &mut self.service,
        }
    }

    /// The role a column was picked for, if any.
    pub fn role_of(&self, column: &str) -> Option<Role> {
        [Role::Date, Role::Channel, Role::Service]
            .into_iter()
            .find(|role| self.get(*role) == Some(column))
    }
}

/// Evaluates `rules` in order against the normalized column list. A role is
/// filled by the first rule that finds a column, and within a rule by the
/// leftmost matching column.
pub fn resolve_schema(columns: &[String], rules: &[RoleRule]) -> ResolvedSchema {
    let mut schema = ResolvedSchema::default();
    for rule in rules {
        let slot = schema.slot(rule.role);
        if slot.is_some() {
            continue;
        }
        *slot = columns.iter().find(|c| rule.matcher.matches(c)).cloned();
    }
    for role in [Role::Date, Role::Channel, Role::Service] {
        match schema.get(role) {
            Some(column) => debug!("Resolved {} column '{column}'", role.label()),
            None => debug!("No column resolved for {} role", role.label()),
        }
    }
    schema
}

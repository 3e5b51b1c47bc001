//! Pipeline configuration: role rules, categorical field names, and the
//! commission-group segments used by the segmented seller ranking.
//!
//! Everything has a built-in default matching the sales exports the tool was
//! written for. A YAML file can override any section; missing sections keep
//! their defaults.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{data::canonical_text, normalize::normalize_column_name};

/// Semantic role a column can play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Date,
    Channel,
    Service,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Channel => "channel",
            Role::Service => "service",
        }
    }
}

/// How a rule recognizes a column name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMatcher {
    Contains(String),
    Exact(String),
}

impl ColumnMatcher {
    pub fn matches(&self, column: &str) -> bool {
        match self {
            ColumnMatcher::Contains(marker) => column.contains(marker.as_str()),
            ColumnMatcher::Exact(name) => column == name,
        }
    }

    fn normalized(self) -> Self {
        match self {
            ColumnMatcher::Contains(marker) => ColumnMatcher::Contains(normalize_column_name(&marker)),
            ColumnMatcher::Exact(name) => ColumnMatcher::Exact(normalize_column_name(&name)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRule {
    pub role: Role,
    #[serde(flatten)]
    pub matcher: ColumnMatcher,
}

impl RoleRule {
    pub fn contains(role: Role, marker: &str) -> Self {
        Self {
            role,
            matcher: ColumnMatcher::Contains(marker.to_string()),
        }
    }

    pub fn exact(role: Role, name: &str) -> Self {
        Self {
            role,
            matcher: ColumnMatcher::Exact(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldNames {
    pub district: String,
    pub seller: String,
    pub commission_group: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            district: "DISTRITO".to_string(),
            seller: "VENDEDOR".to_string(),
            commission_group: "GRUPO_DE_COMISION".to_string(),
        }
    }
}

/// A named sub-population of commission groups, selected by substring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentDef {
    pub label: String,
    pub marker: String,
}

impl SegmentDef {
    pub fn new(label: &str, marker: &str) -> Self {
        Self {
            label: label.to_string(),
            marker: canonical_text(marker),
        }
    }

    pub fn matches(&self, commission_group: &str) -> bool {
        commission_group.contains(self.marker.as_str())
    }
}

pub fn default_segments() -> Vec<SegmentDef> {
    vec![
        SegmentDef::new("ASISTENTE DE VENTA", "ASISTENTE"),
        SegmentDef::new("VENDEDOR EXTERNO", "EXTERNO"),
        SegmentDef::new("VENDEDOR INTERNO", "INTERNO"),
        SegmentDef::new("TECNICO", "TECNIC"),
    ]
}

pub fn default_role_rules() -> Vec<RoleRule> {
    vec![
        RoleRule::contains(Role::Date, "FECHA"),
        RoleRule::contains(Role::Channel, "CANAL"),
        RoleRule::exact(Role::Service, "SERVICIO_SOLICITADO"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    pub roles: Vec<RoleRule>,
    pub fields: FieldNames,
    pub segments: Vec<SegmentDef>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roles: default_role_rules(),
            fields: FieldNames::default(),
            segments: default_segments(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let parsed: PipelineConfig = serde_yaml::from_str(raw)?;
        Ok(parsed.canonicalized())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Brings column names and markers into the same form as normalized
    /// columns and canonical cell values.
    pub fn canonicalized(self) -> Self {
        Self {
            roles: self
                .roles
                .into_iter()
                .map(|rule| RoleRule {
                    role: rule.role,
                    matcher: rule.matcher.normalized(),
                })
                .collect(),
            fields: FieldNames {
                district: normalize_column_name(&self.fields.district),
                seller: normalize_column_name(&self.fields.seller),
                commission_group: normalize_column_name(&self.fields.commission_group),
            },
            segments: self
                .segments
                .into_iter()
                .map(|segment| SegmentDef::new(&segment.label, &segment.marker))
                .collect(),
        }
    }
}

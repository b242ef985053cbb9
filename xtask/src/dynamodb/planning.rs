//! Pure functions for calculating deployment plans (Functional Core).

use super::config::{KeyAttribute, TableConfig};

/// Represents the current state of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub status: TableStatus,
    /// Hash key as reported by DescribeTable, if it could be read.
    pub partition_key: Option<KeyAttribute>,
    /// Name of the range key, if the table has one.
    pub sort_key: Option<String>,
}

/// Table status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
    /// Any other reported status (archived, inaccessible encryption
    /// credentials, ...). The table cannot serve plays in this state.
    Unusable(String),
}

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { config: TableConfig },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
    /// Table exists but its status means it cannot be used.
    TableUnusable { table_name: String, status: String },
    /// Table exists with a key schema plays cannot be stored in.
    /// Key schemas are immutable, so the table must be destroyed first.
    KeySchemaMismatch {
        table_name: String,
        expected: String,
        found: String,
    },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    /// Table exists and will be deleted.
    DeleteTable { table_name: String },
    /// Table doesn't exist, nothing to do.
    AlreadyGone { table_name: String },
}

/// Pure function: Calculate what changes are needed to reach desired state.
pub fn calculate_deploy_plan(current: Option<&TableState>, desired: &TableConfig) -> DeployPlan {
    let Some(state) = current else {
        return DeployPlan::CreateTable {
            config: desired.clone(),
        };
    };

    if let TableStatus::Unusable(status) = &state.status {
        return DeployPlan::TableUnusable {
            table_name: desired.table_name.clone(),
            status: status.clone(),
        };
    }

    let key_matches =
        state.partition_key.as_ref() == Some(&desired.partition_key) && state.sort_key.is_none();

    if key_matches {
        DeployPlan::NoChanges {
            table_name: desired.table_name.clone(),
        }
    } else {
        DeployPlan::KeySchemaMismatch {
            table_name: desired.table_name.clone(),
            expected: describe_key(Some(&desired.partition_key), None),
            found: describe_key(state.partition_key.as_ref(), state.sort_key.as_deref()),
        }
    }
}

/// Pure function: Calculate destroy plan.
pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    match current {
        Some(_) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { config } => vec![
            format!("+ Create table: {}", config.table_name),
            format!(
                "  Partition key: {} ({})",
                config.partition_key.name,
                config.partition_key.attribute_type.code()
            ),
            "  Billing: PAY_PER_REQUEST".to_string(),
        ],
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is up to date", table_name)]
        }
        DeployPlan::TableUnusable { table_name, status } => vec![
            format!("~ Table '{}' is in status {}", table_name, status),
            "  It cannot be used until it is restored or recreated".to_string(),
        ],
        DeployPlan::KeySchemaMismatch {
            table_name,
            expected,
            found,
        } => vec![
            format!("~ Table '{}' has an incompatible key schema", table_name),
            format!("  Expected: {}", expected),
            format!("  Found:    {}", found),
            "  Run with --destroy first to recreate it".to_string(),
        ],
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!(
                "- Delete table: {} (ALL DATA WILL BE LOST)",
                table_name
            )]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{}' does not exist", table_name)]
        }
    }
}

fn describe_key(partition_key: Option<&KeyAttribute>, sort_key: Option<&str>) -> String {
    let hash = match partition_key {
        Some(key) => format!("HASH {} ({})", key.name, key.attribute_type.code()),
        None => "no readable HASH key".to_string(),
    };
    match sort_key {
        Some(range) => format!("{}, RANGE {}", hash, range),
        None => hash,
    }
}

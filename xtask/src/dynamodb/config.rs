//! Table configuration types (Functional Core - pure data).

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB scalar attribute types usable in a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Binary,
}

impl AttributeType {
    /// The single-letter code DynamoDB uses for this type.
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

/// Returns the canonical table configuration for plays.
///
/// One item per play, keyed by the string `id`. No range key and no
/// secondary indexes: every read is either a point lookup or a full scan.
pub fn plays_table_config() -> TableConfig {
    TableConfig {
        table_name: "Plays".to_string(),
        partition_key: KeyAttribute {
            name: "id".to_string(),
            attribute_type: AttributeType::String,
        },
        billing_mode: BillingMode::PayPerRequest,
    }
}

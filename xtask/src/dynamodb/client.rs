//! AWS SDK client setup (Imperative Shell).

use super::config::{AttributeType, KeyAttribute};
use super::error::{DynamodbError, Result};
use super::planning::{TableState, TableStatus};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::{
    KeyType, ScalarAttributeType, TableDescription, TableStatus as SdkTableStatus,
};
use aws_sdk_dynamodb::Client;

/// AWS client configuration.
///
/// Reads the same variables as the server so `cargo xtask` and the running
/// service always point at the same store.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Use dummy credentials; local DynamoDB accepts any.
    pub static_credentials: bool,
}

impl Default for AwsConfig {
    fn default() -> Self {
        let endpoint_url = std::env::var("DYNAMODB_ENDPOINT")
            .or_else(|_| std::env::var("AWS_ENDPOINT_URL"))
            .ok()
            .filter(|url| !url.is_empty());
        let static_credentials =
            endpoint_url.is_some() && std::env::var("AWS_ACCESS_KEY_ID").is_err();

        Self {
            endpoint_url,
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            static_credentials,
        }
    }
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    if config.static_credentials {
        sdk_config_loader = sdk_config_loader.credentials_provider(Credentials::new(
            "dummy", "dummy", None, None, "xtask-local",
        ));
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Fetches current table state, returns None if table doesn't exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => match response.table() {
            Some(table) => Ok(Some(parse_table_state(table))),
            None => Ok(None),
        },
        Err(err) => {
            let not_found = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if not_found {
                Ok(None)
            } else {
                Err(DynamodbError::AwsSdk(err.to_string()))
            }
        }
    }
}

/// Only ACTIVE counts as active; a missing or unrecognised status is unusable.
fn parse_table_status(status: Option<&SdkTableStatus>) -> TableStatus {
    match status {
        Some(SdkTableStatus::Active) => TableStatus::Active,
        Some(SdkTableStatus::Creating) => TableStatus::Creating,
        Some(SdkTableStatus::Updating) => TableStatus::Updating,
        Some(SdkTableStatus::Deleting) => TableStatus::Deleting,
        Some(other) => TableStatus::Unusable(other.as_str().to_string()),
        None => TableStatus::Unusable("UNKNOWN".to_string()),
    }
}

fn parse_table_state(table: &TableDescription) -> TableState {
    let status = parse_table_status(table.table_status());

    let key_name = |key_type: KeyType| {
        table
            .key_schema()
            .iter()
            .find(|k| *k.key_type() == key_type)
            .map(|k| k.attribute_name().to_string())
    };

    let partition_key = key_name(KeyType::Hash).and_then(|name| {
        let attribute_type = table
            .attribute_definitions()
            .iter()
            .find(|a| a.attribute_name() == name)
            .and_then(|a| match a.attribute_type() {
                ScalarAttributeType::S => Some(AttributeType::String),
                ScalarAttributeType::N => Some(AttributeType::Number),
                ScalarAttributeType::B => Some(AttributeType::Binary),
                _ => None,
            })?;
        Some(KeyAttribute {
            name,
            attribute_type,
        })
    });

    TableState {
        status,
        partition_key,
        sort_key: key_name(KeyType::Range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::Active)),
            TableStatus::Active
        );
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::Creating)),
            TableStatus::Creating
        );
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::Deleting)),
            TableStatus::Deleting
        );
    }

    #[test]
    fn test_archived_and_inaccessible_tables_are_unusable() {
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::Archived)),
            TableStatus::Unusable("ARCHIVED".to_string())
        );
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::Archiving)),
            TableStatus::Unusable("ARCHIVING".to_string())
        );
        assert_eq!(
            parse_table_status(Some(&SdkTableStatus::InaccessibleEncryptionCredentials)),
            TableStatus::Unusable("INACCESSIBLE_ENCRYPTION_CREDENTIALS".to_string())
        );
    }

    #[test]
    fn test_missing_status_is_unusable() {
        assert!(matches!(
            parse_table_status(None),
            TableStatus::Unusable(_)
        ));
    }

    #[test]
    fn test_table_state_reads_key_schema() {
        use aws_sdk_dynamodb::types::{AttributeDefinition, KeySchemaElement};

        let table = TableDescription::builder()
            .table_status(SdkTableStatus::Active)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("id")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .build();

        let state = parse_table_state(&table);

        assert_eq!(state.status, TableStatus::Active);
        assert_eq!(
            state.partition_key,
            Some(KeyAttribute {
                name: "id".to_string(),
                attribute_type: AttributeType::String,
            })
        );
        assert_eq!(state.sort_key, None);
    }
}

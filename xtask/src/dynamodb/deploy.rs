//! Table deployment operations (Imperative Shell).

use super::client;
use super::config::{self, TableConfig};
use super::error::{DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan, TableStatus};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;

const MAX_WAIT_ATTEMPTS: u32 = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// Execute a deploy plan.
pub async fn execute_deploy_plan(client: &Client, plan: &DeployPlan) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { config } => {
            create_table(client, config).await?;
            wait_for_table_active(client, &config.table_name).await?;
        }
        DeployPlan::NoChanges { .. } => {
            // Nothing to do
        }
        DeployPlan::TableUnusable { table_name, status } => {
            return Err(DynamodbError::TableUnusable {
                table_name: table_name.clone(),
                status: status.clone(),
            });
        }
        DeployPlan::KeySchemaMismatch {
            table_name,
            expected,
            found,
        } => {
            return Err(DynamodbError::KeySchemaMismatch {
                table_name: table_name.clone(),
                expected: expected.clone(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            delete_table(client, table_name).await?;
            wait_for_table_gone(client, table_name).await?;
        }
        DestroyPlan::AlreadyGone { .. } => {
            // Nothing to do
        }
    }
    Ok(())
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let key_schema = KeySchemaElement::builder()
        .attribute_name(&config.partition_key.name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

    let attribute_definition = AttributeDefinition::builder()
        .attribute_name(&config.partition_key.name)
        .attribute_type(to_scalar_type(&config.partition_key.attribute_type))
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

    let billing_mode = match config.billing_mode {
        config::BillingMode::PayPerRequest => BillingMode::PayPerRequest,
    };

    client
        .create_table()
        .table_name(&config.table_name)
        .key_schema(key_schema)
        .attribute_definitions(attribute_definition)
        .billing_mode(billing_mode)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;
    Ok(())
}

async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..MAX_WAIT_ATTEMPTS {
        if let Some(state) = client::get_table_state(client, table_name).await? {
            match state.status {
                TableStatus::Active => return Ok(()),
                TableStatus::Unusable(status) => {
                    return Err(DynamodbError::TableUnusable {
                        table_name: table_name.to_string(),
                        status,
                    });
                }
                TableStatus::Creating | TableStatus::Updating | TableStatus::Deleting => {}
            }
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(DynamodbError::TableActivationTimeout {
        table_name: table_name.to_string(),
    })
}

async fn wait_for_table_gone(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..MAX_WAIT_ATTEMPTS {
        if client::get_table_state(client, table_name).await?.is_none() {
            return Ok(());
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(DynamodbError::TableDeletionTimeout {
        table_name: table_name.to_string(),
    })
}

fn to_scalar_type(attr_type: &config::AttributeType) -> ScalarAttributeType {
    match attr_type {
        config::AttributeType::String => ScalarAttributeType::S,
        config::AttributeType::Number => ScalarAttributeType::N,
        config::AttributeType::Binary => ScalarAttributeType::B,
    }
}

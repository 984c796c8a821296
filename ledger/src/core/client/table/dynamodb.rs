use crate::core::client::table::{TableClient, TableError};
use crate::core::cloud::CloudProvider;
use crate::types::migration::MigrationRecord;
use crate::types::table::{TableDescriptor, TableExistence, TableState};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::ProvideErrorMetadata;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Wire attribute names. `name` is the partition key.
const ATTR_NAME: &str = "name";
const ATTR_EXECUTED: &str = "executed";
const ATTR_CREATED_AT: &str = "createdAt";
const ATTR_UPDATED_AT: &str = "updatedAt";

/// DynamoDB implementation of [`TableClient`].
#[derive(Clone, Debug)]
pub struct DynamoTable {
    client: Client,
}

impl DynamoTable {
    /// Creates a new instance of DynamoTable with the provided AWS
    /// configuration. The DynamoDB config inherits retry, HTTP client and
    /// endpoint settings from the shared `SdkConfig`.
    pub fn new(aws_config: &SdkConfig) -> Self {
        let dynamo_config_builder = aws_sdk_dynamodb::config::Builder::from(aws_config);
        let client = Client::from_conf(dynamo_config_builder.build());
        Self { client }
    }

    pub fn from_provider(provider: &CloudProvider) -> Self {
        match provider {
            CloudProvider::AWS(aws_config) => Self::new(aws_config),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl TableClient for DynamoTable {
    #[tracing::instrument(skip(self), fields(function_type = "table_call"), err)]
    async fn describe_table(&self, table: &str) -> Result<TableExistence, TableError> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(output) => match output.table() {
                Some(description) => {
                    let descriptor = descriptor_from_sdk(table, description);
                    tracing::debug!(table = %table, state = %descriptor.state, category = "table_call", "Described table");
                    Ok(TableExistence::Found(descriptor))
                }
                None => Ok(TableExistence::NotFound),
            },
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_resource_not_found_exception()) {
                    tracing::debug!(table = %table, category = "table_call", "Table not found");
                    Ok(TableExistence::NotFound)
                } else {
                    Err(TableError::DescribeTableError(err))
                }
            }
        }
    }

    #[tracing::instrument(skip(self), fields(function_type = "table_call"), err)]
    async fn create_table(&self, table: &str) -> Result<(), TableError> {
        let key_attribute = AttributeDefinition::builder()
            .attribute_name(ATTR_NAME)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| TableError::InvalidDefinition(e.to_string()))?;
        let key_schema = KeySchemaElement::builder()
            .attribute_name(ATTR_NAME)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| TableError::InvalidDefinition(e.to_string()))?;

        match self
            .client
            .create_table()
            .table_name(table)
            .attribute_definitions(key_attribute)
            .key_schema(key_schema)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(table = %table, category = "table_call", "Requested table creation");
                Ok(())
            }
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_resource_in_use_exception()) {
                    Err(TableError::TableAlreadyExists(table.to_string()))
                } else {
                    Err(TableError::CreateTableError(err))
                }
            }
        }
    }

    #[tracing::instrument(skip(self), fields(function_type = "table_call"), err)]
    async fn update_table(&self, table: &str) -> Result<(), TableError> {
        // Re-assert the billing mode as the definition sync. The service
        // rejecting it with a validation error means nothing needed to
        // change, which is the steady-state answer for an existing table.
        match self
            .client
            .update_table()
            .table_name(table)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
        {
            Ok(_) => {
                tracing::debug!(table = %table, category = "table_call", "Updated table definition");
                Ok(())
            }
            Err(err) if err.code() == Some("ValidationException") => {
                tracing::debug!(table = %table, category = "table_call", "Table definition already up to date");
                Ok(())
            }
            Err(err) => Err(TableError::UpdateTableError(err)),
        }
    }

    #[tracing::instrument(skip(self, record), fields(function_type = "table_call", migration = %record.name), err)]
    async fn put_item(&self, table: &str, record: &MigrationRecord) -> Result<(), TableError> {
        self.client
            .put_item()
            .table_name(table)
            .item(ATTR_NAME, AttributeValue::S(record.name.clone()))
            .item(ATTR_EXECUTED, AttributeValue::Bool(record.executed))
            .item(ATTR_CREATED_AT, AttributeValue::S(record.created_at.to_rfc3339()))
            .item(ATTR_UPDATED_AT, AttributeValue::S(record.updated_at.to_rfc3339()))
            .send()
            .await?;

        tracing::debug!(table = %table, migration = %record.name, category = "table_call", "Upserted migration record");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(function_type = "table_call"), err)]
    async fn delete_item(&self, table: &str, name: &str) -> Result<(), TableError> {
        self.client
            .delete_item()
            .table_name(table)
            .key(ATTR_NAME, AttributeValue::S(name.to_string()))
            .send()
            .await?;

        tracing::debug!(table = %table, migration = %name, category = "table_call", "Deleted migration record");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(function_type = "table_call"), err)]
    async fn scan_items(&self, table: &str) -> Result<Vec<MigrationRecord>, TableError> {
        let mut records = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(table)
                .filter_expression("#executed = :executed")
                .expression_attribute_names("#executed", ATTR_EXECUTED)
                .expression_attribute_values(":executed", AttributeValue::Bool(true));

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request.send().await?;

            for item in response.items() {
                records.push(record_from_item(table, item)?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                }
                _ => break,
            }
        }

        tracing::debug!(table = %table, records = records.len(), category = "table_call", "Scanned migration records");
        Ok(records)
    }
}

fn descriptor_from_sdk(
    table: &str,
    description: &aws_sdk_dynamodb::types::TableDescription,
) -> TableDescriptor {
    let state = match description.table_status() {
        Some(TableStatus::Creating) => TableState::Creating,
        Some(TableStatus::Active) => TableState::Active,
        Some(TableStatus::Updating) => TableState::Updating,
        Some(TableStatus::Deleting) => TableState::Deleting,
        Some(other) => TableState::Unknown(other.as_str().to_string()),
        None => TableState::Unknown("UNREPORTED".to_string()),
    };
    TableDescriptor { name: description.table_name().unwrap_or(table).to_string(), state }
}

fn record_from_item(
    table: &str,
    item: &HashMap<String, AttributeValue>,
) -> Result<MigrationRecord, TableError> {
    let name = item
        .get(ATTR_NAME)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed(table, "missing or non-string 'name' attribute"))?
        .clone();

    let executed = item
        .get(ATTR_EXECUTED)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false);

    let created_at = parse_timestamp(table, item, ATTR_CREATED_AT)?;
    let updated_at = parse_timestamp(table, item, ATTR_UPDATED_AT)?;

    Ok(MigrationRecord { name, executed, created_at, updated_at })
}

fn parse_timestamp(
    table: &str,
    item: &HashMap<String, AttributeValue>,
    attribute: &str,
) -> Result<DateTime<Utc>, TableError> {
    let raw = item
        .get(attribute)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed(table, &format!("missing or non-string '{attribute}' attribute")))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| malformed(table, &format!("unparseable '{attribute}' timestamp: {e}")))
}

fn malformed(table: &str, reason: &str) -> TableError {
    TableError::MalformedRecord { table: table.to_string(), reason: reason.to_string() }
}

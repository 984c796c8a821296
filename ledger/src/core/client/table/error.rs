use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_table::UpdateTableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to describe table: {0}")]
    DescribeTableError(#[from] SdkError<DescribeTableError>),

    #[error("Failed to create table: {0}")]
    CreateTableError(#[from] SdkError<CreateTableError>),

    #[error("Failed to update table: {0}")]
    UpdateTableError(#[from] SdkError<UpdateTableError>),

    #[error("Failed to put item: {0}")]
    PutItemError(#[from] SdkError<PutItemError>),

    #[error("Failed to delete item: {0}")]
    DeleteItemError(#[from] SdkError<DeleteItemError>),

    #[error("Failed to scan table: {0}")]
    ScanError(#[from] SdkError<ScanError>),

    /// The service reported the table as already created; a lost create
    /// race lands here.
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("Invalid table definition: {0}")]
    InvalidDefinition(String),

    #[error("Malformed record in table '{table}': {reason}")]
    MalformedRecord { table: String, reason: String },
}

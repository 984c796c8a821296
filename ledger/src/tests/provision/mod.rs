use crate::core::client::table::{MockTableClient, TableError};
use crate::core::traits::resource::Resource;
use crate::provision::{ProvisionError, TableProvisioner};
use crate::tests::common::{active, found, transient_failure, update_failure};
use crate::types::params::{PollArgs, TableArgs};
use crate::types::table::{TableExistence, TableState};
use mockall::Sequence;
use rstest::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn provisioner_over(mock: MockTableClient) -> TableProvisioner {
    TableProvisioner::new(Arc::new(mock), TableArgs::default())
}

/// A freshly-absent table is created and then polled until the service
/// reports it ACTIVE.
#[rstest]
#[tokio::test(start_paused = true)]
async fn ensure_ready_creates_missing_table() {
    let mut mock = MockTableClient::new();
    let mut seq = Sequence::new();
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(TableExistence::NotFound));
    mock.expect_create_table().times(1).in_sequence(&mut seq).returning(|_| Ok(()));
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Ok(found(table, TableState::Creating)));
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Ok(active(table)));

    provisioner_over(mock).ensure_ready().await.unwrap();
}

/// A table that already exists gets the definition sync, never a create.
#[rstest]
#[tokio::test]
async fn ensure_ready_syncs_existing_table() {
    let mut mock = MockTableClient::new();
    mock.expect_describe_table().returning(|table| Ok(active(table)));
    mock.expect_update_table().times(1).returning(|_| Ok(()));
    mock.expect_create_table().times(0);

    provisioner_over(mock).ensure_ready().await.unwrap();
}

/// A transient describe failure surfaces as a provisioning error; it is
/// genuine absence that triggers a create, nothing else.
#[rstest]
#[tokio::test]
async fn transient_describe_failure_never_triggers_create() {
    let mut mock = MockTableClient::new();
    mock.expect_describe_table().times(1).returning(|_| Err(transient_failure()));
    mock.expect_create_table().times(0);

    let result = provisioner_over(mock).ensure_ready().await;

    assert!(matches!(result, Err(ProvisionError::DescribeTable(_))));
}

/// Losing the create race to a concurrent caller is success: the table
/// exists, which is all the caller wanted.
#[rstest]
#[tokio::test]
async fn ensure_ready_tolerates_lost_create_race() {
    let mut mock = MockTableClient::new();
    let mut seq = Sequence::new();
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(TableExistence::NotFound));
    mock.expect_create_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Err(TableError::TableAlreadyExists(table.to_string())));
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Ok(active(table)));

    provisioner_over(mock).ensure_ready().await.unwrap();
}

/// If the definition sync fails on an existing table, provisioning falls
/// back to the create path and accepts the already-exists answer.
#[rstest]
#[tokio::test]
async fn definition_sync_failure_falls_back_to_create() {
    let mut mock = MockTableClient::new();
    let mut seq = Sequence::new();
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Ok(active(table)));
    mock.expect_update_table().times(1).in_sequence(&mut seq).returning(|_| Err(update_failure()));
    mock.expect_create_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Err(TableError::TableAlreadyExists(table.to_string())));
    mock.expect_describe_table()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|table| Ok(active(table)));

    provisioner_over(mock).ensure_ready().await.unwrap();
}

/// A genuine create failure surfaces with the create phase tagged.
#[rstest]
#[tokio::test]
async fn create_failure_surfaces() {
    let mut mock = MockTableClient::new();
    mock.expect_describe_table().times(1).returning(|_| Ok(TableExistence::NotFound));
    mock.expect_create_table()
        .times(1)
        .returning(|_| Err(TableError::InvalidDefinition("rejected schema".to_string())));

    let result = provisioner_over(mock).ensure_ready().await;

    assert!(matches!(result, Err(ProvisionError::CreateTable(_))));
}

/// With a deadline configured, a table stuck in CREATING eventually fails
/// readiness instead of blocking forever.
#[rstest]
#[tokio::test(start_paused = true)]
async fn readiness_deadline_expires_on_stuck_table() {
    let mut mock = MockTableClient::new();
    let calls = AtomicUsize::new(0);
    mock.expect_describe_table().returning(move |table| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(TableExistence::NotFound)
        } else {
            Ok(found(table, TableState::Creating))
        }
    });
    mock.expect_create_table().times(1).returning(|_| Ok(()));

    let probe = PollArgs { interval: Duration::from_millis(500), deadline: Some(Duration::from_secs(2)) };
    let provisioner =
        TableProvisioner::with_probe(Arc::new(mock), TableArgs::default(), probe);

    let result = provisioner.ensure_ready().await;

    assert!(matches!(result, Err(ProvisionError::ReadinessDeadline(table)) if table == "migrations"));
}

/// Concurrent `ensure_ready` calls against a freshly-absent table all
/// converge: at most one create wins and every caller ends up observing an
/// ACTIVE table.
#[rstest]
#[tokio::test(start_paused = true)]
async fn concurrent_ensure_ready_converges() {
    let mut mock = MockTableClient::new();
    let describes = AtomicUsize::new(0);
    mock.expect_describe_table().returning(move |table| {
        if describes.fetch_add(1, Ordering::SeqCst) < 2 {
            Ok(TableExistence::NotFound)
        } else {
            Ok(active(table))
        }
    });
    let creates = AtomicUsize::new(0);
    mock.expect_create_table().returning(move |table| {
        if creates.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(())
        } else {
            Err(TableError::TableAlreadyExists(table.to_string()))
        }
    });
    mock.expect_update_table().returning(|_| Ok(()));

    let client: Arc<MockTableClient> = Arc::new(mock);
    let first = TableProvisioner::new(client.clone(), TableArgs::default());
    let second = TableProvisioner::new(client, TableArgs::default());

    let (a, b) = tokio::join!(first.ensure_ready(), second.ensure_ready());
    a.unwrap();
    b.unwrap();
}

/// `check_if_exists` reports presence without judging readiness: a table
/// still CREATING already exists.
#[rstest]
#[case(TableState::Creating)]
#[case(TableState::Active)]
#[tokio::test]
async fn check_if_exists_reports_presence(#[case] state: TableState) {
    let mut mock = MockTableClient::new();
    let state_for_mock = state.clone();
    mock.expect_describe_table().returning(move |table| Ok(found(table, state_for_mock.clone())));

    let provisioner = provisioner_over(mock);

    assert!(provisioner.check_if_exists(&TableArgs::default()).await.unwrap());
}

/// An absent table is simply not there yet for readiness purposes; the
/// create just issued may not be visible to describe.
#[rstest]
#[tokio::test]
async fn absent_table_is_not_ready() {
    let mut mock = MockTableClient::new();
    mock.expect_describe_table().returning(|_| Ok(TableExistence::NotFound));

    let provisioner = provisioner_over(mock);

    assert!(!provisioner.is_ready_to_use(&TableArgs::default()).await.unwrap());
    assert!(!provisioner.check_if_exists(&TableArgs::default()).await.unwrap());
}

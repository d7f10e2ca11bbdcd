//! Counter allocation tests for [`PostgresTemplateRepository`].
//!
//! [`PostgresTemplateRepository`]: taskledger::template::adapters::postgres::PostgresTemplateRepository

use crate::postgres::helpers::{BoxError, harness};
use diesel::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use taskledger::template::{
    domain::{TaskIdPrefix, TaskIdentifier},
    ports::TemplateRepositoryError,
    services::{RegisterTemplateRequest, TemplateRegistryError},
};

const CONCURRENT_SAVES: u64 = 24;

fn payables(activity: &str) -> RegisterTemplateRequest {
    RegisterTemplateRequest::new("Contas a Pagar", activity, 1, "Monthly")
}

/// Parallel saves over a shared pool receive exactly the numbers `1..=N`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_receive_gapless_numbers() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    let registry = Arc::new(pg.registry);

    let mut handles = Vec::new();
    for index in 0..CONCURRENT_SAVES {
        let worker = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            worker.register(payables(&format!("Batch {index}"))).await
        }));
    }
    let mut numbers = Vec::new();
    for handle in handles {
        let template = handle.await??;
        let number = template
            .task_id()
            .and_then(TaskIdentifier::sequence_number)
            .ok_or("saved template lacks a numbered identifier")?;
        numbers.push(number.value());
    }
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=CONCURRENT_SAVES).collect::<Vec<_>>());
    assert_eq!(
        registry.counter(&TaskIdPrefix::new("CL-CAP")?).await?,
        Some(CONCURRENT_SAVES)
    );
    Ok(())
}

/// A rejected insert takes the counter increment down with it.
#[tokio::test(flavor = "multi_thread")]
async fn failed_save_leaves_counter_unchanged() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    pg.registry.register(payables("Pay suppliers")).await?;

    let result = pg
        .registry
        .register(payables("Imported task").with_task_id("CL-CAP-000001"))
        .await;

    assert!(matches!(
        result,
        Err(TemplateRegistryError::Repository(
            TemplateRepositoryError::DuplicateTaskIdentifier(_)
        ))
    ));
    assert_eq!(pg.registry.counter(&TaskIdPrefix::new("CL-CAP")?).await?, Some(1));
    Ok(())
}

/// An imported identifier in the allocator's layout pushes the counter past
/// it, so later saves for the prefix keep succeeding.
#[tokio::test(flavor = "multi_thread")]
async fn imported_identifier_moves_counter_past_it() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    pg.registry
        .register(payables("Imported task").with_task_id("CL-CAP-000001"))
        .await?;

    let next = pg.registry.register(payables("Pay suppliers")).await?;

    assert_eq!(
        next.task_id().map(TaskIdentifier::as_str),
        Some("CL-CAP-000002")
    );
    assert_eq!(pg.registry.counter(&TaskIdPrefix::new("CL-CAP")?).await?, Some(2));
    Ok(())
}

/// Waiting on a locked counter row past the lock timeout fails without
/// touching the counter.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lock_timeout_surfaces_as_retryable_failure() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_millis(200))? else {
        return Ok(());
    };
    let prefix = TaskIdPrefix::new("LK-TST")?;
    pg.registry.allocate(&prefix).await?;

    let mut holder = pg.pool.get()?;
    let handle = tokio::runtime::Handle::current();
    let attempt = holder.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::sql_query("SELECT last_number FROM task_id_counters WHERE prefix = 'LK-TST' FOR UPDATE")
            .execute(conn)?;
        Ok(tokio::task::block_in_place(|| {
            handle.block_on(pg.registry.allocate(&prefix))
        }))
    })?;

    let err = attempt.expect_err("allocation should time out behind the held lock");
    assert!(err.is_retryable());
    assert_eq!(pg.registry.counter(&prefix).await?, Some(1));
    Ok(())
}

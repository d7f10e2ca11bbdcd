//! Identifier allocation tests for the in-memory template repository.

use crate::in_memory::helpers::{Services, payables, services};
use rstest::rstest;
use std::sync::Arc;
use taskledger::template::{
    domain::{TaskIdPrefix, TaskIdentifier},
    services::RegisterTemplateRequest,
};

const CONCURRENT_SAVES: u64 = 32;

/// Parallel first saves for one prefix receive exactly the numbers `1..=N`.
#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_receive_gapless_numbers(
    services: Services,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = Arc::new(services.registry);
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
    let prefix = TaskIdPrefix::new("CL-CAP")?;
    assert_eq!(registry.counter(&prefix).await?, Some(CONCURRENT_SAVES));
    Ok(())
}

/// Sectors whose names abbreviate alike draw from one counter, so their
/// identifiers never collide.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sectors_with_same_abbreviation_share_a_counter(
    services: Services,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let first = services.registry.register(payables("Pay suppliers")).await?;
    let other = services
        .registry
        .register(
            RegisterTemplateRequest::new(
                "Contabilidade Avançada Plena",
                "Close the books",
                0,
                "Monthly",
            ),
        )
        .await?;
    let second = services.registry.register(payables("Archive receipts")).await?;

    let ids: Vec<&str> = [&first, &other, &second]
        .iter()
        .filter_map(|template| template.task_id().map(TaskIdentifier::as_str))
        .collect();
    assert_eq!(ids, vec!["CL-CAP-000001", "CL-CAP-000002", "CL-CAP-000003"]);
    Ok(())
}

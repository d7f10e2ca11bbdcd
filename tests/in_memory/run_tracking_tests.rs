//! Run tracking tests against in-memory repositories.

use crate::in_memory::helpers::{Services, payables, services};
use chrono::{Days, Local};
use rstest::rstest;
use std::sync::Arc;
use taskledger::run::{
    domain::{RunFilter, RunStatus},
    services::ScheduleRunRequest,
};

/// A run scheduled for today reads as due today until it is completed.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_lifecycle_from_schedule_to_completion(
    services: Services,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = Local::now().date_naive();
    let template = services.registry.register(payables("Pay suppliers")).await?;

    let scheduled = services
        .tracking
        .schedule(ScheduleRunRequest::new(template.id()).with_due_date(today))
        .await?;
    assert_eq!(scheduled.status, RunStatus::DueToday);

    let completed = services
        .tracking
        .complete(scheduled.run.id(), today, Some("Ana"))
        .await?;
    assert_eq!(completed.status, RunStatus::Completed);

    let listed = services.tracking.list_for_template(template.id()).await?;
    assert_eq!(listed, vec![completed]);
    Ok(())
}

/// Text search resolves the owning template's identifier.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_by_template_identifier(
    services: Services,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = Local::now().date_naive();
    let later = today.checked_add_days(Days::new(7)).ok_or("date overflow")?;
    let first = services.registry.register(payables("Pay suppliers")).await?;
    let second = services.registry.register(payables("Archive receipts")).await?;
    for template in [&first, &second] {
        services
            .tracking
            .schedule(ScheduleRunRequest::new(template.id()).with_due_date(later))
            .await?;
    }

    let found = services
        .tracking
        .search(&RunFilter::new().with_text("CL-CAP-000002"))
        .await?;

    assert_eq!(found.len(), 1);
    assert!(found.iter().all(|tracked| tracked.run.template_id() == second.id()));
    assert!(found.iter().all(|tracked| tracked.status == RunStatus::InProgress));
    Ok(())
}

/// Concurrent completions of one run leave exactly one recorded winner.
#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_record_one_winner(
    services: Services,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = Local::now().date_naive();
    let template = services.registry.register(payables("Pay suppliers")).await?;
    let scheduled = services
        .tracking
        .schedule(ScheduleRunRequest::new(template.id()).with_due_date(today))
        .await?;
    let run_id = scheduled.run.id();
    let tracking = Arc::new(services.tracking);

    let handles: Vec<_> = ["Ana", "Bruno", "Carla", "Davi"]
        .into_iter()
        .map(|person| {
            let worker = Arc::clone(&tracking);
            tokio::spawn(async move { worker.complete(run_id, today, Some(person)).await })
        })
        .collect();
    let mut successes = 0;
    for handle in handles {
        if handle.await?.is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    Ok(())
}

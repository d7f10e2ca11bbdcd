//! Run persistence tests for [`PostgresRunRepository`].
//!
//! [`PostgresRunRepository`]: taskledger::run::adapters::postgres::PostgresRunRepository

use crate::postgres::helpers::{BoxError, harness};
use chrono::{Days, Local};
use std::sync::Arc;
use std::time::Duration;
use taskledger::run::{
    domain::{RunDomainError, RunFilter, RunStatus},
    ports::RunRepositoryError,
    services::{RunTrackingError, ScheduleRunRequest},
};
use taskledger::template::{domain::TemplateId, services::RegisterTemplateRequest};

/// Runs are listed by due date with unscheduled runs last.
#[tokio::test(flavor = "multi_thread")]
async fn runs_round_trip_in_schedule_order() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    let today = Local::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).ok_or("date overflow")?;
    let next_week = today.checked_add_days(Days::new(7)).ok_or("date overflow")?;
    let template = pg
        .registry
        .register(RegisterTemplateRequest::new("Contas a Pagar", "Pay suppliers", 1, "Monthly"))
        .await?;

    for request in [
        ScheduleRunRequest::new(template.id()).with_due_date(next_week),
        ScheduleRunRequest::new(template.id()),
        ScheduleRunRequest::new(template.id())
            .with_start_date(yesterday)
            .with_due_date(yesterday),
    ] {
        pg.tracking.schedule(request).await?;
    }

    let listed = pg.tracking.list_for_template(template.id()).await?;
    let statuses: Vec<RunStatus> = listed.iter().map(|tracked| tracked.status).collect();

    assert_eq!(
        statuses,
        vec![RunStatus::Overdue, RunStatus::InProgress, RunStatus::NeedsScheduling]
    );
    Ok(())
}

/// Completion is persisted and cannot be repeated.
#[tokio::test(flavor = "multi_thread")]
async fn completion_is_persisted_once() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    let today = Local::now().date_naive();
    let template = pg
        .registry
        .register(RegisterTemplateRequest::new("Financeiro", "Close the books", 0, "Monthly"))
        .await?;
    let scheduled = pg
        .tracking
        .schedule(ScheduleRunRequest::new(template.id()).with_due_date(today))
        .await?;

    pg.tracking
        .complete(scheduled.run.id(), today, Some("Ana"))
        .await?;
    let again = pg.tracking.complete(scheduled.run.id(), today, None).await;
    let stored = pg
        .tracking
        .find_by_id(scheduled.run.id())
        .await?
        .ok_or("run exists")?;
    let done_today = pg
        .tracking
        .search(&RunFilter::new().with_done_from(today).with_done_until(today))
        .await?;

    assert!(matches!(
        again,
        Err(RunTrackingError::Domain(RunDomainError::AlreadyCompleted { .. }))
    ));
    assert_eq!(stored.run.done_by(), Some("Ana"));
    assert_eq!(stored.status, RunStatus::Completed);
    assert_eq!(done_today.len(), 1);
    Ok(())
}

/// Runs cannot be scheduled for templates that do not exist.
#[tokio::test(flavor = "multi_thread")]
async fn unknown_template_is_rejected() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };

    let result = pg
        .tracking
        .schedule(ScheduleRunRequest::new(TemplateId::new()))
        .await;

    assert!(matches!(
        result,
        Err(RunTrackingError::Repository(RunRepositoryError::TemplateNotFound(_)))
    ));
    Ok(())
}

/// Of two concurrent completions of one run, exactly one is recorded.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_record_one_winner() -> Result<(), BoxError> {
    let Some(pg) = harness(Duration::from_secs(5))? else {
        return Ok(());
    };
    let today = Local::now().date_naive();
    let template = pg
        .registry
        .register(RegisterTemplateRequest::new("Financeiro", "Close the books", 0, "Monthly"))
        .await?;
    let scheduled = pg
        .tracking
        .schedule(ScheduleRunRequest::new(template.id()).with_due_date(today))
        .await?;
    let run_id = scheduled.run.id();
    let tracking = Arc::new(pg.tracking);

    let handles: Vec<_> = ["Ana", "Bruno"]
        .into_iter()
        .map(|person| {
            let worker = Arc::clone(&tracking);
            tokio::spawn(async move { worker.complete(run_id, today, Some(person)).await })
        })
        .collect();
    let mut winners = Vec::new();
    let mut rejected = 0;
    for handle in handles {
        match handle.await? {
            Ok(tracked) => winners.push(tracked.run.done_by().map(str::to_owned)),
            Err(
                RunTrackingError::Domain(RunDomainError::AlreadyCompleted { .. })
                | RunTrackingError::Repository(RunRepositoryError::AlreadyCompleted(_)),
            ) => rejected += 1,
            Err(other) => return Err(other.into()),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(rejected, 1);
    let stored = tracking.find_by_id(run_id).await?.ok_or("run exists")?;
    assert_eq!(
        stored.run.done_by().map(str::to_owned),
        winners.into_iter().next().flatten()
    );
    Ok(())
}

//! End-to-end lifecycle tests: events in, committed history out.

mod common;

use std::sync::Arc;

use chrono::Duration;

use common::*;
use printjob_history::{
    HistoryError, HistoryEvent, PrintEvent, PrintOutcome, Providers, ReconcilerState,
};

fn all_providers() -> Providers {
    Providers::none()
        .with_file_metadata(Arc::new(SlicerMetadata(12.345)))
        .with_preheat(Arc::new(FixedPreheat::tool_and_bed(215.0, 60.0)))
        .with_filament(Arc::new(SelectedSpool))
        .with_layer_progress(Arc::new(LayerTracker))
}

#[test]
fn test_full_print_with_every_provider() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(all_providers());
    let file = file_info("benchy.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    for n in 1..=3 {
        reconciler
            .handle_event(PrintEvent::LayerChanged(layer(n, 120)))
            .unwrap();
    }
    harness.clock.advance(Duration::minutes(95));
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();

    let stored = harness.store.load_all().unwrap();
    assert_eq!(stored.len(), 1);
    let job = &stored[0];
    assert!(job.id.is_some());
    assert_eq!(job.started_at, jan_first(10, 0));
    assert_eq!(job.ended_at, Some(jan_first(11, 35)));
    assert_eq!(job.outcome, Some(PrintOutcome::Success));
    assert_eq!(job.printed_layers_label.as_deref(), Some("3/120"));
    assert_eq!(job.printed_height_label.as_deref(), Some("0.6/24.0"));

    let sensors: Vec<_> = job
        .temperature_samples
        .iter()
        .map(|t| (t.sensor_name.as_str(), t.sensor_value_celsius))
        .collect();
    assert_eq!(sensors, vec![("tool0", 215.0), ("bed", 60.0)]);

    let filament = job.filament.as_ref().unwrap();
    assert_eq!(filament.calculated_length_mm, Some(12.345));
    assert_eq!(filament.used_length_mm, Some(1198.25));
    assert_eq!(filament.spool_name.as_deref(), Some("Galaxy Black"));
    assert_eq!(filament.spool_cost_unit.as_deref(), Some("€"));
    assert_eq!(filament.material_vendor.as_deref(), Some("Prusament"));
}

#[test]
fn test_repeated_terminal_events_commit_once() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(Providers::none());
    let file = file_info("cube.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintCancelled(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintFailed(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();

    assert_eq!(harness.store.count().unwrap(), 1);
    assert_eq!(reconciler.state(), &ReconcilerState::Idle);
    let stored = harness.store.load_all().unwrap();
    assert_eq!(stored[0].outcome, Some(PrintOutcome::Canceled));
}

#[test]
fn test_no_providers_degrades_to_empty_fields() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(Providers::none());
    let file = file_info("bracket.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    harness.clock.advance(Duration::minutes(12));
    reconciler
        .handle_event(PrintEvent::PrintFailed(file))
        .unwrap();

    let job = reconciler.last_committed().unwrap();
    assert!(job.printed_layers_label.is_none());
    assert!(job.printed_height_label.is_none());
    assert!(job.temperature_samples.is_empty());
    let filament = job.filament.as_ref().unwrap();
    assert_eq!(filament, &printjob_history::FilamentUsage::default());
    assert_eq!(harness.store.count().unwrap(), 1);
}

#[test]
fn test_failing_filament_provider_degrades() {
    let harness = TestHarness::new();
    let providers = Providers::none()
        .with_file_metadata(Arc::new(SlicerMetadata(512.0)))
        .with_filament(Arc::new(FailingFilament));
    let mut reconciler = harness.reconciler(providers);
    let file = file_info("hook.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();

    let stored = harness.store.load_all().unwrap();
    let filament = stored[0].filament.as_ref().unwrap();
    assert_eq!(filament.calculated_length_mm, Some(512.0));
    assert!(filament.used_length_mm.is_none());
    assert!(filament.spool_name.is_none());
}

#[test]
fn test_unusable_preheat_reading_still_records_the_print() {
    let harness = TestHarness::new();
    let providers =
        Providers::none().with_preheat(Arc::new(FixedPreheat::tool_and_bed(f64::NAN, 60.0)));
    let mut reconciler = harness.reconciler(providers);
    let file = file_info("nan.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();

    assert_eq!(harness.row_count("print_jobs"), 1);
    assert_eq!(harness.row_count("temperatures"), 0);
    assert_eq!(reconciler.state(), &ReconcilerState::Idle);
}

#[test]
fn test_events_before_start_are_ignored() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(Providers::none());

    reconciler
        .handle_event(PrintEvent::LayerChanged(layer(1, 10)))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file_info("ghost.gcode")))
        .unwrap();

    assert_eq!(reconciler.state(), &ReconcilerState::Idle);
    assert_eq!(harness.store.count().unwrap(), 0);
}

#[test]
fn test_second_start_abandons_uncommitted_job() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(Providers::none());

    reconciler
        .handle_event(PrintEvent::PrintStarted(file_info("first.gcode")))
        .unwrap();
    harness.clock.advance(Duration::minutes(5));
    reconciler
        .handle_event(PrintEvent::PrintStarted(file_info("second.gcode")))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file_info("second.gcode")))
        .unwrap();

    let stored = harness.store.load_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_name.as_deref(), Some("second.gcode"));
    assert_eq!(stored[0].started_at, jan_first(10, 5));
}

#[test]
fn test_notifications_follow_the_lifecycle() {
    let harness = TestHarness::new();
    let mut rx = harness.broadcaster.subscribe();
    let mut reconciler = harness.reconciler(Providers::none());
    let file = file_info("vase.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file.clone()))
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        HistoryEvent::PrintStarted {
            file_name: Some("vase.gcode".to_string())
        }
    );
    let id = reconciler.last_committed().unwrap().id.unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        HistoryEvent::PrintFinished {
            database_id: id,
            outcome: PrintOutcome::Success
        }
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_store_failure_keeps_job_for_retry() {
    let harness = TestHarness::new();
    let mut reconciler = harness.reconciler(Providers::none());
    let file = file_info("retry.gcode");

    reconciler
        .handle_event(PrintEvent::PrintStarted(file.clone()))
        .unwrap();
    harness
        .store
        .database()
        .with_conn(|conn| {
            conn.execute_batch("ALTER TABLE temperatures RENAME TO temperatures_moved;")?;
            Ok(())
        })
        .unwrap();

    let err = reconciler
        .handle_event(PrintEvent::PrintDone(file.clone()))
        .unwrap_err();
    assert!(matches!(err, HistoryError::StorageWrite(_)));
    assert_eq!(harness.row_count("print_jobs"), 0);
    assert!(reconciler.current_job().unwrap().ended_at.is_none());

    harness
        .store
        .database()
        .with_conn(|conn| {
            conn.execute_batch("ALTER TABLE temperatures_moved RENAME TO temperatures;")?;
            Ok(())
        })
        .unwrap();
    reconciler
        .handle_event(PrintEvent::PrintDone(file))
        .unwrap();
    assert_eq!(harness.store.count().unwrap(), 1);
}

#[test]
fn test_client_opened_reports_missing_providers() {
    let harness = TestHarness::new();
    let mut rx = harness.broadcaster.subscribe();
    let flag = Arc::new(std::sync::atomic::AtomicBool::new(true));
    let mut reconciler = harness
        .reconciler(Providers::none().with_layer_progress(Arc::new(LayerTracker)))
        .with_dependency_check(flag);

    reconciler.handle_event(PrintEvent::ClientOpened).unwrap();

    match rx.try_recv().unwrap() {
        HistoryEvent::MissingPlugin { providers, message } => {
            assert_eq!(providers.len(), 2);
            assert_eq!(
                message,
                "<ul><li>PreHeat</li><li>FilamentManager</li></ul>"
            );
        }
        other => panic!("unexpected event {:?}", other),
    }
}

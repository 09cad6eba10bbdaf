//! # Firmware Reload Tests
//!
//! A threaded step that overlaps a firmware image replacement must come back as a reboot request.

use std::fs;
use std::path::PathBuf;

use guestlink_core::common::GuestError;
use guestlink_core::controller::ImageWatch;
use guestlink_core::session::GuestFactory;
use guestlink_core::{Controller, StepResult};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{TempImage, epoch_plus, set_mtime};
use crate::common::mocks::{MockInterp, factory_of, started_guest, stepping_guest};

/// A guest whose step touches the image at `path`, then returns `result` or faults on `None`.
fn touching_guest(path: PathBuf, result: Option<StepResult>) -> MockInterp {
    let mut guest = started_guest();
    guest.expect_step().returning(move |_| {
        set_mtime(&path, epoch_plus(2_000));
        result
            .clone()
            .ok_or_else(|| GuestError::Fault("IndexError".into()))
    });
    guest
}

fn watched(guest: MockInterp, image: &TempImage) -> Controller<impl GuestFactory> {
    let controller = Controller::new(factory_of(vec![guest]), ImageWatch::new(image.path()));
    assert!(controller.initialize());
    controller
}

#[test]
fn test_unchanged_image_passes_result_through() {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = watched(stepping_guest(StepResult::Sleep { ticks: 4 }), &image);

    assert_eq!(
        controller.run_threaded(false),
        Some(StepResult::Sleep { ticks: 4 })
    );
    assert_eq!(controller.stats().forced_reloads, 0);
}

#[rstest]
#[case::cont(Some(StepResult::Continue))]
#[case::sleep(Some(StepResult::Sleep { ticks: 10 }))]
#[case::shutdown(Some(StepResult::Shutdown { reboot: false }))]
fn test_image_change_during_step_forces_reboot(#[case] outcome: Option<StepResult>) {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = watched(touching_guest(image.path(), outcome), &image);

    assert_eq!(
        controller.run_threaded(false),
        Some(StepResult::Shutdown { reboot: true })
    );
    let stats = controller.stats();
    assert_eq!(stats.forced_reloads, 1);
    assert_eq!(stats.step_failures, 0);
}

#[test]
fn test_failed_step_reports_error_despite_image_change() {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = watched(touching_guest(image.path(), None), &image);

    match controller.run_threaded(false) {
        Some(StepResult::Error(message)) => assert!(message.contains("IndexError"), "{message}"),
        other => panic!("expected error result, got {other:?}"),
    }
    let stats = controller.stats();
    assert_eq!(stats.step_failures, 1);
    assert_eq!(stats.forced_reloads, 0);
}

#[test]
fn test_panicking_step_reports_error_despite_image_change() {
    let image = TempImage::new(epoch_plus(1_000));
    let path = image.path();

    let mut guest = started_guest();
    guest.expect_step().returning(move |_| {
        set_mtime(&path, epoch_plus(2_000));
        panic!("interpreter bug")
    });
    let controller = watched(guest, &image);

    assert!(matches!(
        controller.run_threaded(false),
        Some(StepResult::Error(ref m)) if m.contains("interpreter bug")
    ));
    assert_eq!(controller.stats().forced_reloads, 0);
}

#[test]
fn test_change_between_steps_is_not_a_reload() {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = watched(stepping_guest(StepResult::Continue), &image);

    set_mtime(&image.path(), epoch_plus(5_000));
    assert_eq!(controller.run_threaded(false), Some(StepResult::Continue));
    assert_eq!(controller.stats().forced_reloads, 0);
}

#[test]
fn test_missing_image_never_triggers() {
    let dir = tempfile::tempdir().unwrap();
    let controller = Controller::new(
        factory_of(vec![stepping_guest(StepResult::Continue)]),
        ImageWatch::new(dir.path().join("absent.img")),
    );
    assert!(controller.initialize());
    assert_eq!(controller.run_threaded(false), Some(StepResult::Continue));
}

#[test]
fn test_image_removed_during_step_is_not_a_change() {
    let image = TempImage::new(epoch_plus(1_000));
    let path = image.path();

    let mut guest = started_guest();
    guest.expect_step().returning(move |_| {
        fs::remove_file(&path).unwrap();
        Ok(StepResult::Continue)
    });
    let controller = watched(guest, &image);

    assert_eq!(controller.run_threaded(false), Some(StepResult::Continue));
    assert_eq!(controller.stats().forced_reloads, 0);
}

#[test]
fn test_disabled_watch_ignores_change() {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = Controller::new(
        factory_of(vec![touching_guest(image.path(), Some(StepResult::Continue))]),
        ImageWatch::disabled(),
    );
    assert!(controller.initialize());
    assert_eq!(controller.run_threaded(false), Some(StepResult::Continue));
}

#[test]
fn test_synchronized_step_is_not_watched() {
    let image = TempImage::new(epoch_plus(1_000));
    let controller = watched(
        touching_guest(image.path(), Some(StepResult::Sleep { ticks: 2 })),
        &image,
    );

    controller.run_synchronized();
    assert_eq!(
        controller.run_threaded(true),
        Some(StepResult::Sleep { ticks: 2 })
    );
    assert_eq!(controller.stats().forced_reloads, 0);
}

#[test]
fn test_last_modified_reads_image_time() {
    let image = TempImage::new(epoch_plus(1_234));
    let watch = ImageWatch::new(image.path());
    assert_eq!(watch.last_modified(), Some(epoch_plus(1_234)));
    assert_eq!(watch.path(), Some(image.path().as_path()));
    assert_eq!(ImageWatch::disabled().last_modified(), None);
}

#[rstest]
#[case::both_absent(None, None, false)]
#[case::appeared(None, Some(2), false)]
#[case::vanished(Some(1), None, false)]
#[case::same(Some(1), Some(1), false)]
#[case::differ(Some(1), Some(2), true)]
fn test_changed_requires_two_differing_samples(
    #[case] before: Option<u64>,
    #[case] after: Option<u64>,
    #[case] expected: bool,
) {
    assert_eq!(
        ImageWatch::changed(before.map(epoch_plus), after.map(epoch_plus)),
        expected
    );
}

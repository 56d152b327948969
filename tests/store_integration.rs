// SPDX-License-Identifier: MPL-2.0
//! Observer behavior of the store across fields.

use approx::assert_relative_eq;
use clipcut::domain::{ExportFormat, ExportQuality, VideoMetadata};
use clipcut::error::{Error, StoreError};
use clipcut::media::VideoDescriptor;
use clipcut::state::{Field, Store, TrimHandle};
use std::cell::RefCell;
use std::rc::Rc;

const MIB: u64 = 1024 * 1024;

fn clip(name: &str, size: u64, duration_secs: f64) -> VideoDescriptor {
    let mut video = VideoDescriptor::new(format!("/clips/{name}"), size, None);
    video.apply_metadata(&VideoMetadata::new(1920, 1080, duration_secs));
    video
}

/// Subscribes to every field and records which ones fire, in order.
fn watch_all(store: &mut Store) -> Rc<RefCell<Vec<Field>>> {
    let fired = Rc::new(RefCell::new(Vec::new()));
    for field in Field::ALL {
        let log = Rc::clone(&fired);
        store.subscribe(field, move |value| {
            log.borrow_mut().push(value.field());
            Ok(())
        });
    }
    fired
}

#[test]
fn selecting_a_clip_fires_each_affected_field_once() {
    let mut store = Store::new();
    let fired = watch_all(&mut store);

    store
        .set_current_video(Some(clip("a.mp4", 10 * MIB, 20.0)))
        .expect("select");

    assert_eq!(
        *fired.borrow(),
        vec![
            Field::CurrentVideo,
            Field::TrimRange,
            Field::Playback,
            Field::ExportSettings
        ]
    );
}

#[test]
fn trim_subscriber_sees_full_clip_after_selection() {
    let mut store = Store::new();
    let ranges = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&ranges);
    store.subscribe(Field::TrimRange, move |value| {
        if let Some(range) = value.as_trim_range() {
            log.borrow_mut().push(*range);
        }
        Ok(())
    });

    store
        .set_current_video(Some(clip("a.mp4", 10 * MIB, 42.5)))
        .expect("select");

    let ranges = ranges.borrow();
    assert_eq!(ranges.len(), 1);
    assert_relative_eq!(ranges[0].start, 0.0);
    assert_relative_eq!(ranges[0].end, 42_500.0);
}

#[test]
fn trimming_half_the_clip_halves_the_estimate() {
    let mut store = Store::new();
    store
        .set_current_video(Some(clip("a.mp4", 100 * MIB, 60.0)))
        .expect("select");
    let full = store.state().export_settings.estimated_size;

    store.set_trim_range(0.0, 30_000.0).expect("trim");

    let half = store.state().export_settings.estimated_size;
    assert!(full.abs_diff(2 * half) <= 1, "{full} vs {half}");
}

#[test]
fn format_and_quality_drive_the_estimate() {
    let mut store = Store::new();
    store
        .set_current_video(Some(clip("a.mp4", 1_000_000, 10.0)))
        .expect("select");
    // medium mp4 keeps half the source
    assert_eq!(store.state().export_settings.estimated_size, 500_000);

    store.set_export_format(ExportFormat::Gif).expect("format");
    assert_eq!(store.state().export_settings.estimated_size, 1_250_000);

    store.set_export_quality(ExportQuality::Strong).expect("quality");
    let first = store.state().export_settings.estimated_size;
    store.set_export_quality(ExportQuality::Strong).expect("quality");
    assert_eq!(store.state().export_settings.estimated_size, first);
    assert_eq!(first, 750_000);
}

#[test]
fn trim_handles_cannot_cross() {
    let mut store = Store::new();
    store
        .set_current_video(Some(clip("a.mp4", MIB, 100.0)))
        .expect("select");

    store.set_trim_handle(TrimHandle::End, 0.25).expect("end");
    store.set_trim_handle(TrimHandle::Start, 0.75).expect("start");

    let range = store.state().trim_range;
    assert_relative_eq!(range.start, 25_000.0);
    assert_relative_eq!(range.end, 25_000.0);
}

#[test]
fn failing_observer_keeps_the_change() {
    let mut store = Store::new();
    let later = Rc::new(RefCell::new(0));
    store.subscribe(Field::CurrentVideo, |_| {
        Err(Error::Subscriber("panel closed".to_string()))
    });
    let count = Rc::clone(&later);
    store.subscribe(Field::TrimRange, move |_| {
        *count.borrow_mut() += 1;
        Ok(())
    });

    let err = store
        .set_current_video(Some(clip("a.mp4", MIB, 5.0)))
        .expect_err("observer fails");

    assert!(matches!(err, Error::Subscriber(_)));
    assert!(store.state().current_video.is_some());
    assert_eq!(*later.borrow(), 0);
}

#[test]
fn blocked_clip_never_reaches_observers() {
    let mut store = Store::new();
    let fired = watch_all(&mut store);

    let err = store
        .set_current_video(Some(clip("huge.mp4", 800 * MIB, 600.0)))
        .expect_err("blocked");

    assert!(matches!(err, Error::Store(StoreError::BlockedVideo(_))));
    assert!(fired.borrow().is_empty());
}

#[test]
fn library_selection_and_unsubscribe() {
    let mut store = Store::new();
    let fired = Rc::new(RefCell::new(0));
    let count = Rc::clone(&fired);
    let sub = store.subscribe(Field::VideoLibrary, move |value| {
        assert_eq!(value.as_video_library().map(<[_]>::len), Some(2));
        *count.borrow_mut() += 1;
        Ok(())
    });

    store
        .add_videos_to_library(vec![clip("a.mp4", MIB, 3.0), clip("b.mp4", MIB, 4.0)])
        .expect("library");
    store.select_from_library(1).expect("select");
    assert_eq!(
        store.state().current_video.as_ref().map(|v| v.name.as_str()),
        Some("b.mp4")
    );

    assert!(store.unsubscribe(sub));
    store.add_videos_to_library(Vec::new()).expect("library");
    assert_eq!(*fired.borrow(), 1);
}

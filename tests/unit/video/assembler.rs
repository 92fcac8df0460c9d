use super::*;
use crate::assets::decode::save_frame_jpeg;
use crate::encode::sink::InMemorySink;

fn solid(v: u8) -> FrameRGBA {
    FrameRGBA::solid(4, 4, [v, v, v, 255])
}

fn seven_frames() -> Vec<FrameRGBA> {
    (0..7u8).map(|i| solid(i * 30)).collect()
}

#[test]
fn seven_images_produce_366_contiguous_frames() {
    let mut sink = InMemorySink::new();
    let stats = VideoAssembler::default()
        .assemble(&seven_frames(), &mut sink)
        .unwrap()
        .unwrap();

    assert_eq!(stats.frames, 366);
    assert_eq!(stats.images, 7);
    assert!((stats.duration_secs - 12.2).abs() < 1e-9);
    assert_eq!(sink.frames.len(), 366);
    assert!(sink.is_ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps.num, cfg.fps.den), (4, 4, 30, 1));
    for (i, (idx, _)) in sink.frames.iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
}

#[test]
fn holds_then_crossfades_towards_the_next_image() {
    let frames = seven_frames();
    let mut sink = InMemorySink::new();
    VideoAssembler::default().assemble(&frames, &mut sink).unwrap();
    let out: Vec<&FrameRGBA> = sink.frames.iter().map(|(_, f)| f).collect();

    assert!(out[..42].iter().all(|f| **f == frames[0]));

    let first_fade = out[42].data[0];
    let a = frames[0].data[0];
    let b = frames[1].data[0];
    assert_ne!(first_fade, a);
    assert!(first_fade.abs_diff(a) < first_fade.abs_diff(b));

    let fade_values: Vec<u8> = out[42..54].iter().map(|f| f.data[0]).collect();
    assert!(fade_values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(out[53].data, frames[1].data);

    assert!(out[54..96].iter().all(|f| **f == frames[1]));
    assert!(out[366 - 42..].iter().all(|f| **f == frames[6]));
}

#[test]
fn no_frames_is_a_noop() {
    let mut sink = InMemorySink::new();
    let stats = VideoAssembler::default().assemble(&[], &mut sink).unwrap();
    assert!(stats.is_none());
    assert!(sink.config().is_none());
    assert!(!sink.is_ended());
}

#[test]
fn dimension_mismatch_is_rejected_before_encoding() {
    let frames = vec![solid(0), FrameRGBA::solid(6, 4, [0, 0, 0, 255])];
    let mut sink = InMemorySink::new();
    let err = VideoAssembler::default()
        .assemble(&frames, &mut sink)
        .unwrap_err();
    assert!(matches!(err, TwainError::Validation(_)));
    assert!(sink.config().is_none());
}

#[test]
fn single_image_is_only_held() {
    let mut sink = InMemorySink::new();
    let stats = VideoAssembler::default()
        .assemble(&[solid(9)], &mut sink)
        .unwrap()
        .unwrap();
    assert_eq!(stats.frames, 42);
}

#[test]
fn folder_with_missing_slot_skips_it() {
    let dir = tempfile::tempdir().unwrap();
    for i in [0usize, 1, 2, 4, 5, 6] {
        save_frame_jpeg(&solid(i as u8 * 30), &dir.path().join(frame_file_name(i))).unwrap();
    }
    std::fs::write(dir.path().join("caption.txt"), "not a frame").unwrap();

    let paths = VideoAssembler::collect_frame_paths(dir.path());
    assert_eq!(paths.len(), 6);
    assert!(paths[2].ends_with("question_2.jpg"));
    assert!(paths[3].ends_with("question_4.jpg"));

    let mut sink = InMemorySink::new();
    let stats = VideoAssembler::default()
        .assemble_folder_into(dir.path(), &mut sink)
        .unwrap()
        .unwrap();
    assert_eq!(stats.images, 6);
    assert_eq!(stats.frames, 6 * 42 + 5 * 12);
}

#[test]
fn empty_folder_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let stats = VideoAssembler::default()
        .assemble_folder(dir.path())
        .unwrap();
    assert!(stats.is_none());
    assert!(!dir.path().join(VIDEO_FILE_NAME).exists());
}

use super::*;
use crate::foundation::core::Canvas;

fn local_font_bytes() -> Option<Vec<u8>> {
    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if let Some(p) = std::env::var_os("TWAIN_TEST_FONT") {
        candidates.push(p.into());
    }
    candidates.extend(
        [
            "assets/DMSerifDisplay-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
        .iter()
        .map(std::path::PathBuf::from),
    );
    candidates.into_iter().find_map(|p| std::fs::read(p).ok())
}

fn small_config() -> RenderConfig {
    let mut cfg = RenderConfig {
        canvas: Canvas {
            width: 216,
            height: 384,
        },
        ..RenderConfig::default()
    };
    cfg.intro.font_size = 16.0;
    cfg.intro.padding_x = 8.0;
    cfg.intro.padding_y = 8.0;
    cfg.question.font_size = 12.0;
    cfg.question.tag_font_size = 9.0;
    cfg.question.brand_font_size = 10.0;
    cfg.question.rule_inset = 20.0;
    cfg.question.brand_bottom_offset = 28.0;
    cfg.outro.font_size = 14.0;
    cfg
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i16::from(*x) - i16::from(*y)).abs() <= 2)
}

#[test]
fn slots_map_to_positional_file_names() {
    let names: Vec<String> = FrameSlot::all().iter().map(|s| s.file_name()).collect();
    assert_eq!(
        names,
        vec![
            "question_0.jpg",
            "question_1.jpg",
            "question_2.jpg",
            "question_3.jpg",
            "question_4.jpg",
            "question_5.jpg",
            "question_6.jpg",
        ]
    );
    assert_eq!(FrameSlot::Question(2).index(), 3);
    assert_eq!(FrameSlot::Outro.index(), 6);
}

#[test]
fn missing_font_is_fatal() {
    let cfg = RenderConfig {
        font_path: "does/not/exist.ttf".into(),
        ..RenderConfig::default()
    };
    let err = CardRenderer::new(cfg).err().expect("missing font must fail");
    assert!(matches!(err, TwainError::Font(_)));
}

#[test]
fn question_index_out_of_range_is_rejected() {
    let Some(bytes) = local_font_bytes() else {
        return;
    };
    let mut r = CardRenderer::with_font_bytes(small_config(), bytes).unwrap();
    let err = r.draw_question("Why?", "DeepQuestions", 5).unwrap_err();
    assert!(matches!(err, TwainError::Validation(_)));
}

#[test]
fn question_card_has_canvas_size_and_solid_corners() {
    let Some(bytes) = local_font_bytes() else {
        return;
    };
    let cfg = small_config();
    let bg = cfg.background_rgba;
    let mut r = CardRenderer::with_font_bytes(cfg, bytes).unwrap();
    let frame = r
        .draw_question(
            "What is one small thing I do that makes you feel loved?",
            "LoveAndIntimacy",
            0,
        )
        .unwrap();
    assert_eq!(frame.dimensions(), (216, 384));
    assert!(close(px(&frame, 0, 0), bg));
    assert!(close(px(&frame, 215, 0), bg));
    assert!(frame.data.chunks_exact(4).any(|p| p[0] != bg[0]));
}

#[test]
fn intro_resizes_background_and_writes_slot_zero() {
    let Some(bytes) = local_font_bytes() else {
        return;
    };
    let mut r = CardRenderer::with_font_bytes(small_config(), bytes).unwrap();
    let background = image::RgbaImage::from_pixel(100, 50, image::Rgba([10, 120, 200, 255]));
    let frame = r.draw_intro("Ready to get closer?", &background).unwrap();
    assert_eq!(frame.dimensions(), (216, 384));
    let corner = px(&frame, 1, 1);
    assert!((i16::from(corner[2]) - 200).abs() <= 2, "corner = {corner:?}");
}

#[test]
fn render_calls_write_jpegs_at_slot_paths() {
    let Some(bytes) = local_font_bytes() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut r = CardRenderer::with_font_bytes(small_config(), bytes).unwrap();

    let q = r
        .render_question("Is this fun?", "DeepQuestions", 4, dir.path())
        .unwrap();
    assert_eq!(q, dir.path().join("question_5.jpg"));
    let outro = r.render_outro(dir.path()).unwrap();
    assert_eq!(outro, dir.path().join("question_6.jpg"));

    let img = image::open(&q).unwrap();
    assert_eq!((img.width(), img.height()), (216, 384));
}

use super::*;

fn block(widths: &[f64], line_height: f64, spacing: f64) -> TextBlock {
    TextBlock {
        lines: widths
            .iter()
            .map(|w| MeasuredLine {
                text: "x".to_string(),
                width: *w,
            })
            .collect(),
        line_height,
        spacing,
    }
}

#[test]
fn block_height_matches_line_formula() {
    for lines in 1..=8usize {
        let h = 57.0;
        let s = 20.0;
        let expected = lines as f64 * h + (lines as f64 - 1.0) * s;
        assert_eq!(block_height(lines, h, s), expected);
    }
}

#[test]
fn block_height_of_empty_block_is_zero() {
    assert_eq!(block_height(0, 57.0, 20.0), 0.0);
    assert_eq!(block(&[], 57.0, 20.0).height(), 0.0);
}

#[test]
fn line_tops_advance_by_height_plus_spacing() {
    let b = block(&[10.0, 20.0, 30.0], 50.0, 20.0);
    let tops: Vec<f64> = b.line_tops(100.0).collect();
    assert_eq!(tops, vec![100.0, 170.0, 240.0]);
}

#[test]
fn centered_box_uses_widest_line_and_padding() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let b = block(&[400.0, 600.0, 300.0], 60.0, 20.0);
    let bx = centered_box(canvas, &b, 40.0, 40.0);

    assert_eq!(bx.width(), 600.0 + 80.0);
    assert_eq!(bx.height(), b.height() + 80.0);
    assert_eq!((bx.left + bx.right) / 2.0, 540.0);
    assert_eq!((bx.top + bx.bottom) / 2.0, 960.0);
    assert_eq!(bx.text_top, bx.top + 40.0);
}

#[test]
fn centered_box_of_empty_block_collapses_to_padding() {
    let canvas = Canvas {
        width: 100,
        height: 200,
    };
    let bx = centered_box(canvas, &block(&[], 60.0, 20.0), 10.0, 5.0);
    assert_eq!(bx.width(), 20.0);
    assert_eq!(bx.height(), 10.0);
    assert_eq!(bx.text_top, 100.0);
}

#[test]
fn question_stack_is_centered_as_a_unit() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let spacing = StackSpacing {
        above_rule: 48.0,
        rule_thickness: 3.0,
        below_rule: 24.0,
    };
    let stack = question_stack(canvas, 40.0, 300.0, spacing);

    assert_eq!(stack.height, 40.0 + 48.0 + 3.0 + 24.0 + 300.0);
    assert_eq!(stack.tag_top, 960.0 - stack.height / 2.0);
    assert_eq!(stack.rule_y, stack.tag_top + 40.0 + 48.0);
    assert_eq!(stack.text_top, stack.rule_y + 3.0 + 24.0);
    // Bottom of the question block mirrors the top of the tag around the canvas center.
    assert_eq!(stack.text_top + 300.0 - 960.0, 960.0 - stack.tag_top);
}

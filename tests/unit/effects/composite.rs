use super::*;

fn dist(a: PremulRgba8, b: PremulRgba8) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| u32::from(x.abs_diff(*y)))
        .sum()
}

#[test]
fn crossfade_t_0_is_a_and_t_1_is_b() {
    let a = [10, 20, 30, 255];
    let b = [200, 210, 220, 255];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
}

#[test]
fn out_of_range_t_is_clamped() {
    let a = [10, 20, 30, 255];
    let b = [200, 210, 220, 255];
    assert_eq!(crossfade(a, b, -3.0), a);
    assert_eq!(crossfade(a, b, 7.5), b);
}

#[test]
fn first_fade_step_stays_closer_to_the_outgoing_frame() {
    let a = [0, 0, 0, 255];
    let b = [240, 120, 60, 255];
    let first = crossfade(a, b, 1.0 / 12.0);
    let last = crossfade(a, b, 12.0 / 12.0);
    assert_ne!(first, a);
    assert!(dist(first, a) < dist(last, a));
    assert!(dist(first, a) < dist(first, b));
}

#[test]
fn steps_move_monotonically_towards_b() {
    let a = [30, 200, 90, 255];
    let b = [220, 10, 150, 255];
    let mut prev = dist(a, b);
    for f in 1..=12 {
        let d = dist(crossfade(a, b, f as f32 / 12.0), b);
        assert!(d < prev, "step {f}: {d} !< {prev}");
        prev = d;
    }
    assert_eq!(prev, 0);
}

#[test]
fn buffer_crossfade_checks_lengths() {
    let a = vec![0u8; 8];
    let b = vec![255u8; 8];
    let mut dst = vec![0u8; 8];
    crossfade_into(&mut dst, &a, &b, 0.5).unwrap();
    assert_eq!(dst, vec![128u8; 8]);

    let mut short = vec![0u8; 4];
    assert!(crossfade_into(&mut short, &a, &b, 0.5).is_err());
}

use super::*;

const SIZE: u32 = 30;

fn px(buf: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * SIZE + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn disc_mask_covers_center_not_corners() {
    let mask = disc_mask(SIZE).unwrap();
    assert_eq!(mask.len(), (SIZE * SIZE * 4) as usize);

    assert_eq!(px(&mask, 15, 15), [255; 4]);
    assert_eq!(px(&mask, 5, 15)[3], 255);
    for (x, y) in [(0, 0), (29, 0), (0, 29), (29, 29)] {
        assert_eq!(px(&mask, x, y), [0; 4], "({x}, {y})");
    }
}

#[test]
fn disc_mask_edge_is_anti_aliased() {
    let mask = disc_mask(SIZE).unwrap();
    let partial = mask
        .chunks_exact(4)
        .filter(|p| p[3] > 0 && p[3] < 255)
        .count();
    assert!(partial > 0);

    // Coverage sums to roughly the disc area, pi * 15^2.
    let area: f64 = mask.chunks_exact(4).map(|p| f64::from(p[3]) / 255.0).sum();
    assert!((area - 706.86).abs() < 6.0, "{area}");
}

#[test]
fn ring_layer_is_transparent_inside_and_outside() {
    let ring = ring_layer(SIZE, 2, Rgb8::new(0, 200, 0)).unwrap();
    assert_eq!(px(&ring, 15, 15), [0; 4]);
    assert_eq!(px(&ring, 15, 8), [0; 4]);
    assert_eq!(px(&ring, 0, 0), [0; 4]);

    let top = px(&ring, 15, 1);
    assert!(top[3] >= 240, "{top:?}");
    assert!(top[1] >= 185 && top[0] <= 5 && top[2] <= 5, "{top:?}");
}

#[test]
fn ring_layer_area_matches_two_pixel_band() {
    let ring = ring_layer(SIZE, 2, Rgb8::BLACK).unwrap();
    // pi * (15^2 - 13^2)
    let area: f64 = ring.chunks_exact(4).map(|p| f64::from(p[3]) / 255.0).sum();
    assert!((area - 175.93).abs() < 6.0, "{area}");
}

#[test]
fn rendering_is_repeatable() {
    assert_eq!(disc_mask(SIZE).unwrap(), disc_mask(SIZE).unwrap());
    let c = Rgb8::new(200, 0, 0);
    assert_eq!(ring_layer(SIZE, 2, c).unwrap(), ring_layer(SIZE, 2, c).unwrap());
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(matches!(disc_mask(70_000), Err(FamapError::Validation(_))));
}

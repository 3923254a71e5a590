use std::io::Cursor;

use image::{Rgb, RgbImage, Rgba};

use super::*;
use crate::pin::placeholder::PLACEHOLDER_BG;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "famap_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, img: DynamicImage) {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

fn checkerboard(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
        if (x / 7 + y / 7) % 2 == 0 {
            Rgb([240, 180, 20])
        } else {
            Rgb([20, 40, 200])
        }
    }))
}

fn top_ring_pixel(path: &Path) -> [u8; 4] {
    image::open(path).unwrap().to_rgba8().get_pixel(15, 1).0
}

fn assert_close(actual: [u8; 4], expected: [u8; 4], tol: u8) {
    for i in 0..4 {
        assert!(
            actual[i].abs_diff(expected[i]) <= tol,
            "{actual:?} vs {expected:?}"
        );
    }
}

fn dist_from_center(x: u32, y: u32) -> f64 {
    let c = f64::from(PIN_SIZE) / 2.0;
    (f64::from(x) + 0.5 - c).hypot(f64::from(y) + 0.5 - c)
}

#[test]
fn pin_path_uses_stem_and_suffix() {
    let c = IconCompositor::new("images/pins", BorderPalette::default());
    assert_eq!(
        c.pin_path_for(Path::new("images/carl.jpeg")).unwrap(),
        Path::new("images/pins/carl_pin.png")
    );
    assert_eq!(
        c.pin_path_for(Path::new("/other/dir/carl.png")).unwrap(),
        Path::new("images/pins/carl_pin.png")
    );
    assert!(c.pin_path_for(Path::new("")).is_err());
}

#[test]
fn large_source_becomes_30x30_disc() {
    let dir = temp_dir("pin_resize");
    let src = dir.join("big.png");
    write_png(&src, checkerboard(301, 173));

    let c = IconCompositor::new(&dir, BorderPalette::default());
    let out = c.make_pin(&src, "Carl").unwrap();
    assert_eq!(out, dir.join("big_pin.png"));

    let pin = image::open(&out).unwrap().to_rgba8();
    assert_eq!(pin.dimensions(), (PIN_SIZE, PIN_SIZE));
    assert_eq!(pin.get_pixel(0, 0).0[3], 0);
    assert_eq!(pin.get_pixel(29, 29).0[3], 0);
    assert!(pin.get_pixel(15, 15).0[3] > 250);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn tiny_source_is_upscaled() {
    let dir = temp_dir("pin_upscale");
    let src = dir.join("tiny.png");
    write_png(&src, checkerboard(3, 5));

    let c = IconCompositor::new(&dir, BorderPalette::default());
    let pin = image::open(c.make_pin(&src, "Julia").unwrap()).unwrap();
    assert_eq!((pin.width(), pin.height()), (PIN_SIZE, PIN_SIZE));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn ring_color_follows_palette() {
    let dir = temp_dir("pin_ring");
    let src = dir.join("face.png");
    write_png(&src, checkerboard(64, 64));
    let c = IconCompositor::new(&dir, BorderPalette::default());

    let carl = top_ring_pixel(&c.make_pin(&src, "Carl").unwrap());
    assert_close(carl, [0, 200, 0, 255], 8);
    assert!(carl[1] > carl[0] && carl[1] > carl[2]);

    let julia = top_ring_pixel(&c.make_pin(&src, "Julia").unwrap());
    assert_close(julia, [200, 0, 0, 255], 8);

    let unknown = top_ring_pixel(&c.make_pin(&src, "Unknown").unwrap());
    assert_close(unknown, [0, 0, 0, 255], 8);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn ring_stays_visible_over_opaque_edges() {
    let c = IconCompositor::new(".", BorderPalette::default());
    let white = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([255; 4])));
    let pin = c.render_pin(&white, "Julia").unwrap();
    for y in 0..PIN_SIZE {
        for x in 0..PIN_SIZE {
            let d = dist_from_center(x, y);
            let px = pin.get_pixel(x, y).0;
            if d <= 11.5 {
                assert_eq!(px, [255; 4], "({x}, {y})");
            } else if (13.6..=14.4).contains(&d) {
                assert!(px[0] >= 190 && px[1] <= 60 && px[3] >= 240, "({x}, {y}) {px:?}");
            } else if d >= 16.0 {
                assert_eq!(px[3], 0, "({x}, {y})");
            }
        }
    }
}

#[test]
fn disc_edge_is_anti_aliased() {
    let c = IconCompositor::new(".", BorderPalette::default());
    let white = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([255; 4])));
    let pin = c.render_pin(&white, "Carl").unwrap();
    let soft = pin.pixels().filter(|p| p.0[3] > 0 && p.0[3] < 255).count();
    assert!(soft > 0);
}

#[test]
fn source_alpha_is_kept_inside_disc() {
    let c = IconCompositor::new(".", BorderPalette::default());
    let clear = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([9, 9, 9, 0])));
    let pin = c.render_pin(&clear, "Carl").unwrap();
    assert_eq!(pin.get_pixel(15, 15).0[3], 0);
    assert_close(pin.get_pixel(15, 1).0, [0, 200, 0, 255], 8);
}

#[test]
fn half_transparent_source_blends_under_ring() {
    let c = IconCompositor::new(".", BorderPalette::default());
    let glass = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([0, 0, 255, 128])));
    let pin = c.render_pin(&glass, "Julia").unwrap();

    let center = pin.get_pixel(15, 15).0;
    assert_eq!(center[3], 128);
    assert!(center[2] >= 254 && center[0] == 0, "{center:?}");

    let ring = pin.get_pixel(15, 1).0;
    assert!(ring[3] >= 250 && ring[0] >= 190, "{ring:?}");
}

#[test]
fn output_is_byte_identical_across_runs() {
    let dir = temp_dir("pin_determinism");
    let src = dir.join("carl.png");
    write_png(&src, checkerboard(120, 90));
    let c = IconCompositor::new(&dir, BorderPalette::default());

    let first = std::fs::read(c.make_pin(&src, "Carl").unwrap()).unwrap();
    let second = std::fs::read(c.make_pin(&src, "Carl").unwrap()).unwrap();
    assert_eq!(first, second);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_source_uses_initials_placeholder() {
    let dir = temp_dir("pin_placeholder");
    let c = IconCompositor::new(&dir, BorderPalette::default());

    let out = c
        .make_pin(Path::new("/does/not/exist.png"), "Ada Lovelace")
        .unwrap();
    assert_eq!(out, dir.join("exist_pin.png"));
    assert!(!Path::new("/does/not/exist.png").exists());

    let pin = image::open(&out).unwrap().to_rgba8();
    assert_eq!(pin.dimensions(), (PIN_SIZE, PIN_SIZE));
    let grey = [PLACEHOLDER_BG.r, PLACEHOLDER_BG.g, PLACEHOLDER_BG.b, 255];
    assert_eq!(pin.get_pixel(15, 5).0, grey);
    // Initials sit in the lower right of the disc.
    assert!((10..25).any(|y| (7..22).any(|x| pin.get_pixel(x, y).0[0] < 150)));

    let expected = c
        .render_pin(
            &DynamicImage::ImageRgb8(placeholder::placeholder_image("Alan Lee").unwrap()),
            "Ada Lovelace",
        )
        .unwrap();
    assert_eq!(pin, expected);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn undecodable_source_is_decode_error() {
    let dir = temp_dir("pin_decode");
    let src = dir.join("broken.png");
    std::fs::write(&src, b"definitely not a png").unwrap();

    let c = IconCompositor::new(&dir, BorderPalette::default());
    let err = c.make_pin(&src, "Carl").unwrap_err();
    assert!(matches!(err, FamapError::Decode { ref path, .. } if path == &src));
    assert!(!dir.join("broken_pin.png").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_pins_dir_is_io_error() {
    let dir = temp_dir("pin_no_dir");
    let c = IconCompositor::new(dir.join("absent"), BorderPalette::default());
    let err = c.make_pin(Path::new("/does/not/exist.png"), "Carl").unwrap_err();
    assert!(matches!(err, FamapError::Io { .. }), "{err}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn same_basename_overwrites() {
    let dir = temp_dir("pin_collide");
    std::fs::create_dir_all(dir.join("a")).unwrap();
    std::fs::create_dir_all(dir.join("b")).unwrap();
    write_png(&dir.join("a/me.png"), checkerboard(40, 40));
    write_png(
        &dir.join("b/me.png"),
        DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 30, Rgb([1, 2, 3]))),
    );

    let c = IconCompositor::new(&dir, BorderPalette::default());
    let a = c.make_pin(&dir.join("a/me.png"), "Carl").unwrap();
    let b = c.make_pin(&dir.join("b/me.png"), "Carl").unwrap();
    assert_eq!(a, b);
    let pin = image::open(&b).unwrap().to_rgba8();
    assert_eq!(pin.get_pixel(15, 15).0, [1, 2, 3, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

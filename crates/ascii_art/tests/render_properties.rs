//! End-to-end checks of the conversion engine through its public API.

use ascii_art::{
    AsciiRenderer, GlyphGrid, HostBounds, LayoutPolicy, Ramp, RenderConfig, Rendering,
    SourceImage, ToneAdjust,
};

const RAMP: &str = "@%#*+=-:. ";

fn config(invert: bool) -> RenderConfig {
    RenderConfig { charset: RAMP.into(), scale: 1.0, invert, ..RenderConfig::default() }
}

fn text(output: Rendering) -> String {
    match output {
        Rendering::Text(text) => text,
        Rendering::Colored(grid) => {
            panic!("expected text, got {}x{} grid", grid.width, grid.height)
        },
    }
}

fn grid(output: Rendering) -> GlyphGrid {
    match output {
        Rendering::Colored(grid) => grid,
        Rendering::Text(text) => panic!("expected grid, got {text:?}"),
    }
}

/// Gradient image with distinct colors per pixel.
fn gradient(width: u32, height: u32) -> SourceImage {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend([(x * 255 / width) as u8, (y * 255 / height) as u8, 90, 255]);
        }
    }
    SourceImage::from_rgba(width, height, pixels).unwrap()
}

#[test]
fn white_square_renders_brightest_glyph() {
    let image = SourceImage::filled(2, 2, [255, 255, 255, 255]);
    let output = AsciiRenderer.render(&image, &config(false), (0, 0));
    assert_eq!(text(output.rendering), "@@\n@@");
}

#[test]
fn white_square_inverted_renders_spaces() {
    let image = SourceImage::filled(2, 2, [255, 255, 255, 255]);
    let output = AsciiRenderer.render(&image, &config(true), (0, 0));
    assert_eq!(text(output.rendering), "  \n  ");
}

#[test]
fn zero_contrast_pins_every_cell_to_mid_ramp() {
    let image = gradient(16, 8);
    let config = RenderConfig { contrast: 0.0, brightness: 128.0, ..config(false) };
    let output = text(AsciiRenderer.render(&image, &config, (0, 0)).rendering);

    // floor(128 / 255 * 9) = 4 in " .:-=+*#%@".
    assert!(output.lines().all(|line| line.chars().all(|ch| ch == '=')));
}

#[test]
fn invert_equals_reversed_charset() {
    let image = gradient(40, 20);
    let inverted = RenderConfig { scale: 0.5, ..config(true) };
    let reversed: String = RAMP.chars().rev().collect();
    let plain = RenderConfig { charset: reversed, scale: 0.5, ..config(false) };

    let left = AsciiRenderer.render(&image, &inverted, (0, 0));
    let right = AsciiRenderer.render(&image, &plain, (0, 0));
    assert_eq!(left, right);
}

#[test]
fn color_mode_keeps_source_rgb() {
    let image = gradient(6, 3);
    let base = RenderConfig { color: true, ..config(false) };
    let tweaked = RenderConfig { contrast: 3.0, brightness: -80.0, ..base.clone() };

    let plain = grid(AsciiRenderer.render(&image, &base, (6, 3)).rendering);
    let adjusted = grid(AsciiRenderer.render(&image, &tweaked, (6, 3)).rendering);

    let colors = |grid: &GlyphGrid| grid.cells.iter().map(|cell| cell.rgb).collect::<Vec<_>>();
    assert_eq!(colors(&plain), colors(&adjusted));
    assert_ne!(plain.to_text(), adjusted.to_text());

    // Same-size render samples pixels directly.
    let first = plain.cell(0, 0).unwrap();
    assert_eq!(first.rgb, [0, 0, 90]);
}

#[test]
fn rendering_is_idempotent() {
    let image = gradient(123, 77);
    let config = RenderConfig { color: true, contrast: 1.3, ..RenderConfig::default() };
    let first = AsciiRenderer.render(&image, &config, (300, 200));
    let second = AsciiRenderer.render(&image, &config, (300, 200));
    assert_eq!(first, second);
}

#[test]
fn geometry_stays_positive_and_fits_aspect() {
    let sizes = [(1, 1), (3, 500), (500, 3), (640, 480), (1920, 1080), (97, 131)];
    let hosts = [(0, 0), (1, 1), (80, 24), (1024, 768)];
    let scales = [0.0, 0.05, 0.18, 0.5, 1.0, 4.0];

    for &(width, height) in &sizes {
        for &host in &hosts {
            for &scale in &scales {
                let (host_width, host_height) =
                    HostBounds::new().with_container(host.0, host.1).resolve(width, height);
                let layout = LayoutPolicy::Fit { host_width, host_height, scale };
                let geometry = layout.derive(width, height);
                assert!(geometry.columns >= 1 && geometry.rows >= 1);

                // Aspect fit only holds when neither axis hit the one-cell floor.
                if geometry.columns > 1 && geometry.rows > 1 {
                    let ratio = f64::from(width) / f64::from(height);
                    let columns = f64::from(geometry.columns);
                    let rows = f64::from(geometry.rows);
                    let off_by_columns = (columns - rows * ratio).abs();
                    let off_by_rows = (rows - columns / ratio).abs();
                    assert!(
                        off_by_columns <= 1.0 || off_by_rows <= 1.0,
                        "{width}x{height} host {host:?} scale {scale}: {geometry:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn zero_sized_image_renders_single_cell() {
    let image = SourceImage::from_rgba(0, 0, Vec::new()).unwrap();
    let output = AsciiRenderer.render(&image, &config(false), (100, 100));
    assert_eq!((output.geometry.columns, output.geometry.rows), (1, 1));
    assert_eq!(text(output.rendering), " ");
}

#[test]
fn empty_charset_falls_back_to_default() {
    let image = SourceImage::filled(2, 2, [255, 255, 255, 255]);
    let config = RenderConfig { charset: String::new(), ..config(false) };
    let output = AsciiRenderer.render(&image, &config, (0, 0));
    assert_eq!(text(output.rendering), "@@\n@@");
}

#[test]
fn brighter_pixels_never_pick_darker_glyphs() {
    let ramp = Ramp::for_render(RAMP, false);
    let tone = ToneAdjust::new(1.7, -30.0);
    let mut previous = 0;
    for value in 0..=255u8 {
        let index = ramp.index_for(tone.apply(ascii_art::luminance(value, value, value)));
        assert!(index >= previous);
        previous = index;
    }
}

#[test]
fn exact_layout_skips_fit() {
    let image = gradient(100, 10);
    let output = AsciiRenderer.render_exact(&image, 7, 5, RAMP, false);
    assert_eq!(output.lines().count(), 5);
    assert!(output.lines().all(|line| line.chars().count() == 7));
}

#[test]
fn decodes_encoded_png() {
    let buffer = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    buffer.write_to(&mut bytes, image::ImageOutputFormat::Png).unwrap();

    let image = SourceImage::decode(bytes.get_ref()).unwrap();
    assert_eq!(image.dimensions(), (4, 4));
    assert!(SourceImage::decode(b"not an image").is_err());
}

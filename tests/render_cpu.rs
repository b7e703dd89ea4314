use symbol_swap::{
    Color, FrameRGBA, GeneratorConfig, Shape, SymbolIdentity, TargetMark, Task, TaskGenerator,
};

const WHITE: [u8; 3] = [255, 255, 255];
const RED_BORDER: [u8; 3] = [255, 0, 0];
const BLACK: [u8; 3] = [0, 0, 0];

fn assert_rgb_near(frame: &FrameRGBA, x: u32, y: u32, expected: [u8; 3]) {
    let px = frame.pixel(x, y).unwrap();
    for c in 0..3 {
        let d = (i16::from(px[c]) - i16::from(expected[c])).abs();
        assert!(d <= 2, "pixel ({x},{y}) = {px:?}, expected ~{expected:?}");
    }
    assert_eq!(px[3], 255, "frames are opaque");
}

fn scenario_task(generator: &TaskGenerator) -> Task {
    let ids = [
        SymbolIdentity::new(Shape::Circle, Color::Red),
        SymbolIdentity::new(Shape::Square, Color::Blue),
        SymbolIdentity::new(Shape::Star, Color::Green),
    ];
    generator
        .assemble(
            "render",
            0,
            &ids,
            TargetMark(1),
            SymbolIdentity::new(Shape::Triangle, Color::Yellow),
        )
        .unwrap()
}

fn generator() -> TaskGenerator {
    TaskGenerator::new(GeneratorConfig {
        generate_videos: false,
        ..GeneratorConfig::default()
    })
    .unwrap()
}

#[test]
fn symbols_are_filled_with_their_palette_color() {
    let generator = generator();
    let task = scenario_task(&generator);
    let xs: Vec<f64> = task.sequence().symbols().iter().map(|s| s.center.x).collect();
    assert_eq!(xs, vec![176.0, 256.0, 336.0]);

    let initial = task.initial_frame();
    assert_rgb_near(initial, 176, 256, Color::Red.rgb());
    assert_rgb_near(initial, 256, 256, Color::Blue.rgb());
    assert_rgb_near(initial, 336, 256, Color::Green.rgb());
    assert_rgb_near(initial, 5, 5, WHITE);

    let fin = task.final_frame();
    assert_rgb_near(fin, 176, 256, Color::Red.rgb());
    assert_rgb_near(fin, 256, 256, Color::Yellow.rgb());
    assert_rgb_near(fin, 336, 256, Color::Green.rgb());
}

#[test]
fn only_the_target_is_bordered_and_only_initially() {
    let generator = generator();
    let task = scenario_task(&generator);
    let initial = task.initial_frame();
    let fin = task.final_frame();

    // Border ring spans 34..38 px from the target centre.
    assert_rgb_near(initial, 256 - 36, 256, RED_BORDER);
    assert_rgb_near(initial, 256 + 35, 256, RED_BORDER);
    assert_rgb_near(initial, 256, 256 - 36, RED_BORDER);
    assert_rgb_near(initial, 176 - 36, 256, WHITE);
    assert_rgb_near(initial, 336 + 35, 256, WHITE);

    assert_rgb_near(fin, 256 - 36, 256, WHITE);
    assert_rgb_near(fin, 256, 256 - 36, WHITE);
}

#[test]
fn symbols_carry_a_black_outline() {
    let generator = generator();
    let task = scenario_task(&generator);
    // Left edge of the 60 px square centred at x=256 is x=226; the 2 px stroke straddles it.
    assert_rgb_near(task.initial_frame(), 225, 256, BLACK);
}

#[test]
fn crossfade_midpoint_blends_old_and_new() {
    let generator = generator();
    let task = scenario_task(&generator);
    let mid = generator
        .renderer()
        .render_crossfade(task.sequence(), task.target(), task.replacement(), 0.5)
        .unwrap();

    let px = mid.pixel(256, 256).unwrap();
    let rgb = [px[0], px[1], px[2]];
    assert_ne!(rgb, Color::Blue.rgb());
    assert_ne!(rgb, Color::Yellow.rgb());
    assert_ne!(rgb, WHITE);
    // Yellow has far more red than blue does; half-way sits in between.
    assert!(rgb[0] > Color::Blue.rgb()[0] + 20 && rgb[0] < Color::Yellow.rgb()[0]);

    // Unmarked neighbours are untouched.
    assert_rgb_near(&mid, 176, 256, Color::Red.rgb());
    assert_rgb_near(&mid, 336, 256, Color::Green.rgb());

    // Border is half-faded: lighter than full red on the green/blue channels, not white.
    let b = mid.pixel(256 - 36, 256).unwrap();
    assert!(b[1] > 60 && b[1] < 200, "{b:?}");
}

#[test]
fn png_conversion_preserves_dimensions() {
    let generator = generator();
    let task = scenario_task(&generator);
    let img = task.initial_frame().to_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (512, 512));
    assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
}

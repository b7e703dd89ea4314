use std::collections::HashSet;

use symbol_swap::{
    Color, FrameKind, GeneratorConfig, Shape, Substitution, SwapError, SymbolIdentity, TargetMark,
    TaskGenerator,
};

fn stills_only() -> GeneratorConfig {
    GeneratorConfig {
        generate_videos: false,
        ..GeneratorConfig::default()
    }
}

fn id(shape: Shape, color: Color) -> SymbolIdentity {
    SymbolIdentity::new(shape, color)
}

#[test]
fn sequences_are_unique_and_replacements_are_new() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    for seed in 0..40u64 {
        let task = generator.generate("t", seed).unwrap();
        let ids = task.sequence().identities();
        let set: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(set.len(), ids.len(), "seed {seed}: duplicate symbol");
        assert!(!set.contains(&task.replacement()), "seed {seed}");
        assert!((3..=7).contains(&ids.len()));
        assert!(task.target().0 < ids.len());
    }
}

#[test]
fn non_target_symbols_keep_identity_and_position() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    for seed in 0..40u64 {
        let task = generator.generate("t", seed).unwrap();
        let before = task.sequence().symbols();
        let after = task.final_sequence().symbols();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after) {
            assert_eq!(b.index, a.index);
            assert_eq!(b.center, a.center);
            if b.index == task.target().0 {
                assert_eq!(a.identity, task.replacement());
            } else {
                assert_eq!(a.identity, b.identity);
            }
        }
        for w in before.windows(2) {
            assert!(w[0].center.x < w[1].center.x);
        }
    }
}

#[test]
fn same_seed_is_bit_identical() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    let a = generator.generate("a", 1234).unwrap();
    let b = TaskGenerator::new(stills_only())
        .unwrap()
        .generate("b", 1234)
        .unwrap();
    assert_eq!(a.initial_frame(), b.initial_frame());
    assert_eq!(a.final_frame(), b.final_frame());
    assert_eq!(a.description(), b.description());
}

#[test]
fn stills_differ_from_each_other() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    let task = generator.generate("t", 5).unwrap();
    assert_ne!(task.initial_frame(), task.final_frame());
    assert!(task.frames().is_none());
}

#[test]
fn scenario_fixed_length_three() {
    let cfg = GeneratorConfig {
        min_sequence_length: 3,
        max_sequence_length: 3,
        ..stills_only()
    };
    let generator = TaskGenerator::new(cfg).unwrap();
    for seed in 0..20u64 {
        assert_eq!(generator.generate("t", seed).unwrap().sequence().len(), 3);
    }
}

#[test]
fn scenario_explicit_substitution() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    let ids = [
        id(Shape::Circle, Color::Red),
        id(Shape::Square, Color::Blue),
        id(Shape::Star, Color::Green),
    ];
    let replacement = id(Shape::Triangle, Color::Yellow);
    let task = generator
        .assemble("b", 0, &ids, TargetMark(1), replacement)
        .unwrap();

    assert_eq!(
        task.final_sequence().identities(),
        vec![
            id(Shape::Circle, Color::Red),
            id(Shape::Triangle, Color::Yellow),
            id(Shape::Star, Color::Green),
        ]
    );

    let desc = task.description();
    assert_eq!(desc.target_index, 1);
    assert_eq!(desc.target_identity, id(Shape::Square, Color::Blue));
    assert_eq!(desc.replacement_identity, replacement);
    assert_eq!(desc.sequence_length, 3);

    let json = serde_json::to_value(desc).unwrap();
    assert_eq!(json["target_identity"]["shape"], "square");
    assert_eq!(json["replacement_identity"]["color"], "yellow");
}

#[test]
fn scenario_oversized_max_length_is_rejected_up_front() {
    let cfg = GeneratorConfig {
        max_sequence_length: 49,
        ..stills_only()
    };
    match TaskGenerator::new(cfg) {
        Err(SwapError::Configuration(msg)) => assert!(msg.contains("48"), "{msg}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected configuration error"),
    }
}

#[test]
fn assemble_rejects_replacement_already_in_row() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    let ids = [id(Shape::Circle, Color::Red), id(Shape::Square, Color::Blue)];
    let err = generator
        .assemble("x", 0, &ids, TargetMark(0), ids[1])
        .unwrap_err();
    assert!(matches!(err, SwapError::Invariant(_)));
}

#[test]
fn scenario_animation_frame_count_and_endpoints() {
    let cfg = GeneratorConfig {
        hold_frames: 8,
        transform_frames: 30,
        image_size: symbol_swap::Canvas {
            width: 256,
            height: 128,
        },
        max_sequence_length: 3,
        ..GeneratorConfig::default()
    };
    let generator = TaskGenerator::new(cfg).unwrap();
    let task = generator.generate("d", 77).unwrap();
    let frames = task.frames().unwrap();
    assert_eq!(frames.len(), 46);
    assert_eq!(&frames[0], task.initial_frame());
    assert_eq!(&frames[7], task.initial_frame());
    assert_eq!(&frames[45], task.final_frame());
    assert_eq!(&frames[38], task.final_frame());
    // The last transform frame has fully landed on the final state.
    assert_eq!(&frames[37], task.final_frame());
}

#[test]
fn frame_count_is_independent_of_length() {
    for (min, max) in [(1, 1), (5, 5)] {
        let cfg = GeneratorConfig {
            hold_frames: 2,
            transform_frames: 3,
            min_sequence_length: min,
            max_sequence_length: max,
            ..GeneratorConfig::default()
        };
        let task = TaskGenerator::new(cfg).unwrap().generate("n", 1).unwrap();
        assert_eq!(task.frames().unwrap().len(), 7);
    }
}

#[test]
fn zero_transform_frames_jumps_between_holds() {
    let cfg = GeneratorConfig {
        hold_frames: 2,
        transform_frames: 0,
        ..GeneratorConfig::default()
    };
    let task = TaskGenerator::new(cfg).unwrap().generate("z", 9).unwrap();
    let frames = task.frames().unwrap();
    assert_eq!(frames.len(), 4);
    assert_eq!(&frames[1], task.initial_frame());
    assert_eq!(&frames[2], task.final_frame());
}

#[test]
fn border_fades_monotonically_to_zero() {
    let generator = TaskGenerator::new(stills_only()).unwrap();
    let task = generator.generate("f", 21).unwrap();
    let sub = Substitution {
        sequence: task.sequence(),
        target: task.target(),
        replacement: task.replacement(),
        initial: task.initial_frame(),
        final_frame: task.final_frame(),
    };

    let spec = generator.config().animation();
    let opacities: Vec<f32> = spec
        .schedule()
        .into_iter()
        .filter(|k| matches!(k, FrameKind::Transition { .. }))
        .map(|k| sub.plan_for(k).unwrap().unwrap().border_opacity())
        .collect();

    assert_eq!(opacities.len(), 30);
    for w in opacities.windows(2) {
        assert!(w[1] <= w[0]);
    }
    assert_eq!(*opacities.last().unwrap(), 0.0);
}

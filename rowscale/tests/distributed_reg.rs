//! Distributed resize regression test
//!
//! The assembled output must not depend on the participant count, must
//! match the single-process kernel, and failures on the coordinator must
//! reach every participant.

use rowscale::dist::{Communicator, LocalGroup};
use rowscale::io::{ImageFormat, write_image};
use rowscale::transform::resize;
use rowscale::{
    CoordMapping, ResizeConfig, ResizeError, ScaleFactors, resize_distributed,
    resize_image_distributed, run_participant,
};
use rowscale_test::{
    RegParams, corner_4x4_image, corner_image, gradient_image, load_image, regout_dir,
};
use std::path::PathBuf;

fn config(x: f64, y: f64, participants: usize) -> ResizeConfig {
    ResizeConfig::with_factors(ScaleFactors::new(x, y).expect("factors")).participants(participants)
}

#[test]
fn distributed_reg() {
    let mut rp = RegParams::new("distributed");

    // --- Test 1: corner image, 3 participants vs 1 participant ---
    let corner = corner_image();
    let three = resize_image_distributed(&corner, &config(2.0, 2.0, 3)).expect("3 participants");
    let one = resize_image_distributed(&corner, &config(2.0, 2.0, 1)).expect("1 participant");
    rp.compare_strings(&one.to_rgba_bytes(), &three.to_rgba_bytes());
    let expected = corner_4x4_image();
    rp.compare_images(&expected, &three);

    // --- Test 2: default factors, many group sizes, both mappings ---
    let src = gradient_image(23, 9);
    for mapping in [CoordMapping::Reference, CoordMapping::Precise] {
        let single = resize(&src, ScaleFactors::default(), mapping).expect("single process");
        for n in [1usize, 2, 4, 7, 13] {
            let cfg = ResizeConfig::default().participants(n).mapping(mapping);
            let out = resize_image_distributed(&src, &cfg).expect("distributed");
            rp.compare_images(&single, &out);
        }
    }

    // --- Test 3: more participants than output rows ---
    let strip = gradient_image(6, 1);
    let out = resize_image_distributed(&strip, &config(1.0, 1.0, 4)).expect("degenerate");
    rp.compare_values(1.0, out.height() as f64, 0.0);
    let single = resize(&strip, ScaleFactors::new(1.0, 1.0).expect("factors"), CoordMapping::Reference)
        .expect("single strip");
    rp.compare_images(&single, &out);

    // --- Test 4: every output pixel is opaque ---
    let all_opaque = out.pixels().iter().all(|p| p.a == 255);
    rp.compare_values(1.0, if all_opaque { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "distributed regression test failed");
}

#[test]
fn distributed_file_reg() {
    let mut rp = RegParams::new("distributed_file");

    let src = gradient_image(12, 5);
    let input = PathBuf::from(format!("{}/distributed_file.src.png", regout_dir()));
    let output = PathBuf::from(format!("{}/distributed_file.out.png", regout_dir()));
    write_image(&src, &input, ImageFormat::Png).expect("write source");

    let cfg = config(1.5, 3.0, 4).output(&output);
    let report = resize_distributed(&input, &cfg).expect("resize file");
    rp.compare_values(12.0, report.input.0 as f64, 0.0);
    rp.compare_values(5.0, report.input.1 as f64, 0.0);
    rp.compare_values(18.0, report.output.0 as f64, 0.0);
    rp.compare_values(15.0, report.output.1 as f64, 0.0);
    rp.compare_values(4.0, report.ranges.len() as f64, 0.0);
    let rows: i64 = report.ranges.iter().map(|r| r.count).sum();
    rp.compare_values(15.0, rows as f64, 0.0);

    // PNG is lossless, so the file holds exactly the kernel's output.
    let written = load_image(&output.to_string_lossy()).expect("read output");
    let expected = resize(&src, cfg.factors, cfg.mapping).expect("single process");
    rp.compare_images(&expected, &written);

    assert!(rp.cleanup(), "distributed file regression test failed");
}

#[test]
fn decode_failure_reg() {
    let mut rp = RegParams::new("decode_failure");

    let missing = PathBuf::from(format!("{}/does-not-exist.png", regout_dir()));
    let cfg = config(2.0, 2.0, 3).output(format!("{}/never-written.png", regout_dir()));

    // --- Test 1: the group reports the coordinator's decode error ---
    let err = resize_distributed(&missing, &cfg).expect_err("missing source");
    let is_decode = matches!(err, ResizeError::Decode { .. });
    rp.compare_values(1.0, if is_decode { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, err.exit_code() as f64, 0.0);

    // --- Test 2: every other participant aborts instead of blocking ---
    let results = LocalGroup::run(3, |comm| {
        let path = (comm.rank() == 0).then_some(missing.as_path());
        run_participant(&comm, path, &cfg)
    })
    .expect("group run");
    let coordinator_decode = matches!(results[0], Err(ResizeError::Decode { .. }));
    rp.compare_values(1.0, if coordinator_decode { 1.0 } else { 0.0 }, 0.0);
    for (k, r) in results.iter().enumerate().skip(1) {
        let aborted = matches!(r, Err(ResizeError::Aborted { participant }) if *participant == k);
        rp.compare_values(1.0, if aborted { 1.0 } else { 0.0 }, 0.0);
    }

    // --- Test 3: invalid configuration never starts the group ---
    let err = resize_distributed(&missing, &cfg.clone().participants(0)).expect_err("no participants");
    rp.compare_values(64.0, err.exit_code() as f64, 0.0);
    let tiny = config(0.1, 1.0, 2);
    let err = resize_image_distributed(&gradient_image(4, 4), &tiny).expect_err("empty output");
    rp.compare_values(64.0, err.exit_code() as f64, 0.0);

    assert!(rp.cleanup(), "decode failure regression test failed");
}

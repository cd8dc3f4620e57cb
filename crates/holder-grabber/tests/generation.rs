//! End-to-end generation tests.

use holder_grabber::{
    generate, plan, Assembly, GrabberConfig, RibError, RibGroup, RibId, Side, SkipReason,
};
use holder_kernel_math::Point3;
use holder_kernel_sweep::TriangleMesh;

fn sequential() -> GrabberConfig {
    GrabberConfig {
        parallel: false,
        ..GrabberConfig::default()
    }
}

fn spiral_only() -> GrabberConfig {
    let mut config = sequential();
    config.cradle.count = 0;
    config.cradle.section_samples.clear();
    config
}

fn body_box() -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let corners = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ];
    for (x, y, z) in corners {
        mesh.push_vertex(Point3::new(x, y, z));
    }
    for tri in [
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ] {
        mesh.push_triangle(tri);
    }
    mesh
}

#[test]
fn test_every_planned_rib_is_accounted_for() {
    let config = sequential();
    let planned = plan(&config).unwrap();
    let generation = generate(&config).unwrap();
    let report = &generation.report;

    assert_eq!(
        report.built.len() + report.skipped.len(),
        planned.rib_count()
    );
    assert_eq!(generation.ribs.len(), report.built.len());
    for rib in &generation.ribs {
        assert!(!report.is_skipped(rib.id), "{} both built and skipped", rib.id);
    }
}

#[test]
fn test_deterministic_and_parallel_matches_sequential() {
    let first = generate(&sequential()).unwrap();
    let second = generate(&sequential()).unwrap();
    let parallel = generate(&GrabberConfig::default()).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(first.report, parallel.report);
    for ((a, b), c) in first.ribs.iter().zip(&second.ribs).zip(&parallel.ribs) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, c.id);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.mesh, c.mesh);
    }
}

#[test]
fn test_reference_rib_built_and_left_never_trimmed() {
    let generation = generate(&spiral_only()).unwrap();
    assert!(generation
        .ribs
        .iter()
        .any(|r| r.id == RibId::side(Side::Left, 0)));
    assert!(generation
        .report
        .trimmed
        .iter()
        .all(|t| t.rib.group == RibGroup::Right));
}

#[test]
fn test_truncation_bound() {
    let config = spiral_only();
    let generation = generate(&config).unwrap();
    let max_travel = config.max_travel();
    for rib in &generation.ribs {
        for &travel in rib.path.travel() {
            assert!(travel <= max_travel + 1e-9, "{} travels {travel}", rib.id);
        }
    }
}

#[test]
fn test_trimmed_ribs_start_after_closest_sample() {
    let config = spiral_only();
    let planned = plan(&config).unwrap();
    let trim_count = planned
        .sides
        .iter()
        .find(|s| s.side == Side::Right)
        .map_or(0, |s| s.trim_count);
    let generation = generate(&config).unwrap();

    for trimmed in &generation.report.trimmed {
        assert!(trimmed.rib.index < trim_count);
        assert!(trimmed.closest.distance <= config.half.trim_threshold);
        if let Some(rib) = generation.ribs.iter().find(|r| r.id == trimmed.rib) {
            assert!(rib.path.first_index() > trimmed.closest.index);
            assert!(rib.path.original_indices().all(|k| k > trimmed.closest.index));
            assert_eq!(rib.path.len(), trimmed.kept_samples);
        }
    }
}

#[test]
fn test_flagged_ribs_either_trimmed_or_dropped() {
    let config = spiral_only();
    let planned = plan(&config).unwrap();
    let generation = generate(&config).unwrap();
    let report = &generation.report;

    for rib in planned.sides.iter().flat_map(|s| &s.ribs).filter(|r| r.trim) {
        let id = RibId::side(rib.side, rib.index);
        let trimmed = report.trimmed.iter().any(|t| t.rib == id);
        let unresolved = report
            .skip_of(id)
            .is_some_and(|s| s.reason == SkipReason::TrimUnresolved);
        assert!(trimmed ^ unresolved, "{id} trimmed={trimmed} unresolved={unresolved}");
    }
}

#[test]
fn test_over_threshold_ribs_dropped_from_assembly() {
    let mut config = spiral_only();
    config.half.trim_threshold = 1e-6;
    let planned = plan(&config).unwrap();
    let generation = generate(&config).unwrap();
    let assembly = Assembly::new(None, &generation);

    let flagged: Vec<RibId> = planned
        .sides
        .iter()
        .flat_map(|s| &s.ribs)
        .filter(|r| r.trim)
        .map(|r| RibId::side(r.side, r.index))
        .collect();
    assert!(!flagged.is_empty());
    for id in &flagged {
        let skip = generation.report.skip_of(*id).unwrap();
        assert_eq!(skip.reason, SkipReason::TrimUnresolved);
        assert!(!assembly.contains(*id));
    }
    assert_eq!(
        generation.report.count(SkipReason::TrimUnresolved),
        flagged.len()
    );
    // Unflagged right ribs are unaffected.
    assert!(assembly.contains(RibId::side(Side::Right, flagged.len())));
}

#[test]
fn test_degenerate_paths_skipped_without_abort() {
    let mut config = spiral_only();
    // Leaves half a degree of travel: one sample per rib.
    config.core.angle = Some(359.5);
    let planned = plan(&config).unwrap();
    assert!(planned.rib_count() > 0);

    let generation = generate(&config).unwrap();
    assert!(generation.ribs.is_empty());
    assert_eq!(
        generation.report.count(SkipReason::GeometryDegenerate),
        planned.rib_count()
    );
    let detail = &generation.report.skipped[0].detail;
    assert_eq!(
        *detail,
        RibError::GeometryDegenerate { samples: 1 }.to_string()
    );
}

#[test]
fn test_body_only_assembly() {
    let mut config = spiral_only();
    config.left.max_count = Some(0);
    config.right.max_count = Some(0);
    let generation = generate(&config).unwrap();
    assert!(generation.ribs.is_empty());
    assert!(generation.report.skipped.is_empty());

    let assembly = Assembly::new(Some(body_box()), &generation);
    assert!(assembly.is_body_only());
    assert_eq!(assembly.solid_count(), 1);
    assert_eq!(assembly.to_mesh().num_triangles(), 12);
}

#[test]
fn test_built_ribs_are_closed_solids() {
    let generation = generate(&sequential()).unwrap();
    assert!(!generation.ribs.is_empty());
    for rib in &generation.ribs {
        assert!(rib.mesh.is_closed(), "{} is not closed", rib.id);
        assert!(rib.mesh.signed_volume() > 0.0, "{} has no volume", rib.id);
    }

    let assembly = Assembly::new(Some(body_box()), &generation);
    let merged = assembly.to_mesh();
    let expected: usize = 12 + generation
        .ribs
        .iter()
        .map(|r| r.mesh.num_triangles())
        .sum::<usize>();
    assert_eq!(merged.num_triangles(), expected);
}

#[test]
fn test_default_cradle_ribs_built() {
    let generation = generate(&sequential()).unwrap();
    for index in 0..3 {
        let id = RibId::cradle(index);
        assert!(
            generation.report.skip_of(id).is_none(),
            "{id} skipped: {:?}",
            generation.report.skip_of(id)
        );
        let rib = generation.ribs.iter().find(|r| r.id == id).unwrap();
        assert!(rib.mesh.is_closed(), "{id} is not closed");
        assert!(rib.mesh.signed_volume() > 0.0, "{id} has no volume");
    }
}

#[test]
fn test_cradle_ends_flat() {
    let config = sequential();
    let ring = 2 * (config.mesh.arc_segments + config.mesh.blend_segments);
    let generation = generate(&config).unwrap();

    let cradles: Vec<_> = generation
        .ribs
        .iter()
        .filter(|r| r.id.group == RibGroup::Cradle)
        .collect();
    assert_eq!(cradles.len(), 3);

    for rib in cradles {
        assert!(generation.report.built.iter().any(|b| b.rib == rib.id));
        let count = rib.mesh.num_vertices();
        assert_eq!(count % ring, 0);
        for cap in [0..ring, count - ring..count] {
            let z: Vec<f64> = cap.map(|i| rib.mesh.position(i).z).collect();
            let lo = z.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(hi - lo < 1e-3, "{} cap spans z {lo}..{hi}", rib.id);
            assert!(lo.abs() < 1e-3, "{} cap at z {lo}", rib.id);
        }
    }
}

#[test]
fn test_trimmed_ribs_never_skipped() {
    let generation = generate(&sequential()).unwrap();
    let report = &generation.report;
    assert!(!report.trimmed.is_empty());
    for trimmed in &report.trimmed {
        assert!(!report.is_skipped(trimmed.rib), "{} trimmed and skipped", trimmed.rib);
        assert!(report.built.iter().any(|b| b.rib == trimmed.rib));
    }
}

#[test]
fn test_invalid_config_aborts() {
    let mut config = sequential();
    config.left.wrap_angle = 0.0;
    assert!(matches!(
        generate(&config),
        Err(holder_grabber::GrabberError::InvalidConfig(_))
    ));
}

#[test]
fn test_toml_config() {
    let config = GrabberConfig::from_toml_str(
        r#"
        parallel = false
        bottle_radius = 35.0

        [right]
        max_count = 2

        [half]
        side = "left"
        pct = 0.5

        [cradle]
        count = 0
        section_samples = []
        "#,
    )
    .unwrap();
    let generation = generate(&config).unwrap();
    let rights = generation
        .report
        .built
        .iter()
        .filter(|b| b.rib.group == RibGroup::Right)
        .count();
    assert_eq!(rights, 2);
    assert!(generation
        .report
        .trimmed
        .iter()
        .all(|t| t.rib.group == RibGroup::Left));
}

#[test]
fn test_toml_half_side_none_trims_nothing() {
    let config = GrabberConfig::from_toml_str(
        r#"
        parallel = false

        [half]
        side = "none"

        [cradle]
        count = 0
        section_samples = []
        "#,
    )
    .unwrap();
    let planned = plan(&config).unwrap();
    assert!(planned.sides.iter().all(|s| s.trim_count == 0));

    let generation = generate(&config).unwrap();
    assert!(generation.report.trimmed.is_empty());
    assert_eq!(generation.report.count(SkipReason::TrimUnresolved), 0);
}

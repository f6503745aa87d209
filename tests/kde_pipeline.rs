use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use bisimviz::core::grid::{Grid, SizeAxis};
use bisimviz::core::kde::{kde_integration, kde_sampling};
use bisimviz::core::kernel::UniformEpanechnikov;
use bisimviz::core::points::{data_points, max_size, normalized_means, WeightMode};
use bisimviz::core::ticks::{level_ticks, log_size_ticks};
use bisimviz::plot::heatmap::render_heatmap;
use bisimviz::stats::LevelSizes;

fn unique_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "bisimviz_kde_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&path).unwrap();
    path
}

fn level(entries: &[(u64, u64)]) -> LevelSizes {
    let sizes: BTreeMap<u64, u64> = entries.iter().copied().collect();
    LevelSizes {
        accumulated: sizes.clone(),
        sizes,
    }
}

fn block_size_fixture() -> Vec<LevelSizes> {
    vec![
        level(&[(1, 40), (3, 10), (9, 4)]),
        level(&[(1, 55), (3, 6), (27, 2)]),
        level(&[(1, 70), (9, 1), (81, 1)]),
    ]
}

#[test]
fn pipeline_produces_a_normalized_heatmap_and_svg() {
    let levels = block_size_fixture();
    let fixed_point = 2;
    let points = data_points(&levels);
    let maximum_size = max_size(&points);
    assert_eq!(maximum_size, 81);

    let means = normalized_means(&points, fixed_point);
    let weights: Vec<f64> = points
        .iter()
        .map(|p| WeightMode::VertexBased.weight(p))
        .collect();

    let epsilon = (1.0 - 0.05) * 0.5 / fixed_point as f64;
    let scale = 0.75 / maximum_size as f64;
    let kernels: Vec<UniformEpanechnikov> = means
        .iter()
        .map(|m| UniformEpanechnikov::new(m[0], m[1], scale, epsilon).unwrap())
        .collect();

    let grid = Grid::new(128, fixed_point, SizeAxis::Log, maximum_size, 10, 0.2).unwrap();
    let mut heatmap = kde_sampling(&kernels, &weights, &grid).unwrap();
    assert!(heatmap.values.iter().all(|&v| v >= 0.0));
    heatmap.normalize();
    assert!((heatmap.max() - 1.0).abs() < 1e-12);

    let x_ticks = level_ticks(fixed_point, 128);
    let y_ticks = log_size_ticks(maximum_size, 128, 10, 0.2).unwrap();
    assert_eq!(x_ticks.positions.len(), 3);
    assert!(y_ticks.positions.len() > y_ticks.labels.iter().filter(|l| !l.is_empty()).count());

    let dir = unique_dir("svg");
    let path = dir.join("block_sizes_log_kde.svg");
    render_heatmap(
        &path,
        "Block size distribution over bisimulation levels",
        &heatmap,
        &x_ticks,
        &y_ticks,
        "Bisimulation level",
        "Block size",
    )
    .unwrap();
    let rendered = fs::read_to_string(&path).unwrap();
    assert!(rendered.contains("<svg"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn sampling_and_integration_agree_on_the_fixture() {
    let levels = block_size_fixture();
    let fixed_point = 2;
    let points = data_points(&levels);
    let maximum_size = max_size(&points);
    let means = normalized_means(&points, fixed_point);
    let weights: Vec<f64> = points
        .iter()
        .map(|p| WeightMode::BlockBased.weight(p))
        .collect();

    // Wide smooth kernels on a fine linear grid: both aggregators must
    // land on the same normalized shape.
    let kernels: Vec<UniformEpanechnikov> = means
        .iter()
        .map(|m| UniformEpanechnikov::new(m[0], m[1], 0.25, 0.3).unwrap())
        .collect();
    let grid = Grid::new(512, fixed_point, SizeAxis::Linear, maximum_size, 10, 0.2).unwrap();

    let mut sampled = kde_sampling(&kernels, &weights, &grid).unwrap();
    let mut integrated = kde_integration(&kernels, &weights, &grid).unwrap();
    sampled.normalize();
    integrated.normalize();
    for (a, b) in sampled.values.iter().zip(&integrated.values) {
        assert!((a - b).abs() < 0.02, "aggregators diverge: {a} vs {b}");
    }
}

//! Loading scenarios from disk and scoring them.
//!
//! The showcase scenario shipped with the examples crate must match the
//! in-code showcase game exactly, and scoring either must give the same
//! scoreboard.

use std::fs;
use std::path::{Path, PathBuf};

use meritorder_core::test_utils::*;
use meritorder_core::*;
use meritorder_data::{DataLoadError, load_scenario};
use meritorder_scoring::*;

fn showcase_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../meritorder-examples/data/showcase")
}

/// Create a temporary directory with a unique name for test isolation.
fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "meritorder_scenario_test_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn showcase_files_match_in_code_game() {
    let scenario = load_scenario(&showcase_dir()).unwrap();
    assert_eq!(scenario.catalog, PlantCatalog::standard());
    assert_eq!(scenario.config, ScoringConfig::default());
    assert_eq!(scenario.history, showcase_history());
    assert_eq!(scenario.building_consumptions, showcase_buildings());
}

#[test]
fn showcase_files_score_like_in_code_game() {
    let scenario = load_scenario(&showcase_dir()).unwrap();
    let from_files = ScoreAggregator::new(&scenario.catalog, scenario.config.clone())
        .unwrap()
        .score(&scenario.history, &scenario.building_consumptions)
        .unwrap();

    let catalog = PlantCatalog::standard();
    let in_code = ScoreAggregator::new(&catalog, ScoringConfig::default())
        .unwrap()
        .score(&showcase_history(), &showcase_buildings())
        .unwrap();

    assert_eq!(from_files, in_code);
}

#[test]
fn catalog_file_missing_a_used_plant_aborts_scoring() {
    let dir = make_test_dir("missing_plant");
    fs::write(
        dir.join("history.json"),
        r#"[{"North": {"productions": [["NUCLEAR", 500], ["GAS", 100]], "total_consumption": 600}}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("catalog.ron"),
        "[(kind: NUCLEAR, price: 15.0, co2_intensity: 0.0, derating: 92.1)]",
    )
    .unwrap();

    let scenario = load_scenario(&dir).unwrap();
    let err = ScoreAggregator::new(&scenario.catalog, scenario.config)
        .unwrap()
        .score(&scenario.history, &scenario.building_consumptions)
        .unwrap_err();
    assert_eq!(
        err,
        ScoringError::Catalog(CatalogError::MissingPlant(PlantKind::Gas))
    );

    cleanup(&dir);
}

#[test]
fn invalid_scoring_file_is_rejected_at_load() {
    let dir = make_test_dir("bad_scoring");
    fs::write(dir.join("history.ron"), "[]").unwrap();
    fs::write(dir.join("scoring.toml"), "blackout_penalty = 150.0\n").unwrap();

    let result = load_scenario(&dir);
    assert!(matches!(
        result,
        Err(DataLoadError::Scoring {
            source: ScoringError::InvalidConfig {
                field: "blackout_penalty",
                ..
            },
            ..
        })
    ));

    cleanup(&dir);
}

const LARGE_ROUNDS: &str = r#"[
    {"T": {"productions": [["GAS", 1e7]], "total_consumption": 1e7}},
    {"T": {"productions": [["GAS", 1e7]], "total_consumption": 1e7}}
]"#;

#[test]
fn largest_loadable_rounds_score_in_range() {
    let dir = make_test_dir("large_rounds");
    fs::write(dir.join("history.json"), LARGE_ROUNDS).unwrap();
    let scenario = load_scenario(&dir).unwrap();
    cleanup(&dir);

    let score = |policy| {
        let config = scenario.config.clone().with_policy(policy);
        let board = ScoreAggregator::new(&scenario.catalog, config)
            .unwrap()
            .score(&scenario.history, &scenario.building_consumptions)
            .unwrap();
        board.get(&TeamId::from("T")).unwrap().clone()
    };

    let relative = score(PolicyKind::Relative);
    assert_eq!(relative.get(Metric::Finance), Some(1248.2));
    assert_eq!(relative.get(Metric::Stability), Some(1198.2));
    assert_eq!(relative.get(Metric::Popularity), Some(748.2));

    let absolute = score(PolicyKind::Absolute);
    assert_eq!(absolute.get(Metric::Finance), Some(0.0));
    assert_eq!(absolute.get(Metric::Ecology), Some(50.0));
    assert_eq!(absolute.get(Metric::Balance), Some(100.0));
    assert_eq!(absolute.get(Metric::Combined), Some(30.0));
}

#[test]
fn loadable_catalog_too_dear_for_fixed_point_aborts_scoring() {
    let dir = make_test_dir("dear_catalog");
    fs::write(dir.join("history.json"), LARGE_ROUNDS).unwrap();
    fs::write(
        dir.join("catalog.ron"),
        "[(kind: GAS, price: 10000.0, co2_intensity: 0.5, derating: 95.0)]",
    )
    .unwrap();
    let scenario = load_scenario(&dir).unwrap();
    cleanup(&dir);

    let err = ScoreAggregator::new(&scenario.catalog, scenario.config)
        .unwrap()
        .score(&scenario.history, &scenario.building_consumptions)
        .unwrap_err();
    assert!(matches!(err, ScoringError::Overflow { quantity: "total cost", .. }));
}

#[test]
fn scenario_without_history_fails_to_load() {
    let dir = make_test_dir("no_history");
    let result = load_scenario(&dir);
    assert!(matches!(result, Err(DataLoadError::MissingRequired { .. })));
    cleanup(&dir);
}

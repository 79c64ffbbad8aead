use std::collections::HashMap;

use scout_terminal::render::{
    FIXED_COLUMNS, MatchClass, PLACEHOLDER, ResultRenderer, classify_fit, format_score,
};
use scout_terminal::state::{PlayerRow, SuccessResponse};

fn player(rank: u32, name: &str, fit_score: f64, stats: &[(&str, &str)]) -> PlayerRow {
    PlayerRow {
        rank,
        player: name.to_string(),
        age: "24".to_string(),
        nation: "FR".to_string(),
        club: "Brighton".to_string(),
        fit_score,
        key_feature_name: "xG".to_string(),
        key_feature_value: "0.8".to_string(),
        display_stats: stats
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

fn response(columns: &[&str], results: Vec<PlayerRow>) -> SuccessResponse {
    SuccessResponse {
        club: "Arsenal".to_string(),
        role: "ST".to_string(),
        display_columns: columns.iter().map(|c| c.to_string()).collect(),
        results,
    }
}

#[test]
fn header_is_fixed_labels_then_display_columns() {
    let mut renderer = ResultRenderer::new();
    let columns = vec!["Save%".to_string(), "CS%".to_string(), "GA90".to_string()];
    renderer.render_header(&columns);

    let header = &renderer.table().header;
    assert_eq!(header.len(), 5 + columns.len());
    assert_eq!(&header[..5], FIXED_COLUMNS.map(String::from).as_slice());
    assert_eq!(&header[5..], columns.as_slice());
}

#[test]
fn header_replaces_previous_header() {
    let mut renderer = ResultRenderer::new();
    renderer.render_header(&["A".to_string(), "B".to_string(), "C".to_string()]);
    renderer.render_header(&["Z".to_string()]);
    assert_eq!(renderer.table().header.len(), 6);
    assert_eq!(renderer.table().header[5], "Z");
}

#[test]
fn similarity_threshold_is_strictly_above_ninety() {
    assert_eq!(classify_fit(91.0), MatchClass::High);
    assert_eq!(classify_fit(90.0), MatchClass::Mid);
    assert_eq!(classify_fit(90.05), MatchClass::High);
    assert_eq!(classify_fit(0.0), MatchClass::Mid);

    let mut renderer = ResultRenderer::new();
    renderer.render(&response(
        &[],
        vec![player(1, "A", 91.0, &[]), player(2, "B", 90.0, &[])],
    ));
    let rows = &renderer.table().rows;
    assert_eq!(rows[0].similarity.class, MatchClass::High);
    assert_eq!(rows[0].similarity.text, "91%");
    assert_eq!(rows[1].similarity.class, MatchClass::Mid);
    assert_eq!(rows[1].similarity.text, "90%");
}

#[test]
fn row_cells_follow_display_format() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(
        &["xG", "Shots"],
        vec![player(7, "X", 84.5, &[("xG", "0.8"), ("Shots", "3.1")])],
    ));
    let row = &renderer.table().rows[0];
    assert_eq!(row.rank, "#7");
    assert_eq!(row.player_name, "X");
    assert_eq!(row.player_meta, "24 yo • FR");
    assert_eq!(row.squad, "Brighton");
    assert_eq!(row.similarity.text, "84.5%");
    assert_eq!(row.key_stat.value, "0.8");
    assert_eq!(row.key_stat.caption, "xG");
    assert_eq!(row.stats, vec!["0.8", "3.1"]);
    assert_eq!(row.cell_count(), 7);
}

#[test]
fn missing_stat_renders_placeholder() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(
        &["Gls", "xG", "SoT"],
        vec![player(1, "A", 80.0, &[("xG", "0.4"), ("SoT", "")])],
    ));
    let stats = &renderer.table().rows[0].stats;
    assert_eq!(stats, &vec![PLACEHOLDER, "0.4", PLACEHOLDER]);
    assert!(stats.iter().all(|cell| !cell.is_empty()));
}

#[test]
fn zero_stat_is_a_value_not_a_placeholder() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(&["xG"], vec![player(1, "A", 80.0, &[("xG", "0")])]));
    assert_eq!(renderer.table().rows[0].stats, vec!["0"]);
}

#[test]
fn rendering_twice_is_idempotent() {
    let data = response(
        &["xG", "Shots"],
        vec![
            player(1, "A", 95.0, &[("xG", "0.8")]),
            player(2, "B", 88.0, &[("Shots", "2.0")]),
        ],
    );
    let mut renderer = ResultRenderer::new();
    renderer.render(&data);
    let first = renderer.table().clone();
    renderer.render(&data);
    assert_eq!(renderer.table(), &first);
    assert_eq!(renderer.table().rows.len(), 2);
    assert_eq!(renderer.table().header.len(), 7);
}

#[test]
fn rows_keep_server_order() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(
        &[],
        vec![
            player(2, "Second", 70.0, &[]),
            player(1, "First", 99.0, &[]),
        ],
    ));
    let names: Vec<&str> = renderer
        .table()
        .rows
        .iter()
        .map(|r| r.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[test]
fn empty_columns_and_results_degrade_to_fixed_header() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(&[], Vec::new()));
    let table = renderer.table();
    assert_eq!(table.header.len(), 5);
    assert!(table.rows.is_empty());
    let caption = table.caption.as_ref().expect("caption should be set");
    assert_eq!(caption.club, "Arsenal");
    assert_eq!(caption.role, "ST");
}

#[test]
fn clear_drops_everything() {
    let mut renderer = ResultRenderer::new();
    renderer.render(&response(&["xG"], vec![player(1, "A", 95.0, &[])]));
    renderer.clear();
    assert!(renderer.table().is_empty());
    assert!(renderer.table().caption.is_none());
}

#[test]
fn score_formatting_drops_zero_fraction() {
    assert_eq!(format_score(95.0), "95");
    assert_eq!(format_score(93.4), "93.4");
    assert_eq!(format_score(100.0), "100");
}

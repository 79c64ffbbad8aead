use std::fs;
use std::path::PathBuf;

use scout_terminal::recommend_fetch::{
    clubs_url, parse_clubs_json, parse_recommend_json, recommend_url,
};
use scout_terminal::state::RecommendationResponse;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_clubs_fixture_in_order() {
    let clubs = parse_clubs_json(&read_fixture("clubs.json")).expect("fixture should parse");
    assert_eq!(
        clubs,
        vec!["Arsenal", "Aston Villa", "Brighton", "Chelsea", "Liverpool"]
    );
}

#[test]
fn clubs_null_is_empty() {
    assert!(parse_clubs_json("null").expect("null should parse").is_empty());
    assert!(parse_clubs_json("  ").expect("blank should parse").is_empty());
}

#[test]
fn clubs_object_is_rejected() {
    assert!(parse_clubs_json(r#"{"clubs": []}"#).is_err());
}

#[test]
fn parses_success_fixture() {
    let response =
        parse_recommend_json(&read_fixture("recommend_striker.json")).expect("fixture should parse");
    let RecommendationResponse::Success(ok) = response else {
        panic!("expected success response");
    };
    assert_eq!(ok.club, "Arsenal");
    assert_eq!(ok.role, "ST");
    assert_eq!(ok.display_columns, vec!["Gls", "xG", "Sh", "SoT"]);
    assert_eq!(ok.results.len(), 3);

    let first = &ok.results[0];
    assert_eq!(first.rank, 1);
    assert_eq!(first.player, "Jonas Kovac");
    assert_eq!(first.age, "24");
    assert_eq!(first.fit_score, 93.4);
    assert_eq!(first.key_feature_name, "xG");
    assert_eq!(first.key_feature_value, "0.71");
    assert_eq!(first.display_stats.get("Sh").map(String::as_str), Some("3.4"));
}

#[test]
fn loose_scalars_become_text() {
    let response =
        parse_recommend_json(&read_fixture("recommend_striker.json")).expect("fixture should parse");
    let RecommendationResponse::Success(ok) = response else {
        panic!("expected success response");
    };
    let second = &ok.results[1];
    assert_eq!(second.age, "N/A");
    assert_eq!(second.nation, "N/A");
    assert!(!second.display_stats.contains_key("SoT"));

    let third = &ok.results[2];
    assert_eq!(third.display_stats.get("xG").map(String::as_str), Some("0"));
    assert_eq!(third.display_stats.get("SoT").map(String::as_str), Some(""));
}

#[test]
fn parses_error_fixture() {
    let response =
        parse_recommend_json(&read_fixture("recommend_error.json")).expect("fixture should parse");
    assert!(matches!(
        response,
        RecommendationResponse::Error(ref err) if err.message == "No players found for Arsenal in role GK"
    ));
}

#[test]
fn empty_error_field_is_not_an_error_payload() {
    let raw = r#"{"error": "", "club": "Arsenal", "role": "CB", "display_columns": [], "results": []}"#;
    let response = parse_recommend_json(raw).expect("payload should parse");
    assert!(matches!(response, RecommendationResponse::Success(_)));
}

#[test]
fn non_json_body_is_an_error() {
    assert!(parse_recommend_json("<html>Internal Server Error</html>").is_err());
    assert!(parse_recommend_json("").is_err());
    assert!(parse_recommend_json("[1, 2]").is_err());
}

#[test]
fn success_without_results_is_a_shape_error() {
    assert!(parse_recommend_json(r#"{"club": "Arsenal", "role": "ST"}"#).is_err());
}

#[test]
fn endpoint_urls_ignore_trailing_slash() {
    assert_eq!(clubs_url("http://localhost:5000/"), "http://localhost:5000/api/clubs");
    assert_eq!(
        recommend_url("http://localhost:5000"),
        "http://localhost:5000/api/recommend"
    );
}

use scout_terminal::query::UiState;
use scout_terminal::recommend_fetch::parse_recommend_json;
use scout_terminal::render::MatchClass;
use scout_terminal::state::{AppState, Delta, FormInput, apply_delta};

/// Drives one full cycle: submit, decode the body as the worker would, apply.
fn run_cycle(state: &mut AppState, form: &FormInput, body: &str) {
    let pending = state.query.submit(form);
    assert_eq!(state.query.state(), UiState::Loading);
    let delta = match parse_recommend_json(body) {
        Ok(response) => Delta::RecommendResolved {
            generation: pending.generation,
            response,
        },
        Err(err) => Delta::RecommendFailed {
            generation: pending.generation,
            error: format!("{err:#}"),
        },
    };
    apply_delta(state, delta);

    let visibility = state.query.visibility();
    assert!(!visibility.loading);
    assert!(visibility.results ^ visibility.error);
    assert_eq!(visibility.visible_count(), 1);
}

fn arsenal_striker() -> FormInput {
    FormInput {
        club_name: "Arsenal".to_string(),
        subrole: "Striker".to_string(),
        top_k: "5".to_string(),
    }
}

#[test]
fn single_striker_recommendation() {
    let body = r#"{
        "club": "Arsenal",
        "role": "Striker",
        "display_columns": ["xG", "Shots"],
        "results": [{
            "rank": 1, "player": "X", "age": 24, "nation": "FR", "club": "Arsenal",
            "fit_cosine": 95, "key_feature": "xG", "key_feature_value": "0.8",
            "display_stats": {"xG": "0.8", "Shots": "3.1"}
        }]
    }"#;
    let mut state = AppState::new();
    run_cycle(&mut state, &arsenal_striker(), body);

    assert_eq!(state.query.state(), UiState::Results);
    let table = state.query.table();
    assert_eq!(table.header.len(), 7);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].similarity.text, "95%");
    assert_eq!(table.rows[0].similarity.class, MatchClass::High);
    assert_eq!(table.rows[0].stats, vec!["0.8", "3.1"]);
}

#[test]
fn server_error_message_is_shown() {
    let mut state = AppState::new();
    run_cycle(&mut state, &arsenal_striker(), r#"{"error": "Club not found"}"#);

    assert_eq!(state.query.state(), UiState::Error);
    assert_eq!(state.query.error_message(), Some("Club not found"));
    let visibility = state.query.visibility();
    assert!(!visibility.results);
    assert!(!visibility.loading);
}

#[test]
fn empty_results_still_show_results_view() {
    let body = r#"{"club": "Arsenal", "role": "GK", "display_columns": [], "results": []}"#;
    let mut state = AppState::new();
    run_cycle(&mut state, &arsenal_striker(), body);

    assert_eq!(state.query.state(), UiState::Results);
    assert_eq!(state.query.table().header.len(), 5);
    assert!(state.query.table().rows.is_empty());
    assert!(state.query.error_message().is_none());
}

#[test]
fn malformed_body_shows_generic_error() {
    let mut state = AppState::new();
    run_cycle(&mut state, &arsenal_striker(), "Bad Gateway");

    assert_eq!(state.query.state(), UiState::Error);
    assert_eq!(state.query.error_message(), Some("Error fetching data."));
    assert!(state.logs.iter().any(|l| l.starts_with("[WARN]")));
}

#[test]
fn page_stays_usable_after_each_outcome() {
    let ok = r#"{"club": "Arsenal", "role": "ST", "display_columns": ["xG"], "results": []}"#;
    let mut state = AppState::new();
    for body in [ok, r#"{"error": "nope"}"#, "not json", ok] {
        run_cycle(&mut state, &arsenal_striker(), body);
    }
    assert_eq!(state.query.state(), UiState::Results);
    assert_eq!(state.query.generation(), 4);
}

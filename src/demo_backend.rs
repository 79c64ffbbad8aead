use rand::Rng;
use serde_json::{Map, Value, json};

use crate::state::{RecommendationRequest, SUBROLES};

/// Clubs known to the offline backend, already sorted as the service sorts them.
pub const DEMO_CLUBS: [&str; 8] = [
    "Arsenal",
    "Aston Villa",
    "Brighton",
    "Chelsea",
    "Liverpool",
    "Manchester City",
    "Newcastle Utd",
    "Tottenham",
];

const FIRST_NAMES: [&str; 12] = [
    "Alex", "Bruno", "Carlos", "Dario", "Emil", "Felix", "Goran", "Hugo", "Ivan", "Jonas",
    "Kai", "Luca",
];
const LAST_NAMES: [&str; 14] = [
    "Almeida", "Brandt", "Costa", "Dvorak", "Eriksen", "Fabre", "Gallo", "Hansen", "Ibarra",
    "Jansen", "Kovac", "Lindqvist", "Moreau", "Novak",
];
const NATIONS: [&str; 9] = ["ENG", "FRA", "ESP", "GER", "BRA", "ARG", "NED", "POR", "NOR"];
const SQUAD_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlayer {
    pub name: String,
    pub age: u32,
    pub nation: String,
    pub club: String,
    pub subrole: String,
}

/// Offline stand-in for the recommendation service. Answers with the same
/// JSON bodies the service sends so the client pipeline runs unchanged.
#[derive(Debug, Clone)]
pub struct DemoBackend {
    roster: Vec<DemoPlayer>,
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoBackend {
    pub fn new() -> Self {
        Self {
            roster: seed_roster(),
        }
    }

    pub fn roster(&self) -> &[DemoPlayer] {
        &self.roster
    }

    pub fn clubs_json(&self) -> String {
        Value::from(DEMO_CLUBS.to_vec()).to_string()
    }

    pub fn recommend_json(&self, request: &RecommendationRequest, rng: &mut impl Rng) -> String {
        self.recommend_value(request, rng).to_string()
    }

    fn recommend_value(&self, request: &RecommendationRequest, rng: &mut impl Rng) -> Value {
        let Some(columns) = display_columns(&request.subrole) else {
            return json!({ "error": "Invalid subrole" });
        };
        let has_squad = self
            .roster
            .iter()
            .any(|p| p.club == request.club_name && p.subrole == request.subrole);
        if !has_squad {
            return json!({
                "error": format!(
                    "No players found for {} in role {}",
                    request.club_name, request.subrole
                )
            });
        }

        let mut scored: Vec<(f64, Value)> = self
            .roster
            .iter()
            .filter(|p| p.subrole == request.subrole && p.club != request.club_name)
            .map(|p| {
                let fit = round_to(rng.gen_range(55.0..99.5), 1);
                (fit, player_value(p, fit, columns, &mut *rng))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<Value> = scored
            .into_iter()
            .take(request.top_k as usize)
            .enumerate()
            .map(|(idx, (_, mut row))| {
                row["rank"] = json!(idx + 1);
                row
            })
            .collect();

        json!({
            "results": results,
            "club": request.club_name,
            "role": request.subrole,
            "display_columns": columns,
        })
    }
}

/// Four headline stats per subrole, named as the service names them.
pub fn display_columns(subrole: &str) -> Option<&'static [&'static str]> {
    let columns: &'static [&'static str] = match subrole {
        "CB" => &["Tkl", "Int", "Clr", "Blocks_stats_defense"],
        "FB" => &["Tkl", "Crs", "Succ", "PrgP"],
        "CDM" => &["Tkl", "Int", "Cmp", "PrgP"],
        "CM" => &["Cmp", "PrgP", "SCA90", "KP"],
        "CAM" => &["SCA90", "GCA90", "Ast", "xAG"],
        "WINGER" => &["Succ", "Crs", "SCA90", "PrgC"],
        "ST" => &["Gls", "xG", "Sh", "SoT"],
        "GK" => &["Save%", "CS%", "GA90", "PSxG"],
        _ => return None,
    };
    Some(columns)
}

fn stat_range(column: &str) -> (f64, f64) {
    match column {
        "Tkl" | "Int" => (0.5, 3.5),
        "Clr" => (1.0, 7.0),
        "Blocks_stats_defense" => (0.2, 2.0),
        "Crs" => (0.5, 6.0),
        "Succ" => (0.3, 4.0),
        "PrgP" | "PrgC" => (1.0, 9.0),
        "Cmp" => (20.0, 80.0),
        "SCA90" => (1.0, 6.0),
        "GCA90" | "xAG" | "Ast" => (0.05, 0.6),
        "KP" => (0.3, 3.0),
        "Gls" | "xG" => (0.1, 0.9),
        "Sh" => (1.0, 5.0),
        "SoT" => (0.3, 2.0),
        "Save%" => (60.0, 82.0),
        "CS%" => (15.0, 50.0),
        "GA90" => (0.6, 2.0),
        "PSxG" => (-5.0, 8.0),
        _ => (0.0, 1.0),
    }
}

fn player_value(player: &DemoPlayer, fit: f64, columns: &[&str], rng: &mut impl Rng) -> Value {
    let mut stats = Map::new();
    let mut key: Option<(&str, f64, f64)> = None;
    for &column in columns {
        let (lo, hi) = stat_range(column);
        let value = round_to(rng.gen_range(lo..hi), 2);
        let strength = (value - lo) / (hi - lo);
        if key.is_none_or(|(_, _, best)| strength > best) {
            key = Some((column, value, strength));
        }
        stats.insert(column.to_string(), json!(value));
    }
    let (key_feature, key_value) = key.map(|(name, value, _)| (name, value)).unwrap_or(("", 0.0));

    json!({
        "rank": 0,
        "player": player.name,
        "nation": player.nation,
        "club": player.club,
        "subrole": player.subrole,
        "age": player.age,
        "key_feature": key_feature,
        "key_feature_value": key_value,
        "fit_cosine": fit,
        "display_stats": Value::Object(stats),
    })
}

fn seed_roster() -> Vec<DemoPlayer> {
    let mut roster = Vec::new();
    for (club_idx, club) in DEMO_CLUBS.iter().enumerate() {
        for (role_idx, subrole) in SUBROLES.iter().enumerate() {
            for slot in 0..SQUAD_SLOTS {
                let first = FIRST_NAMES[(club_idx * 7 + role_idx * 3 + slot) % FIRST_NAMES.len()];
                let last =
                    LAST_NAMES[(club_idx * 5 + role_idx * 11 + slot * 13) % LAST_NAMES.len()];
                roster.push(DemoPlayer {
                    name: format!("{first} {last}"),
                    age: 19 + ((club_idx + role_idx * 2 + slot * 5) % 15) as u32,
                    nation: NATIONS[(club_idx * 3 + role_idx + slot) % NATIONS.len()].to_string(),
                    club: club.to_string(),
                    subrole: subrole.to_string(),
                });
            }
        }
    }
    roster
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use crate::http_cache::get_json_cached;
use crate::http_client::http_client;
use crate::state::{
    ErrorResponse, PlayerRow, RecommendationRequest, RecommendationResponse, SuccessResponse,
};

pub fn clubs_url(base: &str) -> String {
    format!("{}/api/clubs", base.trim_end_matches('/'))
}

pub fn recommend_url(base: &str) -> String {
    format!("{}/api/recommend", base.trim_end_matches('/'))
}

/// Cache trouble is passed to `on_warning`; the club list is still returned.
pub fn fetch_clubs(
    base: &str,
    use_cache: bool,
    on_warning: impl FnMut(String),
) -> Result<Vec<String>> {
    let client = http_client()?;
    let url = clubs_url(base);
    let body = if use_cache {
        get_json_cached(client, &url, on_warning)?
    } else {
        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status}: {body}"));
        }
        body
    };
    parse_clubs_json(&body)
}

/// Posts the request and decodes whatever body comes back. The service reports
/// user-facing errors as `{"error": ..}` with a 4xx status, so the status alone
/// does not decide success.
pub fn fetch_recommendations(
    base: &str,
    request: &RecommendationRequest,
) -> Result<RecommendationResponse> {
    let client = http_client()?;
    let url = recommend_url(base);
    let resp = client
        .post(&url)
        .header(ACCEPT, "application/json")
        .json(request)
        .send()
        .with_context(|| format!("POST {url} failed"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    parse_recommend_json(&body).with_context(|| format!("http {status} from {url}"))
}

pub fn parse_clubs_json(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let clubs: Vec<Value> = serde_json::from_str(trimmed).context("invalid clubs json")?;
    Ok(clubs
        .iter()
        .map(scalar_text)
        .filter(|club| !club.is_empty())
        .collect())
}

pub fn parse_recommend_json(raw: &str) -> Result<RecommendationResponse> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid recommend json")?;
    if !root.is_object() {
        return Err(anyhow!("recommend response is not an object"));
    }
    if let Some(message) = error_message(&root) {
        return Ok(RecommendationResponse::Error(ErrorResponse { message }));
    }
    let wire: WireSuccess =
        serde_json::from_value(root).context("unexpected recommend response shape")?;
    Ok(RecommendationResponse::Success(wire.into_response()))
}

/// Text for a loosely typed scalar: strings verbatim, numbers via their
/// shortest float form, null as empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format!("{f}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn error_message(root: &Value) -> Option<String> {
    let err = root.get("error")?;
    let message = scalar_text(err);
    // An empty or null error field does not mark the payload as an error.
    if message.trim().is_empty() {
        return None;
    }
    Some(message)
}

#[derive(Debug, Deserialize)]
struct WireSuccess {
    #[serde(default)]
    club: Value,
    #[serde(default)]
    role: Value,
    display_columns: Vec<Value>,
    results: Vec<WirePlayerRow>,
}

#[derive(Debug, Deserialize)]
struct WirePlayerRow {
    rank: u32,
    #[serde(default)]
    player: Value,
    #[serde(default)]
    age: Value,
    #[serde(default)]
    nation: Value,
    #[serde(default)]
    club: Value,
    fit_cosine: f64,
    #[serde(default)]
    key_feature: Value,
    #[serde(default)]
    key_feature_value: Value,
    #[serde(default)]
    display_stats: HashMap<String, Value>,
}

impl WireSuccess {
    fn into_response(self) -> SuccessResponse {
        SuccessResponse {
            club: scalar_text(&self.club),
            role: scalar_text(&self.role),
            display_columns: self.display_columns.iter().map(scalar_text).collect(),
            results: self.results.into_iter().map(WirePlayerRow::into_row).collect(),
        }
    }
}

impl WirePlayerRow {
    fn into_row(self) -> PlayerRow {
        PlayerRow {
            rank: self.rank,
            player: scalar_text(&self.player),
            age: scalar_text(&self.age),
            nation: scalar_text(&self.nation),
            club: scalar_text(&self.club),
            fit_score: self.fit_cosine,
            key_feature_name: scalar_text(&self.key_feature),
            key_feature_value: scalar_text(&self.key_feature_value),
            display_stats: self
                .display_stats
                .iter()
                .map(|(key, value)| (key.clone(), scalar_text(value)))
                .collect(),
        }
    }
}

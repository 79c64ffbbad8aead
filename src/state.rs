use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use serde::Serialize;

use crate::query::{self, PendingRequest, QueryController, Resolution};
use crate::render::RenderedTable;

pub const CLUB_PLACEHOLDER: &str = "Select Club...";
pub const DEFAULT_TOP_K: u32 = 10;
pub const TOP_K_MIN: u32 = 1;
pub const TOP_K_MAX: u32 = 50;

/// Subroles understood by the recommendation service, in form order.
pub const SUBROLES: [&str; 8] = ["CB", "FB", "CDM", "CM", "CAM", "WINGER", "ST", "GK"];

/// Raw form fields as the user left them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub club_name: String,
    pub subrole: String,
    pub top_k: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationRequest {
    pub club_name: String,
    pub subrole: String,
    pub top_k: u32,
}

impl RecommendationRequest {
    pub fn from_form(form: &FormInput) -> Self {
        // Unparsable limits fall back to the service default.
        let top_k = form
            .top_k
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|k| *k > 0)
            .unwrap_or(DEFAULT_TOP_K);
        Self {
            club_name: form.club_name.clone(),
            subrole: form.subrole.clone(),
            top_k,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResponse {
    Error(ErrorResponse),
    Success(SuccessResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    pub club: String,
    pub role: String,
    pub display_columns: Vec<String>,
    pub results: Vec<PlayerRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub rank: u32,
    pub player: String,
    // Age and nation arrive as numbers or "N/A"; both are display-only.
    pub age: String,
    pub nation: String,
    pub club: String,
    pub fit_score: f64,
    pub key_feature_name: String,
    pub key_feature_value: String,
    pub display_stats: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubSelect {
    pub options: Vec<SelectOption>,
    pub selected: usize,
}

impl Default for ClubSelect {
    fn default() -> Self {
        Self::new()
    }
}

impl ClubSelect {
    pub fn new() -> Self {
        Self {
            options: vec![placeholder_option()],
            selected: 0,
        }
    }

    /// Value of the selected option, or `None` while the placeholder is selected.
    pub fn selected_value(&self) -> Option<&str> {
        self.options
            .get(self.selected)
            .filter(|opt| !opt.disabled)
            .map(|opt| opt.value.as_str())
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|opt| opt.label.as_str())
            .unwrap_or(CLUB_PLACEHOLDER)
    }

    pub fn club_count(&self) -> usize {
        self.options.iter().filter(|opt| !opt.disabled).count()
    }

    pub fn select_next(&mut self) {
        let mut idx = self.selected;
        while idx + 1 < self.options.len() {
            idx += 1;
            if !self.options[idx].disabled {
                self.selected = idx;
                return;
            }
        }
    }

    pub fn select_prev(&mut self) {
        let mut idx = self.selected;
        while idx > 0 {
            idx -= 1;
            if !self.options[idx].disabled {
                self.selected = idx;
                return;
            }
        }
    }
}

pub fn placeholder_option() -> SelectOption {
    SelectOption {
        value: String::new(),
        label: CLUB_PLACEHOLDER.to_string(),
        disabled: true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Club,
    Role,
    TopK,
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub active: bool,
    pub last_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub clubs: ClubSelect,
    pub clubs_loading: bool,
    pub subrole: usize,
    pub top_k: u32,
    pub focus: FormFocus,
    pub query: QueryController,
    pub export: ExportState,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_top_k(DEFAULT_TOP_K)
    }

    pub fn with_top_k(top_k: u32) -> Self {
        Self {
            clubs: ClubSelect::new(),
            clubs_loading: false,
            subrole: SUBROLES.iter().position(|r| *r == "ST").unwrap_or(0),
            top_k: top_k.clamp(TOP_K_MIN, TOP_K_MAX),
            focus: FormFocus::Club,
            query: QueryController::new(),
            export: ExportState::default(),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn selected_subrole(&self) -> &'static str {
        SUBROLES[self.subrole % SUBROLES.len()]
    }

    pub fn form_input(&self) -> FormInput {
        FormInput {
            club_name: self.clubs.selected_value().unwrap_or_default().to_string(),
            subrole: self.selected_subrole().to_string(),
            top_k: self.top_k.to_string(),
        }
    }

    /// Submits the form. Refused (no transition) while a required field is empty.
    pub fn submit(&mut self) -> Option<ProviderCommand> {
        let form = self.form_input();
        if form.club_name.is_empty() {
            self.push_log("[INFO] Select a club first");
            return None;
        }
        if form.subrole.is_empty() {
            self.push_log("[INFO] Select a role first");
            return None;
        }
        let pending = self.query.submit(&form);
        self.push_log(format!(
            "[INFO] Request #{}: {} / {} (top {})",
            pending.generation,
            pending.request.club_name,
            pending.request.subrole,
            pending.request.top_k
        ));
        Some(ProviderCommand::Recommend(pending))
    }

    pub fn request_clubs(&mut self) -> ProviderCommand {
        self.clubs_loading = true;
        ProviderCommand::LoadClubs
    }

    pub fn export_command(&mut self, path: PathBuf) -> Option<ProviderCommand> {
        if self.export.active {
            self.push_log("[INFO] Export already running");
            return None;
        }
        let table = self.query.exportable_table()?;
        self.export.active = true;
        Some(ProviderCommand::ExportResults {
            path,
            table: table.clone(),
        })
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormFocus::Club => FormFocus::Role,
            FormFocus::Role => FormFocus::TopK,
            FormFocus::TopK => FormFocus::Club,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormFocus::Club => FormFocus::TopK,
            FormFocus::Role => FormFocus::Club,
            FormFocus::TopK => FormFocus::Role,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            FormFocus::Club => self.clubs.select_next(),
            FormFocus::Role => self.subrole = (self.subrole + 1) % SUBROLES.len(),
            FormFocus::TopK => self.top_k = (self.top_k + 1).min(TOP_K_MAX),
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            FormFocus::Club => self.clubs.select_prev(),
            FormFocus::Role => {
                self.subrole = (self.subrole + SUBROLES.len() - 1) % SUBROLES.len()
            }
            FormFocus::TopK => self.top_k = self.top_k.saturating_sub(1).max(TOP_K_MIN),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetClubs(Vec<String>),
    ClubsFailed(String),
    RecommendResolved {
        generation: u64,
        response: RecommendationResponse,
    },
    RecommendFailed {
        generation: u64,
        error: String,
    },
    ExportFinished {
        path: String,
        rows: usize,
    },
    ExportFailed {
        path: String,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadClubs,
    Recommend(PendingRequest),
    ExportResults { path: PathBuf, table: RenderedTable },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetClubs(clubs) => {
            state.clubs_loading = false;
            let count = clubs.len();
            query::load_club_options(&mut state.clubs, clubs);
            state.push_log(format!("[INFO] Loaded {count} clubs"));
        }
        Delta::ClubsFailed(err) => {
            state.clubs_loading = false;
            state.push_log(format!("[WARN] Club list unavailable: {err}"));
        }
        Delta::RecommendResolved {
            generation,
            response,
        } => {
            let summary = match &response {
                RecommendationResponse::Error(err) => format!("service error: {}", err.message),
                RecommendationResponse::Success(ok) => {
                    format!("{} recommendations", ok.results.len())
                }
            };
            match state.query.resolve(generation, response) {
                Resolution::Applied => {
                    state.push_log(format!("[INFO] Response #{generation}: {summary}"))
                }
                Resolution::Stale => {
                    state.push_log(format!("[INFO] Discarded stale response #{generation}"))
                }
            }
        }
        Delta::RecommendFailed { generation, error } => match state.query.fail(generation) {
            Resolution::Applied => {
                state.push_log(format!("[WARN] Request #{generation} failed: {error}"))
            }
            Resolution::Stale => state.push_log(format!(
                "[INFO] Discarded stale failure #{generation}: {error}"
            )),
        },
        Delta::ExportFinished { path, rows } => {
            state.export.active = false;
            state.export.last_path = Some(path.clone());
            state.push_log(format!("[INFO] Exported {rows} rows to {path}"));
        }
        Delta::ExportFailed { path, error } => {
            state.export.active = false;
            state.push_log(format!("[WARN] Export to {path} failed: {error}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn role_label(subrole: &str) -> &'static str {
    match subrole {
        "CB" => "Centre Back",
        "FB" => "Full Back",
        "CDM" => "Defensive Midfielder",
        "CM" => "Central Midfielder",
        "CAM" => "Attacking Midfielder",
        "WINGER" => "Winger",
        "ST" => "Striker",
        "GK" => "Goalkeeper",
        _ => "Unknown",
    }
}

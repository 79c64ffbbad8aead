use crate::render::{RenderedTable, ResultRenderer};
use crate::state::{
    ClubSelect, FormInput, RecommendationRequest, RecommendationResponse, SelectOption,
    placeholder_option,
};

/// Shown in the error view when the request never produced a service answer.
pub const FALLBACK_ERROR_MESSAGE: &str = "Error fetching data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Results,
    Error,
}

/// Per-view visibility, always derived from a single `UiState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewVisibility {
    pub idle: bool,
    pub loading: bool,
    pub results: bool,
    pub error: bool,
}

impl ViewVisibility {
    pub fn of(state: UiState) -> Self {
        Self {
            idle: state == UiState::Idle,
            loading: state == UiState::Loading,
            results: state == UiState::Results,
            error: state == UiState::Error,
        }
    }

    pub fn visible_count(&self) -> usize {
        [self.idle, self.loading, self.results, self.error]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// A request stamped with the generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub request: RecommendationRequest,
}

#[derive(Debug, Clone)]
pub struct QueryController {
    state: UiState,
    generation: u64,
    error_message: Option<String>,
    renderer: ResultRenderer,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            generation: 0,
            error_message: None,
            renderer: ResultRenderer::new(),
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn visibility(&self) -> ViewVisibility {
        ViewVisibility::of(self.state)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn table(&self) -> &RenderedTable {
        self.renderer.table()
    }

    /// The rendered table, only while the results view is showing.
    pub fn exportable_table(&self) -> Option<&RenderedTable> {
        (self.state == UiState::Results).then(|| self.renderer.table())
    }

    /// Starts a new cycle. The loading view is shown before anything is sent,
    /// and whatever the previous cycle rendered is dropped.
    pub fn submit(&mut self, form: &FormInput) -> PendingRequest {
        self.transition(UiState::Loading);
        self.renderer.clear();
        self.error_message = None;
        self.generation += 1;
        PendingRequest {
            generation: self.generation,
            request: RecommendationRequest::from_form(form),
        }
    }

    pub fn resolve(&mut self, generation: u64, response: RecommendationResponse) -> Resolution {
        if !self.is_current(generation) {
            return Resolution::Stale;
        }
        match response {
            RecommendationResponse::Error(err) => {
                self.error_message = Some(err.message);
                self.transition(UiState::Error);
            }
            RecommendationResponse::Success(ok) => {
                self.renderer.render(&ok);
                self.transition(UiState::Results);
            }
        }
        Resolution::Applied
    }

    /// Transport or decode failure. The detail stays with the caller's log.
    pub fn fail(&mut self, generation: u64) -> Resolution {
        if !self.is_current(generation) {
            return Resolution::Stale;
        }
        self.error_message = Some(FALLBACK_ERROR_MESSAGE.to_string());
        self.transition(UiState::Error);
        Resolution::Applied
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.state == UiState::Loading
    }

    fn transition(&mut self, next: UiState) {
        debug_assert!(
            can_transition(self.state, next),
            "illegal ui transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}

pub fn can_transition(from: UiState, to: UiState) -> bool {
    match (from, to) {
        (_, UiState::Loading) => true,
        (UiState::Loading, UiState::Results | UiState::Error) => true,
        _ => false,
    }
}

/// Replaces the club options: a disabled placeholder, then each club in the
/// order received. The placeholder starts selected.
pub fn load_club_options(select: &mut ClubSelect, clubs: Vec<String>) {
    let mut options = Vec::with_capacity(clubs.len() + 1);
    options.push(placeholder_option());
    options.extend(clubs.into_iter().map(|club| SelectOption {
        label: club.clone(),
        value: club,
        disabled: false,
    }));
    select.options = options;
    select.selected = 0;
}

use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::config::Config;
use crate::demo_backend::DemoBackend;
use crate::recommend_fetch::{self, parse_clubs_json, parse_recommend_json};
use crate::results_export;
use crate::state::{Delta, ProviderCommand, RecommendationRequest, RecommendationResponse};

/// Where requests go: the HTTP service or the in-process demo backend.
#[derive(Debug, Clone)]
pub enum Source {
    Remote { base: String, use_cache: bool },
    Demo(DemoBackend),
}

impl Source {
    pub fn from_config(config: &Config) -> Self {
        if config.demo {
            Source::Demo(DemoBackend::new())
        } else {
            Source::Remote {
                base: config.api_base.clone(),
                use_cache: config.http_cache,
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Source::Remote { base, .. } => base.clone(),
            Source::Demo(_) => "offline demo".to_string(),
        }
    }

    pub fn fetch_clubs(&self, on_warning: impl FnMut(String)) -> Result<Vec<String>> {
        match self {
            Source::Remote { base, use_cache } => {
                recommend_fetch::fetch_clubs(base, *use_cache, on_warning)
            }
            Source::Demo(backend) => parse_clubs_json(&backend.clubs_json()),
        }
    }

    pub fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse> {
        match self {
            Source::Remote { base, .. } => recommend_fetch::fetch_recommendations(base, request),
            Source::Demo(backend) => {
                let mut rng = rand::thread_rng();
                parse_recommend_json(&backend.recommend_json(request, &mut rng))
            }
        }
    }
}

/// Runs commands one at a time on a worker thread until the UI hangs up.
pub fn spawn_provider(source: Source, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!("[INFO] Backend: {}", source.label())));
        for cmd in cmd_rx {
            for delta in handle_command(&source, cmd) {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    });
}

pub fn handle_command(source: &Source, cmd: ProviderCommand) -> Vec<Delta> {
    match cmd {
        ProviderCommand::LoadClubs => {
            let mut deltas = Vec::new();
            let result =
                source.fetch_clubs(|warning| deltas.push(Delta::Log(format!("[WARN] {warning}"))));
            match result {
                Ok(clubs) => deltas.push(Delta::SetClubs(clubs)),
                Err(err) => deltas.push(Delta::ClubsFailed(format!("{err:#}"))),
            }
            deltas
        }
        ProviderCommand::Recommend(pending) => {
            match source.fetch_recommendations(&pending.request) {
                Ok(response) => vec![Delta::RecommendResolved {
                    generation: pending.generation,
                    response,
                }],
                Err(err) => vec![Delta::RecommendFailed {
                    generation: pending.generation,
                    error: format!("{err:#}"),
                }],
            }
        }
        ProviderCommand::ExportResults { path, table } => {
            let display = path.display().to_string();
            match results_export::export_results(&path, &table) {
                Ok(report) => vec![Delta::ExportFinished {
                    path: display,
                    rows: report.rows,
                }],
                Err(err) => vec![Delta::ExportFailed {
                    path: display,
                    error: format!("{err:#}"),
                }],
            }
        }
    }
}

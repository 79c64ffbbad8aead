use crate::state::{PlayerRow, SuccessResponse};

pub const FIXED_COLUMNS: [&str; 5] = ["Rank", "Player Profile", "Squad", "Similarity", "Key Stat"];
pub const PLACEHOLDER: &str = "-";
/// Fit scores strictly above this are classed as high matches.
pub const HIGH_MATCH_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClass {
    High,
    Mid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityPill {
    pub text: String,
    pub class: MatchClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatCell {
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub rank: String,
    pub player_name: String,
    pub player_meta: String,
    pub squad: String,
    pub similarity: SimilarityPill,
    pub key_stat: KeyStatCell,
    pub stats: Vec<String>,
}

impl RenderedRow {
    pub fn cell_count(&self) -> usize {
        FIXED_COLUMNS.len() + self.stats.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCaption {
    pub club: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTable {
    pub caption: Option<ResultCaption>,
    pub header: Vec<String>,
    pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultRenderer {
    table: RenderedTable,
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &RenderedTable {
        &self.table
    }

    pub fn clear(&mut self) {
        self.table = RenderedTable::default();
    }

    pub fn render(&mut self, response: &SuccessResponse) {
        self.table.caption = Some(ResultCaption {
            club: response.club.clone(),
            role: response.role.clone(),
        });
        self.render_header(&response.display_columns);
        self.render_body(&response.results, &response.display_columns);
    }

    pub fn render_header(&mut self, display_columns: &[String]) {
        let mut header = Vec::with_capacity(FIXED_COLUMNS.len() + display_columns.len());
        header.extend(FIXED_COLUMNS.iter().map(|label| label.to_string()));
        header.extend(display_columns.iter().cloned());
        self.table.header = header;
    }

    /// Rebuilds every body row. Rows keep the server's order.
    pub fn render_body(&mut self, results: &[PlayerRow], display_columns: &[String]) {
        self.table.rows = results
            .iter()
            .map(|row| render_row(row, display_columns))
            .collect();
    }
}

pub fn classify_fit(fit_score: f64) -> MatchClass {
    if fit_score > HIGH_MATCH_THRESHOLD {
        MatchClass::High
    } else {
        MatchClass::Mid
    }
}

pub fn format_score(value: f64) -> String {
    // f64 Display already drops a zero fraction ("95", "95.3").
    format!("{value}")
}

fn render_row(row: &PlayerRow, display_columns: &[String]) -> RenderedRow {
    let stats = display_columns
        .iter()
        .map(|column| stat_cell(row, column))
        .collect();
    RenderedRow {
        rank: format!("#{}", row.rank),
        player_name: row.player.clone(),
        player_meta: format!("{} yo • {}", row.age, row.nation),
        squad: row.club.clone(),
        similarity: SimilarityPill {
            text: format!("{}%", format_score(row.fit_score)),
            class: classify_fit(row.fit_score),
        },
        key_stat: KeyStatCell {
            value: row.key_feature_value.clone(),
            caption: row.key_feature_name.clone(),
        },
        stats,
    }
}

fn stat_cell(row: &PlayerRow, column: &str) -> String {
    match row.display_stats.get(column) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => PLACEHOLDER.to_string(),
    }
}

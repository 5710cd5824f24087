use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::options::ActorLabel;

/// Raw figures of one report run, before any display formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub yesterday: NaiveDate,
    pub yesterday_volume: f64,
    pub day_before_volume: f64,
    pub week_before_volume: f64,
    pub dod_change: f64,
    pub wow_change: f64,
    pub top_pathways: Vec<(String, f64)>,
    pub user_volume: f64,
    pub user_tx_count: usize,
    pub avg_tx_size: f64,
    pub top_users: Vec<(String, f64)>,
    pub top_actors: Vec<(String, f64)>,
    pub mm_bot_count: usize,
    pub mm_bot_volume: f64,
    /// Rows left out because their timestamp did not coerce.
    pub skipped_timestamps: usize,
    /// Window rows left out of sums because their amount did not coerce.
    pub skipped_amounts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub path: String,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVolume {
    pub name: String,
    pub volume: String,
}

/// Display-ready daily report. Built once per upload and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub date: String,
    pub month: String,
    pub total_volume: String,
    pub dod_change: String,
    pub wow_change: String,
    pub top_pathways: Vec<Pathway>,
    pub user_tx_count: usize,
    pub avg_tx_size: String,
    pub top_users: Vec<NamedVolume>,
    pub actor_label: ActorLabel,
    pub top_actors: Vec<NamedVolume>,
    pub mm_bot_count: usize,
    pub mm_bot_volume: String,
}

impl Report {
    pub fn new(metrics: &Metrics, actor_label: ActorLabel) -> Self {
        let named = |items: &[(String, f64)]| -> Vec<NamedVolume> {
            items
                .iter()
                .map(|(name, volume)| NamedVolume {
                    name: name.to_owned(),
                    volume: millions(*volume),
                })
                .collect()
        };

        Self {
            date: metrics.yesterday.format("%d").to_string(),
            month: metrics.yesterday.format("%b").to_string(),
            total_volume: millions(metrics.yesterday_volume),
            dod_change: percent(metrics.dod_change),
            wow_change: percent(metrics.wow_change),
            top_pathways: metrics
                .top_pathways
                .iter()
                .map(|(path, volume)| Pathway {
                    path: path.to_owned(),
                    volume: *volume,
                })
                .collect(),
            user_tx_count: metrics.user_tx_count,
            avg_tx_size: thousands(metrics.avg_tx_size),
            top_users: named(&metrics.top_users),
            actor_label,
            top_actors: named(&metrics.top_actors),
            mm_bot_count: metrics.mm_bot_count,
            mm_bot_volume: millions(metrics.mm_bot_volume),
        }
    }
}

/// `$X.XXM`
pub fn millions(volume: f64) -> String {
    // adding positive zero turns -0.0 into 0.0
    format!("${:.2}M", volume / 1_000_000.0 + 0.0)
}

/// `$X.Xk`
pub fn thousands(volume: f64) -> String {
    format!("${:.1}k", volume / 1_000.0 + 0.0)
}

/// Whole percent with the sign kept, e.g. `-12%`.
pub fn percent(change: f64) -> String {
    format!("{:.0}%", change)
}

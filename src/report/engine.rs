use std::{collections::HashMap, hash::Hash};

use chrono::NaiveDate;
use tracing::debug;

use crate::ingest::Row;

use super::{
    model::{Metrics, Report},
    options::{ReportOptions, TOP_PATHWAYS_LIMIT, TOP_USERS_LIMIT},
    window::{DateWindow, Period},
};

/// Volume sums per key, kept in first-seen order so equal volumes rank by
/// appearance.
#[derive(Debug)]
struct VolumeGroups<K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, f64)>,
}

impl<K: Eq + Hash + Clone> VolumeGroups<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn add(&mut self, key: K, amount: f64) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].1 += amount,
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, amount));
            },
        }
    }

    fn top(mut self, limit: usize) -> Vec<(K, f64)> {
        self.groups.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.groups.truncate(limit);
        self.groups
    }
}

fn volume<'a>(rows: impl IntoIterator<Item = &'a Row>) -> f64 {
    rows.into_iter()
        .filter_map(|row| row.amount_usd().ok())
        .fold(0.0, |total, amount| total + amount)
}

fn change(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Computes the raw figures for the day before `as_of`.
pub fn summarize(
    rows: &[Row],
    as_of: NaiveDate,
    options: &ReportOptions,
) -> Metrics {
    let window = DateWindow::new(as_of);

    let mut yesterday = vec![];
    let mut day_before = vec![];
    let mut week_before = vec![];
    let mut skipped_timestamps = 0;

    for row in rows {
        let date = match row.origin_date() {
            Ok(date) => date,
            Err(_) => {
                skipped_timestamps += 1;
                continue;
            },
        };

        match window.period(date) {
            Some(Period::Yesterday) => yesterday.push(row),
            Some(Period::DayBefore) => day_before.push(row),
            Some(Period::WeekBefore) => week_before.push(row),
            None => {},
        }
    }

    let skipped_amounts = yesterday
        .iter()
        .chain(day_before.iter())
        .chain(week_before.iter())
        .filter(|row| row.amount_usd().is_err())
        .count();

    debug!(
        "Window {}: {} rows, day before: {} rows, week before: {} rows",
        window.yesterday,
        yesterday.len(),
        day_before.len(),
        week_before.len()
    );

    let yesterday_volume = volume(yesterday.iter().copied());
    let day_before_volume = volume(day_before.iter().copied());
    let week_before_volume = volume(week_before.iter().copied());

    let (mm_rows, user_rows): (Vec<&Row>, Vec<&Row>) = yesterday
        .iter()
        .copied()
        .partition(|row| options.is_market_maker_bot(row));

    let mut pathways = VolumeGroups::new();
    let mut users = VolumeGroups::new();

    for row in &user_rows {
        let Ok(amount) = row.amount_usd() else {
            continue;
        };

        if let Some(pathway) = row.pathway() {
            pathways.add(pathway, amount);
        }

        if let Some(name) = row.get(&options.grouping_column) {
            users.add(name, amount);
        }
    }

    let mut actors = VolumeGroups::new();

    for row in &yesterday {
        let Some(name) = row.get(&options.actor_column) else {
            continue;
        };
        if options.is_excluded(name, row) {
            continue;
        }
        if let Ok(amount) = row.amount_usd() {
            actors.add(name, amount);
        }
    }

    let user_volume = volume(user_rows.iter().copied());
    let user_tx_count = user_rows.len();
    let avg_tx_size = if user_tx_count > 0 {
        user_volume / user_tx_count as f64
    } else {
        0.0
    };

    let owned = |items: Vec<(&str, f64)>| -> Vec<(String, f64)> {
        items
            .into_iter()
            .map(|(name, volume)| (name.to_owned(), volume))
            .collect()
    };

    Metrics {
        yesterday: window.yesterday,
        yesterday_volume,
        day_before_volume,
        week_before_volume,
        dod_change: change(yesterday_volume, day_before_volume),
        wow_change: change(yesterday_volume, week_before_volume),
        top_pathways: pathways
            .top(TOP_PATHWAYS_LIMIT)
            .into_iter()
            .map(|((from, to, asset), volume)| {
                (format!("{} > {} - {}", from, to, asset), volume)
            })
            .collect(),
        user_volume,
        user_tx_count,
        avg_tx_size,
        top_users: owned(users.top(TOP_USERS_LIMIT)),
        top_actors: owned(actors.top(options.top_actors_limit)),
        mm_bot_count: mm_rows.len(),
        mm_bot_volume: volume(mm_rows.iter().copied()),
        skipped_timestamps,
        skipped_amounts,
    }
}

/// Builds the report for the day before `as_of`.
pub fn generate(
    rows: &[Row],
    as_of: NaiveDate,
    options: &ReportOptions,
) -> Report {
    let metrics = summarize(rows, as_of, options);

    debug!(
        "Report {}: skipped {} rows without timestamp, {} without amount",
        metrics.yesterday, metrics.skipped_timestamps, metrics.skipped_amounts
    );

    Report::new(&metrics, options.actor_label)
}

use std::{env, fs, ops::Deref, path::Path, sync::Arc, time::Duration};

use tracing::info;

use crate::{
    error::Error,
    helpers::{parse_list, parse_tuple_string},
    report::{ReportOptions, RouteExclusion},
    store::ReportStore,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub reports: ReportStore,
}

impl State {
    pub fn new(config: Config) -> State {
        let reports = ReportStore::new(
            config.report_cache_capacity,
            Duration::from_secs(config.report_ttl),
        );

        Self { config, reports }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    pub report_ttl: u64,
    pub report_cache_capacity: u64,
    pub report: ReportOptions,
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = parse_list(&env::var("ALLOWED_ORIGINS")?);
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );
    let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")?.parse()?;
    let report_ttl = env::var("REPORT_TTL_IN_SECONDS")?.parse()?;
    let report_cache_capacity = env::var("REPORT_CACHE_CAPACITY")?.parse()?;
    let report = get_report_options(|key| env::var(key).ok())?;

    let config = Config {
        server_host,
        port,
        allowed_origins,
        static_dir,
        max_upload_bytes,
        report_ttl,
        report_cache_capacity,
        report,
    };

    Ok(config)
}

/// Report knobs; a key that is not set keeps the default.
pub fn get_report_options<F>(lookup: F) -> Result<ReportOptions, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = ReportOptions::default();

    if let Some(limit) = lookup("TOP_ACTORS_LIMIT") {
        options.top_actors_limit = limit.trim().parse()?;
    }

    if let Some(label) = lookup("ACTOR_LABEL") {
        options.actor_label = label.parse()?;
    }

    if let Some(column) = lookup("USER_GROUPING_COLUMN") {
        options.grouping_column = column.trim().to_owned();
    }

    if let Some(column) = lookup("ACTOR_COLUMN") {
        options.actor_column = column.trim().to_owned();
    }

    if let Some(column) = lookup("CLASSIFIER_COLUMN") {
        options.classifier_column = column.trim().to_owned();
    }

    if let Some(name) = lookup("MARKET_MAKER_BOT_NAME") {
        options.market_maker_bot_name = name.trim().to_owned();
    }

    if let Some(routes) = lookup("EXCLUDED_ROUTES") {
        options.excluded_routes = parse_tuple_string(routes)
            .iter()
            .map(|route| route.parse::<RouteExclusion>())
            .collect::<Result<Vec<_>, Error>>()?;
    }

    Ok(options)
}

/// Loads `.env` from the crate directory into the process environment.
/// Variables that are already set win over the file.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    if !Path::new(&path).exists() {
        info!("No {} found, using process environment", config_file);
        return Ok(());
    }

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string)?;

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| s.trim_end_matches('\r'))
        .filter(|s| !s.trim_start().starts_with('#'))
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k.trim(), v[1..].trim()));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }

    Ok(())
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{columns, error::Error, ingest::Row};

pub const TOP_PATHWAYS_LIMIT: usize = 3;
pub const TOP_USERS_LIMIT: usize = 3;

/// Wording of the ranked actor lines in the MMs section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorLabel {
    Rebalancer,
    MarketMaker,
}

impl fmt::Display for ActorLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ActorLabel::Rebalancer => write!(f, "rebalancer"),
            ActorLabel::MarketMaker => write!(f, "market maker"),
        }
    }
}

impl FromStr for ActorLabel {
    type Err = Error;

    fn from_str(value: &str) -> Result<ActorLabel, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rebalancer" => Ok(ActorLabel::Rebalancer),
            "market maker" | "market_maker" => Ok(ActorLabel::MarketMaker),
            _ => Err(Error::InvalidOption {
                option: format!(
                    "actor label '{}'. Valid options: rebalancer, market maker",
                    value
                ),
            }),
        }
    }
}

/// Transfers of `actor` on the `from_chain` > `to_chain` route are left out
/// of that actor's ranked volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteExclusion {
    pub actor: String,
    pub from_chain: String,
    pub to_chain: String,
}

impl RouteExclusion {
    pub fn new(actor: &str, from_chain: &str, to_chain: &str) -> Self {
        Self {
            actor: actor.to_owned(),
            from_chain: from_chain.to_owned(),
            to_chain: to_chain.to_owned(),
        }
    }

    pub fn excludes(&self, actor: &str, row: &Row) -> bool {
        self.actor == actor
            && row.from_chain() == self.from_chain
            && row.to_chain() == self.to_chain
    }
}

impl FromStr for RouteExclusion {
    type Err = Error;

    /// Parses `actor,from_chain,to_chain`.
    fn from_str(value: &str) -> Result<RouteExclusion, Self::Err> {
        let items: Vec<&str> = value.split(',').map(str::trim).collect();

        match items.as_slice() {
            [actor, from_chain, to_chain]
                if !actor.is_empty()
                    && !from_chain.is_empty()
                    && !to_chain.is_empty() =>
            {
                Ok(RouteExclusion::new(actor, from_chain, to_chain))
            },
            _ => Err(Error::ConfigurationError(format!(
                "route exclusion '{}' must be actor,from_chain,to_chain",
                value
            ))),
        }
    }
}

/// Knobs that differ between deployments of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_actors_limit: usize,
    pub actor_label: ActorLabel,
    /// Column naming the party behind a user transfer.
    pub grouping_column: String,
    /// Column the ranked actors are grouped by.
    pub actor_column: String,
    /// Column telling market maker bot transfers from user transfers.
    pub classifier_column: String,
    pub market_maker_bot_name: String,
    pub excluded_routes: Vec<RouteExclusion>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_actors_limit: 2,
            actor_label: ActorLabel::Rebalancer,
            grouping_column: columns::REBALANCER_INITIATOR.to_owned(),
            actor_column: columns::MARKET_MAKER_INITIATOR.to_owned(),
            classifier_column: columns::MARKET_MAKER_INITIATOR.to_owned(),
            market_maker_bot_name: columns::MARKET_MAKER_BOT.to_owned(),
            excluded_routes: vec![RouteExclusion::new(
                "tokka", "blast", "ethereum",
            )],
        }
    }
}

impl ReportOptions {
    pub fn is_market_maker_bot(&self, row: &Row) -> bool {
        row.get(&self.classifier_column)
            == Some(self.market_maker_bot_name.as_str())
    }

    pub fn is_excluded(&self, actor: &str, row: &Row) -> bool {
        self.excluded_routes
            .iter()
            .any(|route| route.excludes(actor, row))
    }

    /// Columns the report reads on top of the always-required ones.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![
            self.grouping_column.to_owned(),
            self.actor_column.to_owned(),
        ];
        if !columns.contains(&self.classifier_column) {
            columns.push(self.classifier_column.to_owned());
        }
        columns.dedup();
        columns
    }
}

use std::fmt;

use super::model::{millions, Report};

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "**Metrics {} {}**", self.month, self.date)?;
        writeln!(f)?;

        writeln!(f, "Volume (last day)")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Total — {} ({} d-o-d; {} w-o-w)",
            self.total_volume, self.dod_change, self.wow_change
        )?;
        writeln!(f, "- Top pathways (users only, not MM)")?;
        for pathway in &self.top_pathways {
            writeln!(f, "    - {} - {}", pathway.path, millions(pathway.volume))?;
        }

        writeln!(f)?;
        writeln!(f, "Transactions (last day)")?;
        writeln!(f)?;
        writeln!(f, "- Total # — {}", self.user_tx_count)?;
        writeln!(f, "- Average size — {}", self.avg_tx_size)?;

        writeln!(f)?;
        writeln!(f, "Users (last day)")?;
        writeln!(f)?;
        for (index, user) in self.top_users.iter().enumerate() {
            writeln!(
                f,
                "- Top user #{} — {} {}",
                index + 1,
                user.name,
                user.volume
            )?;
        }

        writeln!(f)?;
        writeln!(f, "MMs:")?;
        writeln!(f)?;
        for (index, actor) in self.top_actors.iter().enumerate() {
            writeln!(
                f,
                "- Top {} #{} — {} volume closed ({})",
                self.actor_label,
                index + 1,
                actor.volume,
                actor.name
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Market Maker Bot (last day)")?;
        writeln!(f)?;
        writeln!(f, "- Total # invoices filled — {}", self.mm_bot_count)?;
        writeln!(f, "- $M volume filled — {}", self.mm_bot_volume)
    }
}

/// Text form of the report, identical for identical reports.
pub fn render(report: &Report) -> String {
    report.to_string()
}

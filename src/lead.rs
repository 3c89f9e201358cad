//! Leads captured by a flow and how their profile page is chosen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Closed,
    Qualified,
    Unqualified,
}

/// Score bucket used for badges and routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

pub const HIGH_SCORE: u8 = 80;
pub const LOW_SCORE: u8 = 50;

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_SCORE {
            ScoreBand::High
        } else if score < LOW_SCORE {
            ScoreBand::Low
        } else {
            ScoreBand::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub source: String,
    pub form_name: String,
    /// 0..=100
    pub score: u8,
    pub submitted_at: DateTime<Utc>,
    pub status: LeadStatus,
}

/// Which lead profile layout to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTemplate {
    /// Booking-first layout
    Qualified,
    /// Nurture-first layout
    Unqualified,
}

impl Lead {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// An explicit qualification verdict wins; otherwise only a high score
    /// counts as qualified.
    pub fn template(&self) -> ProfileTemplate {
        match self.status {
            LeadStatus::Qualified => ProfileTemplate::Qualified,
            LeadStatus::Unqualified => ProfileTemplate::Unqualified,
            LeadStatus::New | LeadStatus::Contacted | LeadStatus::Closed => {
                match self.score_band() {
                    ScoreBand::High => ProfileTemplate::Qualified,
                    ScoreBand::Medium | ScoreBand::Low => ProfileTemplate::Unqualified,
                }
            }
        }
    }
}

/// Inbox filtering: optional status tab plus a case-insensitive search over
/// name and email.
pub fn filter_leads<'a>(
    leads: &'a [Lead],
    status: Option<LeadStatus>,
    query: &str,
) -> Vec<&'a Lead> {
    let query = query.trim().to_lowercase();
    leads
        .iter()
        .filter(|lead| status.is_none_or(|s| lead.status == s))
        .filter(|lead| {
            query.is_empty()
                || lead.name.to_lowercase().contains(&query)
                || lead.email.to_lowercase().contains(&query)
        })
        .collect()
}

//! Subscription rows and the plan tiers derived from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    #[default]
    Free,
    Premium,
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanType::Free => "free",
            PlanType::Premium => "premium",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Lifecycle state stored on a subscription row.
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
    Trial,
    TrialEnding,
    Beta,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::TrialEnding => "trial_ending",
            SubscriptionStatus::Beta => "beta",
        };
        f.write_str(label)
    }
}

/// A user's subscription as stored by the backend. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    #[serde(default)]
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_end: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn new(
        user_id: Uuid,
        plan_type: PlanType,
        status: SubscriptionStatus,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            plan_type,
            status,
            start_date,
            end_date: None,
            trial_end: None,
            beta_end: None,
        }
    }

    pub fn with_beta_end(mut self, beta_end: DateTime<Utc>) -> Self {
        self.beta_end = Some(beta_end);
        self
    }

    pub fn with_trial_end(mut self, trial_end: DateTime<Utc>) -> Self {
        self.trial_end = Some(trial_end);
        self
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Effective plan tier after evaluating a subscription against the clock.
pub enum Tier {
    Free,
    Beta,
    Trial,
    Premium,
    Expired,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Free => "Free",
            Tier::Beta => "Beta",
            Tier::Trial => "Trial",
            Tier::Premium => "Premium",
            Tier::Expired => "Expired",
        };
        f.write_str(label)
    }
}

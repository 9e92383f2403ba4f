//! Plan tier resolution for a user's subscription.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use dash_domain::{PlanType, Subscription, SubscriptionStatus, Tier};

pub const MS_PER_DAY: i64 = 86_400_000;
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Something the caller should show next to the plan badge.
pub enum EntitlementNotice {
    BetaExpired { ended_at: Option<DateTime<Utc>> },
    TrialExpired { ended_at: Option<DateTime<Utc>> },
    EndingSoon { tier: Tier, days_remaining: i64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitlementResult {
    pub tier: Tier,
    pub is_premium_active: bool,
    pub days_remaining: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<EntitlementNotice>,
}

impl EntitlementResult {
    pub fn free() -> Self {
        Self {
            tier: Tier::Free,
            is_premium_active: false,
            days_remaining: None,
            notice: None,
        }
    }

    fn free_with(notice: EntitlementNotice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::free()
        }
    }

    fn premium() -> Self {
        Self {
            tier: Tier::Premium,
            is_premium_active: true,
            days_remaining: None,
            notice: None,
        }
    }

    fn time_boxed(tier: Tier, days_remaining: i64, warning_days: i64) -> Self {
        let notice = (days_remaining <= warning_days).then_some(EntitlementNotice::EndingSoon {
            tier,
            days_remaining,
        });
        Self {
            tier,
            is_premium_active: true,
            days_remaining: Some(days_remaining),
            notice,
        }
    }
}

/// Whole days left until `end`, rounded up. `None` once `end` is not in the future.
pub fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        None
    } else {
        Some((millis + MS_PER_DAY - 1) / MS_PER_DAY)
    }
}

/// Resolves a subscription with the default expiry warning threshold.
pub fn resolve_entitlement(
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> EntitlementResult {
    EntitlementService::resolve(subscription, now)
}

/// Stateless entitlement rules plus the beta-tester administration helpers.
pub struct EntitlementService;

impl EntitlementService {
    pub fn resolve(subscription: Option<&Subscription>, now: DateTime<Utc>) -> EntitlementResult {
        Self::resolve_with_warning(subscription, now, DEFAULT_EXPIRY_WARNING_DAYS)
    }

    /// Applies the tier rules in order; the first match wins.
    pub fn resolve_with_warning(
        subscription: Option<&Subscription>,
        now: DateTime<Utc>,
        warning_days: i64,
    ) -> EntitlementResult {
        let Some(sub) = subscription else {
            debug!("no subscription row, resolving to free tier");
            return EntitlementResult::free();
        };

        let result = match sub.status {
            SubscriptionStatus::Beta => match sub.beta_end.and_then(|end| days_remaining(end, now)) {
                Some(days) => EntitlementResult::time_boxed(Tier::Beta, days, warning_days),
                None => EntitlementResult::free_with(EntitlementNotice::BetaExpired {
                    ended_at: sub.beta_end,
                }),
            },
            SubscriptionStatus::Trial => {
                match sub.trial_end.and_then(|end| days_remaining(end, now)) {
                    Some(days) => EntitlementResult::time_boxed(Tier::Trial, days, warning_days),
                    None => EntitlementResult::free_with(EntitlementNotice::TrialExpired {
                        ended_at: sub.trial_end,
                    }),
                }
            }
            SubscriptionStatus::Active if sub.plan_type == PlanType::Premium => {
                EntitlementResult::premium()
            }
            _ => EntitlementResult::free(),
        };

        debug!(
            user_id = %sub.user_id,
            status = %sub.status,
            tier = %result.tier,
            days_remaining = ?result.days_remaining,
            "resolved entitlement"
        );
        result
    }

    /// Starts a beta period of `days` days at `start`.
    pub fn grant_beta(user_id: Uuid, start: DateTime<Utc>, days: u32) -> Subscription {
        Subscription::new(user_id, PlanType::Free, SubscriptionStatus::Beta, start)
            .with_beta_end(start + Duration::days(days as i64))
    }

    /// Pushes the beta end forward from whichever is later: the current end or `now`.
    pub fn extend_beta(subscription: &mut Subscription, extra_days: u32, now: DateTime<Utc>) {
        let base = subscription
            .beta_end
            .filter(|end| *end > now)
            .unwrap_or(now);
        subscription.status = SubscriptionStatus::Beta;
        subscription.beta_end = Some(base + Duration::days(extra_days as i64));
    }

    /// Ends a beta immediately.
    pub fn revoke_beta(subscription: &mut Subscription, now: DateTime<Utc>) {
        if subscription.status == SubscriptionStatus::Beta {
            subscription.status = SubscriptionStatus::Expired;
            subscription.beta_end = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn sub(status: SubscriptionStatus, plan: PlanType) -> Subscription {
        Subscription::new(Uuid::new_v4(), plan, status, now() - Duration::days(30))
    }

    #[test]
    fn day_count_rounds_up_partial_days() {
        assert_eq!(days_remaining(now() + Duration::hours(1), now()), Some(1));
        assert_eq!(days_remaining(now() + Duration::hours(25), now()), Some(2));
        assert_eq!(days_remaining(now() + Duration::days(7), now()), Some(7));
        assert_eq!(days_remaining(now(), now()), None);
        assert_eq!(days_remaining(now() - Duration::days(1), now()), None);
    }

    #[test]
    fn beta_without_end_is_expired() {
        let result = EntitlementService::resolve(
            Some(&sub(SubscriptionStatus::Beta, PlanType::Free)),
            now(),
        );
        assert_eq!(result.tier, Tier::Free);
        assert_eq!(
            result.notice,
            Some(EntitlementNotice::BetaExpired { ended_at: None })
        );
    }

    #[test]
    fn trial_ending_status_falls_through_to_free() {
        let row = sub(SubscriptionStatus::TrialEnding, PlanType::Premium)
            .with_trial_end(now() + Duration::days(2));
        let result = EntitlementService::resolve(Some(&row), now());
        assert_eq!(result, EntitlementResult::free());
    }

    #[test]
    fn warning_threshold_controls_ending_soon() {
        let row = sub(SubscriptionStatus::Trial, PlanType::Free)
            .with_trial_end(now() + Duration::days(5));
        let quiet = EntitlementService::resolve_with_warning(Some(&row), now(), 3);
        assert!(quiet.notice.is_none());
        let loud = EntitlementService::resolve_with_warning(Some(&row), now(), 5);
        assert_eq!(
            loud.notice,
            Some(EntitlementNotice::EndingSoon {
                tier: Tier::Trial,
                days_remaining: 5
            })
        );
    }

    #[test]
    fn extend_beta_counts_from_now_once_lapsed() {
        let mut row = EntitlementService::grant_beta(Uuid::new_v4(), now() - Duration::days(40), 30);
        EntitlementService::extend_beta(&mut row, 14, now());
        assert_eq!(row.beta_end, Some(now() + Duration::days(14)));

        EntitlementService::extend_beta(&mut row, 7, now());
        assert_eq!(row.beta_end, Some(now() + Duration::days(21)));
    }

    #[test]
    fn revoked_beta_resolves_free() {
        let mut row = EntitlementService::grant_beta(Uuid::new_v4(), now(), 30);
        EntitlementService::revoke_beta(&mut row, now());
        let result = EntitlementService::resolve(Some(&row), now());
        assert_eq!(result.tier, Tier::Free);
        assert!(!result.is_premium_active);
    }
}

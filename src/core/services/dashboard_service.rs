//! Binds the engine to explicit user context: config, clock, and fetched rows.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{info, warn};

use dash_config::Config;
use dash_core::{
    count_active_events, month_window, range_window, week_window, CalendarService, Clock, EntitlementResult,
    EntitlementService, PeriodAggregator, PeriodSummary, QuotaGate, RecurrenceService,
    SystemClock,
};
use dash_domain::{CalendarWindow, Event, Task};

use crate::{errors::DashboardError, snapshot::Snapshot};

/// Entry point for callers that hold a user's snapshot.
///
/// Nothing is read from ambient session state: the clock, preferences, and
/// rows are all passed in.
pub struct DashboardService {
    config: Config,
    clock: Box<dyn Clock>,
}

impl DashboardService {
    pub fn new(config: Config, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn with_system_clock(config: Config) -> Self {
        Self::new(config, Box::new(SystemClock))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn entitlement(&self, snapshot: &Snapshot) -> EntitlementResult {
        EntitlementService::resolve_with_warning(
            snapshot.subscription.as_ref(),
            self.now(),
            self.config.expiry_warning_days,
        )
    }

    pub fn quota_gate(&self) -> QuotaGate {
        QuotaGate::new(self.config.free_event_limit)
    }

    /// Precondition for creating an event; run before the create request is sent.
    pub fn ensure_can_create_event(&self, snapshot: &Snapshot) -> Result<(), DashboardError> {
        let entitlement = self.entitlement(snapshot);
        let current = count_active_events(&snapshot.events);
        self.quota_gate().check(&entitlement, current)?;
        if !entitlement.is_premium_active {
            warn!("{}", QuotaGate::ADVISORY);
        }
        Ok(())
    }

    /// Month summary around `reference`, optionally with recurring rows projected in.
    pub fn month_summary<Tz: TimeZone>(
        &self,
        snapshot: &Snapshot,
        reference: &DateTime<Tz>,
        projected: bool,
    ) -> PeriodSummary {
        let window = month_window(reference);
        self.summarize(snapshot, &window, projected)
    }

    /// Summary over the local days `first..=last`; a reversed range is rejected.
    pub fn range_summary<Tz: TimeZone>(
        &self,
        snapshot: &Snapshot,
        tz: &Tz,
        first: NaiveDate,
        last: NaiveDate,
        projected: bool,
    ) -> Result<PeriodSummary, DashboardError> {
        let window = range_window(tz, first, last)?;
        Ok(self.summarize(snapshot, &window, projected))
    }

    pub fn summarize<Tz: TimeZone>(
        &self,
        snapshot: &Snapshot,
        window: &CalendarWindow<Tz>,
        projected: bool,
    ) -> PeriodSummary {
        let summary = if projected {
            let expanded = RecurrenceService::expand(&snapshot.transactions, window);
            PeriodAggregator::aggregate(&expanded, window, self.config.monthly_budget)
        } else {
            PeriodAggregator::aggregate(&snapshot.transactions, window, self.config.monthly_budget)
        };
        if summary.skipped > 0 {
            info!(skipped = summary.skipped, "some transactions were not aggregated");
        }
        summary
    }

    pub fn week<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> CalendarWindow<Tz> {
        week_window(reference, self.config.week_start())
    }

    pub fn events_in_week<'a, Tz: TimeZone>(
        &self,
        snapshot: &'a Snapshot,
        reference: &DateTime<Tz>,
    ) -> Vec<&'a Event> {
        CalendarService::events_in_window(&snapshot.events, &self.week(reference))
    }

    pub fn tasks_due_in_week<'a, Tz: TimeZone>(
        &self,
        snapshot: &'a Snapshot,
        reference: &DateTime<Tz>,
    ) -> Vec<&'a Task> {
        CalendarService::tasks_due_in_window(&snapshot.tasks, &self.week(reference))
    }
}

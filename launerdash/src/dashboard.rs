//! Dashboard view state and the subscriptions that feed it. Each subscription
//! writes its own fields only.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::adapters::{self, Resource, SeriesPoint, UsageSnapshot};
use crate::api;
use crate::gateway::Gateway;
use crate::history::UsageHistory;
use crate::poller::{
    PollingSubscription, SubscriptionId, BASIC_INTERVAL, LAST_HOUR_INTERVAL, REALTIME_INTERVAL,
};
use crate::types::{CurrentUsages, LastHour, LastHourServices, LegacyUsage};

pub const BASIC_TOTALS: SubscriptionId = "basic-totals";
pub const REALTIME_STATS: SubscriptionId = "realtime-stats";
pub const LAST_HOUR_TOTALS: SubscriptionId = "last-hour-totals";
pub const LAST_HOUR_PROCESSES: SubscriptionId = "last-hour-processes";
pub const LAST_HOUR_SERVICES: SubscriptionId = "last-hour-services";

#[derive(Debug, Default, Clone)]
pub struct DashboardData {
    // basic totals (3 s)
    pub basic_cpu: Option<UsageSnapshot>,
    pub basic_mem: Option<UsageSnapshot>,
    pub history: UsageHistory,

    // real-time panel (2.5 s, only while expanded)
    pub realtime_cpu: Option<UsageSnapshot>,
    pub realtime_mem: Option<UsageSnapshot>,

    // last hour (60 s)
    pub totals: Vec<SeriesPoint>,
    pub process_cpu: Vec<SeriesPoint>,
    pub process_mem: Vec<SeriesPoint>,
    pub service_cpu: Vec<SeriesPoint>,
    pub service_mem: Vec<SeriesPoint>,
}

pub type SharedData = Arc<Mutex<DashboardData>>;

pub fn lock(data: &SharedData) -> MutexGuard<'_, DashboardData> {
    data.lock().unwrap_or_else(|p| p.into_inner())
}

/// Every subscription the dashboard mounts. None of them is started here.
pub fn subscriptions(gw: &Arc<Gateway>, data: &SharedData) -> Vec<PollingSubscription> {
    vec![
        basic_totals(gw.clone(), data.clone()),
        realtime_stats(gw.clone(), data.clone()),
        last_hour_totals(gw.clone(), data.clone()),
        last_hour_processes(gw.clone(), data.clone()),
        last_hour_services(gw.clone(), data.clone()),
    ]
}

fn basic_totals(gw: Arc<Gateway>, data: SharedData) -> PollingSubscription {
    PollingSubscription::new(
        BASIC_TOTALS,
        BASIC_INTERVAL,
        move || {
            let gw = gw.clone();
            async move { api::request_legacy_usages(&gw).await }
        },
        move |(cpu, mem): (LegacyUsage, LegacyUsage)| {
            let mut d = lock(&data);
            d.history.push(cpu.total_usage, mem.total_usage);
            d.basic_cpu = Some(adapters::legacy_snapshot(&cpu, Resource::Cpu));
            d.basic_mem = Some(adapters::legacy_snapshot(&mem, Resource::Memory));
        },
    )
}

fn realtime_stats(gw: Arc<Gateway>, data: SharedData) -> PollingSubscription {
    PollingSubscription::new(
        REALTIME_STATS,
        REALTIME_INTERVAL,
        move || {
            let gw = gw.clone();
            async move { api::request_current_usages(&gw).await }
        },
        move |usages: CurrentUsages| {
            let mut d = lock(&data);
            d.realtime_cpu = Some(adapters::usage_snapshot(&usages.cpu_values, Resource::Cpu));
            d.realtime_mem = Some(adapters::usage_snapshot(&usages.mem_values, Resource::Memory));
        },
    )
}

fn last_hour_totals(gw: Arc<Gateway>, data: SharedData) -> PollingSubscription {
    PollingSubscription::new(
        LAST_HOUR_TOTALS,
        LAST_HOUR_INTERVAL,
        move || {
            let gw = gw.clone();
            async move { api::request_last_hour(&gw).await }
        },
        move |lh: LastHour| {
            lock(&data).totals = adapters::total_series(lh.total_data);
        },
    )
}

fn last_hour_processes(gw: Arc<Gateway>, data: SharedData) -> PollingSubscription {
    PollingSubscription::new(
        LAST_HOUR_PROCESSES,
        LAST_HOUR_INTERVAL,
        move || {
            let gw = gw.clone();
            async move { api::request_last_hour(&gw).await }
        },
        move |lh: LastHour| {
            let mut d = lock(&data);
            d.process_cpu = adapters::flatten_series(lh.cpu_data);
            d.process_mem = adapters::flatten_series(lh.memory_data);
        },
    )
}

fn last_hour_services(gw: Arc<Gateway>, data: SharedData) -> PollingSubscription {
    PollingSubscription::new(
        LAST_HOUR_SERVICES,
        LAST_HOUR_INTERVAL,
        move || {
            let gw = gw.clone();
            async move { api::request_last_hour_services(&gw).await }
        },
        move |svc: LastHourServices| {
            let mut d = lock(&data);
            d.service_cpu = adapters::flatten_series(svc.cpu);
            d.service_mem = adapters::flatten_series(svc.memory);
        },
    )
}

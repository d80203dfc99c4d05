//! Typed calls for each backend endpoint.

use futures_util::future::try_join;

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::types::{CurrentUsages, LastHour, LastHourServices, LegacyUsage};

pub const CURRENT_USAGES: &str = "/current-usages";
pub const LAST_HOUR: &str = "/last-60-minutes";
pub const LAST_HOUR_SERVICES: &str = "/last-60-minutes-services";
pub const CPU_USAGE: &str = "/cpu-usage";
pub const MEMORY_USAGE: &str = "/memory-usage";
pub const LOGIN: &str = "/login";

pub async fn request_current_usages(gw: &Gateway) -> Result<CurrentUsages, ApiError> {
    gw.get(CURRENT_USAGES).await
}

pub async fn request_last_hour(gw: &Gateway) -> Result<LastHour, ApiError> {
    gw.get(LAST_HOUR).await
}

pub async fn request_last_hour_services(gw: &Gateway) -> Result<LastHourServices, ApiError> {
    gw.get(LAST_HOUR_SERVICES).await
}

// Both halves of the legacy dashboard, fetched together; either failure fails the pair.
pub async fn request_legacy_usages(gw: &Gateway) -> Result<(LegacyUsage, LegacyUsage), ApiError> {
    try_join(
        gw.get::<LegacyUsage>(CPU_USAGE),
        gw.get::<LegacyUsage>(MEMORY_USAGE),
    )
    .await
}

// Folio Analytics Core
//
// DB-agnostic building blocks for the analytics pipeline:
// - Event entity and its server-derived classification labels
// - User-agent classification (ordered rule tables, first match wins)
// - AnalyticsStore trait implemented by PostgreSQL and in-memory backends
// - Query filters shared by every store implementation
// - Summary DTOs produced by the aggregator

pub mod classify;
pub mod error;
pub mod event;
pub mod query;
pub mod summary;
pub mod telemetry;
pub mod traits;

// Re-exports for convenience
pub use classify::{classify_user_agent, UserAgentInfo};
pub use error::{AnalyticsError, Result};
pub use event::{AnalyticsEvent, Browser, DeviceType, NewAnalyticsEvent, Os, PAGEVIEW_EVENT};
pub use query::{EventColumn, EventQuery, Visit};
pub use summary::{
    AnalyticsSummary, BrowserCount, DailyPoint, DailySeries, DailyTotals, DeviceCount,
    OverviewStats, PageCount,
};
pub use traits::AnalyticsStore;

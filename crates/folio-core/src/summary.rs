// Aggregated analytics DTOs
//
// Field names follow the dashboard's camelCase JSON contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// View count for a single page path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PageCount {
    #[cfg_attr(feature = "openapi", schema(example = "/about"))]
    pub path: String,
    pub count: u64,
}

/// Event count for a device class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeviceCount {
    #[cfg_attr(feature = "openapi", schema(example = "mobile"))]
    pub device: String,
    pub count: u64,
}

/// Event count for a browser family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BrowserCount {
    #[cfg_attr(feature = "openapi", schema(example = "Chrome"))]
    pub browser: String,
    pub count: u64,
}

/// Rollup over a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of events of any type in the window (not only pageviews).
    pub total_page_views: u64,
    /// Distinct visitor IDs across all events in the window.
    pub unique_visitors: u64,
    /// Top pageview paths, most viewed first (at most 10).
    pub page_views: Vec<PageCount>,
    pub devices: Vec<DeviceCount>,
    pub browsers: Vec<BrowserCount>,
}

/// Pageview figures for one UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DailyPoint {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2026-01-31"))]
    pub date: NaiveDate,
    pub visitors: u64,
    pub pageviews: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub unique_visitors: u64,
    pub total_pageviews: u64,
}

/// Per-day pageview series, oldest day first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DailySeries {
    pub analytics: Vec<DailyPoint>,
    pub totals: DailyTotals,
}

/// Headline figures for the admin dashboard (pageviews only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    /// Distinct visitors over all time
    pub unique_visitors: u64,
    /// Distinct visitors since 00:00 UTC today
    pub today_visitors: u64,
    /// Distinct visitors during yesterday (UTC)
    pub yesterday_visitors: u64,
    /// All-time pageview count
    pub total_pageviews: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_shape() {
        let summary = AnalyticsSummary {
            total_page_views: 3,
            unique_visitors: 2,
            page_views: vec![PageCount {
                path: "/".to_string(),
                count: 3,
            }],
            devices: vec![DeviceCount {
                device: "desktop".to_string(),
                count: 3,
            }],
            browsers: vec![],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalPageViews"], 3);
        assert_eq!(json["uniqueVisitors"], 2);
        assert_eq!(json["pageViews"][0]["path"], "/");
        assert_eq!(json["devices"][0]["device"], "desktop");
        assert!(json["browsers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_daily_series_json_shape() {
        let series = DailySeries {
            analytics: vec![DailyPoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
                visitors: 1,
                pageviews: 4,
            }],
            totals: DailyTotals {
                unique_visitors: 1,
                total_pageviews: 4,
            },
        };

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["analytics"][0]["date"], "2026-01-31");
        assert_eq!(json["totals"]["uniqueVisitors"], 1);
        assert_eq!(json["totals"]["totalPageviews"], 4);
    }
}

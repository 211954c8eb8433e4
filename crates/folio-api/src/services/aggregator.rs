// Aggregator service
//
// Read-only rollups over analytics_events. Each facet is an independent read
// against the same window; the reads run concurrently and the first failure
// aborts the whole aggregation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use folio_core::{
    AnalyticsStore, AnalyticsSummary, BrowserCount, DailyPoint, DailySeries, DailyTotals,
    DeviceCount, EventColumn, EventQuery, OverviewStats, PageCount, Result, PAGEVIEW_EVENT,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Window used by the summary when `days` is not given
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Window used by the daily series when `days` is not given
pub const DEFAULT_DAILY_WINDOW_DAYS: u32 = 7;
/// Upper bound on any window
pub const MAX_WINDOW_DAYS: u32 = 3650;
/// Number of entries in the top-pages facet
pub const TOP_PAGES_LIMIT: usize = 10;

const ROOT_PATH: &str = "/";
const UNKNOWN_LABEL: &str = "unknown";

pub struct Aggregator {
    store: Arc<dyn AnalyticsStore>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Summary over the trailing `days` ending now
    pub async fn summarize(&self, days: u32) -> Result<AnalyticsSummary> {
        self.summarize_at(days, Utc::now()).await
    }

    /// Summary over the trailing `days` ending at `now`
    pub async fn summarize_at(&self, days: u32, now: DateTime<Utc>) -> Result<AnalyticsSummary> {
        let window = EventQuery::since(window_start(days, now));
        let pageviews = window.clone().with_event_type(PAGEVIEW_EVENT);

        let (total, visitor_ids, paths, devices, browsers) = tokio::try_join!(
            self.store.count_events(&window),
            self.store.project_column(&window, EventColumn::VisitorId),
            self.store.project_column(&pageviews, EventColumn::PagePath),
            self.store.project_column(&window, EventColumn::DeviceType),
            self.store.project_column(&window, EventColumn::Browser),
        )?;

        let mut page_views: Vec<PageCount> = tally(paths, ROOT_PATH)
            .into_iter()
            .map(|(path, count)| PageCount { path, count })
            .collect();
        page_views.truncate(TOP_PAGES_LIMIT);

        Ok(AnalyticsSummary {
            total_page_views: total,
            unique_visitors: count_distinct(visitor_ids),
            page_views,
            devices: tally(devices, UNKNOWN_LABEL)
                .into_iter()
                .map(|(device, count)| DeviceCount { device, count })
                .collect(),
            browsers: tally(browsers, UNKNOWN_LABEL)
                .into_iter()
                .map(|(browser, count)| BrowserCount { browser, count })
                .collect(),
        })
    }

    /// Per-day pageview series over the trailing `days` ending now
    pub async fn daily(&self, days: u32) -> Result<DailySeries> {
        self.daily_at(days, Utc::now()).await
    }

    pub async fn daily_at(&self, days: u32, now: DateTime<Utc>) -> Result<DailySeries> {
        let query = EventQuery::since(window_start(days, now)).with_event_type(PAGEVIEW_EVENT);
        let visits = self.store.list_visits(&query).await?;

        let mut by_day: BTreeMap<NaiveDate, (HashSet<String>, u64)> = BTreeMap::new();
        let mut everyone: HashSet<String> = HashSet::new();

        for visit in &visits {
            let day = by_day
                .entry(visit.created_at.date_naive())
                .or_insert_with(|| (HashSet::new(), 0));
            day.0.insert(visit.visitor_id.clone());
            day.1 += 1;
            everyone.insert(visit.visitor_id.clone());
        }

        let analytics = by_day
            .into_iter()
            .map(|(date, (visitors, pageviews))| DailyPoint {
                date,
                visitors: visitors.len() as u64,
                pageviews,
            })
            .collect();

        Ok(DailySeries {
            analytics,
            totals: DailyTotals {
                unique_visitors: everyone.len() as u64,
                total_pageviews: visits.len() as u64,
            },
        })
    }

    /// Dashboard headline figures as of now
    pub async fn overview(&self) -> Result<OverviewStats> {
        self.overview_at(Utc::now()).await
    }

    pub async fn overview_at(&self, now: DateTime<Utc>) -> Result<OverviewStats> {
        let today = start_of_day(now);
        let yesterday = today - Duration::days(1);

        let all = EventQuery::all().with_event_type(PAGEVIEW_EVENT);
        let since_today = EventQuery::since(today).with_event_type(PAGEVIEW_EVENT);
        let during_yesterday = EventQuery::since(yesterday)
            .until(today)
            .with_event_type(PAGEVIEW_EVENT);

        let (all_visitors, today_visitors, yesterday_visitors, total_pageviews) = tokio::try_join!(
            self.store.project_column(&all, EventColumn::VisitorId),
            self.store.project_column(&since_today, EventColumn::VisitorId),
            self.store.project_column(&during_yesterday, EventColumn::VisitorId),
            self.store.count_events(&all),
        )?;

        Ok(OverviewStats {
            unique_visitors: count_distinct(all_visitors),
            today_visitors: count_distinct(today_visitors),
            yesterday_visitors: count_distinct(yesterday_visitors),
            total_pageviews,
        })
    }
}

/// `now - days`, with `days` clamped to MAX_WINDOW_DAYS
pub fn window_start(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(i64::from(days.min(MAX_WINDOW_DAYS)))
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

fn count_distinct(values: Vec<Option<String>>) -> u64 {
    values.into_iter().flatten().collect::<HashSet<_>>().len() as u64
}

/// Group values (nulls bucketed under `null_label`) and order by count
/// descending. Equal counts are ordered by label for stable output.
fn tally(values: Vec<Option<String>>, null_label: &str) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in values {
        let key = value.unwrap_or_else(|| null_label.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

//! Tab refresh controller.
//!
//! One `refresh` call fetches the snapshot for a range, then rewrites the
//! range's text nodes and replaces the single live chart. The network round
//! trip and the chart drawing happen outside the view lock so several
//! refreshes can be in flight; whichever was issued last wins.

use crate::chart::{ChartError, ChartHost, ChartId, LineChartSpec, PreparedChart};
use crate::config::{DisplayConfig, FailureMode};
use crate::format::{percent_text, two_decimals, Trend, DANGER_CLASS};
use crate::models::RangeSnapshot;
use crate::range::RangeId;
use crate::source::{FetchError, SnapshotSource};
use crate::view::{Document, ViewSnapshot, STATUS_ELEMENT};
use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Rendered,
    /// A newer refresh was applied while this one was in flight.
    Stale,
    Failed(RefreshError),
}

/// Figures and chart for one range, ready to be written into the page.
struct RenderedRange {
    gain_loss: String,
    percent: String,
    trend: Trend,
    chart: PreparedChart,
}

struct ViewState {
    document: Document,
    charts: ChartHost,
    current_chart: Option<ChartId>,
    active: Option<RangeId>,
    refreshed_at: Option<String>,
    applied_ticket: u64,
}

pub struct RefreshController<S> {
    source: S,
    display: DisplayConfig,
    issued: AtomicU64,
    view: Mutex<ViewState>,
}

impl<S: SnapshotSource> RefreshController<S> {
    pub fn new(source: S, display: DisplayConfig) -> Self {
        let charts = ChartHost::new(display.chart_width, display.chart_height);
        Self {
            source,
            display,
            issued: AtomicU64::new(0),
            view: Mutex::new(ViewState {
                document: Document::default(),
                charts,
                current_chart: None,
                active: None,
                refreshed_at: None,
                applied_ticket: 0,
            }),
        }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub async fn refresh(&self, range: RangeId) -> RefreshOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let ids = self.display.layout.ids(range);

        self.view.lock().await.document.show_loader(&ids.container);

        let rendered = match self.source.fetch(range).await {
            Ok(snapshot) => self.render(range, snapshot).await,
            Err(err) => Err(RefreshError::from(err)),
        };

        let mut view = self.view.lock().await;
        view.document.hide_loader(&ids.container);

        if ticket < view.applied_ticket {
            debug!(%range, ticket, applied = view.applied_ticket, "dropping stale refresh");
            return RefreshOutcome::Stale;
        }

        match rendered {
            Ok(rendered) => {
                self.apply(&mut view, range, rendered);
                view.applied_ticket = ticket;
                info!(%range, "portfolio view refreshed");
                RefreshOutcome::Rendered
            }
            Err(err) => {
                warn!(%range, error = %err, "portfolio refresh failed");
                if self.display.failure_mode == FailureMode::Status {
                    view.document.set_text(
                        STATUS_ELEMENT,
                        format!("Unable to load {range} performance: {err}"),
                    );
                    view.document.set_class(STATUS_ELEMENT, Some(DANGER_CLASS));
                }
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Formats the figures and draws the chart without holding the view lock.
    async fn render(
        &self,
        range: RangeId,
        snapshot: RangeSnapshot,
    ) -> Result<RenderedRange, RefreshError> {
        let gain_loss = two_decimals(snapshot.gain_loss);
        let trend = Trend::of(&gain_loss);
        let percent = match snapshot.percent_change {
            Some(percent) if self.display.show_percent => percent_text(percent, trend),
            _ => String::new(),
        };
        let spec = LineChartSpec {
            labels: snapshot.labels(),
            values: snapshot.values(),
            trend,
            fill: self.display.fill_chart,
        };

        let canvas = self.display.layout.ids(range).canvas;
        let (width, height) = (self.display.chart_width, self.display.chart_height);
        let chart = tokio::task::spawn_blocking(move || {
            PreparedChart::render(canvas, spec, width, height)
        })
        .await
        .map_err(ChartError::from)??;

        Ok(RenderedRange {
            gain_loss,
            percent,
            trend,
            chart,
        })
    }

    fn apply(&self, view: &mut ViewState, range: RangeId, rendered: RenderedRange) {
        let ids = self.display.layout.ids(range);
        let RenderedRange {
            gain_loss,
            percent,
            trend,
            chart,
        } = rendered;

        let document = &mut view.document;
        document.set_text(&ids.gain_loss, gain_loss);
        document.set_text(&ids.percent_change, percent);
        document.set_text(&ids.timescale, range.timescale());
        document.set_class(&ids.status, Some(trend.class()));
        document.set_text(STATUS_ELEMENT, "");
        document.set_class(STATUS_ELEMENT, None);

        if let Some(previous) = view.current_chart.take() {
            view.charts.destroy(previous);
        }
        view.current_chart = Some(view.charts.mount(chart));
        view.active = Some(range);
        view.refreshed_at = Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let view = self.view.lock().await;
        let chart = view
            .current_chart
            .and_then(|id| view.charts.get(id))
            .cloned();
        ViewSnapshot::new(&view.document, view.active, view.refreshed_at.clone(), chart)
    }

    pub async fn chart_svg(&self) -> Option<String> {
        let view = self.view.lock().await;
        view.current_chart
            .and_then(|id| view.charts.get(id))
            .map(|chart| chart.svg.clone())
    }

    pub async fn live_charts(&self) -> usize {
        self.view.lock().await.charts.live_count()
    }
}

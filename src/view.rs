use crate::chart::LineChart;
use crate::range::RangeId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Element carrying the visible refresh error, shared by every tab.
pub const STATUS_ELEMENT: &str = "refresh-status";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// `None` for nodes whose children carry the text, e.g. the status wrapper.
    pub text: Option<String>,
    pub class: Option<String>,
}

/// Element-id conventions used by the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementLayout {
    /// Every range has its own set of nodes, e.g. `gains-losses-1M`.
    PerTab,
    /// One set of nodes reused by all ranges.
    Shared,
}

impl FromStr for ElementLayout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per-tab" | "per_tab" => Ok(ElementLayout::PerTab),
            "shared" => Ok(ElementLayout::Shared),
            other => Err(format!("unknown element layout '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub status: String,
    pub gain_loss: String,
    pub percent_change: String,
    pub timescale: String,
    pub canvas: String,
    pub container: String,
}

impl ElementLayout {
    pub fn ids(self, range: RangeId) -> ElementIds {
        match self {
            ElementLayout::PerTab => ElementIds {
                status: format!("portfolio-status-{range}"),
                gain_loss: format!("gains-losses-{range}"),
                percent_change: format!("percent-change-{range}"),
                timescale: format!("timescale-{range}"),
                canvas: format!("{range}-chart"),
                container: format!("{range}-chart-container"),
            },
            ElementLayout::Shared => ElementIds {
                status: "portfolio-status".to_string(),
                gain_loss: "gains-losses".to_string(),
                percent_change: "percent-change".to_string(),
                timescale: "timescale".to_string(),
                canvas: "chart".to_string(),
                container: "chart-container".to_string(),
            },
        }
    }

    /// Ranges that get their own panel on the page.
    pub fn panels(self) -> Vec<Option<RangeId>> {
        match self {
            ElementLayout::PerTab => RangeId::ALL.into_iter().map(Some).collect(),
            ElementLayout::Shared => vec![None],
        }
    }
}

/// Text and class state of the page's addressable nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: BTreeMap<String, Element>,
    /// In-flight refreshes per chart container.
    loading: BTreeMap<String, usize>,
}

impl Document {
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.elements.entry(id.to_string()).or_default().text = Some(text.into());
    }

    pub fn set_class(&mut self, id: &str, class: Option<&str>) {
        self.elements.entry(id.to_string()).or_default().class = class.map(str::to_string);
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> &str {
        self.get(id)
            .and_then(|element| element.text.as_deref())
            .unwrap_or("")
    }

    pub fn show_loader(&mut self, container: &str) {
        *self.loading.entry(container.to_string()).or_default() += 1;
    }

    /// The loader goes away once every refresh that showed it has finished.
    pub fn hide_loader(&mut self, container: &str) {
        if let Some(pending) = self.loading.get_mut(container) {
            *pending -= 1;
            if *pending == 0 {
                self.loading.remove(container);
            }
        }
    }

    pub fn is_loading(&self, container: &str) -> bool {
        self.loading.contains_key(container)
    }
}

/// Everything the page needs to redraw itself.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub active: Option<RangeId>,
    pub refreshed_at: Option<String>,
    pub elements: BTreeMap<String, Element>,
    pub loading: Vec<String>,
    pub chart: Option<LineChart>,
}

impl ViewSnapshot {
    pub fn new(
        document: &Document,
        active: Option<RangeId>,
        refreshed_at: Option<String>,
        chart: Option<LineChart>,
    ) -> Self {
        Self {
            active,
            refreshed_at,
            elements: document.elements.clone(),
            loading: document.loading.keys().cloned().collect(),
            chart,
        }
    }

    pub fn text(&self, id: &str) -> &str {
        self.elements
            .get(id)
            .and_then(|element| element.text.as_deref())
            .unwrap_or("")
    }

    pub fn class(&self, id: &str) -> Option<&str> {
        self.elements.get(id).and_then(|element| element.class.as_deref())
    }
}

use serde::{Deserialize, Serialize};

use super::charts::ChartSpec;

// =========================================================
// Page types + route
// =========================================================

/// Dashboard pages, in navigation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Overview,
    Households,
    Map,
    Interest,
    Gas,
    About,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Overview,
        Page::Households,
        Page::Map,
        Page::Interest,
        Page::Gas,
        Page::About,
    ];

    /// Page shown when a session starts.
    pub fn initial() -> Self {
        Self::ALL[0]
    }

    pub fn key(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Households => "households",
            Page::Map => "map",
            Page::Interest => "interest",
            Page::Gas => "gas",
            Page::About => "about",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Solar production overview",
            Page::Households => "Households",
            Page::Map => "Production map",
            Page::Interest => "Forecast and public interest",
            Page::Gas => "Gas prices and grid purchases",
            Page::About => "About",
        }
    }
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown page '{}'", s.trim()))
    }
}

/// Severity of a transient notice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Inline message shown above the charts for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Headline figure displayed above a page's charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

/// Short page descriptor for the navigation widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub key: String,
    pub title: String,
}

impl From<Page> for PageInfo {
    fn from(page: Page) -> Self {
        Self {
            key: page.key().to_string(),
            title: page.title().to_string(),
        }
    }
}

/// Everything the frontend needs to draw one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<ChartSpec>,
    pub notices: Vec<Notice>,
    /// Usage rows left after filtering.
    pub row_count: usize,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Recommendation,
    Anomaly,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Recommendation => "Recommendation",
            InsightKind::Anomaly => "Anomaly",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            InsightKind::Recommendation => Color::Green,
            InsightKind::Anomaly => Color::Yellow,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            InsightKind::Recommendation => "→",
            InsightKind::Anomaly => "⚠",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub kind: InsightKind,
    pub message: String,
    /// Ranking key for recommendations only; never displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl InsightItem {
    pub fn recommendation(message: impl Into<String>, score: f64) -> Self {
        Self {
            kind: InsightKind::Recommendation,
            message: message.into(),
            score: Some(score),
        }
    }

    pub fn anomaly(message: impl Into<String>) -> Self {
        Self {
            kind: InsightKind::Anomaly,
            message: message.into(),
            score: None,
        }
    }
}

/// Result of one insight computation over a record snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub recommendations: Vec<InsightItem>,
    pub anomalies: Vec<InsightItem>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.anomalies.is_empty()
    }
}

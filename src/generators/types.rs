// Artifact types produced by the template generators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product format. `Other` keeps unrecognized values so lookups can fall back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    Pdf,
    Checklist,
    Template,
    Audio,
    Video,
    Worksheet,
    Other(String),
}

impl Format {
    pub const KNOWN: [Format; 6] = [
        Format::Pdf,
        Format::Checklist,
        Format::Template,
        Format::Audio,
        Format::Video,
        Format::Worksheet,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "pdf" => Format::Pdf,
            "checklist" => Format::Checklist,
            "template" => Format::Template,
            "audio" => Format::Audio,
            "video" => Format::Video,
            "worksheet" => Format::Worksheet,
            other => Format::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Pdf => "pdf",
            Format::Checklist => "checklist",
            Format::Template => "template",
            Format::Audio => "audio",
            Format::Video => "video",
            Format::Worksheet => "worksheet",
            Format::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Format::Pdf => "PDF Guide",
            Format::Checklist => "Checklist",
            Format::Template => "Template",
            Format::Audio => "Audio Course",
            Format::Video => "Video Series",
            Format::Worksheet => "Worksheet",
            Format::Other(value) => value,
        }
    }
}

impl From<String> for Format {
    fn from(value: String) -> Self {
        Format::parse(&value)
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw user input for the first stage, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferInput {
    pub niche: String,
    pub pain_point: String,
    pub format: String,
}

impl OfferInput {
    pub fn new(
        niche: impl Into<String>,
        pain_point: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            niche: niche.into(),
            pain_point: pain_point.into(),
            format: format.into(),
        }
    }

    /// Names of the fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("niche", &self.niche),
            ("painPoint", &self.pain_point),
            ("format", &self.format),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub niche: String,
    pub pain_point: String,
    pub format: Format,
    pub name: String,
    pub promise: String,
    pub deliverable: String,
}

impl Offer {
    /// Plain-text block used when copying the offer.
    pub fn summary(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.name, self.promise, self.deliverable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub main: u32,
    pub suggested: u32,
    pub premium: u32,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upsell {
    pub title: String,
    pub price: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackComponent {
    pub item: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStack {
    pub total_value: u32,
    pub your_price: u32,
    pub savings: u32,
    pub components: Vec<StackComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub pricing: Pricing,
    pub bonuses: Vec<String>,
    pub upsells: Vec<Upsell>,
    pub offer_stack: OfferStack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesCopy {
    pub social_post: String,
    pub cta_one_liner: String,
    pub mini_sales_page: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTask {
    pub id: u32,
    pub task: String,
    pub time_estimate: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistPhase {
    pub id: u32,
    pub phase: String,
    pub tasks: Vec<ChecklistTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub phases: Vec<ChecklistPhase>,
}

impl Checklist {
    pub fn total_tasks(&self) -> usize {
        self.phases.iter().map(|phase| phase.tasks.len()).sum()
    }

    pub fn contains_task(&self, id: u32) -> bool {
        self.phases
            .iter()
            .flat_map(|phase| phase.tasks.iter())
            .any(|task| task.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoScript {
    pub id: u32,
    pub title: String,
    pub duration: String,
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoPost {
    pub id: u32,
    pub platform: String,
    pub kind: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoKit {
    pub video_scripts: Vec<VideoScript>,
    pub social_posts: Vec<PromoPost>,
}

//! Core data model: a unit of company knowledge.

use serde::{Deserialize, Deserializer, Serialize};

/// Informational tag of a document. It never gates scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Faq,
    Documentation,
    Policy,
    #[default]
    Other,
}

impl DocumentType {
    /// Case-insensitive mapping; unknown labels become [`DocumentType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "faq" | "faqs" => Self::Faq,
            "documentation" | "docs" | "doc" | "guide" => Self::Documentation,
            "policy" | "policies" => Self::Policy,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Documentation => "documentation",
            Self::Policy => "policy",
            Self::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let label = String::deserialize(d)?;
        Ok(Self::from_label(&label))
    }
}

/// A company knowledge document (FAQ, policy, guide, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: DocumentType,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            description: None,
            doc_type: DocumentType::Other,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = doc_type;
        self
    }

    /// Description or empty string.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

//! Message template catalog and rendering.
//!
//! The catalog is a closed table: each template id maps to a display name
//! and an expected efficacy figure, resolved exactly once when a dispatch
//! starts. Content lives in `<templates_dir>/<id>.html`; any read failure
//! falls back to a built-in stub so a missing file never blocks a launch.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TemplateError;

/// Placeholder substituted with the recipient address at render time.
pub const TARGET_PLACEHOLDER: &str = "{{target}}";

/// Fallback content served when a template file cannot be read.
pub const STUB_CONTENT: &str =
    "<h1>Hello {{target}}</h1><p>This is a placeholder message body.</p>";

/// Closed set of campaign templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Welcome,
    Newsletter,
    ProductLaunch,
    Reminder,
    Survey,
    Shipping,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        Self::Welcome,
        Self::Newsletter,
        Self::ProductLaunch,
        Self::Reminder,
        Self::Survey,
        Self::Shipping,
    ];

    /// Identifier used in the API and as the on-disk file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Newsletter => "newsletter",
            Self::ProductLaunch => "product-launch",
            Self::Reminder => "reminder",
            Self::Survey => "survey",
            Self::Shipping => "shipping",
        }
    }

    /// Human-readable name, used as the message subject.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome Aboard",
            Self::Newsletter => "Monthly Newsletter",
            Self::ProductLaunch => "Product Launch",
            Self::Reminder => "Renewal Reminder",
            Self::Survey => "Customer Survey",
            Self::Shipping => "Package Delivery Update",
        }
    }

    /// Expected delivery-to-engagement efficacy, in percent.
    pub fn expected_efficacy(&self) -> f32 {
        match self {
            Self::Welcome => 92.0,
            Self::Newsletter => 87.0,
            Self::ProductLaunch => 94.0,
            Self::Reminder => 89.0,
            Self::Survey => 91.0,
            Self::Shipping => 88.0,
        }
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::Welcome
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateId {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| TemplateError::Unknown(s.to_string()))
    }
}

/// Catalog entry exposed by the stats and template endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub expected_efficacy: f32,
}

/// The full template table.
pub fn catalog() -> Vec<TemplateInfo> {
    TemplateId::ALL
        .iter()
        .map(|id| TemplateInfo {
            id: *id,
            name: id.display_name(),
            expected_efficacy: id.expected_efficacy(),
        })
        .collect()
}

/// A template resolved to concrete content for one campaign run.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub subject: String,
    pub content: String,
}

impl ResolvedTemplate {
    /// Substitute every `{{target}}` occurrence with the recipient address.
    pub fn render(&self, recipient: &str) -> String {
        self.content.replace(TARGET_PLACEHOLDER, recipient)
    }
}

/// File-backed template content provider.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Raw content for one template, stub fallback on any read failure.
    pub async fn content(&self, id: TemplateId) -> String {
        let path = self.dir.join(format!("{id}.html"));
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    template = %id,
                    path = %path.display(),
                    error = %e,
                    "Template file unavailable, serving stub"
                );
                STUB_CONTENT.to_string()
            }
        }
    }

    /// Resolve a selector to concrete content: a non-empty override wins,
    /// otherwise the template file (or its stub).
    pub async fn resolve(&self, id: TemplateId, custom: Option<&str>) -> ResolvedTemplate {
        let content = match custom {
            Some(raw) if !raw.trim().is_empty() => raw.to_string(),
            _ => self.content(id).await,
        };
        ResolvedTemplate {
            subject: id.display_name().to_string(),
            content,
        }
    }
}

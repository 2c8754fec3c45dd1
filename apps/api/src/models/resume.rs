#![allow(dead_code)]

//! Résumé data model — the structured career data a client submits for rendering.
//!
//! Sections are tagged variants, one per section type, each carrying a
//! `SectionSchema` that names its required and optional fields. The template
//! layer validates entries against the schema before building a context, so
//! a missing required field is reported by name instead of surfacing as a
//! hole in the compiled document.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Contact block
// ────────────────────────────────────────────────────────────────────────────

/// Full résumé payload: contact block plus an ordered list of sections.
/// Section order in the document follows the order submitted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    pub sections: Vec<Section>,
}

/// An external link shown in the contact line. The label falls back to the
/// URL itself when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub label: String,
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// A résumé section. The optional `heading` overrides the default section
/// title, so e.g. a second `experience` section can be titled
/// "Research Experience".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Summary {
        text: String,
        #[serde(default)]
        heading: Option<String>,
    },
    Experience {
        entries: Vec<ExperienceEntry>,
        #[serde(default)]
        heading: Option<String>,
    },
    Projects {
        entries: Vec<ProjectEntry>,
        #[serde(default)]
        heading: Option<String>,
    },
    Education {
        entries: Vec<EducationEntry>,
        #[serde(default)]
        heading: Option<String>,
    },
    Skills {
        groups: Vec<SkillGroup>,
        #[serde(default)]
        heading: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Schemas
// ────────────────────────────────────────────────────────────────────────────

/// Field schema for one section type. `required` fields must be present and
/// non-empty on every entry; `optional` fields render as empty when absent.
#[derive(Debug, Clone, Copy)]
pub struct SectionSchema {
    pub kind: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const SUMMARY_SCHEMA: SectionSchema = SectionSchema {
    kind: "summary",
    required: &["text"],
    optional: &["heading"],
};

pub const EXPERIENCE_SCHEMA: SectionSchema = SectionSchema {
    kind: "experience",
    required: &["company", "role"],
    optional: &["start", "end", "location", "bullets"],
};

pub const PROJECTS_SCHEMA: SectionSchema = SectionSchema {
    kind: "projects",
    required: &["name", "description"],
    optional: &["technologies", "link"],
};

pub const EDUCATION_SCHEMA: SectionSchema = SectionSchema {
    kind: "education",
    required: &["institution", "degree"],
    optional: &["start", "end", "location", "details"],
};

pub const SKILLS_SCHEMA: SectionSchema = SectionSchema {
    kind: "skills",
    required: &["category", "items"],
    optional: &[],
};

impl Section {
    pub fn schema(&self) -> SectionSchema {
        match self {
            Section::Summary { .. } => SUMMARY_SCHEMA,
            Section::Experience { .. } => EXPERIENCE_SCHEMA,
            Section::Projects { .. } => PROJECTS_SCHEMA,
            Section::Education { .. } => EDUCATION_SCHEMA,
            Section::Skills { .. } => SKILLS_SCHEMA,
        }
    }

    /// Section title shown in the document: the custom heading when set and
    /// non-empty, otherwise the default title for the section type.
    pub fn heading(&self) -> &str {
        let (custom, default) = match self {
            Section::Summary { heading, .. } => (heading, "Professional Summary"),
            Section::Experience { heading, .. } => (heading, "Experience"),
            Section::Projects { heading, .. } => (heading, "Projects"),
            Section::Education { heading, .. } => (heading, "Education"),
            Section::Skills { heading, .. } => (heading, "Technical Skills"),
        };
        match custom {
            Some(h) if !h.trim().is_empty() => h,
            _ => default,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field lookup (drives schema validation in the template layer)
// ────────────────────────────────────────────────────────────────────────────

/// Looks up a schema field by name on an entry. Returns `None` when the field
/// is absent or empty, so `field(name).is_some()` means "present and usable".
pub trait FieldLookup {
    fn field(&self, name: &str) -> Option<String>;
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_empty_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

impl FieldLookup for ExperienceEntry {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "company" => non_empty(&self.company),
            "role" => non_empty(&self.role),
            "start" => non_empty_opt(&self.start),
            "end" => non_empty_opt(&self.end),
            "location" => non_empty_opt(&self.location),
            "bullets" => non_empty(&self.bullets.join("\n")),
            _ => None,
        }
    }
}

impl FieldLookup for ProjectEntry {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => non_empty(&self.name),
            "description" => non_empty(&self.description),
            "technologies" => non_empty(&self.technologies.join(", ")),
            "link" => non_empty_opt(&self.link),
            _ => None,
        }
    }
}

impl FieldLookup for EducationEntry {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "institution" => non_empty(&self.institution),
            "degree" => non_empty(&self.degree),
            "start" => non_empty_opt(&self.start),
            "end" => non_empty_opt(&self.end),
            "location" => non_empty_opt(&self.location),
            "details" => non_empty(&self.details.join("\n")),
            _ => None,
        }
    }
}

impl FieldLookup for SkillGroup {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "category" => non_empty(&self.category),
            "items" => non_empty(&self.items.join(", ")),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Template context — the ordered field→value mapping handed to the renderer.
//!
//! Contexts are built here and nowhere else. Every user-supplied value is
//! escaped at insertion time, so by the time a context reaches the renderer it
//! is immutable and safe to substitute verbatim. Composite fields (date
//! ranges, bullet lists) are assembled from escaped pieces, which is why
//! records accept pre-escaped values rather than escaping on insert.

use crate::models::resume::{
    EducationEntry, ExperienceEntry, FieldLookup, ProjectEntry, Section, SectionSchema, SkillGroup,
};
use crate::template::escape::{escape, escape_url};
use crate::template::renderer::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Context types
// ────────────────────────────────────────────────────────────────────────────

/// A field value: rendered (escaped) text, or a list of records for
/// `{{#each}}` blocks.
#[derive(Debug, Clone)]
pub enum TemplateValue {
    Text(String),
    Records(Vec<Record>),
}

/// One record inside a list field. Values are already escaped LaTeX.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered mapping from field name to value. Insertion order is preserved;
/// lookup returns the first insert for a name, and callers insert each field
/// once.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    fields: Vec<(String, TemplateValue)>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user-supplied scalar, escaping it for LaTeX.
    pub fn insert_text(&mut self, name: &str, value: &str) {
        self.insert_raw(name, escape(value));
    }

    /// Inserts a pre-built LaTeX fragment verbatim. Only this module and the
    /// style shells use raw inserts; user input never takes this path
    /// unescaped.
    pub fn insert_raw(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .push((name.to_string(), TemplateValue::Text(value.into())));
    }

    pub fn insert_records(&mut self, name: &str, records: Vec<Record>) {
        self.fields
            .push((name.to_string(), TemplateValue::Records(records)));
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schema validation
// ────────────────────────────────────────────────────────────────────────────

/// Checks every required schema field on `item`. `path` prefixes the reported
/// field name, e.g. `experience[0]` → `experience[0].company`.
fn validate_required<T: FieldLookup>(
    item: &T,
    schema: &SectionSchema,
    path: &str,
) -> Result<(), RenderError> {
    for &name in schema.required {
        if item.field(name).is_none() {
            return Err(RenderError::MissingField {
                field: format!("{path}.{name}"),
            });
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Section contexts
// ────────────────────────────────────────────────────────────────────────────

/// Builds the context for one section's snippet template, validating entries
/// against the section schema first.
pub fn section_context(section: &Section) -> Result<TemplateContext, RenderError> {
    let schema = section.schema();
    let mut ctx = TemplateContext::new();

    match section {
        Section::Summary { text, .. } => {
            if text.trim().is_empty() {
                return Err(RenderError::MissingField {
                    field: format!("{}.text", schema.kind),
                });
            }
            ctx.insert_text("text", text.trim());
        }

        Section::Experience { entries, .. } => {
            let mut records = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                validate_required(entry, &schema, &format!("{}[{i}]", schema.kind))?;
                records.push(experience_record(entry));
            }
            ctx.insert_records("entries", records);
        }

        Section::Projects { entries, .. } => {
            let mut records = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                validate_required(entry, &schema, &format!("{}[{i}]", schema.kind))?;
                records.push(project_record(entry));
            }
            ctx.insert_records("entries", records);
        }

        Section::Education { entries, .. } => {
            let mut records = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                validate_required(entry, &schema, &format!("{}[{i}]", schema.kind))?;
                records.push(education_record(entry));
            }
            ctx.insert_records("entries", records);
        }

        Section::Skills { groups, .. } => {
            let mut records = Vec::with_capacity(groups.len());
            for (i, group) in groups.iter().enumerate() {
                validate_required(group, &schema, &format!("{}[{i}]", schema.kind))?;
                records.push(skill_record(group));
            }
            ctx.insert_records("groups", records);
        }
    }

    Ok(ctx)
}

fn experience_record(entry: &ExperienceEntry) -> Record {
    let mut record = Record::new();
    record.insert("role", escape(entry.role.trim()));
    record.insert("company", escape(entry.company.trim()));
    if let Some(dates) = date_range(entry.start.as_deref(), entry.end.as_deref()) {
        record.insert("dates", dates);
    }
    if let Some(location) = trimmed(entry.location.as_deref()) {
        record.insert("location_suffix", format!(", {}", escape(location)));
    }
    if let Some(list) = item_list(&entry.bullets) {
        record.insert("bullet_list", list);
    }
    record
}

fn project_record(entry: &ProjectEntry) -> Record {
    let mut record = Record::new();
    record.insert("name", escape(entry.name.trim()));
    record.insert("description", escape(entry.description.trim()));

    let technologies: Vec<String> = entry
        .technologies
        .iter()
        .filter_map(|t| trimmed(Some(t.as_str())))
        .map(escape)
        .collect();
    if !technologies.is_empty() {
        record.insert(
            "tech_suffix",
            format!(" \\textbar{{}} \\textit{{{}}}", technologies.join(", ")),
        );
    }

    if let Some(link) = trimmed(entry.link.as_deref()) {
        record.insert(
            "link_suffix",
            format!(" \\hfill \\href{{{}}}{{{}}}", escape_url(link), escape(link)),
        );
    }
    record
}

fn education_record(entry: &EducationEntry) -> Record {
    let mut record = Record::new();
    record.insert("institution", escape(entry.institution.trim()));
    record.insert("degree", escape(entry.degree.trim()));
    if let Some(dates) = date_range(entry.start.as_deref(), entry.end.as_deref()) {
        record.insert("dates", dates);
    }
    if let Some(location) = trimmed(entry.location.as_deref()) {
        record.insert("location_suffix", format!(", {}", escape(location)));
    }
    if let Some(list) = item_list(&entry.details) {
        record.insert("detail_list", list);
    }
    record
}

fn skill_record(group: &SkillGroup) -> Record {
    let mut record = Record::new();
    record.insert("category", escape(group.category.trim()));
    let items: Vec<String> = group
        .items
        .iter()
        .filter_map(|i| trimmed(Some(i.as_str())))
        .map(escape)
        .collect();
    record.insert("items", items.join(", "));
    record
}

// ────────────────────────────────────────────────────────────────────────────
// Composite field helpers
// ────────────────────────────────────────────────────────────────────────────

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Formats a start/end pair as an escaped date range. An open-ended start
/// becomes "start -- Present"; a lone end is used as-is.
fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (trimmed(start), trimmed(end)) {
        (Some(s), Some(e)) => Some(format!("{} -- {}", escape(s), escape(e))),
        (Some(s), None) => Some(format!("{} -- Present", escape(s))),
        (None, Some(e)) => Some(escape(e)),
        (None, None) => None,
    }
}

/// Builds an itemize environment from the non-empty items, escaping each.
/// Returns `None` when no item survives, so the snippet omits the list
/// entirely instead of emitting an empty environment (a LaTeX error).
fn item_list(items: &[String]) -> Option<String> {
    let items: Vec<&str> = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        return None;
    }
    let mut out = String::from("\\begin{itemize}\n");
    for item in items {
        out.push_str("\\item ");
        out.push_str(&escape(item));
        out.push('\n');
    }
    out.push_str("\\end{itemize}");
    Some(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Template layer — turns structured résumé data into a complete LaTeX source.
//!
//! Composition: each section renders through its snippet into a body block,
//! the body is wrapped in the selected style's document shell, and every
//! user-supplied value is escaped on its way into the context. The whole
//! layer is pure; the typeset module owns all filesystem and process work.

pub mod context;
pub mod escape;
pub mod renderer;
pub mod styles;

pub use renderer::{render, RenderError};
pub use styles::{FontSize, TemplateStyle};

use crate::models::resume::ResumeData;
use crate::template::context::{section_context, TemplateContext};
use crate::template::escape::{escape, escape_url};
use crate::template::styles::{section_snippet, MULTI_PAGE_PREAMBLE};

/// Per-request rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub style: TemplateStyle,
    pub font_size: FontSize,
    /// Adds a "Page X of Y" footer; the page count is a forward reference
    /// resolved on the compiler's second pass.
    pub multi_page: bool,
}

/// Renders the full LaTeX document for `resume`.
pub fn render_resume(resume: &ResumeData, opts: &RenderOptions) -> Result<String, RenderError> {
    if resume.name.trim().is_empty() {
        return Err(RenderError::MissingField {
            field: "name".to_string(),
        });
    }
    if resume.email.trim().is_empty() {
        return Err(RenderError::MissingField {
            field: "email".to_string(),
        });
    }

    let mut body = String::new();
    for section in &resume.sections {
        let ctx = section_context(section)?;
        let rendered = render(section_snippet(section), &ctx)?;
        body.push_str("\\resumesection{");
        body.push_str(&escape(section.heading()));
        body.push_str("}\n");
        body.push_str(rendered.trim());
        body.push_str("\n\n");
    }

    let mut ctx = TemplateContext::new();
    ctx.insert_raw("font_size", opts.font_size.as_latex());
    ctx.insert_text("name", resume.name.trim());
    ctx.insert_raw("contact_line", contact_line(resume)?);
    if opts.multi_page {
        ctx.insert_raw("extra_preamble", MULTI_PAGE_PREAMBLE);
    }
    ctx.insert_raw("body", body.trim_end().to_string());

    render(opts.style.shell(), &ctx)
}

/// Builds the centered contact line: email, then phone, location, and links,
/// separated by dots. Links with an empty label display their URL.
fn contact_line(resume: &ResumeData) -> Result<String, RenderError> {
    let email = resume.email.trim();
    let mut pieces = vec![format!(
        "\\href{{mailto:{}}}{{{}}}",
        escape_url(email),
        escape(email)
    )];

    if let Some(phone) = resume.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        pieces.push(escape(phone));
    }
    if let Some(location) = resume
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        pieces.push(escape(location));
    }

    for (i, link) in resume.links.iter().enumerate() {
        let url = link.url.trim();
        if url.is_empty() {
            return Err(RenderError::MissingField {
                field: format!("links[{i}].url"),
            });
        }
        let label = link.label.trim();
        let label = if label.is_empty() { url } else { label };
        pieces.push(format!(
            "\\href{{{}}}{{{}}}",
            escape_url(url),
            escape(label)
        ));
    }

    Ok(pieces.join(" $\\cdot$ "))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, Link, Section, SkillGroup};

    fn make_resume() -> ResumeData {
        ResumeData {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("+44 20 7946 0000".to_string()),
            location: Some("London".to_string()),
            links: vec![Link {
                label: "GitHub".to_string(),
                url: "https://github.com/ada_l".to_string(),
            }],
            sections: vec![
                Section::Summary {
                    text: "Engineer with 100% focus on analytical engines & compilers."
                        .to_string(),
                    heading: None,
                },
                Section::Experience {
                    entries: vec![ExperienceEntry {
                        company: "Babbage & Co".to_string(),
                        role: "Chief Analyst".to_string(),
                        start: Some("1842".to_string()),
                        end: Some("1843".to_string()),
                        location: None,
                        bullets: vec!["Wrote the first program (note_G)".to_string()],
                    }],
                    heading: None,
                },
                Section::Skills {
                    groups: vec![SkillGroup {
                        category: "Mathematics".to_string(),
                        items: vec!["Bernoulli numbers".to_string()],
                    }],
                    heading: None,
                },
            ],
        }
    }

    #[test]
    fn test_render_resume_produces_complete_document() {
        let latex = render_resume(&make_resume(), &RenderOptions::default()).unwrap();
        assert!(latex.starts_with("\\documentclass[10pt,letterpaper]{article}"));
        assert!(latex.contains("\\begin{document}"));
        assert!(latex.ends_with("\\end{document}\n"));
        assert!(latex.contains("Ada Lovelace"));
        assert!(latex.contains("\\resumesection{Professional Summary}"));
        assert!(latex.contains("\\resumesection{Experience}"));
    }

    #[test]
    fn test_render_resume_leaves_no_placeholders_behind() {
        let latex = render_resume(&make_resume(), &RenderOptions::default()).unwrap();
        assert!(!latex.contains("{{"), "unsubstituted placeholder in:\n{latex}");
    }

    #[test]
    fn test_render_resume_escapes_user_input() {
        let latex = render_resume(&make_resume(), &RenderOptions::default()).unwrap();
        // '&', '%', '_' from the fixture must all arrive escaped.
        assert!(latex.contains("Babbage \\& Co"));
        assert!(latex.contains("100\\% focus"));
        assert!(latex.contains("note\\_G"));
        assert!(!latex.contains("Babbage & Co"));
    }

    #[test]
    fn test_render_resume_missing_name_fails() {
        let mut resume = make_resume();
        resume.name = "  ".to_string();
        let err = render_resume(&resume, &RenderOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_render_resume_missing_email_fails() {
        let mut resume = make_resume();
        resume.email = String::new();
        let err = render_resume(&resume, &RenderOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                field: "email".to_string()
            }
        );
    }

    #[test]
    fn test_render_resume_multi_page_adds_footer_preamble() {
        let opts = RenderOptions {
            multi_page: true,
            ..Default::default()
        };
        let latex = render_resume(&make_resume(), &opts).unwrap();
        assert!(latex.contains("\\usepackage{lastpage}"));
        assert!(latex.contains("\\pageref{LastPage}"));

        let single = render_resume(&make_resume(), &RenderOptions::default()).unwrap();
        assert!(!single.contains("lastpage"));
    }

    #[test]
    fn test_render_resume_compact_style_and_font_size() {
        let opts = RenderOptions {
            style: TemplateStyle::Compact,
            font_size: FontSize::ElevenPt,
            multi_page: false,
        };
        let latex = render_resume(&make_resume(), &opts).unwrap();
        assert!(latex.starts_with("\\documentclass[11pt,letterpaper]{article}"));
        assert!(latex.contains("margin=0.5in"));
    }

    #[test]
    fn test_contact_line_orders_pieces_and_links() {
        let line = contact_line(&make_resume()).unwrap();
        assert!(line.starts_with("\\href{mailto:ada@example.com}"));
        assert!(line.contains(" $\\cdot$ London $\\cdot$ "));
        // Link target unescaped underscore, label escaped text.
        assert!(line.contains("\\href{https://github.com/ada_l}{GitHub}"));
    }

    #[test]
    fn test_contact_line_rejects_empty_link_url() {
        let mut resume = make_resume();
        resume.links.push(Link {
            label: "Broken".to_string(),
            url: "  ".to_string(),
        });
        let err = contact_line(&resume).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                field: "links[1].url".to_string()
            }
        );
    }

    #[test]
    fn test_custom_heading_flows_into_body() {
        let mut resume = make_resume();
        resume.sections.push(Section::Experience {
            entries: vec![ExperienceEntry {
                company: "Royal Society".to_string(),
                role: "Fellow".to_string(),
                start: None,
                end: None,
                location: None,
                bullets: vec![],
            }],
            heading: Some("Research Experience".to_string()),
        });
        let latex = render_resume(&resume, &RenderOptions::default()).unwrap();
        assert!(latex.contains("\\resumesection{Research Experience}"));
    }
}

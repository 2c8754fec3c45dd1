//! Placeholder renderer — pure text substitution over a template string.
//!
//! Syntax (adapted from the usual `{{ }}` substitution engines):
//! - `{{field}}` — required scalar; rendering fails when the context lacks it.
//! - `{{field?}}` — optional scalar; missing values render as empty.
//! - `{{#each field}} ... {{/each}}` — repeats the body once per record in a
//!   list field; inner placeholders resolve against the current record.
//!
//! Blocks do not nest. The renderer performs no escaping itself: context
//! values are escaped when the context is built, so substitution is verbatim.

use thiserror::Error;

use crate::template::context::{Record, TemplateContext, TemplateValue};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const EACH_PREFIX: &str = "#each ";
const EACH_CLOSE: &str = "{{/each}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("unterminated placeholder marker")]
    UnterminatedPlaceholder,

    #[error("unclosed each block for field '{field}'")]
    UnclosedBlock { field: String },

    #[error("closing each marker without an open block")]
    StrayBlockClose,

    #[error("each blocks cannot nest (inside '{field}')")]
    NestedBlock { field: String },

    #[error("field '{field}' is not a {expected}")]
    ShapeMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Renders `template` against `ctx`. Pure: the only output is the returned
/// string or the first error encountered, in template order.
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let end = after
            .find(CLOSE)
            .ok_or(RenderError::UnterminatedPlaceholder)?;
        let token = after[..end].trim();

        if token == "/each" {
            return Err(RenderError::StrayBlockClose);
        }

        if let Some(field) = token.strip_prefix(EACH_PREFIX) {
            let field = field.trim();
            let body_and_rest = &after[end + CLOSE.len()..];
            let close = body_and_rest
                .find(EACH_CLOSE)
                .ok_or_else(|| RenderError::UnclosedBlock {
                    field: field.to_string(),
                })?;
            let body = &body_and_rest[..close];

            match ctx.get(field) {
                Some(TemplateValue::Records(records)) => {
                    for (index, record) in records.iter().enumerate() {
                        render_record(body, record, field, index, &mut out)?;
                    }
                }
                Some(TemplateValue::Text(_)) => {
                    return Err(RenderError::ShapeMismatch {
                        field: field.to_string(),
                        expected: "list",
                    });
                }
                None => {
                    return Err(RenderError::MissingField {
                        field: field.to_string(),
                    });
                }
            }

            rest = &body_and_rest[close + EACH_CLOSE.len()..];
            continue;
        }

        let (field, optional) = parse_token(token);
        match ctx.get(field) {
            Some(TemplateValue::Text(value)) => out.push_str(value),
            Some(TemplateValue::Records(_)) => {
                return Err(RenderError::ShapeMismatch {
                    field: field.to_string(),
                    expected: "scalar",
                });
            }
            None if optional => {}
            None => {
                return Err(RenderError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        rest = &after[end + CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Renders one each-block body against a single record. Missing required
/// record fields are reported with their full path, e.g. `entries[1].company`.
fn render_record(
    body: &str,
    record: &Record,
    list_field: &str,
    index: usize,
    out: &mut String,
) -> Result<(), RenderError> {
    let mut rest = body;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let end = after
            .find(CLOSE)
            .ok_or(RenderError::UnterminatedPlaceholder)?;
        let token = after[..end].trim();

        if token.starts_with('#') {
            return Err(RenderError::NestedBlock {
                field: list_field.to_string(),
            });
        }

        let (field, optional) = parse_token(token);
        match record.get(field) {
            Some(value) => out.push_str(value),
            None if optional => {}
            None => {
                return Err(RenderError::MissingField {
                    field: format!("{list_field}[{index}].{field}"),
                });
            }
        }
        rest = &after[end + CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(())
}

fn parse_token(token: &str) -> (&str, bool) {
    match token.strip_suffix('?') {
        Some(field) => (field.trim_end(), true),
        None => (token, false),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_text(pairs: &[(&str, &str)]) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        for (name, value) in pairs {
            ctx.insert_raw(name, (*value).to_string());
        }
        ctx
    }

    #[test]
    fn test_render_substitutes_scalars() {
        let ctx = ctx_with_text(&[("name", "Ada Lovelace"), ("email", "ada@example.com")]);
        let out = render("Hello {{name}} <{{email}}>", &ctx).unwrap();
        assert_eq!(out, "Hello Ada Lovelace <ada@example.com>");
    }

    #[test]
    fn test_render_missing_required_names_the_field() {
        let ctx = ctx_with_text(&[("name", "Ada")]);
        let err = render("{{name}} {{email}}", &ctx).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                field: "email".to_string()
            }
        );
    }

    #[test]
    fn test_render_missing_optional_is_empty() {
        let ctx = ctx_with_text(&[("name", "Ada")]);
        let out = render("{{name}}{{middle?}} done", &ctx).unwrap();
        assert_eq!(out, "Ada done");
    }

    #[test]
    fn test_render_each_block_repeats_per_record() {
        let mut ctx = TemplateContext::new();
        let mut first = Record::new();
        first.insert("company", "Acme");
        first.insert("role", "Engineer");
        let mut second = Record::new();
        second.insert("company", "Globex");
        second.insert("role", "Lead");
        ctx.insert_records("entries", vec![first, second]);

        let out = render("{{#each entries}}{{role}} @ {{company}}; {{/each}}", &ctx).unwrap();
        assert_eq!(out, "Engineer @ Acme; Lead @ Globex; ");
    }

    #[test]
    fn test_render_each_missing_record_field_has_indexed_path() {
        let mut ctx = TemplateContext::new();
        let mut first = Record::new();
        first.insert("company", "Acme");
        first.insert("role", "Engineer");
        let mut second = Record::new();
        second.insert("company", "Globex");
        ctx.insert_records("entries", vec![first, second]);

        let err = render("{{#each entries}}{{role}}{{/each}}", &ctx).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                field: "entries[1].role".to_string()
            }
        );
    }

    #[test]
    fn test_render_each_optional_record_field() {
        let mut ctx = TemplateContext::new();
        let mut record = Record::new();
        record.insert("role", "Engineer");
        ctx.insert_records("entries", vec![record]);

        let out = render("{{#each entries}}{{role}}{{dates?}}{{/each}}", &ctx).unwrap();
        assert_eq!(out, "Engineer");
    }

    #[test]
    fn test_render_empty_list_renders_nothing() {
        let mut ctx = TemplateContext::new();
        ctx.insert_records("entries", vec![]);
        let out = render("a{{#each entries}}X{{/each}}b", &ctx).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_render_unclosed_block_is_an_error() {
        let mut ctx = TemplateContext::new();
        ctx.insert_records("entries", vec![]);
        let err = render("{{#each entries}}body", &ctx).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnclosedBlock {
                field: "entries".to_string()
            }
        );
    }

    #[test]
    fn test_render_stray_close_is_an_error() {
        let ctx = TemplateContext::new();
        let err = render("text {{/each}}", &ctx).unwrap_err();
        assert_eq!(err, RenderError::StrayBlockClose);
    }

    #[test]
    fn test_render_unterminated_marker_is_an_error() {
        let ctx = ctx_with_text(&[("name", "Ada")]);
        let err = render("{{name", &ctx).unwrap_err();
        assert_eq!(err, RenderError::UnterminatedPlaceholder);
    }

    #[test]
    fn test_render_shape_mismatch_scalar_used_as_list() {
        let ctx = ctx_with_text(&[("entries", "not a list")]);
        let err = render("{{#each entries}}x{{/each}}", &ctx).unwrap_err();
        assert!(matches!(err, RenderError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_render_leaves_single_braces_alone() {
        let ctx = ctx_with_text(&[("name", "Ada")]);
        let out = render("{\\bfseries {{name}}}", &ctx).unwrap();
        assert_eq!(out, "{\\bfseries Ada}");
    }
}

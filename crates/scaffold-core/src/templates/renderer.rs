//! Field-action template renderer.
//!
//! Template files use Go `text/template` field actions: `{{.Module}}`, with
//! optional spaces inside the braces and the `{{- ` / ` -}}` trim markers.
//! Nothing else between `{{` and `}}` is accepted: helpers, pipelines,
//! conditionals and comments are syntax errors. Text outside actions is
//! copied byte for byte, backslashes included.
//!
//! ## Usage
//!
//! ```
//! use scaffold_core::templates::renderer::render;
//!
//! let data = serde_json::json!({ "Module": "github.com/acme/blog" });
//! let output = render("go.mod", "module {{.Module}}", &data).unwrap();
//! assert_eq!(output, "module github.com/acme/blog");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Result, ScaffoldError};

/// One field action, anchored at the start of the haystack.
static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{(-[ \t\r\n])?[ \t\r\n]*\.([A-Za-z_][A-Za-z0-9_]*)[ \t\r\n]*([ \t\r\n]-)?\}\}")
        .expect("valid action regex")
});

/// Characters removed next to a trim marker.
const TRIM_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Field { field: &'a str, line: usize },
}

/// Render `template` against the string fields of `data`.
///
/// `name` identifies the template in error messages. The whole template is
/// parsed before anything is substituted: malformed actions become
/// [`ScaffoldError::TemplateParse`], fields missing from `data` become
/// [`ScaffoldError::TemplateRender`].
pub fn render(name: &str, template: &str, data: &Value) -> Result<String> {
    let pieces = parse(name, template)?;

    let mut output = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Text(text) => output.push_str(text),
            Piece::Field { field, line } => {
                let value = data.get(field).and_then(Value::as_str).ok_or_else(|| {
                    ScaffoldError::TemplateRender {
                        name: name.to_string(),
                        message: format!("line {line}: no field named `{field}`"),
                    }
                })?;
                output.push_str(value);
            }
        }
    }
    Ok(output)
}

fn parse<'a>(name: &str, template: &'a str) -> Result<Vec<Piece<'a>>> {
    let mut pieces = Vec::new();
    let mut offset = 0;
    let mut trim_next = false;

    while let Some(found) = template[offset..].find("{{") {
        let start = offset + found;
        let caps = ACTION
            .captures(&template[start..])
            .ok_or_else(|| syntax_error(name, template, start))?;

        let mut text = &template[offset..start];
        if trim_next {
            text = text.trim_start_matches(TRIM_CHARS);
        }
        if caps.get(1).is_some() {
            text = text.trim_end_matches(TRIM_CHARS);
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        let field = caps.get(2).map_or("", |m| m.as_str());
        pieces.push(Piece::Field {
            field,
            line: line_at(template, start),
        });

        trim_next = caps.get(3).is_some();
        offset = start + caps.get(0).map_or(2, |m| m.end());
    }

    let mut tail = &template[offset..];
    if trim_next {
        tail = tail.trim_start_matches(TRIM_CHARS);
    }
    if !tail.is_empty() {
        pieces.push(Piece::Text(tail));
    }
    Ok(pieces)
}

fn syntax_error(name: &str, template: &str, start: usize) -> ScaffoldError {
    let line = line_at(template, start);
    let message = match template[start + 2..].find("}}") {
        Some(close) => format!(
            "line {line}: unsupported action `{}`",
            &template[start..start + 2 + close + 2]
        ),
        None => format!("line {line}: unclosed action"),
    };
    ScaffoldError::TemplateParse {
        name: name.to_string(),
        message,
    }
}

fn line_at(template: &str, offset: usize) -> usize {
    template[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn data() -> Value {
        json!({
            "BinFile": "blog",
            "Module": "github.com/acme/blog",
            "EnvironmentVariablesPrefix": "APP",
        })
    }

    fn render_ok(template: &str) -> String {
        render("test", template, &data()).unwrap()
    }

    #[test]
    fn test_render_substitutes_all_fields() {
        let out = render_ok(
            "BIN={{.BinFile}}\nMOD={{.Module}}\nENV={{.EnvironmentVariablesPrefix}}_PORT\n",
        );
        assert_eq!(out, "BIN=blog\nMOD=github.com/acme/blog\nENV=APP_PORT\n");
    }

    #[test]
    fn test_render_allows_spaces_inside_action() {
        assert_eq!(render_ok("module {{ .Module }}\n"), "module github.com/acme/blog\n");
        assert_eq!(render_ok("{{\t.BinFile\t}}"), "blog");
    }

    #[test]
    fn test_render_trim_markers() {
        assert_eq!(render_ok("a  \n {{- .BinFile}}"), "ablog");
        assert_eq!(render_ok("{{.BinFile -}} \n\t b"), "blogb");
        assert_eq!(render_ok("x {{- .BinFile -}} y"), "xblogy");
        // Only the adjacent text is trimmed, not substituted values.
        assert_eq!(render_ok("{{.BinFile}} {{- .BinFile}}"), "blogblog");
    }

    #[test]
    fn test_render_does_not_escape() {
        let out = render("t", "{{.Module}}", &json!({ "Module": "a<b>&\"c\"=d" })).unwrap();
        assert_eq!(out, "a<b>&\"c\"=d");
    }

    #[test]
    fn test_render_keeps_backslashes_before_actions() {
        assert_eq!(
            render_ok("x := \"\\\\{{.BinFile}}\"\ny := \\{{.Module}}\n"),
            "x := \"\\\\blog\"\ny := \\github.com/acme/blog\n"
        );
    }

    #[test]
    fn test_render_without_actions_is_identity() {
        let src = "package main\n\nfunc main() { m := map[string]int{}; _ = m }\n}} stray\n";
        assert_eq!(render_ok(src), src);
    }

    #[test]
    fn test_render_unknown_field_fails() {
        let err = render("README.md", "# {{.ProjectName}}", &data()).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateRender { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn test_render_fields_are_case_sensitive() {
        let err = render("t", "{{.module}}", &data()).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateRender { .. }));
    }

    #[test]
    fn test_render_rejects_non_field_actions() {
        for template in [
            "{{Module}}",
            "{{if .Module}}x{{end}}",
            "{{log .Module}}",
            "{{~.Module~}}",
            "{{.Module | printf \"%q\"}}",
            "{{/* note */}}",
            "{{-.Module}}",
            "re := `\\{{2}`, `}}`",
        ] {
            let err = render("t", template, &data()).unwrap_err();
            assert!(
                matches!(err, ScaffoldError::TemplateParse { .. }),
                "{template:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_render_unclosed_action_fails() {
        let err = render("go.mod", "module github.com/x\n\nrequire {{.Module", &data()).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateParse { ref name, ref message }
            if name == "go.mod" && message == "line 3: unclosed action"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_render_parses_before_substituting() {
        let err = render("t", "{{.Unknown}} then {{broken", &data()).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateParse { .. }));
    }
}

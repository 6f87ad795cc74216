//! `{{ placeholder }}` substitution.

use crate::error::RenderError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{ name }}` in `text` with `lookup(name)`.
///
/// `template` only labels errors.
pub(crate) fn render(
    template: &str,
    text: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(RenderError::UnclosedPlaceholder {
                template: template.to_string(),
                offset: consumed + start,
            });
        };

        let name = after_open[..end].trim();
        let value = lookup(name).ok_or_else(|| RenderError::UnknownPlaceholder {
            template: template.to_string(),
            name: name.to_string(),
        })?;
        out.push_str(&value);

        let advance = start + OPEN.len() + end + CLOSE.len();
        consumed += advance;
        rest = &rest[advance..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "file.name" => Some("invoice.proto".to_string()),
            "empty" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("t", "no placeholders } { here", lookup).unwrap(), "no placeholders } { here");
    }

    #[test]
    fn test_substitutes_with_whitespace() {
        let out = render("t", "// {{file.name}} / {{ file.name }}{{empty}}!", lookup).unwrap();
        assert_eq!(out, "// invoice.proto / invoice.proto!");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = render("svc.go.tmpl", "x {{ nope }}", lookup).unwrap_err();
        assert_eq!(err.to_string(), "svc.go.tmpl: unknown placeholder 'nope'");
    }

    #[test]
    fn test_unclosed_placeholder_reports_offset() {
        let err = render("t", "{{file.name}} and {{ file.name", lookup).unwrap_err();
        match err {
            RenderError::UnclosedPlaceholder { offset, .. } => assert_eq!(offset, 18),
            other => panic!("unexpected error: {other}"),
        }
    }
}

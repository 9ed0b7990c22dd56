/// URI template scanning.
///
/// A light validation of RFC 6570 level-3 templates: balanced expression
/// braces, no square brackets, operator and variable-name shape inside
/// each expression. Violations are warnings; the template is always kept
/// as written. Also extracts expression variable names for the
/// parameter/URI cross-check.

use crate::diagnostics::{Report, WarningCode};
use crate::patterns::patterns;
use crate::span::CharRange;

const OPERATORS: &[char] = &['+', '#', '.', '/', ';', '?', '&'];

/// Validate a URI template, appending `URIWarning`s against `ranges`.
pub(crate) fn check_template(template: &str, ranges: &[CharRange], report: &mut Report) {
    if template.contains('[') || template.contains(']') {
        report.warn(
            WarningCode::Uri,
            format!("URI template '{template}' contains square brackets"),
            ranges.to_vec(),
        );
    }

    let mut depth = 0i32;
    for ch in template.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth > 1 || depth < 0 {
            report.warn(
                WarningCode::Uri,
                format!("URI template '{template}' has unbalanced expression braces"),
                ranges.to_vec(),
            );
            return;
        }
    }
    if depth != 0 {
        report.warn(
            WarningCode::Uri,
            format!("URI template '{template}' has an unclosed expression"),
            ranges.to_vec(),
        );
        return;
    }

    for capture in patterns().uri_expression.captures_iter(template) {
        let expression = &capture[1];
        if !expression_is_valid(expression) {
            report.warn(
                WarningCode::Uri,
                format!("invalid URI template expression '{{{expression}}}'"),
                ranges.to_vec(),
            );
        }
    }
}

fn expression_is_valid(expression: &str) -> bool {
    let mut rest = expression;
    if let Some(first) = rest.chars().next() {
        if OPERATORS.contains(&first) {
            rest = &rest[first.len_utf8()..];
        }
    } else {
        return false;
    }

    rest.split(',').all(varspec_is_valid)
}

fn varspec_is_valid(varspec: &str) -> bool {
    let name = varspec
        .strip_suffix('*')
        .unwrap_or(varspec)
        .split(':')
        .next()
        .unwrap_or("");
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '%' | '.' | '-'))
}

/// The variable names used by a template's expressions, in order.
pub(crate) fn template_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    for capture in patterns().uri_expression.captures_iter(template) {
        let mut expression = &capture[1];
        if let Some(first) = expression.chars().next() {
            if OPERATORS.contains(&first) {
                expression = &expression[first.len_utf8()..];
            }
        }
        for varspec in expression.split(',') {
            let name = varspec
                .trim()
                .strip_suffix('*')
                .unwrap_or(varspec.trim())
                .split(':')
                .next()
                .unwrap_or("")
                .to_string();
            if !name.is_empty() {
                variables.push(name);
            }
        }
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_cover_operators_and_modifiers() {
        assert_eq!(
            template_variables("/r/{id}{?limit,offset*}{&page:2}"),
            vec!["id", "limit", "offset", "page"]
        );
    }

    #[test]
    fn whitespace_in_expression_warns() {
        let mut report = Report::new();
        check_template("/id{? limit}", &[], &mut report);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, WarningCode::Uri);
    }

    #[test]
    fn clean_template_stays_silent() {
        let mut report = Report::new();
        check_template("/resource/{id}{?limit}", &[], &mut report);
        assert!(report.warnings.is_empty());
    }
}

use crate::emitter::Emitter;
use crate::error::EmitError;
use as3ts_ast::NodeIndex;

/// Template literal body for an XML literal. Backticks are escaped and every
/// top-level `{expr}` becomes an interpolation. `None` when braces don't
/// pair up.
fn template_body(literal: &str) -> Option<String> {
    let mut body = String::with_capacity(literal.len() + 8);
    let mut depth = 0u32;
    for c in literal.chars() {
        match c {
            '`' => body.push_str("\\`"),
            '{' => {
                if depth == 0 {
                    body.push('$');
                }
                depth += 1;
                body.push(c);
            }
            '}' => {
                depth = depth.checked_sub(1)?;
                body.push(c);
            }
            _ => body.push(c),
        }
    }
    (depth == 0).then_some(body)
}

/// `<a>{v}</a>` becomes ``new XML(`<a>${v}</a>`)``.
pub(super) fn emit_xml_literal(emitter: &mut Emitter<'_>, shim: &str, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let literal = emitter.required_text(node)?;
    let body = template_body(literal)
        .ok_or_else(|| emitter.malformed(node, "unbalanced braces in XML literal"))?;

    emitter.ensure_import("XML", Some(shim), false)?;
    emitter.catchup(tree.start(node))?;
    emitter.insert(&format!("new XML(`{body}`)"));
    emitter.skip_to(tree.end(node))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_body_interpolates_top_level_braces() {
        assert_eq!(
            template_body("<a id={id}>{f({x: 1})}</a>").as_deref(),
            Some("<a id=${id}>${f({x: 1})}</a>")
        );
    }

    #[test]
    fn test_template_body_escapes_backticks() {
        assert_eq!(template_body("<a>`</a>").as_deref(), Some("<a>\\`</a>"));
    }

    #[test]
    fn test_template_body_rejects_unbalanced_braces() {
        assert_eq!(template_body("<a>}{</a>"), None);
        assert_eq!(template_body("<a>{</a>"), None);
    }
}

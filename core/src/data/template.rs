//! Template registry and resolver.
//!
//! Templates are lexically scoped: the walker pushes a scope on every node
//! descent and pops it on return, so a template is visible to the node that
//! declares it and that node's descendants, never to ancestors or unrelated
//! subtrees. Lookup searches innermost scope first.
//!
//! Resolution clones the template body and runs strict `$`-substitution
//! over every attribute value in the copy:
//!
//! - `${key}` and `$key` are replaced by the preset attribute `key`
//! - `$$` is a literal `$`
//! - anything else after `$` is an error
//!
//! Replacement text is never re-scanned.

use std::collections::HashMap;

use tracing::debug;

use crate::data::node::Node;
use crate::error::{LayoutError, Result};


/// A named, reusable layout subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub body: Node,
}

impl Template {
    /// Build from a `<template name="..">` node with exactly one child.
    pub fn from_node(node: &Node) -> Result<Template> {
        let name = node
            .get("name")
            .ok_or_else(|| LayoutError::MissingAttribute {
                tag: node.tag.clone(),
                attribute: "name".into(),
            })?
            .to_string();
        match node.children.as_slice() {
            [body] => Ok(Template {
                name,
                body: body.clone(),
            }),
            [] => Err(LayoutError::InvalidTemplate {
                name,
                reason: "template has no body element".into(),
            }),
            more => Err(LayoutError::InvalidTemplate {
                name,
                reason: format!("template must have exactly one body element, found {}", more.len()),
            }),
        }
    }

    /// Deep-copy the body and substitute placeholders from `vars`.
    pub fn resolve(&self, vars: &[(String, String)]) -> Result<Node> {
        let mut resolved = self.body.clone();
        resolved.try_for_each_mut(&mut |node: &mut Node| {
            for (_, value) in node.attributes.iter_mut() {
                *value = substitute(value.as_str(), vars)?;
            }
            Ok(())
        })?;
        Ok(resolved)
    }
}


/// Chain of template scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    scopes: Vec<HashMap<String, Template>>,
    /// Names of the presets currently being expanded, outermost first.
    expanding: Vec<String>,
}

impl TemplateRegistry {
    pub fn new() -> TemplateRegistry {
        TemplateRegistry::default()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Store a template in the innermost scope, replacing a same-named
    /// template of that scope only.
    pub fn declare(&mut self, template: Template) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        debug!(name = %template.name, depth = self.scopes.len(), "declare template");
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(template.name.clone(), template);
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Template> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| LayoutError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    /// Mark `name` as being expanded. Fails if it already is, since the
    /// expansion would never terminate.
    pub fn begin_expansion(&mut self, name: &str) -> Result<()> {
        if self.expanding.iter().any(|n| n == name) {
            let mut chain = self.expanding.clone();
            chain.push(name.to_string());
            return Err(LayoutError::InvalidTemplate {
                name: name.to_string(),
                reason: format!("recursive preset ({})", chain.join(" -> ")),
            });
        }
        self.expanding.push(name.to_string());
        Ok(())
    }

    pub fn end_expansion(&mut self) {
        self.expanding.pop();
    }
}


/// Strict `$`-substitution of `value` against `vars`.
pub fn substitute(value: &str, vars: &[(String, String)]) -> Result<String> {
    let invalid = || LayoutError::InvalidPlaceholder {
        value: value.to_string(),
    };

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        let (key, tail) = if let Some(inner) = after.strip_prefix('{') {
            let len = identifier_len(inner);
            if len == 0 || !inner[len..].starts_with('}') {
                return Err(invalid());
            }
            (&inner[..len], &inner[len + 1..])
        } else {
            let len = identifier_len(after);
            if len == 0 {
                return Err(invalid());
            }
            (&after[..len], &after[len..])
        };

        let replacement = vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| LayoutError::UndefinedPlaceholder {
                key: key.to_string(),
            })?;
        out.push_str(replacement);
        rest = tail;
    }
    out.push_str(rest);
    Ok(out)
}


/// Byte length of the ASCII identifier (`[_A-Za-z][_A-Za-z0-9]*`) at the
/// start of `s`.
fn identifier_len(s: &str) -> usize {
    s.bytes()
        .enumerate()
        .take_while(|&(i, b)| b == b'_' || b.is_ascii_alphabetic() || (i > 0 && b.is_ascii_digit()))
        .count()
}

//! Tree walker — turns an attributed `Node` tree into an `Action` tree.
//!
//! Every node descent opens a template scope. The node's `<template>`
//! children are declared into that scope first, then the remaining children
//! are walked depth-first, left to right (this order is the pane creation
//! order), and only then is the node itself interpreted.

use tracing::debug;

use crate::data::cmdline;
use crate::data::node::Node;
use crate::data::template::{Template, TemplateRegistry};
use crate::error::{LayoutError, Result};
use crate::types::action::{
    Action, Layout, LayoutDirection, LayoutTab, Pane, PaneGroup, TabColor, Window,
};


pub const TEMPLATE_TAG: &str = "template";


/// The closed set of tags a layout document may use (besides `template`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Window,
    Tab,
    Group(LayoutDirection),
    Pane,
    Preset,
}

impl Tag {
    fn parse(tag: &str) -> Result<Tag> {
        match tag {
            "window" => Ok(Tag::Window),
            "tab" => Ok(Tag::Tab),
            "row" => Ok(Tag::Group(LayoutDirection::Row)),
            "column" => Ok(Tag::Group(LayoutDirection::Column)),
            "pane" => Ok(Tag::Pane),
            "preset" => Ok(Tag::Preset),
            other => Err(LayoutError::UnknownTag {
                tag: other.to_string(),
            }),
        }
    }
}


/// Walk `node` in a fresh child scope of `registry`.
pub fn walk(node: &Node, registry: &mut TemplateRegistry) -> Result<Action> {
    registry.push_scope();
    let result = walk_in_scope(node, registry);
    registry.pop_scope();
    result
}


fn walk_in_scope(node: &Node, registry: &mut TemplateRegistry) -> Result<Action> {
    let tag = Tag::parse(&node.tag)?;

    for child in node.children.iter().filter(|c| c.tag == TEMPLATE_TAG) {
        registry.declare(Template::from_node(child)?);
    }

    let children = node
        .children
        .iter()
        .filter(|c| c.tag != TEMPLATE_TAG)
        .map(|c| walk(c, registry))
        .collect::<Result<Vec<Action>>>()?;

    debug!(tag = %node.tag, children = children.len(), depth = registry.depth(), "walk");

    match tag {
        Tag::Window => window(children),
        Tag::Tab => tab(children),
        Tag::Group(direction) => group(node, direction, children),
        Tag::Pane => {
            reject_children(node, &children)?;
            pane(node).map(Action::Pane)
        }
        Tag::Preset => {
            reject_children(node, &children)?;
            preset(node, registry)
        }
    }
}


fn window(children: Vec<Action>) -> Result<Action> {
    let tabs = children
        .into_iter()
        .map(|child| match child {
            Action::Tab(t) => Ok(t),
            other => Err(LayoutError::InvalidStructure(format!(
                "<window> children must be tabs, found <{}>",
                other.kind()
            ))),
        })
        .collect::<Result<Vec<LayoutTab>>>()?;
    Ok(Action::Window(Window::new(tabs)?))
}


fn tab(children: Vec<Action>) -> Result<Action> {
    let mut children = children.into_iter();
    let pane = match (children.next(), children.next()) {
        (None, _) => Layout::default(),
        (Some(only), None) => only.into_layout()?,
        (Some(_), Some(_)) => {
            return Err(LayoutError::InvalidStructure(
                "<tab> must contain at most one pane or pane group".into(),
            ))
        }
    };
    Ok(Action::Tab(LayoutTab { pane }))
}


fn group(node: &Node, direction: LayoutDirection, children: Vec<Action>) -> Result<Action> {
    let panes = children
        .into_iter()
        .map(Action::into_layout)
        .collect::<Result<Vec<Layout>>>()?;
    let weights = match node.get_non_empty("weights") {
        Some(raw) => parse_weights(raw)?,
        None => None,
    };
    Ok(Action::Group(PaneGroup::new(direction, panes, weights)?))
}


/// Parse a whitespace-separated list of numbers. A blank list means no
/// weights.
pub fn parse_weights(raw: &str) -> Result<Option<Vec<f64>>> {
    let weights = raw
        .split_whitespace()
        .map(|w| {
            w.parse::<f64>().map_err(|_| LayoutError::MalformedWeights {
                reason: format!("'{}' is not a number", w),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok((!weights.is_empty()).then_some(weights))
}


fn pane(node: &Node) -> Result<Pane> {
    let text = |key: &str| node.get_non_empty(key).map(str::to_string);

    let process = match node.get_non_empty("process") {
        Some(raw) => Some(cmdline::split(raw).ok_or_else(|| LayoutError::InvalidAttribute {
            tag: node.tag.clone(),
            attribute: "process".into(),
            value: raw.to_string(),
        })?),
        None => None,
    };

    let tab_color = match node.get_non_empty("tabColor") {
        Some(raw) => Some(TabColor::parse(raw).ok_or_else(|| LayoutError::InvalidAttribute {
            tag: node.tag.clone(),
            attribute: "tabColor".into(),
            value: raw.to_string(),
        })?),
        None => None,
    };

    Ok(Pane {
        title: text("title"),
        starting_directory: text("directory"),
        profile: text("profile"),
        process,
        tab_color,
    })
}


/// Resolve the named template against this node's attributes and walk the
/// result in the current scope, so nested presets still see outer templates.
/// A preset that reaches itself again is an error.
fn preset(node: &Node, registry: &mut TemplateRegistry) -> Result<Action> {
    let name = node.get("name").ok_or_else(|| LayoutError::MissingAttribute {
        tag: node.tag.clone(),
        attribute: "name".into(),
    })?;
    let resolved = registry.lookup(name)?.resolve(&node.attributes)?;
    debug!(preset = name, body = %resolved.tag, "resolved preset");
    registry.begin_expansion(name)?;
    let result = walk(&resolved, registry);
    registry.end_expansion();
    result
}


fn reject_children(node: &Node, children: &[Action]) -> Result<()> {
    match children.first() {
        None => Ok(()),
        Some(child) => Err(LayoutError::InvalidStructure(format!(
            "<{}> cannot contain <{}>",
            node.tag,
            child.kind()
        ))),
    }
}

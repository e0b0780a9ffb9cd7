//! Static analysis over the annotated template tree.
//!
//! Walks the tree and detects sub-trees that are purely static, i.e. parts of
//! the output that never change across re-renders. Static roots are later
//! hoisted into constants by codegen and skipped during patching. This phase
//! cannot fail: anything it cannot prove static is conservatively left
//! dynamic.

use crate::ast::{ElementNode, Node, NodeId, Template};
use crate::options::CompilerOptions;

/// Two passes: mark every node static/dynamic, then promote qualifying
/// static sub-trees to hoistable roots.
pub fn optimize(template: &mut Template, options: &CompilerOptions) {
    let root = match template.root {
        Some(root) => root,
        None => return,
    };
    mark_static(template, root, options);
    mark_static_roots(template, root, false);
}

fn with_element<F: FnOnce(&mut ElementNode)>(t: &mut Template, id: NodeId, f: F) {
    if let Node::Element(el) = t.node_mut(id) {
        f(el);
    }
}

/// Staticness of any node. Text and comment staticness is intrinsic;
/// elements carry the analyzed flag.
fn node_static(t: &Template, id: NodeId) -> bool {
    match t.node(id) {
        Node::Text(text) => text.expression.is_none(),
        Node::Comment(_) => true,
        Node::Element(el) => el.r#static,
    }
}

fn mark_static(t: &mut Template, id: NodeId, options: &CompilerOptions) {
    let is_static = is_static(t, id, options);
    let el = match t.node_mut(id) {
        Node::Element(el) => el,
        // text/comment staticness is intrinsic, nothing to record
        _ => return,
    };
    el.r#static = is_static;

    // Do not descend into component slot content. A parent must not freeze
    // nodes a child component has to be free to re-render, so that content
    // keeps whatever classification it gets when compiled as its own subtree.
    let reserved = (options.is_reserved_tag)(&el.tag);
    if !reserved && el.tag != "slot" && !el.attrs_map.contains_key("inline-template") {
        return;
    }

    let children = el.children.clone();
    let blocks: Vec<NodeId> = el.conditions.iter().skip(1).map(|c| c.block).collect();

    for child in children {
        mark_static(t, child, options);
        if !node_static(t, child) {
            with_element(t, id, |el| el.r#static = false);
        }
    }
    for block in blocks {
        mark_static(t, block, options);
        if !node_static(t, block) {
            with_element(t, id, |el| el.r#static = false);
        }
    }
}

fn mark_static_roots(t: &mut Template, id: NodeId, in_for: bool) {
    let el = match t.element(id) {
        Some(el) => el,
        None => return,
    };
    let has_for = el.for_binding.is_some();

    if el.r#static || el.once {
        with_element(t, id, |el| el.static_in_for = in_for);
    }

    // A static root must have children that are more than a single text
    // node, otherwise hoisting costs more than rendering it fresh.
    let el = t.element(id).expect("element checked above");
    let qualifies = el.r#static
        && !el.children.is_empty()
        && !(el.children.len() == 1 && is_text_type(t, el.children[0]));
    if qualifies {
        with_element(t, id, |el| el.static_root = true);
        return;
    }
    with_element(t, id, |el| el.static_root = false);

    let el = t.element(id).expect("element checked above");
    let children = el.children.clone();
    let blocks: Vec<NodeId> = el.conditions.iter().skip(1).map(|c| c.block).collect();

    for child in children {
        mark_static_roots(t, child, in_for || has_for);
    }
    for block in blocks {
        mark_static_roots(t, block, in_for);
    }
}

fn is_text_type(t: &Template, id: NodeId) -> bool {
    matches!(t.node(id), Node::Text(_) | Node::Comment(_))
}

fn is_static(t: &Template, id: NodeId, options: &CompilerOptions) -> bool {
    let el = match t.node(id) {
        Node::Text(text) => return text.expression.is_none(),
        Node::Comment(_) => return true,
        Node::Element(el) => el,
    };
    el.pre
        || (!el.has_bindings
            && el.if_expr.is_none()
            && el.else_if_expr.is_none()
            && !el.is_else
            && el.for_binding.is_none()
            && !CompilerOptions::is_built_in_tag(&el.tag)
            && (options.is_reserved_tag)(&el.tag)
            && !is_direct_child_of_template_for(t, id)
            && has_only_static_markup(el))
}

/// Content of a `<template v-for>` must stay dynamic even when textually
/// inert, because each iteration stamps out fresh nodes.
fn is_direct_child_of_template_for(t: &Template, id: NodeId) -> bool {
    let mut current = id;
    while let Some(parent) = t.parent(current) {
        let el = match t.element(parent) {
            Some(el) => el,
            None => return false,
        };
        if el.tag != "template" {
            return false;
        }
        if el.for_binding.is_some() {
            return true;
        }
        current = parent;
    }
    false
}

/// The typed counterpart of the original allow-listed static-key check: the
/// element qualifies only if it carries no field that implies dynamic
/// behavior at render time.
fn has_only_static_markup(el: &ElementNode) -> bool {
    el.events.is_empty()
        && el.native_events.is_empty()
        && el.props.is_empty()
        && el.dynamic_attrs.is_empty()
        && el.directives.is_empty()
        && el.key.is_none()
        && el.ref_expr.is_none()
        && el.slot_target.is_none()
        && el.slot_scope.is_none()
        && el.scoped_slots.is_empty()
        && el.component.is_none()
        && el.model.is_none()
        && !el.inline_template
        && !el.once
        && el.class_binding.is_none()
        && el.style_binding.is_none()
}

//! Directive pre-pass and the built-in directive generators.
//!
//! Registered directive generators run exactly once per node, before the
//! structural walk, so the tree is read-only while code is being emitted.
//! A generator may mutate its element (converting the directive into plain
//! bindings) and reports whether a runtime counterpart is still needed.

use crate::ast::{BindWrap, Directive, ElementNode, Node, NodeId, Template};
use crate::options::{CompilerOptions, DirectiveGen, WarnSink};
use std::collections::HashMap;

/// Run every registered directive generator over the arena. Guarded by the
/// per-node `processed` flag so nested compiles never re-run generators.
pub fn apply_directives(template: &mut Template, options: &CompilerOptions) {
    for index in 0..template.nodes.len() {
        let id = NodeId(index as u32);
        let dirs = match template.node(id) {
            Node::Element(el) if !el.processed => el.directives.clone(),
            _ => continue,
        };
        if let Node::Element(el) = template.node_mut(id) {
            el.processed = true;
        }
        for (i, dir) in dirs.iter().enumerate() {
            let needs_runtime = match options.directives.get(&dir.name) {
                Some(gen) => match template.node_mut(id) {
                    Node::Element(el) => gen.compile(el, dir, &*options.warn),
                    _ => true,
                },
                // no compile-time handler: the directive is runtime-only
                None => true,
            };
            if let Node::Element(el) = template.node_mut(id) {
                if let Some(d) = el.directives.get_mut(i) {
                    d.needs_runtime = needs_runtime;
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILT-IN DIRECTIVES
// ═══════════════════════════════════════════════════════════════════════════════

/// Object form of `v-on`: merges a listeners object into the data wrap.
struct OnDirective;

impl DirectiveGen for OnDirective {
    fn compile(&self, el: &mut ElementNode, dir: &Directive, warn: &WarnSink) -> bool {
        if !dir.modifiers.is_empty() {
            warn(
                "v-on without argument does not support modifiers.",
                Some(&dir.loc),
                false,
            );
        }
        if let Some(value) = &dir.value {
            el.wrap_listeners = Some(value.clone());
        }
        false
    }
}

/// Object form of `v-bind`: merges a props object into the data wrap.
struct BindDirective;

impl DirectiveGen for BindDirective {
    fn compile(&self, el: &mut ElementNode, dir: &Directive, _warn: &WarnSink) -> bool {
        if let Some(value) = &dir.value {
            el.wrap_data = Some(BindWrap {
                value: value.clone(),
                prop: dir.modifiers.iter().any(|m| m == "prop"),
                sync: dir.modifiers.iter().any(|m| m == "sync"),
            });
        }
        false
    }
}

/// `v-cloak` is a pure runtime marker, nothing to compile.
struct CloakDirective;

impl DirectiveGen for CloakDirective {
    fn compile(&self, _el: &mut ElementNode, _dir: &Directive, _warn: &WarnSink) -> bool {
        false
    }
}

pub fn base_directives() -> HashMap<String, Box<dyn DirectiveGen>> {
    let mut map: HashMap<String, Box<dyn DirectiveGen>> = HashMap::new();
    map.insert("on".to_string(), Box::new(OnDirective));
    map.insert("bind".to_string(), Box::new(BindDirective));
    map.insert("cloak".to_string(), Box::new(CloakDirective));
    map
}

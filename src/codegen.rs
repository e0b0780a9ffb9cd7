//! Code generation over the analyzed template tree.
//!
//! Walks the arena and emits the render-function body as source text: one
//! intrinsic-call expression per node, with conditionals as ternary chains,
//! loops as iteration calls, and static roots hoisted into a side list of
//! standalone render bodies. The tree is read-only here; per-node dispatch
//! progress lives in the compile state so re-entrant paths (once wrapping a
//! conditional, hoisting re-entering the plain path) terminate.

use crate::ast::{
    Attr, Directive, ElementNode, IfCondition, Node, NodeId, SourceLocation, Template,
    EMPTY_SLOT_SCOPE_TOKEN,
};
use crate::directives::apply_directives;
use crate::events::gen_handlers;
use crate::options::CompilerOptions;
use bitflags::bitflags;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref CAMELIZE_RE: Regex = Regex::new(r"-(\w)").expect("valid camelize regex");
}

bitflags! {
    /// Which transformations already ran for a node during this compile.
    /// Guards against re-entering the same transformation when the
    /// dispatcher revisits a node through a different path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Processed: u8 {
        const STATIC = 1 << 0;
        const ONCE = 1 << 1;
        const FOR = 1 << 2;
        const IF = 1 << 3;
    }
}

/// Result record handed to the consumer: the dynamic render body plus one
/// body per hoisted static root, in hoist order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenResult {
    pub render: String,
    pub static_render_fns: Vec<String>,
}

/// Mutable per-compile accumulator. Nested compiles (inline templates) get a
/// fresh state and share only the immutable options.
pub struct CodegenState<'a> {
    pub options: &'a CompilerOptions,
    once_id: u32,
    pub static_render_fns: Vec<String>,
    /// True while generating inside a hoisted `v-pre` subtree.
    pre: bool,
    processed: Vec<Processed>,
}

type GenFn = fn(&Template, NodeId, &mut CodegenState) -> String;

impl<'a> CodegenState<'a> {
    pub fn new(template: &Template, options: &'a CompilerOptions) -> Self {
        CodegenState {
            options,
            once_id: 0,
            static_render_fns: Vec::new(),
            pre: false,
            processed: vec![Processed::empty(); template.nodes.len()],
        }
    }

    fn mark(&mut self, id: NodeId, flag: Processed) {
        self.processed[id.index()].insert(flag);
    }

    fn is_marked(&self, id: NodeId, flag: Processed) -> bool {
        self.processed[id.index()].contains(flag)
    }

    fn warn(&self, msg: &str, loc: Option<&SourceLocation>, is_tip: bool) {
        (self.options.warn)(msg, loc, is_tip);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the directive pre-pass, then emit the render sources for the whole
/// template. Never fails; anomalies degrade to conservative output plus a
/// diagnostic through the options' warn sink.
pub fn generate(template: &mut Template, options: &CompilerOptions) -> CodegenResult {
    apply_directives(template, options);
    generate_from(template, template.root, options)
}

/// Emission for one (sub)tree with a fresh state. Used for the top-level
/// compile and recursively for inline-template compiles.
fn generate_from(
    template: &Template,
    root: Option<NodeId>,
    options: &CompilerOptions,
) -> CodegenResult {
    let mut state = CodegenState::new(template, options);
    let code = match root {
        Some(id) => {
            // root-level <script> tags must not be rendered
            if template.element(id).map_or(false, |el| el.tag == "script") {
                "null".to_string()
            } else {
                gen_element(template, id, &mut state)
            }
        }
        None => format!("{}(\"div\")", options.intrinsics.create_element),
    };
    CodegenResult {
        render: format!("with(this){{return {}}}", code),
        static_render_fns: state.static_render_fns,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURAL DISPATCH
// ═══════════════════════════════════════════════════════════════════════════════

pub fn gen_element(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    let el = match t.element(id) {
        Some(el) => el,
        None => return gen_node(t, id, state),
    };
    let pre = effective_pre(t, id);

    if el.static_root && !state.is_marked(id, Processed::STATIC) {
        gen_static(t, id, state)
    } else if el.once && !state.is_marked(id, Processed::ONCE) {
        gen_once(t, id, state)
    } else if el.for_binding.is_some() && !state.is_marked(id, Processed::FOR) {
        gen_for(t, id, state, None)
    } else if el.if_expr.is_some() && !state.is_marked(id, Processed::IF) {
        gen_if(t, id, state, None, None)
    } else if el.tag == "template" && el.slot_target.is_none() && !state.pre {
        gen_children(t, id, state, false).unwrap_or_else(|| "void 0".to_string())
    } else if el.tag == "slot" {
        gen_slot(t, id, state)
    } else {
        // component or element
        let mut code = if let Some(component) = el.component.clone() {
            gen_component(&component, t, id, state)
        } else {
            let data = if !el.plain || (pre && state.options.maybe_component(el)) {
                Some(gen_data(t, id, state))
            } else {
                None
            };
            let children = if el.inline_template {
                None
            } else {
                gen_children(t, id, state, true)
            };
            format!(
                "{}('{}'{}{})",
                state.options.intrinsics.create_element,
                el.tag,
                data.map(|d| format!(",{}", d)).unwrap_or_default(),
                children.map(|c| format!(",{}", c)).unwrap_or_default()
            )
        };
        for module in &state.options.modules {
            code = module.transform_code(el, code);
        }
        code
    }
}

/// `v-pre` applies to the whole subtree; the effective flag is the node's
/// own or any ancestor's.
fn effective_pre(t: &Template, id: NodeId) -> bool {
    let mut current = Some(id);
    while let Some(n) = current {
        if let Some(el) = t.element(n) {
            if el.pre {
                return true;
            }
        }
        current = t.parent(n);
    }
    false
}

/// Hoist a static sub-tree out: its full render body goes onto the side
/// list, its original site becomes a cheap indexed reference.
fn gen_static(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    state.mark(id, Processed::STATIC);
    let (is_pre, static_in_for) = match t.element(id) {
        Some(el) => (el.pre, el.static_in_for),
        None => (false, false),
    };
    // Templates behave differently inside of a v-pre node. All pre nodes
    // are static roots, so this is the place to switch the mode and reset
    // it when leaving the subtree.
    let original_pre = state.pre;
    if is_pre {
        state.pre = true;
    }
    let body = gen_element(t, id, state);
    state
        .static_render_fns
        .push(format!("with(this){{return {}}}", body));
    state.pre = original_pre;
    format!(
        "{}({}{})",
        state.options.intrinsics.render_static,
        state.static_render_fns.len() - 1,
        if static_in_for { ",true" } else { "" }
    )
}

fn gen_once(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    state.mark(id, Processed::ONCE);
    let el = match t.element(id) {
        Some(el) => el,
        None => return gen_node(t, id, state),
    };
    if el.if_expr.is_some() && !state.is_marked(id, Processed::IF) {
        return gen_if(t, id, state, None, None);
    }
    if el.static_in_for {
        // memoizing per loop iteration is only sound when the enclosing
        // loop is keyed
        let loc = el.loc.clone();
        let mut key = None;
        let mut parent = t.parent(id);
        while let Some(p) = parent {
            if let Some(pel) = t.element(p) {
                if pel.for_binding.is_some() {
                    key = pel.key.clone();
                    break;
                }
            }
            parent = t.parent(p);
        }
        let key = match key {
            Some(key) => key,
            None => {
                state.warn(
                    "v-once can only be used inside v-for that is keyed. ",
                    Some(&loc),
                    false,
                );
                return gen_element(t, id, state);
            }
        };
        let code = gen_element(t, id, state);
        let once_id = state.once_id;
        state.once_id += 1;
        format!(
            "{}({},{},{})",
            state.options.intrinsics.mark_once, code, once_id, key
        )
    } else {
        gen_static(t, id, state)
    }
}

pub fn gen_if(
    t: &Template,
    id: NodeId,
    state: &mut CodegenState,
    alt_gen: Option<GenFn>,
    alt_empty: Option<&str>,
) -> String {
    state.mark(id, Processed::IF);
    let conditions: &[IfCondition] = match t.element(id) {
        Some(el) => el.conditions.as_slice(),
        None => &[],
    };
    gen_if_conditions(t, conditions, state, alt_gen, alt_empty)
}

/// Right-associative ternary chain over the condition list, consumed by
/// index in strict source order. The first entry without an expression is
/// the unconditional tail.
fn gen_if_conditions(
    t: &Template,
    conditions: &[IfCondition],
    state: &mut CodegenState,
    alt_gen: Option<GenFn>,
    alt_empty: Option<&str>,
) -> String {
    let (condition, rest) = match conditions.split_first() {
        Some(split) => split,
        None => {
            return alt_empty
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("{}()", state.options.intrinsics.create_empty))
        }
    };
    match &condition.exp {
        Some(exp) => {
            let branch = gen_ternary_exp(t, condition.block, state, alt_gen);
            let rest = gen_if_conditions(t, rest, state, alt_gen, alt_empty);
            format!("({})?{}:{}", exp, branch, rest)
        }
        None => gen_ternary_exp(t, condition.block, state, alt_gen),
    }
}

/// v-if combined with v-once should still memoize each branch, so branches
/// go through the once path when flagged.
fn gen_ternary_exp(
    t: &Template,
    id: NodeId,
    state: &mut CodegenState,
    alt_gen: Option<GenFn>,
) -> String {
    if let Some(gen) = alt_gen {
        return gen(t, id, state);
    }
    match t.element(id) {
        Some(el) if el.once => gen_once(t, id, state),
        _ => gen_element(t, id, state),
    }
}

pub fn gen_for(
    t: &Template,
    id: NodeId,
    state: &mut CodegenState,
    alt_gen: Option<GenFn>,
) -> String {
    let el = match t.element(id) {
        Some(el) => el,
        None => return gen_node(t, id, state),
    };
    let binding = match el.for_binding.clone() {
        Some(binding) => binding,
        None => return gen_element(t, id, state),
    };
    let iterator1 = binding
        .iterator1
        .as_ref()
        .map(|it| format!(",{}", it))
        .unwrap_or_default();
    let iterator2 = binding
        .iterator2
        .as_ref()
        .map(|it| format!(",{}", it))
        .unwrap_or_default();

    if state.options.maybe_component(el)
        && el.tag != "slot"
        && el.tag != "template"
        && el.key.is_none()
    {
        state.warn(
            &format!(
                "<{} v-for=\"{} in {}\">: component lists rendered with v-for should have explicit keys.",
                el.tag, binding.alias, binding.source
            ),
            Some(&el.loc),
            true,
        );
    }

    state.mark(id, Processed::FOR);
    let gen = alt_gen.unwrap_or(gen_element);
    format!(
        "{}(({}),function({}{}{}){{return {}}})",
        state.options.intrinsics.render_list,
        binding.source,
        binding.alias,
        iterator1,
        iterator2,
        gen(t, id, state)
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// DATA OBJECT
// ═══════════════════════════════════════════════════════════════════════════════

pub fn gen_data(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    let el = match t.element(id) {
        Some(el) => el,
        None => return "{}".to_string(),
    };
    let mut data = String::from("{");

    // directives first: their pre-pass may have rewritten the fields below
    if let Some(dirs) = gen_directives(el) {
        data.push_str(&dirs);
        data.push(',');
    }

    if let Some(key) = &el.key {
        data.push_str(&format!("key:{},", key));
    }
    if let Some(ref_expr) = &el.ref_expr {
        data.push_str(&format!("ref:{},", ref_expr));
    }
    if el.ref_in_for {
        data.push_str("refInFor:true,");
    }
    // v-pre applies transitively, so an inherited flag is recorded too
    if effective_pre(t, id) {
        data.push_str("pre:true,");
    }
    // record the original tag for components using the "is" attribute
    if el.component.is_some() {
        data.push_str(&format!("tag:\"{}\",", el.tag));
    }
    for module in &state.options.modules {
        data.push_str(&module.gen_data(el));
    }
    if !el.attrs.is_empty() {
        data.push_str(&format!("attrs:{},", gen_props(&el.attrs, state.options)));
    }
    if !el.props.is_empty() {
        data.push_str(&format!("domProps:{},", gen_props(&el.props, state.options)));
    }
    if !el.events.is_empty() {
        data.push_str(&format!(
            "{},",
            gen_handlers(&el.events, false, &state.options.intrinsics)
        ));
    }
    if !el.native_events.is_empty() {
        data.push_str(&format!(
            "{},",
            gen_handlers(&el.native_events, true, &state.options.intrinsics)
        ));
    }
    // only for non-scoped slots
    if let (Some(target), None) = (&el.slot_target, &el.slot_scope) {
        data.push_str(&format!("slot:{},", target));
    }
    if !el.scoped_slots.is_empty() {
        data.push_str(&format!("{},", gen_scoped_slots(t, id, state)));
    }
    if let Some(model) = &el.model {
        data.push_str(&format!(
            "model:{{value:{},callback:{},expression:{}}},",
            model.value, model.callback, model.expression
        ));
    }
    if el.inline_template {
        if let Some(inline) = gen_inline_template(t, id, state) {
            data.push_str(&format!("{},", inline));
        }
    }
    let mut data = format!("{}}}", data.trim_end_matches(','));

    // dynamically named bindings must go through the same object merge so
    // class/style/mustUseProp routing still applies at runtime
    if !el.dynamic_attrs.is_empty() {
        data = format!(
            "{}({},\"{}\",{})",
            state.options.intrinsics.bind_object_props,
            data,
            el.tag,
            gen_props(&el.dynamic_attrs, state.options)
        );
    }
    // v-bind object wrap
    if let Some(wrap) = &el.wrap_data {
        data = format!(
            "{}({},'{}',{},{}{})",
            state.options.intrinsics.bind_object_props,
            data,
            el.tag,
            wrap.value,
            wrap.prop,
            if wrap.sync { ",true" } else { "" }
        );
    }
    // v-on object wrap
    if let Some(listeners) = &el.wrap_listeners {
        data = format!(
            "{}({},{})",
            state.options.intrinsics.bind_object_listeners, data, listeners
        );
    }
    data
}

/// Emit the runtime descriptors for directives that still need a runtime
/// counterpart after the compile-time pass.
fn gen_directives(el: &ElementNode) -> Option<String> {
    let runtime: Vec<&Directive> = el.directives.iter().filter(|d| d.needs_runtime).collect();
    if runtime.is_empty() {
        return None;
    }
    let mut res = String::from("directives:[");
    for dir in runtime {
        res.push_str(&format!(
            "{{name:\"{}\",rawName:\"{}\"",
            dir.name, dir.raw_name
        ));
        if let Some(value) = &dir.value {
            res.push_str(&format!(
                ",value:({}),expression:{}",
                value,
                quote_json(value)
            ));
        }
        if let Some(arg) = &dir.arg {
            let arg = if dir.is_dynamic_arg {
                arg.clone()
            } else {
                format!("\"{}\"", arg)
            };
            res.push_str(&format!(",arg:{}", arg));
        }
        if !dir.modifiers.is_empty() {
            res.push_str(&format!(",modifiers:{}", modifiers_json(&dir.modifiers)));
        }
        res.push_str("},");
    }
    Some(format!("{}]", res.trim_end_matches(',')))
}

fn modifiers_json(modifiers: &[String]) -> String {
    let entries: Vec<String> = modifiers
        .iter()
        .map(|m| format!("{}:true", quote_json(m)))
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn gen_inline_template(t: &Template, id: NodeId, state: &mut CodegenState) -> Option<String> {
    let el = t.element(id)?;
    let first = el.children.first().copied();
    let well_formed =
        el.children.len() == 1 && first.map_or(false, |c| matches!(t.node(c), Node::Element(_)));
    if !well_formed {
        state.warn(
            "Inline-template components must have exactly one child element.",
            Some(&el.loc),
            false,
        );
    }
    let child = first?;
    if !matches!(t.node(child), Node::Element(_)) {
        return None;
    }
    let inline = generate_from(t, Some(child), state.options);
    let static_fns: Vec<String> = inline
        .static_render_fns
        .iter()
        .map(|code| format!("function(){{{}}}", code))
        .collect();
    Some(format!(
        "inlineTemplate:{{render:function(){{{}}},staticRenderFns:[{}]}}",
        inline.render,
        static_fns.join(",")
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPED SLOTS
// ═══════════════════════════════════════════════════════════════════════════════

fn gen_scoped_slots(t: &Template, host_id: NodeId, state: &mut CodegenState) -> String {
    let host = match t.element(host_id) {
        Some(el) => el,
        None => return String::new(),
    };
    // Scoped slots are considered "stable" by default, letting children
    // with only scoped slots skip forced updates from the parent. Bail out
    // of the optimization when slot content can change identity underneath.
    let mut needs_force_update = host.for_binding.is_some()
        || host.scoped_slots.iter().any(|&slot_id| {
            t.element(slot_id).map_or(false, |slot| {
                slot.slot_target_dynamic
                    || slot.if_expr.is_some()
                    || slot.for_binding.is_some()
                    || contains_slot_child(t, slot_id)
            })
        });

    // A component with scoped slots inside a conditional branch may be
    // reused with different slot content, so the content gets a key derived
    // from its own generated code.
    let mut needs_key = host.if_expr.is_some();

    // An intermediate scope variable or loop between here and the root may
    // sever reactivity tracking.
    if !needs_force_update {
        let mut parent = t.parent(host_id);
        while let Some(p) = parent {
            if let Some(pel) = t.element(p) {
                let scoped = pel
                    .slot_scope
                    .as_deref()
                    .map_or(false, |s| s != EMPTY_SLOT_SCOPE_TOKEN);
                if scoped || pel.for_binding.is_some() {
                    needs_force_update = true;
                    break;
                }
                if pel.if_expr.is_some() {
                    needs_key = true;
                }
            }
            parent = t.parent(p);
        }
    }

    let slots = host.scoped_slots.clone();
    let generated: Vec<String> = slots
        .iter()
        .map(|&slot_id| gen_scoped_slot(t, slot_id, state))
        .collect();
    let generated = generated.join(",");

    let mut res = format!(
        "scopedSlots:{}([{}]",
        state.options.intrinsics.resolve_scoped_slots, generated
    );
    if needs_force_update {
        res.push_str(",null,true");
    } else if needs_key {
        res.push_str(&format!(",null,false,{}", hash(&generated)));
    }
    res.push(')');
    res
}

/// Slot content that forwards another slot outlet may be dynamic upstream.
fn contains_slot_child(t: &Template, id: NodeId) -> bool {
    match t.node(id) {
        Node::Element(el) => {
            if el.tag == "slot" {
                return true;
            }
            el.children.iter().any(|&c| contains_slot_child(t, c))
        }
        _ => false,
    }
}

fn gen_scoped_slot(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    let el = match t.element(id) {
        Some(el) => el,
        None => return "null".to_string(),
    };
    let is_legacy_syntax = el.attrs_map.contains_key("slot-scope");
    if el.if_expr.is_some() && !state.is_marked(id, Processed::IF) && !is_legacy_syntax {
        // an absent conditional slot yields nothing, not a placeholder node
        return gen_if(t, id, state, Some(gen_scoped_slot), Some("null"));
    }
    if el.for_binding.is_some() && !state.is_marked(id, Processed::FOR) {
        return gen_for(t, id, state, Some(gen_scoped_slot));
    }
    let slot_scope = el
        .slot_scope
        .as_deref()
        .filter(|s| *s != EMPTY_SLOT_SCOPE_TOKEN)
        .unwrap_or("")
        .to_string();
    let key = el
        .slot_target
        .clone()
        .unwrap_or_else(|| "\"default\"".to_string());

    let body = if el.tag == "template" {
        match (&el.if_expr, is_legacy_syntax) {
            (Some(if_expr), true) => {
                let if_expr = if_expr.clone();
                let children =
                    gen_children(t, id, state, false).unwrap_or_else(|| "undefined".to_string());
                format!("({})?{}:undefined", if_expr, children)
            }
            _ => gen_children(t, id, state, false).unwrap_or_else(|| "undefined".to_string()),
        }
    } else {
        gen_element(t, id, state)
    };
    let fn_code = format!("function({}){{return {}}}", slot_scope, body);
    // slots without their own scope can be aliased on $slots instead of
    // being invoked
    let reverse_proxy = if slot_scope.is_empty() { ",proxy:true" } else { "" };
    format!("{{key:{},fn:{}{}}}", key, fn_code, reverse_proxy)
}

/// Stability key over regenerated slot content: DJB2 with XOR folding,
/// iterated from the last UTF-16 unit to the first, truncated to u32.
pub fn hash(text: &str) -> u32 {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut hash: u32 = 5381;
    for &unit in units.iter().rev() {
        hash = hash.wrapping_mul(33) ^ unit as u32;
    }
    hash
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHILDREN / LEAF NODES
// ═══════════════════════════════════════════════════════════════════════════════

pub fn gen_children(
    t: &Template,
    id: NodeId,
    state: &mut CodegenState,
    check_skip: bool,
) -> Option<String> {
    let el = t.element(id)?;
    if el.children.is_empty() {
        return None;
    }
    // optimize single v-for: skip the array wrapper around the lone child
    if el.children.len() == 1 {
        let child = el.children[0];
        if let Some(cel) = t.element(child) {
            if cel.for_binding.is_some() && cel.tag != "template" && cel.tag != "slot" {
                let normalization = if check_skip {
                    if state.options.maybe_component(cel) {
                        ",1"
                    } else {
                        ",0"
                    }
                } else {
                    ""
                };
                return Some(format!("{}{}", gen_element(t, child, state), normalization));
            }
        }
    }
    let normalization_type = if check_skip {
        get_normalization_type(t, &el.children, state.options)
    } else {
        0
    };
    let items: Vec<String> = el.children.iter().map(|&c| gen_node(t, c, state)).collect();
    let suffix = if normalization_type != 0 {
        format!(",{}", normalization_type)
    } else {
        String::new()
    };
    Some(format!("[{}]{}", items.join(","), suffix))
}

/// How deeply the children array may need flattening before use:
/// 0 = not at all, 1 = one level (possible nested array), 2 = fully.
/// Recomputed fresh per call site, never cached on the node.
fn get_normalization_type(t: &Template, children: &[NodeId], options: &CompilerOptions) -> u8 {
    let mut res = 0;
    for &child in children {
        let el = match t.element(child) {
            Some(el) => el,
            None => continue,
        };
        let branch_blocks = || el.conditions.iter().filter_map(|c| t.element(c.block));
        if needs_normalization(el) || branch_blocks().any(needs_normalization) {
            res = 2;
            break;
        }
        if options.maybe_component(el) || branch_blocks().any(|b| options.maybe_component(b)) {
            res = 1;
        }
    }
    res
}

fn needs_normalization(el: &ElementNode) -> bool {
    el.for_binding.is_some() || el.tag == "template" || el.tag == "slot"
}

fn gen_node(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    match t.node(id) {
        Node::Element(_) => gen_element(t, id, state),
        Node::Comment(comment) => format!(
            "{}({})",
            state.options.intrinsics.create_empty,
            quote_json(&comment.text)
        ),
        Node::Text(text) => {
            let content = match &text.expression {
                // already wrapped by the parser, no extra parens needed
                Some(expression) => expression.clone(),
                None => transform_special_newlines(&quote_json(&text.text)),
            };
            format!("{}({})", state.options.intrinsics.create_text, content)
        }
    }
}

fn gen_slot(t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    let el = match t.element(id) {
        Some(el) => el,
        None => return gen_node(t, id, state),
    };
    let slot_name = el
        .slot_name
        .clone()
        .unwrap_or_else(|| "\"default\"".to_string());
    let children = gen_children(t, id, state, false);
    let mut res = format!("{}({}", state.options.intrinsics.render_slot, slot_name);
    if let Some(children) = &children {
        res.push_str(&format!(",function(){{return {}}}", children));
    }
    let attrs = if !el.attrs.is_empty() || !el.dynamic_attrs.is_empty() {
        let merged: Vec<Attr> = el
            .attrs
            .iter()
            .chain(el.dynamic_attrs.iter())
            .map(|attr| Attr {
                // slot props are camelized
                name: camelize(&attr.name),
                value: attr.value.clone(),
                dynamic: attr.dynamic,
            })
            .collect();
        Some(gen_props(&merged, state.options))
    } else {
        None
    };
    let bind = el.attrs_map.get("v-bind");
    if (attrs.is_some() || bind.is_some()) && children.is_none() {
        res.push_str(",null");
    }
    if let Some(attrs) = &attrs {
        res.push_str(&format!(",{}", attrs));
    }
    if let Some(bind) = bind {
        res.push_str(&format!(
            "{},{}",
            if attrs.is_some() { "" } else { ",null" },
            bind
        ));
    }
    res.push(')');
    res
}

fn gen_component(component: &str, t: &Template, id: NodeId, state: &mut CodegenState) -> String {
    let inline_template = t.element(id).map_or(false, |el| el.inline_template);
    let children = if inline_template {
        None
    } else {
        gen_children(t, id, state, true)
    };
    format!(
        "{}({},{}{})",
        state.options.intrinsics.create_element,
        component,
        gen_data(t, id, state),
        children.map(|c| format!(",{}", c)).unwrap_or_default()
    )
}

fn gen_props(props: &[Attr], options: &CompilerOptions) -> String {
    let mut static_props = String::new();
    let mut dynamic_props = String::new();
    for prop in props {
        let value = transform_special_newlines(&prop.value);
        if prop.dynamic {
            dynamic_props.push_str(&format!("{},{},", prop.name, value));
        } else {
            static_props.push_str(&format!("\"{}\":{},", prop.name, value));
        }
    }
    let static_props = format!("{{{}}}", static_props.trim_end_matches(','));
    if dynamic_props.is_empty() {
        static_props
    } else {
        format!(
            "{}({},[{}])",
            options.intrinsics.bind_dynamic_keys,
            static_props,
            dynamic_props.trim_end_matches(',')
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn quote_json(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// U+2028/U+2029 are valid in string data but terminate lines inside a
/// generated function body, so they must leave here escaped.
fn transform_special_newlines(text: &str) -> String {
    text.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn camelize(name: &str) -> String {
    CAMELIZE_RE
        .replace_all(name, |caps: &regex::Captures| caps[1].to_uppercase())
        .to_string()
}

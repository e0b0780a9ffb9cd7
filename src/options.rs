use crate::ast::{Directive, ElementNode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC SINK
// ═══════════════════════════════════════════════════════════════════════════════

/// Advisory diagnostic sink. Arguments: message, source position if known,
/// and whether the diagnostic is a non-fatal tip. Must never abort the
/// compile.
pub type WarnSink = dyn Fn(&str, Option<&SourceLocation>, bool);

pub fn base_warn(msg: &str, loc: Option<&SourceLocation>, is_tip: bool) {
    let level = if is_tip { "tip" } else { "warning" };
    match loc {
        Some(l) => eprintln!("[template-compiler {}] {} ({}:{})", level, msg, l.line, l.column),
        None => eprintln!("[template-compiler {}] {}", level, msg),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLUGIN CAPABILITIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile-time directive generator. May mutate the element (e.g. convert the
/// directive into a plain property binding). Returns true if the directive
/// still needs a runtime counterpart after compile-time processing.
pub trait DirectiveGen {
    fn compile(&self, el: &mut ElementNode, dir: &Directive, warn: &WarnSink) -> bool;
}

/// Per-module data/code generator (class and style merging live here on real
/// platforms). `gen_data` fragments are concatenated verbatim into the data
/// object and must carry their own trailing comma; `transform_code` rewraps
/// the emitted element code, applied in registration order.
pub trait ModuleGen {
    fn gen_data(&self, _el: &ElementNode) -> String {
        String::new()
    }

    fn transform_code(&self, _el: &ElementNode, code: String) -> String {
        code
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTRINSIC NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Names of the runtime entry points the generated source invokes. The
/// defaults follow the companion runtime's underscore convention; a runtime
/// with different helper names swaps this table out wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intrinsics {
    pub create_element: String,
    pub create_text: String,
    pub create_empty: String,
    pub render_list: String,
    pub render_static: String,
    pub mark_once: String,
    pub render_slot: String,
    pub resolve_scoped_slots: String,
    pub bind_object_props: String,
    pub bind_dynamic_keys: String,
    pub bind_object_listeners: String,
    pub check_key_codes: String,
}

impl Default for Intrinsics {
    fn default() -> Self {
        Intrinsics {
            create_element: "_c".to_string(),
            create_text: "_v".to_string(),
            create_empty: "_e".to_string(),
            render_list: "_l".to_string(),
            render_static: "_m".to_string(),
            mark_once: "_o".to_string(),
            render_slot: "_t".to_string(),
            resolve_scoped_slots: "_u".to_string(),
            bind_object_props: "_b".to_string(),
            bind_dynamic_keys: "_d".to_string(),
            bind_object_listeners: "_g".to_string(),
            check_key_codes: "_k".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable configuration shared by a compile and all of its nested
/// compiles. One instance may serve many sequential compiles; it carries no
/// per-compile state.
pub struct CompilerOptions {
    pub warn: Box<WarnSink>,
    /// Directive generators keyed by directive name.
    pub directives: HashMap<String, Box<dyn DirectiveGen>>,
    /// Platform modules, in registration order.
    pub modules: Vec<Box<dyn ModuleGen>>,
    /// True for tags the platform renders natively. Anything else may
    /// resolve to a user component.
    pub is_reserved_tag: Box<dyn Fn(&str) -> bool>,
    pub intrinsics: Intrinsics,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            warn: Box::new(base_warn),
            directives: crate::directives::base_directives(),
            modules: Vec::new(),
            is_reserved_tag: Box::new(|_| false),
            intrinsics: Intrinsics::default(),
        }
    }
}

impl CompilerOptions {
    /// True if the element may resolve to a component at runtime: it names a
    /// dynamic component target, or its tag is not platform-reserved.
    pub fn maybe_component(&self, el: &ElementNode) -> bool {
        el.component.is_some() || !(self.is_reserved_tag)(&el.tag)
    }

    /// Runtime built-ins that never count as static content containers.
    pub fn is_built_in_tag(tag: &str) -> bool {
        tag == "slot" || tag == "component"
    }
}

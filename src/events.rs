//! Event-handler block emission.
//!
//! Turns the per-element handler tables into `on:{...}` / `nativeOn:{...}`
//! data fragments. Bare method paths and function expressions are passed
//! through untouched; statement bodies are wrapped in a `function($event)`
//! shell; modifiers compile to inline guards executed before the user code.

use crate::ast::{EventEntry, Handler};
use crate::options::Intrinsics;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FN_EXP_RE: Regex =
        Regex::new(r#"^([\w$_]+|\([^)]*?\))\s*=>|^function(?:\s+[\w$]+)?\s*\("#)
            .expect("valid handler regex");
    static ref FN_INVOKE_RE: Regex = Regex::new(r"\([^)]*?\);*$").expect("valid handler regex");
    static ref SIMPLE_PATH_RE: Regex = Regex::new(
        r#"^[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*|\['[^']*?'\]|\["[^"]*?"\]|\[\d+\]|\[[A-Za-z_$][\w$]*\])*$"#
    )
    .expect("valid handler regex");
}

/// Emit the handler block for one table. Static names build a literal map;
/// any dynamically-named handler switches the block to a dynamic-keys merge.
pub fn gen_handlers(events: &[EventEntry], is_native: bool, intrinsics: &Intrinsics) -> String {
    let prefix = if is_native { "nativeOn:" } else { "on:" };
    let mut static_handlers = String::new();
    let mut dynamic_handlers = String::new();

    for entry in events {
        let handler_code = gen_handler(&entry.handlers, intrinsics);
        // only a single handler can carry a dynamic name
        let dynamic = entry.handlers.len() == 1 && entry.handlers[0].dynamic;
        if dynamic {
            dynamic_handlers.push_str(&format!("{},{},", entry.name, handler_code));
        } else {
            static_handlers.push_str(&format!("\"{}\":{},", entry.name, handler_code));
        }
    }

    let static_handlers = format!("{{{}}}", static_handlers.trim_end_matches(','));
    if dynamic_handlers.is_empty() {
        format!("{}{}", prefix, static_handlers)
    } else {
        format!(
            "{}{}({},[{}])",
            prefix,
            intrinsics.bind_dynamic_keys,
            static_handlers,
            dynamic_handlers.trim_end_matches(',')
        )
    }
}

fn gen_handler(handlers: &[Handler], intrinsics: &Intrinsics) -> String {
    match handlers {
        [] => "function(){}".to_string(),
        [handler] => gen_single_handler(handler, intrinsics),
        many => format!(
            "[{}]",
            many.iter()
                .map(|h| gen_single_handler(h, intrinsics))
                .collect::<Vec<_>>()
                .join(",")
        ),
    }
}

fn gen_single_handler(handler: &Handler, intrinsics: &Intrinsics) -> String {
    let is_method_path = SIMPLE_PATH_RE.is_match(&handler.value);
    let is_function_expression = FN_EXP_RE.is_match(&handler.value);
    let is_function_invocation = FN_INVOKE_RE.is_match(&handler.value);

    if handler.modifiers.is_empty() {
        if is_method_path || is_function_expression {
            return handler.value.clone();
        }
        let body = if is_function_invocation {
            format!("return {}", handler.value)
        } else {
            handler.value.clone()
        };
        return format!("function($event){{{}}}", body);
    }

    let mut code = String::new();
    let mut modifier_guards = String::new();
    let mut keys: Vec<&str> = Vec::new();

    for key in &handler.modifiers {
        if let Some(guard) = modifier_code(key) {
            modifier_guards.push_str(&guard);
            // left/right double as key modifiers
            if key_code_literal(key).is_some() {
                keys.push(key);
            }
        } else if key == "exact" {
            let unfiltered: Vec<String> = ["ctrl", "shift", "alt", "meta"]
                .iter()
                .filter(|m| !handler.modifiers.iter().any(|h| h == *m))
                .map(|m| format!("$event.{}Key", m))
                .collect();
            modifier_guards.push_str(&gen_guard(&unfiltered.join("||")));
        } else {
            keys.push(key);
        }
    }

    if !keys.is_empty() {
        code.push_str(&gen_key_filter(&keys, intrinsics));
    }
    // prevent/stop run after key filtering
    code.push_str(&modifier_guards);

    let handler_code = if is_method_path {
        format!("return {}.apply(null, arguments)", handler.value)
    } else if is_function_expression {
        format!("return ({}).apply(null, arguments)", handler.value)
    } else if is_function_invocation {
        format!("return {}", handler.value)
    } else {
        handler.value.clone()
    };
    format!("function($event){{{}{}}}", code, handler_code)
}

fn gen_guard(condition: &str) -> String {
    format!("if({})return null;", condition)
}

fn modifier_code(key: &str) -> Option<String> {
    match key {
        "stop" => Some("$event.stopPropagation();".to_string()),
        "prevent" => Some("$event.preventDefault();".to_string()),
        "self" => Some(gen_guard("$event.target !== $event.currentTarget")),
        "ctrl" => Some(gen_guard("!$event.ctrlKey")),
        "shift" => Some(gen_guard("!$event.shiftKey")),
        "alt" => Some(gen_guard("!$event.altKey")),
        "meta" => Some(gen_guard("!$event.metaKey")),
        "left" => Some(gen_guard("'button' in $event && $event.button !== 0")),
        "middle" => Some(gen_guard("'button' in $event && $event.button !== 1")),
        "right" => Some(gen_guard("'button' in $event && $event.button !== 2")),
        _ => None,
    }
}

fn gen_key_filter(keys: &[&str], intrinsics: &Intrinsics) -> String {
    let filters: Vec<String> = keys.iter().map(|k| gen_filter_code(k, intrinsics)).collect();
    format!(
        "if(!$event.type.indexOf('key')&&{})return null;",
        filters.join("&&")
    )
}

fn gen_filter_code(key: &str, intrinsics: &Intrinsics) -> String {
    if let Ok(key_val) = key.parse::<u32>() {
        if key_val != 0 {
            return format!("$event.keyCode!=={}", key_val);
        }
    }
    let key_code = key_code_literal(key).unwrap_or("undefined");
    let key_name = key_name_literal(key).unwrap_or("undefined");
    format!(
        "{}($event.keyCode,\"{}\",{},$event.key,{})",
        intrinsics.check_key_codes, key, key_code, key_name
    )
}

/// Built-in keyCode aliases, as JSON literals.
fn key_code_literal(key: &str) -> Option<&'static str> {
    match key {
        "esc" => Some("27"),
        "tab" => Some("9"),
        "enter" => Some("13"),
        "space" => Some("32"),
        "up" => Some("38"),
        "left" => Some("37"),
        "right" => Some("39"),
        "down" => Some("40"),
        "delete" => Some("[8,46]"),
        _ => None,
    }
}

/// Browser key-name aliases for the same keys, as JSON literals.
fn key_name_literal(key: &str) -> Option<&'static str> {
    match key {
        "esc" => Some("[\"Esc\",\"Escape\"]"),
        "tab" => Some("\"Tab\""),
        "enter" => Some("\"Enter\""),
        "space" => Some("[\" \",\"Spacebar\"]"),
        "up" => Some("[\"Up\",\"ArrowUp\"]"),
        "left" => Some("[\"Left\",\"ArrowLeft\"]"),
        "right" => Some("[\"Right\",\"ArrowRight\"]"),
        "down" => Some("[\"Down\",\"ArrowDown\"]"),
        "delete" => Some("[\"Backspace\",\"Delete\",\"Del\"]"),
        _ => None,
    }
}

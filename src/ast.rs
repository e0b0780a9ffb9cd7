use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════════════
// ARENA
// ═══════════════════════════════════════════════════════════════════════════════

/// Index of a node inside a [`Template`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The annotated template tree handed over by the parser.
///
/// Nodes live in a flat arena; structural links (children, condition blocks,
/// scoped slots) are [`NodeId`] indices into the same arena. The parent table
/// runs parallel to the node vector and is used only for upward lookups, never
/// for mutation propagation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub nodes: Vec<Node>,
    pub parents: Vec<Option<NodeId>>,
    pub root: Option<NodeId>,
}

impl Template {
    pub fn new() -> Self {
        Template::default()
    }

    /// Add a parentless node to the arena.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.parents.push(None);
        id
    }

    /// Add a node as the last child of `parent`. `parent` must be an element.
    pub fn append_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.push(node);
        self.parents[id.index()] = Some(parent);
        if let Node::Element(el) = &mut self.nodes[parent.index()] {
            el.children.push(id);
        }
        id
    }

    /// Register `block` as the next branch of `owner`'s condition chain.
    /// `exp: None` marks the terminal unconditional branch.
    pub fn add_if_condition(&mut self, owner: NodeId, exp: Option<String>, block: NodeId) {
        if let Node::Element(el) = &mut self.nodes[owner.index()] {
            el.conditions.push(IfCondition { exp, block });
        }
    }

    /// Add a node to the arena as a scoped-slot definition of `host`.
    /// The slot keeps `host` as its parent for ancestor scans.
    pub fn add_scoped_slot(&mut self, host: NodeId, node: Node) -> NodeId {
        let id = self.push(node);
        self.parents[id.index()] = Some(host);
        if let Node::Element(el) = &mut self.nodes[host.index()] {
            el.scoped_slots.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        match self.node(id) {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// A plain attribute or binding as recorded by the parser. `dynamic` marks a
/// dynamically-named binding (`:[name]="value"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attr {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub dynamic: bool,
}

/// Iteration descriptor: `(alias, iterator1, iterator2) in source`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForBinding {
    pub source: String,
    pub alias: String,
    #[serde(default)]
    pub iterator1: Option<String>,
    #[serde(default)]
    pub iterator2: Option<String>,
}

/// One branch of a sibling conditional chain. `exp: None` denotes the
/// terminal `else` branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfCondition {
    pub exp: Option<String>,
    pub block: NodeId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    pub value: String,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Event-handler table entry, kept in source order so emission is
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub name: String,
    pub handlers: Vec<Handler>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub name: String,
    pub raw_name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(default)]
    pub is_dynamic_arg: bool,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Set by the directive pre-pass: the directive still needs a runtime
    /// counterpart after compile-time processing.
    #[serde(default)]
    pub needs_runtime: bool,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Two-way binding descriptor produced by component `v-model` processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBinding {
    pub value: String,
    pub callback: String,
    pub expression: String,
}

/// Data wrap attached by the object form of `v-bind`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindWrap {
    pub value: String,
    pub prop: bool,
    pub sync: bool,
}

/// Scope-binding name used by scoped slots that declare no binding of their
/// own. A slot whose `slot_scope` equals this token is a pure passthrough.
pub const EMPTY_SLOT_SCOPE_TOKEN: &str = "_empty_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub ns: Option<String>,
    #[serde(default)]
    pub attrs_list: Vec<Attr>,
    #[serde(default)]
    pub attrs_map: HashMap<String, String>,
    #[serde(default)]
    pub loc: SourceLocation,

    #[serde(default)]
    pub children: Vec<NodeId>,

    // structural directives
    #[serde(default)]
    pub pre: bool,
    #[serde(default)]
    pub for_binding: Option<ForBinding>,
    #[serde(default)]
    pub if_expr: Option<String>,
    #[serde(default)]
    pub else_if_expr: Option<String>,
    #[serde(default)]
    pub is_else: bool,
    /// Ordered branch list populated as sibling `v-if`/`v-else-if`/`v-else`
    /// chains are discovered. Present only on the chain's first element.
    #[serde(default)]
    pub conditions: Vec<IfCondition>,
    #[serde(default)]
    pub once: bool,

    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub ref_expr: Option<String>,
    #[serde(default)]
    pub ref_in_for: bool,

    // slots
    #[serde(default)]
    pub slot_target: Option<String>,
    #[serde(default)]
    pub slot_target_dynamic: bool,
    #[serde(default)]
    pub slot_scope: Option<String>,
    /// Scoped-slot definition nodes, in source order.
    #[serde(default)]
    pub scoped_slots: Vec<NodeId>,
    /// Set when the element itself is a `<slot>` outlet.
    #[serde(default)]
    pub slot_name: Option<String>,

    /// Dynamic-component target expression (`is` binding).
    #[serde(default)]
    pub component: Option<String>,

    // class / style (emitted by platform modules, carried here)
    #[serde(default)]
    pub static_class: Option<String>,
    #[serde(default)]
    pub class_binding: Option<String>,
    #[serde(default)]
    pub static_style: Option<String>,
    #[serde(default)]
    pub style_binding: Option<String>,

    #[serde(default)]
    pub events: Vec<EventEntry>,
    #[serde(default)]
    pub native_events: Vec<EventEntry>,

    /// DOM property bindings.
    #[serde(default)]
    pub props: Vec<Attr>,
    #[serde(default)]
    pub attrs: Vec<Attr>,
    #[serde(default)]
    pub dynamic_attrs: Vec<Attr>,

    #[serde(default)]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub model: Option<ModelBinding>,

    #[serde(default)]
    pub inline_template: bool,
    /// No attributes at all.
    #[serde(default)]
    pub plain: bool,
    /// Any dynamic binding present.
    #[serde(default)]
    pub has_bindings: bool,
    /// Directive pre-pass already ran for this node.
    #[serde(default)]
    pub processed: bool,

    // wraps attached by object-form v-bind / v-on directives
    #[serde(default)]
    pub wrap_data: Option<BindWrap>,
    #[serde(default)]
    pub wrap_listeners: Option<String>,

    // analysis outputs
    #[serde(default)]
    pub r#static: bool,
    #[serde(default)]
    pub static_root: bool,
    #[serde(default)]
    pub static_in_for: bool,
}

impl ElementNode {
    pub fn new(tag: &str) -> Self {
        ElementNode {
            tag: tag.to_string(),
            ..ElementNode::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub text: String,
    /// Interpolation source, e.g. `_s(message)`. `Some` marks the node as an
    /// interpolation; interpolations are never static.
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub text: String,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_child_links_parent() {
        let mut t = Template::new();
        let root = t.push(Node::Element(ElementNode::new("div")));
        t.root = Some(root);
        let child = t.append_child(
            root,
            Node::Text(TextNode {
                text: "hi".to_string(),
                ..TextNode::default()
            }),
        );
        assert_eq!(t.parent(child), Some(root));
        assert_eq!(t.element(root).unwrap().children, vec![child]);
    }

    #[test]
    fn test_node_roundtrip() {
        let node = Node::Element(ElementNode::new("span"));
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"element\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Node::Element(el) if el.tag == "span"));
    }
}

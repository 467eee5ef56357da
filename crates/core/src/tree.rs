// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layout tree parsed from a `get_tree` reply.
//!
//! Nodes live in a flat arena owned by [`Tree`]. Children are held as indices
//! in wire order (tiling `nodes` first, then `floating_nodes`), and the parent
//! link is a plain index back into the same arena, so ownership stays
//! strictly root-to-leaf.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wmctl_wire::ProtocolError;

/// Position of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Node type as reported by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Output,
    Workspace,
    #[serde(alias = "container", alias = "view")]
    Con,
    FloatingCon,
    Dockarea,
}

/// Coarse classification used by traversal helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Output,
    Workspace,
    Container,
    /// A leaf container holding an application surface.
    View,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub name: Option<String>,
    pub node_type: NodeType,
    pub rect: Rect,
    pub focused: bool,
    pub app_id: Option<String>,
    pub pid: Option<i64>,
    /// X11 window id, present for xwayland views.
    pub window: Option<i64>,
    pub shell: Option<String>,
    /// Remaining fields of the node object, without `nodes`/`floating_nodes`.
    pub raw: Map<String, Value>,
    index: NodeIndex,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    /// Count of leading `children` that came from `nodes`.
    tiling: usize,
}

impl Node {
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Children in wire order: tiling first, then floating.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Children from the `nodes` array.
    pub fn tiling_children(&self) -> &[NodeIndex] {
        self.children.get(..self.tiling).unwrap_or(&self.children)
    }

    /// Children from the `floating_nodes` array.
    pub fn floating_children(&self) -> &[NodeIndex] {
        self.children.get(self.tiling..).unwrap_or_default()
    }

    pub fn kind(&self) -> NodeKind {
        match self.node_type {
            NodeType::Root => NodeKind::Root,
            NodeType::Output => NodeKind::Output,
            NodeType::Workspace => NodeKind::Workspace,
            NodeType::Dockarea => NodeKind::Container,
            NodeType::Con | NodeType::FloatingCon if self.children.is_empty() => NodeKind::View,
            NodeType::Con | NodeType::FloatingCon => NodeKind::Container,
        }
    }

    pub fn is_view(&self) -> bool {
        self.kind() == NodeKind::View
    }

    pub fn is_xwayland(&self) -> bool {
        self.shell.as_deref() == Some("xwayland") || self.window.is_some()
    }

    /// The node's JSON object as received, minus its child arrays.
    pub fn to_json(&self) -> Value {
        Value::Object(self.raw.clone())
    }
}

/// Parsed layout tree with exactly one root.
///
/// Arena order is pre-order: the root is index 0 and `descendants[i]` is
/// index `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
    descendants: Vec<Node>,
}

impl Tree {
    /// Parse a `get_tree` reply, whose top node must be of type `root`.
    pub fn parse_layout(payload: &str) -> Result<Self, ProtocolError> {
        let tree = Self::parse(payload)?;
        if tree.root.node_type != NodeType::Root {
            return Err(ProtocolError::Malformed(format!(
                "layout tree starts at {:?} node {}, not the root",
                tree.root.node_type, tree.root.id
            )));
        }
        Ok(tree)
    }

    /// Parse any subtree, e.g. a window event's container.
    pub fn parse(payload: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let mut nodes = Vec::new();
        build(&mut nodes, value, None)?;

        let focused = nodes.iter().filter(|node| node.focused).count();
        if focused > 1 {
            return Err(ProtocolError::Malformed(format!(
                "{focused} nodes claim focus, at most one may"
            )));
        }

        let mut nodes = nodes.into_iter();
        let Some(root) = nodes.next() else {
            return Err(ProtocolError::Malformed("empty layout tree".to_string()));
        };
        Ok(Self { root, descendants: nodes.collect() })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        match index.0 {
            0 => Some(&self.root),
            i => self.descendants.get(i - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.descendants.len() + 1
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent.and_then(|index| self.node(index))
    }

    pub fn children_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().filter_map(|index| self.node(*index))
    }

    /// Depth-first, pre-order, children in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        // Arena order is already pre-order.
        std::iter::once(&self.root).chain(&self.descendants)
    }

    /// Walk from the node's parent up to the root.
    pub fn ancestors<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        std::iter::successors(self.parent_of(node), move |n| self.parent_of(n))
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Node> {
        self.iter().find(|node| node.id == id)
    }

    pub fn find_focused(&self) -> Option<&Node> {
        self.iter().find(|node| node.focused)
    }

    pub fn filter_by_type(&self, node_type: NodeType) -> Vec<&Node> {
        self.iter().filter(|node| node.node_type == node_type).collect()
    }

    pub fn filter_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.iter().filter(|node| node.kind() == kind).collect()
    }

    /// All view nodes, tiling and floating.
    pub fn views(&self) -> Vec<&Node> {
        self.filter_by_kind(NodeKind::View)
    }

    /// The output containing `node`, or `node` itself if it is one.
    pub fn output_of<'a>(&'a self, node: &'a Node) -> Option<&'a Node> {
        self.self_or_ancestor(node, NodeType::Output)
    }

    /// The workspace containing `node`, or `node` itself if it is one.
    pub fn workspace_of<'a>(&'a self, node: &'a Node) -> Option<&'a Node> {
        self.self_or_ancestor(node, NodeType::Workspace)
    }

    pub fn focused_output(&self) -> Option<&Node> {
        self.find_focused().and_then(|node| self.output_of(node))
    }

    fn self_or_ancestor<'a>(&'a self, node: &'a Node, node_type: NodeType) -> Option<&'a Node> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|n| n.node_type == node_type)
    }
}

/// Append `value` and its descendants to `nodes` in pre-order.
fn build(
    nodes: &mut Vec<Node>,
    value: Value,
    parent: Option<NodeIndex>,
) -> Result<NodeIndex, ProtocolError> {
    let Value::Object(mut raw) = value else {
        return Err(ProtocolError::Malformed("tree node is not a JSON object".to_string()));
    };

    let id = raw.get("id").and_then(Value::as_i64).ok_or(ProtocolError::MissingField("id"))?;
    let node_type = match raw.get("type") {
        Some(ty) => NodeType::deserialize(ty)
            .map_err(|e| ProtocolError::Malformed(format!("node {id}: {e}")))?,
        None => return Err(ProtocolError::MissingField("type")),
    };
    if node_type == NodeType::Root && parent.is_some() {
        return Err(ProtocolError::Malformed(format!("node {id}: nested root node")));
    }

    let rect = match raw.get("rect") {
        Some(rect) => Rect::deserialize(rect)
            .map_err(|e| ProtocolError::Malformed(format!("node {id}: rect: {e}")))?,
        None => Rect::default(),
    };
    let tiling = take_children(&mut raw, "nodes", id)?;
    let floating = take_children(&mut raw, "floating_nodes", id)?;

    let index = NodeIndex(nodes.len());
    nodes.push(Node {
        id,
        name: string_field(&raw, "name"),
        node_type,
        rect,
        focused: raw.get("focused").and_then(Value::as_bool).unwrap_or(false),
        app_id: string_field(&raw, "app_id"),
        pid: raw.get("pid").and_then(Value::as_i64),
        window: raw.get("window").and_then(Value::as_i64),
        shell: string_field(&raw, "shell"),
        raw,
        index,
        parent,
        children: Vec::new(),
        tiling: tiling.len(),
    });

    let mut children = Vec::with_capacity(tiling.len() + floating.len());
    for child in tiling.into_iter().chain(floating) {
        children.push(build(nodes, child, Some(index))?);
    }
    if let Some(node) = nodes.get_mut(index.0) {
        node.children = children;
    }

    Ok(index)
}

fn take_children(raw: &mut Map<String, Value>, key: &str, id: i64) -> Result<Vec<Value>, ProtocolError> {
    match raw.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(children)) => Ok(children),
        Some(_) => Err(ProtocolError::Malformed(format!("node {id}: `{key}` is not an array"))),
    }
}

fn string_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

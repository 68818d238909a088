//! Classification of the host's current selection.
//!
//! The host reports selected nodes as plain descriptions; this module decides
//! whether a shadow can be cast on them. Unusable selections are ordinary
//! variants carrying a user-facing message, not errors.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::persist::PersistedShadowData;

/// Host node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Page,
    BooleanOperation,
    Component,
    ComponentSet,
    Instance,
    Ellipse,
    Frame,
    Group,
    Line,
    Polygon,
    Rectangle,
    Star,
    Text,
    Vector,
    Slice,
    Section,
    Sticky,
    Connector,
}

impl NodeKind {
    /// Whether the node can carry shadow effects.
    #[must_use]
    pub fn supports_shadow(self) -> bool {
        matches!(
            self,
            Self::BooleanOperation
                | Self::Component
                | Self::Instance
                | Self::Ellipse
                | Self::Frame
                | Self::Group
                | Self::Line
                | Self::Polygon
                | Self::Rectangle
                | Self::Star
                | Self::Text
                | Self::Vector
        )
    }

    /// Document and page nodes end the ancestor walk.
    fn is_root(self) -> bool {
        matches!(self, Self::Document | Self::Page)
    }
}

/// A selected node as described by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedNode {
    pub kind: NodeKind,
    pub size: Size,
    /// `None` when the host reports mixed corner radii.
    #[serde(default)]
    pub corner_radius: Option<f64>,
    /// Ancestor kinds, nearest parent first.
    #[serde(default)]
    pub ancestors: Vec<NodeKind>,
    #[serde(default)]
    pub children: Vec<SelectedNode>,
    /// Raw stored shadow payload, if the node has one.
    #[serde(default)]
    pub plugin_data: Option<String>,
}

impl SelectedNode {
    #[must_use]
    pub fn new(kind: NodeKind, size: Size) -> Self {
        Self { kind, size, corner_radius: None, ancestors: Vec::new(), children: Vec::new(), plugin_data: None }
    }

    /// Whether an ancestor of `kind` sits between this node and the page.
    #[must_use]
    pub fn is_within(&self, kind: NodeKind) -> bool {
        self.ancestors.iter().take_while(|k| !k.is_root()).any(|&k| k == kind)
    }

    /// Whether this node is a component, or a group containing one through nested groups.
    #[must_use]
    pub fn has_component_child(&self) -> bool {
        match self.kind {
            NodeKind::Component => true,
            NodeKind::Group => self.children.iter().any(SelectedNode::has_component_child),
            _ => false,
        }
    }
}

/// A single node a shadow can be cast on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidSelection {
    pub kind: NodeKind,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// The node sits inside a component; shadows still apply.
    pub within_component: bool,
    pub prior: Option<PersistedShadowData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selection {
    Empty,
    Multiple,
    Invalid { kind: NodeKind },
    WithinInstance,
    HasComponentChild,
    Valid(ValidSelection),
}

impl Selection {
    /// Whether a shadow can be applied to this selection.
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[must_use]
    pub fn valid(&self) -> Option<&ValidSelection> {
        match self {
            Self::Valid(valid) => Some(valid),
            _ => None,
        }
    }

    /// Notification for selections the user has to change.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Empty => Some("Select an element to cast a shadow on."),
            Self::Multiple => Some("Select only one element or group elements together."),
            Self::Invalid { .. } => Some("Element type not supported."),
            Self::WithinInstance => Some("Elements inside an instance can't be changed. Detach the instance first."),
            Self::HasComponentChild => Some("Groups containing components are not supported."),
            Self::Valid(_) => None,
        }
    }
}

/// Classify the current selection.
#[must_use]
pub fn validate_selection(nodes: &[SelectedNode]) -> Selection {
    let selection = match nodes {
        [] => Selection::Empty,
        [node] => classify(node),
        _ => Selection::Multiple,
    };
    tracing::info!(applicable = selection.is_applicable(), count = nodes.len(), "selection changed");
    selection
}

fn classify(node: &SelectedNode) -> Selection {
    if !node.kind.supports_shadow() {
        return Selection::Invalid { kind: node.kind };
    }
    let within_component = node.is_within(NodeKind::Component);
    if !within_component {
        if node.is_within(NodeKind::Instance) {
            return Selection::WithinInstance;
        }
        if node.kind == NodeKind::Group && node.has_component_child() {
            return Selection::HasComponentChild;
        }
    }
    Selection::Valid(ValidSelection {
        kind: node.kind,
        width: node.size.width,
        height: node.size.height,
        corner_radius: node.corner_radius.unwrap_or(0.0),
        within_component,
        prior: PersistedShadowData::load(node.plugin_data.as_deref()),
    })
}

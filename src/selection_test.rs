#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn node(kind: NodeKind) -> SelectedNode {
    SelectedNode::new(kind, Size::new(120.0, 80.0))
}

fn inside(kind: NodeKind, ancestors: &[NodeKind]) -> SelectedNode {
    SelectedNode { ancestors: ancestors.to_vec(), ..node(kind) }
}

// =============================================================
// Basic states
// =============================================================

#[test]
fn empty_selection() {
    let s = validate_selection(&[]);
    assert_eq!(s, Selection::Empty);
    assert!(!s.is_applicable());
    assert!(s.message().is_some());
}

#[test]
fn multiple_selection() {
    let s = validate_selection(&[node(NodeKind::Rectangle), node(NodeKind::Frame)]);
    assert_eq!(s, Selection::Multiple);
    assert_eq!(s.message(), Some("Select only one element or group elements together."));
}

#[test]
fn unsupported_kind_is_invalid() {
    let s = validate_selection(&[node(NodeKind::Slice)]);
    assert_eq!(s, Selection::Invalid { kind: NodeKind::Slice });
    assert_eq!(s.message(), Some("Element type not supported."));
}

#[test]
fn every_supported_kind_is_valid() {
    use NodeKind as K;
    let supported = [
        K::BooleanOperation,
        K::Component,
        K::Instance,
        K::Ellipse,
        K::Frame,
        K::Group,
        K::Line,
        K::Polygon,
        K::Rectangle,
        K::Star,
        K::Text,
        K::Vector,
    ];
    for kind in supported {
        assert!(validate_selection(&[node(kind)]).is_applicable(), "{kind:?}");
    }
    for kind in [K::Document, K::Page, K::ComponentSet, K::Slice, K::Section, K::Sticky, K::Connector] {
        assert!(!validate_selection(&[node(kind)]).is_applicable(), "{kind:?}");
    }
}

#[test]
fn valid_selection_carries_geometry() {
    let n = SelectedNode { corner_radius: Some(12.0), ..node(NodeKind::Rectangle) };
    let s = validate_selection(&[n]);
    let valid = s.valid().expect("valid");
    assert_eq!((valid.width, valid.height, valid.corner_radius), (120.0, 80.0, 12.0));
    assert!(!valid.within_component);
    assert!(valid.prior.is_none());
    assert_eq!(s.message(), None);
}

#[test]
fn mixed_corner_radius_reads_as_zero() {
    let s = validate_selection(&[node(NodeKind::Rectangle)]);
    assert_eq!(s.valid().map(|v| v.corner_radius), Some(0.0));
}

// =============================================================
// Component / instance nesting
// =============================================================

#[test]
fn within_component_is_still_applicable() {
    let s = validate_selection(&[inside(NodeKind::Rectangle, &[NodeKind::Frame, NodeKind::Component, NodeKind::Page])]);
    assert!(s.is_applicable());
    assert!(s.valid().is_some_and(|v| v.within_component));
}

#[test]
fn within_instance_is_not_applicable() {
    let s = validate_selection(&[inside(NodeKind::Text, &[NodeKind::Instance, NodeKind::Page])]);
    assert_eq!(s, Selection::WithinInstance);
    assert!(s.message().is_some());
}

#[test]
fn component_takes_priority_over_instance() {
    let s = validate_selection(&[inside(NodeKind::Text, &[NodeKind::Instance, NodeKind::Component])]);
    assert!(s.valid().is_some_and(|v| v.within_component));
}

#[test]
fn ancestor_walk_stops_at_page() {
    let n = inside(NodeKind::Rectangle, &[NodeKind::Page, NodeKind::Component]);
    assert!(!n.is_within(NodeKind::Component));
}

#[test]
fn group_with_nested_component_is_rejected() {
    let inner_group = SelectedNode { children: vec![node(NodeKind::Component)], ..node(NodeKind::Group) };
    let outer = SelectedNode { children: vec![node(NodeKind::Rectangle), inner_group], ..node(NodeKind::Group) };
    assert_eq!(validate_selection(&[outer]), Selection::HasComponentChild);
}

#[test]
fn component_inside_frame_inside_group_is_not_searched() {
    let frame = SelectedNode { children: vec![node(NodeKind::Component)], ..node(NodeKind::Frame) };
    let group = SelectedNode { children: vec![frame], ..node(NodeKind::Group) };
    assert!(validate_selection(&[group]).is_applicable());
}

// =============================================================
// Prior data
// =============================================================

#[test]
fn stored_data_is_loaded_into_valid_selection() {
    let n = SelectedNode {
        plugin_data: Some(r#"{"azimuth":90,"distance":30,"elevation":0.5,"brightness":0.4}"#.into()),
        ..node(NodeKind::Frame)
    };
    let s = validate_selection(&[n]);
    let prior = s.valid().and_then(|v| v.prior.as_ref()).expect("prior");
    assert_eq!(prior.azimuth, 90.0);
}

#[test]
fn unreadable_stored_data_is_ignored() {
    let n = SelectedNode { plugin_data: Some("garbage".into()), ..node(NodeKind::Frame) };
    let s = validate_selection(&[n]);
    assert!(s.is_applicable());
    assert!(s.valid().is_some_and(|v| v.prior.is_none()));
}

#[test]
fn selection_serializes_with_state_tag() {
    let json = serde_json::to_value(validate_selection(&[node(NodeKind::Ellipse)])).expect("serialize");
    assert_eq!(json["state"], "VALID");
    assert_eq!(json["kind"], "ELLIPSE");
    assert_eq!(json["cornerRadius"], 0.0);
    let json = serde_json::to_value(Selection::HasComponentChild).expect("serialize");
    assert_eq!(json["state"], "HAS_COMPONENT_CHILD");
}

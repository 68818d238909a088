#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;
use crate::selection::NodeKind;
use crate::shadow::ShadowKind;

// =============================================================
// Helpers
// =============================================================

#[derive(Debug, Default)]
struct FakeNode {
    size: Size,
    effects: Vec<Effect>,
    data: HashMap<String, String>,
    removed: bool,
}

impl ShadowNode for FakeNode {
    fn size(&self) -> Size {
        self.size
    }

    fn effects(&self) -> Vec<Effect> {
        self.effects.clone()
    }

    fn set_effects(&mut self, effects: Vec<Effect>) {
        self.effects = effects;
    }

    fn plugin_data(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    fn set_plugin_data(&mut self, key: &str, value: String) {
        self.data.insert(key.to_owned(), value);
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

fn blur() -> Effect {
    Effect::Blur(BlurEffect { kind: BlurKind::LayerBlur, radius: 4.0, visible: true })
}

fn old_shadow() -> Effect {
    Effect::Shadow(ShadowEffect {
        kind: ShadowKind::Drop,
        color: crate::color::Rgba::BLACK,
        offset: crate::geometry::Point::new(1.0, 1.0),
        radius: 2.0,
        spread: 0.0,
        visible: true,
        blend_mode: crate::shadow::BlendMode::Normal,
    })
}

fn fake(size: Size) -> FakeNode {
    FakeNode { size, effects: vec![blur(), old_shadow()], ..FakeNode::default() }
}

fn described(size: Size) -> SelectedNode {
    SelectedNode::new(NodeKind::Rectangle, size)
}

fn payload() -> PersistedShadowData {
    PersistedShadowData {
        azimuth: 45.0,
        distance: 40.0,
        elevation: 0.6,
        brightness: 0.5,
        background_color: Some("#e5e5e5".into()),
        background_preference: None,
        shadow_color: None,
        shadow_type: Some(ShadowKind::Inner),
        light_position: Some(crate::geometry::Point::new(10.0, 10.0)),
        preview_bounds: Some(Size::new(375.0, 375.0)),
        version: None,
    }
}

fn selected_session() -> ShadowSession<FakeNode> {
    let size = Size::new(200.0, 100.0);
    let mut session = ShadowSession::new(ShadowConfig::default());
    session.on_selection_change(&[described(size)], Some(fake(size)));
    session
}

fn shadow_count(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| e.is_shadow()).count()
}

// =============================================================
// Window
// =============================================================

#[test]
fn window_size_is_clamped() {
    assert_eq!(clamp_window_size(Size::new(100.0, 100.0)), Size::new(340.0, 340.0));
    assert_eq!(clamp_window_size(Size::new(5000.0, 900.0)), Size::new(3600.0, 600.0));
    assert_eq!(clamp_window_size(Size::new(375.0, 375.0)), Size::new(375.0, 375.0));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn valid_selection_adopts_node_and_posts_to_ui() {
    let size = Size::new(200.0, 100.0);
    let mut session = ShadowSession::new(ShadowConfig::default());
    let (commands, released) = session.on_selection_change(&[described(size)], Some(fake(size)));
    assert!(released.is_none());
    assert!(session.node().is_some());
    assert_eq!(commands.len(), 1);
    assert!(matches!(&commands[0], HostCommand::PostToUi(HostMessage::SelectionChange(Selection::Valid(_)))));
}

#[test]
fn multiple_selection_notifies_and_releases_previous_node() {
    let mut session = selected_session();
    session.update(payload());
    let (commands, released) = session.on_selection_change(&[described(Size::default()), described(Size::default())], None);
    assert!(commands.contains(&HostCommand::Notify("Select only one element or group elements together.".into())));
    let released = released.expect("previous node released");
    assert_eq!(released.effects, vec![blur(), old_shadow()]);
    assert!(session.node().is_none());
}

#[test]
fn empty_selection_is_silent() {
    let mut session = selected_session();
    let (commands, released) = session.on_selection_change(&[], None);
    assert_eq!(commands.len(), 1);
    assert!(released.is_some());
}

#[test]
fn removed_node_is_not_adopted() {
    let size = Size::new(10.0, 10.0);
    let mut session = ShadowSession::new(ShadowConfig::default());
    let node = FakeNode { removed: true, ..fake(size) };
    session.on_selection_change(&[described(size)], Some(node));
    assert!(session.node().is_none());
}

// =============================================================
// Updates
// =============================================================

#[test]
fn update_replaces_shadows_and_keeps_other_effects() {
    let mut session = selected_session();
    session.update(payload());
    let node = session.node().expect("node");
    assert_eq!(node.effects.len(), 1 + ShadowConfig::default().layer_count);
    assert_eq!(node.effects[0], blur());
    assert!(!node.effects.contains(&old_shadow()));

    session.update(payload());
    let node = session.node().expect("node");
    assert_eq!(shadow_count(&node.effects), ShadowConfig::default().layer_count);
}

#[test]
fn update_scales_shadow_to_node_size() {
    let mut small = ShadowSession::new(ShadowConfig::default());
    let small_size = Size::new(50.0, 50.0);
    small.on_selection_change(&[described(small_size)], Some(fake(small_size)));
    small.update(payload());

    let mut large = selected_session();
    large.update(payload());

    let last_radius = |s: &ShadowSession<FakeNode>| match s.node().and_then(|n| n.effects.last().copied()) {
        Some(Effect::Shadow(fx)) => fx.radius,
        _ => -1.0,
    };
    assert!(last_radius(&large) > last_radius(&small));
}

#[test]
fn update_emits_requested_shadow_type() {
    let mut session = selected_session();
    session.update(payload());
    let node = session.node().expect("node");
    assert!(node.effects.iter().all(|e| match e {
        Effect::Shadow(fx) => fx.kind == ShadowKind::Inner,
        Effect::Blur(_) => true,
    }));
}

// =============================================================
// Close
// =============================================================

#[test]
fn close_without_apply_restores_effects() {
    let mut session = selected_session();
    session.update(payload());
    let commands = session.handle(UiMessage::Close).expect("close");
    assert_eq!(commands, vec![HostCommand::ClosePlugin]);
    assert!(session.node().is_none());
}

#[test]
fn apply_keeps_shadow_and_stores_versioned_settings() {
    let mut session = selected_session();
    session.update(payload());
    let commands = session.handle(UiMessage::Apply).expect("apply");
    assert_eq!(commands, vec![HostCommand::ClosePlugin]);
    assert!(session.is_applied());

    let node = session.node().expect("node kept");
    assert_eq!(shadow_count(&node.effects), ShadowConfig::default().layer_count);
    let stored = node.plugin_data(PLUGIN_DATA_KEY).expect("stored data");
    let data = PersistedShadowData::parse(&stored).expect("parse");
    assert_eq!(data.version, Some(crate::consts::PERSISTED_FORMAT_VERSION));
    assert_eq!(data.azimuth, 45.0);
}

#[test]
fn apply_without_update_stores_nothing() {
    let mut session = selected_session();
    session.handle(UiMessage::Apply).expect("apply");
    assert!(session.node().is_some_and(|n| n.data.is_empty()));
}

// =============================================================
// Protocol
// =============================================================

#[test]
fn ui_messages_use_type_and_data_envelope() {
    let msg: UiMessage = serde_json::from_str(r#"{"type":"RESIZE_WINDOW","data":{"width":400,"height":380}}"#).expect("parse");
    assert_eq!(msg, UiMessage::ResizeWindow(Size::new(400.0, 380.0)));
    let msg: UiMessage = serde_json::from_str(r#"{"type":"APPLY"}"#).expect("parse");
    assert_eq!(msg, UiMessage::Apply);
}

#[test]
fn update_shadows_message_accepts_legacy_payload() {
    let raw = r#"{"type":"UPDATE_SHADOWS","data":{"azimuth":1,"distance":2,"elevation":0.5,"brightness":0.5}}"#;
    let msg: UiMessage = serde_json::from_str(raw).expect("parse");
    assert!(matches!(msg, UiMessage::UpdateShadows(ref p) if p.light_position.is_none()));
}

#[test]
fn resize_and_show_message_pass_through() {
    let mut session = selected_session();
    let resize = session.handle(UiMessage::ResizeWindow(Size::new(100.0, 100.0))).expect("resize");
    assert_eq!(resize, vec![HostCommand::ResizeUi(Size::new(340.0, 340.0))]);
    let notify = session.handle(UiMessage::ShowMessage("hi".into())).expect("notify");
    assert_eq!(notify, vec![HostCommand::Notify("hi".into())]);
}

#[test]
fn effects_round_trip_through_host_json() {
    let effects = vec![blur(), old_shadow()];
    let json = serde_json::to_string(&effects).expect("serialize");
    assert!(json.contains("\"LAYER_BLUR\"") && json.contains("\"DROP_SHADOW\""));
    let back: Vec<Effect> = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, effects);
}

#[test]
fn host_message_carries_selection_state() {
    let msg = HostMessage::SelectionChange(Selection::Multiple);
    let json = serde_json::to_value(&msg).expect("serialize");
    assert_eq!(json["type"], "SELECTION_CHANGE");
    assert_eq!(json["data"]["state"], "MULTIPLE");
}

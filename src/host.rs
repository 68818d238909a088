//! Host boundary: message protocol, the node seam, and the editing session.
//!
//! DESIGN
//! ======
//! The design tool's runtime is reached only through [`ShadowNode`], so the
//! session logic runs unchanged against a real host binding or an in-memory
//! node in tests. The UI and the runtime talk through [`UiMessage`] and
//! [`HostMessage`], serialized as `{"type": ..., "data": ...}`.
//!
//! A session remembers a node's effects when it is selected. Every update
//! replaces the node's drop and inner shadows wholesale, leaving blurs alone.
//! Switching away or closing without applying puts the remembered effects back;
//! closing after apply keeps the shadow and stores its settings on the node.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use serde::{Deserialize, Serialize};

use crate::config::ShadowConfig;
use crate::consts::{PLUGIN_DATA_KEY, WINDOW_MAX_HEIGHT, WINDOW_MAX_WIDTH, WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH};
use crate::geometry::{Size, clamp};
use crate::persist::{PersistError, PersistedShadowData};
use crate::scene::Scene;
use crate::selection::{SelectedNode, Selection, validate_selection};
use crate::shadow::{ShadowEffect, to_effects};

// =============================================================================
// EFFECTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlurKind {
    LayerBlur,
    BackgroundBlur,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurEffect {
    #[serde(rename = "type")]
    pub kind: BlurKind,
    pub radius: f64,
    pub visible: bool,
}

/// An effect on a host node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Effect {
    Shadow(ShadowEffect),
    Blur(BlurEffect),
}

impl Effect {
    #[must_use]
    pub fn is_shadow(&self) -> bool {
        matches!(self, Self::Shadow(_))
    }
}

// =============================================================================
// NODE SEAM
// =============================================================================

/// The operations the session needs from a host design node.
pub trait ShadowNode {
    fn size(&self) -> Size;
    fn effects(&self) -> Vec<Effect>;
    fn set_effects(&mut self, effects: Vec<Effect>);
    fn plugin_data(&self, key: &str) -> Option<String>;
    fn set_plugin_data(&mut self, key: &str, value: String);
    /// The node was deleted while selected; it must not be touched.
    fn is_removed(&self) -> bool;
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Runtime to UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    SelectionChange(Selection),
}

/// UI to runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiMessage {
    UpdateShadows(PersistedShadowData),
    ResizeWindow(Size),
    ShowMessage(String),
    Apply,
    Close,
}

/// What the runtime binding must do in response to a session event.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    PostToUi(HostMessage),
    Notify(String),
    ResizeUi(Size),
    ClosePlugin,
}

/// Clamp a requested plugin window size to what the host allows.
#[must_use]
pub fn clamp_window_size(size: Size) -> Size {
    Size::new(
        clamp(size.width, WINDOW_MIN_WIDTH, WINDOW_MAX_WIDTH),
        clamp(size.height, WINDOW_MIN_HEIGHT, WINDOW_MAX_HEIGHT),
    )
}

// =============================================================================
// SESSION
// =============================================================================

pub struct ShadowSession<N: ShadowNode> {
    config: ShadowConfig,
    node: Option<N>,
    original_effects: Vec<Effect>,
    payload: Option<PersistedShadowData>,
    applied: bool,
}

impl<N: ShadowNode> ShadowSession<N> {
    #[must_use]
    pub fn new(config: ShadowConfig) -> Self {
        Self { config, node: None, original_effects: Vec::new(), payload: None, applied: false }
    }

    #[must_use]
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// React to a selection change.
    ///
    /// `nodes` describes the selection; `handle` is the single selected node
    /// when there is exactly one. Returns the node released from the session,
    /// if any, with its original effects back in place.
    pub fn on_selection_change(&mut self, nodes: &[SelectedNode], handle: Option<N>) -> (Vec<HostCommand>, Option<N>) {
        let selection = validate_selection(nodes);
        let mut commands = Vec::new();
        let released = self.release();

        match (&selection, handle) {
            (Selection::Valid(_), Some(node)) => {
                if node.is_removed() {
                    tracing::warn!("selected node already removed");
                } else {
                    self.original_effects = node.effects();
                    self.node = Some(node);
                }
            }
            (Selection::Valid(_), None) => tracing::warn!("valid selection without a node handle"),
            (Selection::Empty, _) => {}
            _ => commands.extend(selection.message().map(|m| HostCommand::Notify(m.to_owned()))),
        }

        commands.push(HostCommand::PostToUi(HostMessage::SelectionChange(selection)));
        (commands, released)
    }

    /// Handle a UI message.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] only from [`UiMessage::Close`] after apply,
    /// when the settings cannot be serialized for storage.
    pub fn handle(&mut self, message: UiMessage) -> Result<Vec<HostCommand>, PersistError> {
        match message {
            UiMessage::UpdateShadows(payload) => {
                self.update(payload);
                Ok(Vec::new())
            }
            UiMessage::ResizeWindow(size) => Ok(vec![HostCommand::ResizeUi(clamp_window_size(size))]),
            UiMessage::ShowMessage(text) => Ok(vec![HostCommand::Notify(text)]),
            UiMessage::Apply => {
                self.apply();
                self.close()?;
                Ok(vec![HostCommand::ClosePlugin])
            }
            UiMessage::Close => {
                self.close()?;
                Ok(vec![HostCommand::ClosePlugin])
            }
        }
    }

    /// Draw the shadow described by `payload` onto the selected node.
    pub fn update(&mut self, payload: PersistedShadowData) {
        if let Some(node) = self.node.as_mut().filter(|n| !n.is_removed()) {
            let scene = Scene::from_payload(&payload);
            let layers = scene.layers(node.size(), &self.config);
            let mut effects: Vec<Effect> = node.effects().into_iter().filter(|e| !e.is_shadow()).collect();
            effects.extend(to_effects(&layers, scene.shadow_type).into_iter().map(Effect::Shadow));
            node.set_effects(effects);
        }
        self.payload = Some(payload);
    }

    /// Mark the current shadow as committed.
    pub fn apply(&mut self) {
        tracing::info!(has_node = self.node.is_some(), "shadow applied");
        self.applied = true;
    }

    /// End the session: store settings if applied, otherwise restore original effects.
    ///
    /// # Errors
    ///
    /// [`PersistError`] when the applied settings cannot be serialized.
    pub fn close(&mut self) -> Result<(), PersistError> {
        if !self.applied {
            tracing::info!("closing without apply; restoring effects");
            self.release();
            return Ok(());
        }
        match (self.node.as_mut(), self.payload.as_ref()) {
            (Some(node), Some(payload)) if !node.is_removed() => {
                node.set_plugin_data(PLUGIN_DATA_KEY, payload.to_json()?);
                tracing::info!(azimuth = payload.azimuth, distance = payload.distance, "shadow settings stored");
            }
            _ => tracing::debug!("nothing to store on close"),
        }
        Ok(())
    }

    /// Put the remembered effects back and drop the node from the session.
    fn release(&mut self) -> Option<N> {
        let mut node = self.node.take()?;
        let effects = std::mem::take(&mut self.original_effects);
        if !node.is_removed() {
            node.set_effects(effects);
        }
        Some(node)
    }
}

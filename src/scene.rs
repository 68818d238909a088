//! Scene reconciliation: the single owner of light, target, background and
//! the derived scene record.
//!
//! DESIGN
//! ======
//! `SceneState` is the only place logical preview state lives. Widgets feed it
//! drag samples and numeric entry; it answers with a list of [`Action`]s for
//! the embedding layer to carry out (re-render, notify the host, resize the
//! window). Nothing else mutates the light or target.
//!
//! The [`Scene`] record is rebuilt from scratch on every change and swapped in
//! whole, so readers never see a half-updated record. Light position changes
//! are throttled before they trigger a rebuild; scene-to-host updates are
//! debounced so a burst of rebuilds reaches the host once, with its final
//! state. Both schedulers are polled by [`SceneState::tick_at`].

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, derive_tint};
use crate::config::ShadowConfig;
use crate::consts::{
    BACKGROUND_DEFAULT_RGB, PREVIEW_TARGET_FALLBACK_RADIUS, PREVIEW_TARGET_MIN_SIZE, PREVIEW_TARGET_SIZE,
    WINDOW_INITIAL_HEIGHT, WINDOW_INITIAL_WIDTH,
};
use crate::geometry::{
    Point, Size, angle_between, clamp, denormalize, distance_between, max_distance, normalize, polar_offset,
    reachable_distance, resize_retaining_aspect,
};
use crate::host::clamp_window_size;
use crate::input::{
    DragEvent, LightSource, Target, drag_brightness, drag_elevation, drag_light, reconcile_resize,
};
use crate::params::{ParamError, ParamField, validate_azimuth, validate_distance, validate_percent};
use crate::persist::{PersistedShadowData, RestoreOutcome};
use crate::schedule::Scheduler;
use crate::selection::ValidSelection;
use crate::shadow::{ShadowKind, ShadowLayer, ShadowParams, cast_shadow_with, css_box_shadow};

// =============================================================================
// SCENE RECORD
// =============================================================================

/// Authoritative snapshot of the shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Degrees, `[0, 360)`.
    pub azimuth: f64,
    /// Preview pixels, `>= 0`.
    pub distance: f64,
    pub elevation: f64,
    pub brightness: f64,
    /// Effective background beneath the target.
    pub background_color: Option<Rgba>,
    /// User-picked shadow color; replaces the derived tint when set.
    pub shadow_color: Option<Rgba>,
    pub shadow_type: ShadowKind,
}

impl Scene {
    /// Scene described by a stored or transmitted payload. Unreadable colors are dropped.
    #[must_use]
    pub fn from_payload(data: &PersistedShadowData) -> Self {
        Self {
            azimuth: data.azimuth,
            distance: data.distance,
            elevation: data.elevation,
            brightness: data.brightness,
            background_color: parse_stored_color(data.background_color.as_deref()),
            shadow_color: parse_stored_color(data.shadow_color.as_deref()),
            shadow_type: data.shadow_type.unwrap_or_default(),
        }
    }

    /// Color applied to every layer before per-layer alpha.
    #[must_use]
    pub fn tint(&self, config: &ShadowConfig) -> Rgba {
        match self.shadow_color {
            Some(color) => color,
            None => derive_tint(self.background_color, config.tint_lightness_delta, config.tint_min_lightness),
        }
    }

    #[must_use]
    pub fn shadow_params(&self, size: Size, config: &ShadowConfig) -> ShadowParams {
        ShadowParams {
            layer_count: config.layer_count,
            azimuth: self.azimuth,
            distance: self.distance,
            elevation: self.elevation,
            brightness: self.brightness,
            tint: self.tint(config),
            size,
        }
    }

    /// Layer stack for an element of `size`.
    #[must_use]
    pub fn layers(&self, size: Size, config: &ShadowConfig) -> Vec<ShadowLayer> {
        cast_shadow_with(&self.shadow_params(size, config), config)
    }
}

// =============================================================================
// BACKGROUND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundPreference {
    /// Ignore the canvas; use the neutral default.
    Disabled,
    /// Use the color detected beneath the selection.
    #[default]
    Auto,
    /// Use the user's color.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Background {
    pub preference: BackgroundPreference,
    pub detected: Option<Rgba>,
    pub custom: Option<Rgba>,
}

impl Background {
    #[must_use]
    pub fn default_color() -> Rgba {
        let (r, g, b) = BACKGROUND_DEFAULT_RGB;
        Rgba::from_rgb8(r, g, b)
    }

    /// The background the tint is derived from. Missing colors fall back to the default.
    #[must_use]
    pub fn effective(&self) -> Rgba {
        let chosen = match self.preference {
            BackgroundPreference::Disabled => None,
            BackgroundPreference::Auto => self.detected,
            BackgroundPreference::Custom => self.custom,
        };
        chosen.unwrap_or_else(Self::default_color)
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Side effects requested by [`SceneState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene record was replaced; re-render the preview shadow.
    SceneChanged(Scene),
    /// Light moved without a scene rebuild; redraw the light and guides.
    RenderNeeded,
    /// Debounced payload for the host to draw onto the selected node.
    UpdateHost(PersistedShadowData),
    ResizeWindow(Size),
    Notify(String),
}

// =============================================================================
// PREVIEW TARGET
// =============================================================================

/// How the selected element is drawn in the preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStyle {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// Visual lift from elevation; presentation only.
    pub scale: f64,
    pub selected: bool,
}

/// Preview rendering of `selection`, fitted into the fixed preview box.
#[must_use]
pub fn target_style(selection: Option<&ValidSelection>, elevation: f64, config: &ShadowConfig) -> TargetStyle {
    let (width, height, radius) = selection.map_or((0.0, 0.0, 0.0), |s| (s.width, s.height, s.corner_radius));
    let fitted = resize_retaining_aspect(width, height, PREVIEW_TARGET_SIZE, PREVIEW_TARGET_SIZE);
    let edge = |v: f64| {
        let v = if v > 0.0 { v } else { PREVIEW_TARGET_SIZE };
        v.max(PREVIEW_TARGET_MIN_SIZE)
    };
    let scaled_radius = radius * fitted.ratio;
    TargetStyle {
        width: edge(fitted.width),
        height: edge(fitted.height),
        corner_radius: if scaled_radius > 0.0 { scaled_radius } else { PREVIEW_TARGET_FALLBACK_RADIUS },
        scale: elevation_scale(elevation, config),
        selected: selection.is_some(),
    }
}

/// Damped scale for the target widget: 1.125 at elevation 0, 1.375 at 1.
#[must_use]
pub fn elevation_scale(elevation: f64, config: &ShadowConfig) -> f64 {
    let range = config.elevation_drag_range;
    let offset = denormalize(elevation, range, -range);
    normalize(offset, range * 4.0, -range * 4.0) + 0.75
}

// =============================================================================
// SCENE STATE
// =============================================================================

pub struct SceneState {
    pub config: ShadowConfig,
    viewport: Size,
    pub light: LightSource,
    pub target: Target,
    pub background: Background,
    shadow_type: ShadowKind,
    shadow_color: Option<Rgba>,
    scene: Scene,
    light_moves: Scheduler<Point>,
    host_updates: Scheduler<PersistedShadowData>,
}

impl SceneState {
    #[must_use]
    pub fn new(config: ShadowConfig) -> Self {
        let viewport = Size::new(WINDOW_INITIAL_WIDTH, WINDOW_INITIAL_HEIGHT);
        let mut state = Self {
            config,
            viewport,
            light: LightSource::initial(viewport, config.light_size),
            target: Target::centered_in(viewport),
            background: Background::default(),
            shadow_type: ShadowKind::default(),
            shadow_color: None,
            scene: Scene::default(),
            light_moves: Scheduler::throttle(config.throttle_interval),
            host_updates: Scheduler::debounce(config.host_update_delay),
        };
        state.scene = state.derive_scene();
        state
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Target anchor in light coordinates.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.target.anchor(self.light.size)
    }

    /// Largest distance accepted by numeric entry at the current azimuth.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        max_distance(self.scene.azimuth, self.viewport, self.light.size)
    }

    // --- Viewport ---

    /// Adopt a newly measured preview size. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, viewport: Size) -> Vec<Action> {
        if viewport.is_degenerate() || viewport == self.viewport {
            return Vec::new();
        }
        self.viewport = viewport;
        self.target.position = viewport.center();
        reconcile_resize(&mut self.light, viewport, &self.config);
        self.rebuild(Instant::now())
    }

    // --- Drags ---

    pub fn on_light_drag(&mut self, event: DragEvent) -> Vec<Action> {
        self.on_light_drag_at(event, Instant::now())
    }

    /// Light position sample. Rebuilds are throttled; the release sample always rebuilds.
    pub fn on_light_drag_at(&mut self, event: DragEvent, now: Instant) -> Vec<Action> {
        let snapped = drag_light(&mut self.light, event, self.viewport, &self.config);
        let emitted = if event.down {
            self.light_moves.push_at(snapped.position, now)
        } else {
            self.light_moves.cancel();
            Some(snapped.position)
        };
        match emitted {
            Some(_) => self.rebuild(now),
            None => vec![Action::RenderNeeded],
        }
    }

    pub fn on_brightness_drag(&mut self, event: DragEvent) -> Vec<Action> {
        drag_brightness(&mut self.light, event, &self.config);
        self.rebuild(Instant::now())
    }

    pub fn on_elevation_drag(&mut self, event: DragEvent) -> Vec<Action> {
        drag_elevation(&mut self.target, event, &self.config);
        self.rebuild(Instant::now())
    }

    // --- Numeric entry ---

    /// Typed azimuth in degrees. Moves the light around the target at the
    /// current distance, shortened to what the light can reach at the new angle.
    ///
    /// # Errors
    ///
    /// Rejects non-finite values and values outside `0..=360`; state is unchanged.
    pub fn set_azimuth(&mut self, degrees: f64) -> Result<Vec<Action>, ParamError> {
        let azimuth = validate_azimuth(degrees)? % 360.0;
        Ok(self.place_light(azimuth, self.scene.distance))
    }

    /// Typed distance in preview pixels along the current azimuth.
    ///
    /// # Errors
    ///
    /// Rejects values outside `0..=max_distance()`; state is unchanged.
    pub fn set_distance(&mut self, distance: f64) -> Result<Vec<Action>, ParamError> {
        let distance = validate_distance(distance, self.max_distance())?;
        Ok(self.place_light(self.scene.azimuth, distance))
    }

    /// Typed brightness percentage.
    ///
    /// # Errors
    ///
    /// Rejects values outside `0..=100`; state is unchanged.
    pub fn set_brightness_percent(&mut self, percent: f64) -> Result<Vec<Action>, ParamError> {
        let fraction = validate_percent(ParamField::Brightness, percent)?;
        self.light.brightness = fraction.max(self.config.min_brightness);
        Ok(self.rebuild(Instant::now()))
    }

    /// Typed elevation percentage.
    ///
    /// # Errors
    ///
    /// Rejects values outside `0..=100`; state is unchanged.
    pub fn set_elevation_percent(&mut self, percent: f64) -> Result<Vec<Action>, ParamError> {
        let fraction = validate_percent(ParamField::Elevation, percent)?;
        self.target.elevation = fraction.max(self.config.min_elevation);
        Ok(self.rebuild(Instant::now()))
    }

    // --- Appearance ---

    pub fn set_background_preference(&mut self, preference: BackgroundPreference) -> Vec<Action> {
        self.background.preference = preference;
        self.rebuild(Instant::now())
    }

    /// Color found beneath the selection, if any.
    pub fn set_detected_background(&mut self, color: Option<Rgba>) -> Vec<Action> {
        self.background.detected = color;
        self.rebuild(Instant::now())
    }

    pub fn set_custom_background(&mut self, color: Rgba) -> Vec<Action> {
        self.background.custom = Some(color);
        self.background.preference = BackgroundPreference::Custom;
        self.rebuild(Instant::now())
    }

    pub fn set_shadow_color(&mut self, color: Option<Rgba>) -> Vec<Action> {
        self.shadow_color = color;
        self.rebuild(Instant::now())
    }

    pub fn toggle_shadow_type(&mut self) -> Vec<Action> {
        self.shadow_type = self.shadow_type.toggled();
        self.rebuild(Instant::now())
    }

    // --- Scheduling ---

    /// Earliest instant [`SceneState::tick_at`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.light_moves.next_deadline(), self.host_updates.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn tick(&mut self) -> Vec<Action> {
        self.tick_at(Instant::now())
    }

    /// Emit held light moves and host updates whose time has come.
    pub fn tick_at(&mut self, now: Instant) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.light_moves.poll_at(now).is_some() {
            actions.extend(self.rebuild(now));
        }
        if let Some(payload) = self.host_updates.poll_at(now) {
            tracing::debug!(azimuth = payload.azimuth, distance = payload.distance, "host update emitted");
            actions.push(Action::UpdateHost(payload));
        }
        actions
    }

    /// Emit everything held right away, e.g. before applying.
    pub fn flush(&mut self) -> Vec<Action> {
        let now = Instant::now();
        let mut actions = Vec::new();
        if self.light_moves.flush_at(now).is_some() {
            actions.extend(self.rebuild(now));
        }
        if let Some(payload) = self.host_updates.flush_at(now) {
            actions.push(Action::UpdateHost(payload));
        }
        actions
    }

    // --- Persistence ---

    /// Payload describing the current scene for the host and for storage.
    #[must_use]
    pub fn payload(&self) -> PersistedShadowData {
        PersistedShadowData {
            azimuth: self.scene.azimuth,
            distance: self.scene.distance,
            elevation: self.scene.elevation,
            brightness: self.scene.brightness,
            background_color: self.scene.background_color.map(Rgba::to_hex),
            background_preference: Some(self.background.preference),
            shadow_color: self.scene.shadow_color.map(Rgba::to_hex),
            shadow_type: Some(self.scene.shadow_type),
            light_position: Some(self.light.position),
            preview_bounds: Some(self.viewport),
            version: None,
        }
    }

    /// Load settings stored on a previously edited node.
    ///
    /// The preview adopts the stored bounds (clamped to the window limits) so the
    /// stored light position means what it meant when saved. When the bounds had
    /// to be clamped, or the record has no light position, the light is placed
    /// from the stored azimuth and distance instead.
    pub fn restore(&mut self, data: &PersistedShadowData) -> Vec<Action> {
        let outcome = data.restore_outcome();
        let bounds = data.preview_bounds.unwrap_or(Size::new(WINDOW_INITIAL_WIDTH, WINDOW_INITIAL_HEIGHT));
        let window = clamp_window_size(bounds);
        let mut actions = vec![Action::ResizeWindow(window)];

        self.light_moves.cancel();
        self.viewport = window;
        self.target.position = window.center();
        self.light.brightness = clamp(data.brightness, self.config.min_brightness, 1.0);
        self.target.elevation = clamp(data.elevation, self.config.min_elevation, 1.0);
        self.shadow_type = data.shadow_type.unwrap_or_default();
        self.shadow_color = parse_stored_color(data.shadow_color.as_deref());
        self.restore_background(data);

        let scene = match data.light_position {
            Some(position) if window == bounds => {
                self.light.position = position;
                reconcile_resize(&mut self.light, window, &self.config);
                self.derive_scene()
            }
            _ => {
                let azimuth = if data.azimuth.is_finite() { data.azimuth.rem_euclid(360.0) } else { 0.0 };
                let distance = if data.distance.is_finite() { data.distance.max(0.0) } else { 0.0 };
                self.position_light(azimuth, distance)
            }
        };

        match outcome {
            RestoreOutcome::Full => tracing::info!("shadow settings restored"),
            RestoreOutcome::Partial => {
                tracing::warn!(version = ?data.version, "shadow settings partially restored");
            }
        }
        actions.extend(self.commit(scene, Instant::now()));
        actions.push(Action::Notify(outcome.message().to_owned()));
        actions
    }

    /// Records without a preference leave the current background alone.
    fn restore_background(&mut self, data: &PersistedShadowData) {
        match data.background_preference {
            Some(BackgroundPreference::Custom) => {
                if let Some(color) = parse_stored_color(data.background_color.as_deref()) {
                    self.background.custom = Some(color);
                }
                self.background.preference = BackgroundPreference::Custom;
            }
            Some(preference) => self.background.preference = preference,
            None => {}
        }
    }

    // --- Preview ---

    /// Layer stack for the fixed-size preview target.
    #[must_use]
    pub fn preview_layers(&self) -> Vec<ShadowLayer> {
        self.scene.layers(Size::new(PREVIEW_TARGET_SIZE, PREVIEW_TARGET_SIZE), &self.config)
    }

    /// CSS `box-shadow` for the preview target.
    #[must_use]
    pub fn preview_box_shadow(&self) -> String {
        css_box_shadow(&self.preview_layers(), self.scene.shadow_type)
    }

    // --- Internals ---

    fn place_light(&mut self, azimuth: f64, distance: f64) -> Vec<Action> {
        let scene = self.position_light(azimuth, distance);
        self.commit(scene, Instant::now())
    }

    /// Put the light at `azimuth`/`distance` around the target and return the
    /// scene with exactly those values. Distance is capped by the reach at
    /// `azimuth`.
    fn position_light(&mut self, azimuth: f64, distance: f64) -> Scene {
        let distance = distance.min(reachable_distance(azimuth, self.viewport, self.light.size));
        let offset = polar_offset(azimuth, distance);
        let anchor = self.anchor();
        let max_x = (self.viewport.width - self.light.size).max(0.0);
        let max_y = (self.viewport.height - self.light.size).max(0.0);
        self.light.position =
            Point::new(clamp(anchor.x - offset.x, 0.0, max_x), clamp(anchor.y - offset.y, 0.0, max_y));
        self.light_moves.cancel();
        Scene { azimuth, distance, ..self.derive_scene() }
    }

    fn derive_scene(&self) -> Scene {
        let anchor = self.anchor();
        let azimuth = angle_between(anchor, self.light.position);
        let reach = reachable_distance(azimuth, self.viewport, self.light.size);
        let distance = distance_between(anchor, self.light.position).min(reach);
        Scene {
            azimuth,
            distance,
            elevation: self.target.elevation,
            brightness: self.light.brightness,
            background_color: Some(self.background.effective()),
            shadow_color: self.shadow_color,
            shadow_type: self.shadow_type,
        }
    }

    fn rebuild(&mut self, now: Instant) -> Vec<Action> {
        let scene = self.derive_scene();
        self.commit(scene, now)
    }

    fn commit(&mut self, scene: Scene, now: Instant) -> Vec<Action> {
        self.scene = scene;
        tracing::debug!(
            azimuth = scene.azimuth,
            distance = scene.distance,
            elevation = scene.elevation,
            brightness = scene.brightness,
            "scene recomputed"
        );
        let payload = self.payload();
        if let Some(ready) = self.host_updates.push_at(payload, now) {
            return vec![Action::SceneChanged(scene), Action::UpdateHost(ready)];
        }
        vec![Action::SceneChanged(scene)]
    }
}

fn parse_stored_color(raw: Option<&str>) -> Option<Rgba> {
    match Rgba::from_hex(raw?) {
        Ok(color) => Some(color),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring stored color");
            None
        }
    }
}

// extensions/tween.rs
//
// Tween system: fire-and-forget animation of node and camera properties.
// Completions are reported by TweenId rather than through closures, so the
// caller decides what a completion means (and whether it is still current).
//
// Usage:
//   let mut tweens = TweenAnimator::new();
//   let id = tweens.animate(Tween::position(node, to, 0.5, Easing::QuadOut).notify());
//   tweens.tick(dt, &mut stage);
//   for done in tweens.drain_completed() { ... }

use std::collections::BTreeMap;

use glam::Vec3;

use super::easing::{ease, ease_vec3, Easing};
use crate::api::types::NodeId;
use crate::core::stage::Stage;

/// Handle to a scheduled tween. Ids increase in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

/// What property a tween animates, and toward which value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Node position.
    Position { node: NodeId, to: Vec3 },
    /// Node uniform scale.
    Scale { node: NodeId, to: f32 },
    /// Node mesh opacity (ignored for nodes without an opacity channel).
    Opacity { node: NodeId, to: f32 },
    /// Camera position.
    CameraPosition { to: Vec3 },
    /// Orbit-controls look-at target.
    ControlsTarget { to: Vec3 },
    /// Animates nothing; only its completion matters.
    Delay,
}

impl TweenTarget {
    /// Two tweens on the same channel write the same property.
    fn channel(&self) -> Option<(u8, Option<NodeId>)> {
        match *self {
            TweenTarget::Position { node, .. } => Some((0, Some(node))),
            TweenTarget::Scale { node, .. } => Some((1, Some(node))),
            TweenTarget::Opacity { node, .. } => Some((2, Some(node))),
            TweenTarget::CameraPosition { .. } => Some((3, None)),
            TweenTarget::ControlsTarget { .. } => Some((4, None)),
            TweenTarget::Delay => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StartValue {
    Scalar(f32),
    Vector(Vec3),
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    /// Report this tween through `drain_completed` when it finishes.
    pub notify: bool,
    /// Captured from the live value on the first tick.
    from: Option<StartValue>,
    /// A newer tween took over the channel; this one runs out silently.
    superseded: bool,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            notify: false,
            from: None,
            superseded: false,
        }
    }

    pub fn position(node: NodeId, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { node, to }, duration, easing)
    }

    pub fn scale(node: NodeId, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { node, to }, duration, easing)
    }

    pub fn opacity(node: NodeId, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Opacity { node, to }, duration, easing)
    }

    pub fn camera_position(to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::CameraPosition { to }, duration, easing)
    }

    pub fn controls_target(to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::ControlsTarget { to }, duration, easing)
    }

    pub fn delay(duration: f32) -> Self {
        Self::new(TweenTarget::Delay, duration, Easing::Linear).notify()
    }

    // -- Builder methods --

    pub fn notify(mut self) -> Self {
        self.notify = true;
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn read_start(&self, stage: &Stage) -> Option<StartValue> {
        match self.target {
            TweenTarget::Position { node, .. } => {
                stage.scene.get(node).map(|n| StartValue::Vector(n.position))
            }
            TweenTarget::Scale { node, .. } => {
                stage.scene.get(node).map(|n| StartValue::Scalar(n.scale))
            }
            TweenTarget::Opacity { node, .. } => {
                stage.scene.get(node).map(|n| StartValue::Scalar(n.opacity()))
            }
            TweenTarget::CameraPosition { .. } => Some(StartValue::Vector(stage.camera.position)),
            TweenTarget::ControlsTarget { .. } => Some(StartValue::Vector(stage.controls.target)),
            TweenTarget::Delay => None,
        }
    }

    fn apply(&self, stage: &mut Stage) {
        let t = self.progress();
        match (self.target, self.from) {
            (TweenTarget::Position { node, to }, Some(StartValue::Vector(from))) => {
                if let Some(n) = stage.scene.get_mut(node) {
                    n.position = ease_vec3(from, to, t, self.easing);
                }
            }
            (TweenTarget::Scale { node, to }, Some(StartValue::Scalar(from))) => {
                if let Some(n) = stage.scene.get_mut(node) {
                    n.scale = ease(from, to, t, self.easing);
                }
            }
            (TweenTarget::Opacity { node, to }, Some(StartValue::Scalar(from))) => {
                if let Some(n) = stage.scene.get_mut(node) {
                    n.set_opacity(ease(from, to, t, self.easing));
                }
            }
            (TweenTarget::CameraPosition { to }, Some(StartValue::Vector(from))) => {
                stage.camera.position = ease_vec3(from, to, t, self.easing);
            }
            (TweenTarget::ControlsTarget { to }, Some(StartValue::Vector(from))) => {
                stage.controls.target = ease_vec3(from, to, t, self.easing);
            }
            _ => {}
        }
    }
}

/// The scheduling surface the orchestration code depends on.
///
/// There is no cancel. Callers discard superseded work by
/// ignoring its completion instead.
pub trait Animator {
    /// Schedule a tween. Its id is reported by `drain_completed` when it
    /// finishes, if the tween was built with `notify()`.
    fn animate(&mut self, tween: Tween) -> TweenId;

    /// Schedule a bare timer; always reported on completion.
    fn delay(&mut self, duration: f32) -> TweenId {
        self.animate(Tween::delay(duration))
    }

    /// Advance all tweens and write their values into the stage.
    fn tick(&mut self, dt: f32, stage: &mut Stage);

    /// Completed notifying tweens, in the order they were scheduled.
    fn drain_completed(&mut self) -> Vec<TweenId>;

    /// No tween is running.
    fn is_idle(&self) -> bool;
}

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenAnimator {
    tweens: BTreeMap<TweenId, Tween>,
    next_id: u64,
    completed: Vec<TweenId>,
}

impl TweenAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed.clear();
    }
}

impl Animator for TweenAnimator {
    fn animate(&mut self, tween: Tween) -> TweenId {
        if let Some(channel) = tween.target.channel() {
            for older in self.tweens.values_mut() {
                if older.target.channel() == Some(channel) {
                    older.superseded = true;
                }
            }
        }
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, tween);
        id
    }

    fn tick(&mut self, dt: f32, stage: &mut Stage) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut finished = Vec::new();

        for (&id, tween) in self.tweens.iter_mut() {
            if !tween.superseded {
                if tween.from.is_none() {
                    tween.from = tween.read_start(stage);
                }
                tween.elapsed += dt;
                tween.apply(stage);
            } else {
                tween.elapsed += dt;
            }

            if tween.is_complete() {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(tween) = self.tweens.remove(&id) {
                if tween.notify {
                    self.completed.push(id);
                }
            }
        }
    }

    fn drain_completed(&mut self) -> Vec<TweenId> {
        std::mem::take(&mut self.completed)
    }

    fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }
}

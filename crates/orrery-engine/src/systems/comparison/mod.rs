//! Side-by-side comparison of two bodies.
//!
//! Each slot is a small state machine (`SlotState`) driven by requests and
//! by animation completions. Every completion carries the generation its
//! transition started under; a completion whose generation is no longer the
//! slot's current one is stale and changes nothing. That check is what keeps
//! rapid repeated requests safe without any way to cancel an animation.

pub mod slot;

use std::collections::HashMap;

use glam::Vec3;

use crate::api::context::EngineContext;
use crate::api::error::OrreryError;
use crate::api::types::{canonical_name, NodeId, Notice, Slot};
use crate::assets::config::ComparisonConfig;
use crate::assets::registry::{BodyInstance, BodyRegistry};
use crate::components::node::{BoundingSphere, Node};
use crate::core::scene::Scene;
use crate::extensions::tween::{Tween, TweenId};
use crate::systems::layout::{
    compute_framing, entry_target, frame_spheres, solo_camera_distance, solo_target, Framing,
};

pub use slot::{ComparisonSlot, Phase, SlotPhase, SlotState, Transition};

/// Read-only view of what each slot is showing (or heading toward).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSnapshot {
    pub left: Option<String>,
    pub right: Option<String>,
}

pub struct ComparisonOrchestrator {
    config: ComparisonConfig,
    slots: [ComparisonSlot; 2],
    /// In-flight transitions keyed by the tween whose completion ends them.
    pending: HashMap<TweenId, Transition>,
}

impl ComparisonOrchestrator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            config,
            slots: [ComparisonSlot::new(Slot::Left), ComparisonSlot::new(Slot::Right)],
            pending: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn slot(&self, slot: Slot) -> &ComparisonSlot {
        match slot {
            Slot::Left => &self.slots[0],
            Slot::Right => &self.slots[1],
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut ComparisonSlot {
        match slot {
            Slot::Left => &mut self.slots[0],
            Slot::Right => &mut self.slots[1],
        }
    }

    /// Check a request without touching any state. Returns the canonical
    /// names.
    pub fn validate(
        registry: &BodyRegistry,
        left: &str,
        right: &str,
    ) -> Result<(String, String), OrreryError> {
        let left = canonical_name(left);
        let right = canonical_name(right);
        if left.is_empty() || right.is_empty() {
            return Err(OrreryError::invalid("select two bodies to compare"));
        }
        if left == right {
            return Err(OrreryError::invalid("select two different bodies"));
        }
        for name in [&left, &right] {
            if !registry.contains(name) {
                return Err(OrreryError::not_found(name.as_str()));
            }
        }
        Ok((left, right))
    }

    /// Show `left` and `right` side by side.
    ///
    /// Malformed requests and unknown names are rejected before any slot
    /// changes.
    pub fn request(
        &mut self,
        ctx: &mut EngineContext,
        left: &str,
        right: &str,
    ) -> Result<(), OrreryError> {
        let (left, right) = Self::validate(&ctx.registry, left, right)?;

        let swap = self.slot(Slot::Left).target_name() == Some(right.as_str())
            && self.slot(Slot::Right).target_name() == Some(left.as_str());
        if swap {
            log::debug!("comparison: swapping {left} and {right}");
        }

        self.request_slot(ctx, Slot::Left, &left, swap);
        self.request_slot(ctx, Slot::Right, &right, swap);

        if self.is_settled() {
            self.apply_layout(ctx);
        }
        Ok(())
    }

    fn request_slot(&mut self, ctx: &mut EngineContext, slot: Slot, name: &str, force: bool) {
        let current = self.slot(slot);
        if !force && current.target_name() == Some(name) {
            if let SlotState::Active { occupant } = current.state() {
                reassert(ctx, occupant.node());
            }
            log::debug!("comparison: {slot} slot retains {name}");
            return;
        }

        let generation = self.slot_mut(slot).bump();
        match self.slot_mut(slot).take_state() {
            SlotState::Empty => self.spawn_into(ctx, slot, name, generation),
            SlotState::Populating { occupant } | SlotState::Active { occupant } => {
                self.begin_exit(ctx, slot, occupant, name, generation, None);
            }
            SlotState::Despawning { outgoing, exit_to, .. } => {
                if outgoing.name() == name {
                    self.revive(ctx, slot, outgoing, generation);
                } else {
                    self.begin_exit(ctx, slot, outgoing, name, generation, Some(exit_to));
                }
            }
        }
    }

    fn exit_offset(&self) -> Vec3 {
        self.config.exit_axis.try_normalize().unwrap_or(Vec3::NEG_Y) * self.config.exit_offset
    }

    fn begin_exit(
        &mut self,
        ctx: &mut EngineContext,
        slot: Slot,
        outgoing: BodyInstance,
        next: &str,
        generation: u64,
        exit_to: Option<Vec3>,
    ) {
        let node = outgoing.node();
        let exit_to = exit_to.unwrap_or_else(|| {
            let from = ctx.stage.scene.get(node).map_or(self.config.anchor, |n| n.position);
            from + self.exit_offset()
        });

        let duration = self.config.transition_duration;
        let easing = self.config.exit_easing;
        let tween = ctx
            .animator
            .animate(Tween::position(node, exit_to, duration, easing).notify());
        ctx.animator.animate(Tween::opacity(node, 0.0, duration, easing));
        self.track(Transition { slot, generation, phase: Phase::Exit, tween });

        log::debug!(
            "comparison: {slot} slot exits {} for {next} (generation {generation})",
            outgoing.name()
        );
        self.slot_mut(slot).state = SlotState::Despawning {
            outgoing,
            next: next.to_string(),
            exit_to,
        };
    }

    /// Spawn `name` off-axis and transparent, then animate it into place.
    /// A failed spawn leaves the slot empty.
    fn spawn_into(&mut self, ctx: &mut EngineContext, slot: Slot, name: &str, generation: u64) {
        let instance = match ctx.registry.spawn(name, &mut ctx.stage.scene) {
            Ok(instance) => instance,
            Err(err) => {
                log::warn!("comparison: {slot} slot left empty: {err}");
                self.slot_mut(slot).state = SlotState::Empty;
                ctx.emit_notice(Notice::BodyNotFound { name: name.to_string() });
                return;
            }
        };

        let incoming = self.sphere_of(ctx, &instance);
        let partner = self.partner_sphere(ctx, slot);
        let rest = entry_target(slot, incoming, partner, &self.config);
        let start = rest + self.exit_offset();
        self.enter(ctx, slot, instance, rest, Some(start), generation);
    }

    /// Bring a leaving occupant back from wherever its exit got to.
    fn revive(&mut self, ctx: &mut EngineContext, slot: Slot, occupant: BodyInstance, generation: u64) {
        let sphere = self.sphere_of(ctx, &occupant);
        let partner = self.partner_sphere(ctx, slot);
        let rest = entry_target(slot, sphere, partner, &self.config);
        log::debug!("comparison: {slot} slot keeps {}", occupant.name());
        self.enter(ctx, slot, occupant, rest, None, generation);
    }

    fn enter(
        &mut self,
        ctx: &mut EngineContext,
        slot: Slot,
        occupant: BodyInstance,
        rest: Vec3,
        start: Option<Vec3>,
        generation: u64,
    ) {
        let node = occupant.node();
        if let Some(n) = ctx.stage.scene.get_mut(node) {
            if let Some(start) = start {
                n.position = start;
                n.set_opacity(0.0);
            }
            n.visible = true;
        }

        let duration = self.config.transition_duration;
        let easing = self.config.enter_easing;
        let tween = ctx
            .animator
            .animate(Tween::position(node, rest, duration, easing).notify());
        ctx.animator.animate(Tween::opacity(node, 1.0, duration, easing));
        self.track(Transition { slot, generation, phase: Phase::Enter, tween });

        log::debug!("comparison: {slot} slot enters {} (generation {generation})", occupant.name());
        self.slot_mut(slot).state = SlotState::Populating { occupant };
    }

    fn track(&mut self, transition: Transition) {
        self.pending.insert(transition.tween, transition);
    }

    fn sphere_of(&self, ctx: &EngineContext, instance: &BodyInstance) -> BoundingSphere {
        ctx.stage
            .scene
            .get(instance.node())
            .map(Node::bounding_sphere)
            .unwrap_or_else(|| {
                let radius = ctx.registry.comparison_radius(instance.name()).unwrap_or(0.0);
                BoundingSphere::new(self.config.anchor, radius)
            })
    }

    /// Bounds of whatever the other slot will end up showing.
    fn partner_sphere(&self, ctx: &EngineContext, slot: Slot) -> Option<BoundingSphere> {
        match self.slot(slot.other()).state() {
            SlotState::Empty => None,
            SlotState::Populating { occupant } | SlotState::Active { occupant } => {
                Some(self.sphere_of(ctx, occupant))
            }
            SlotState::Despawning { next, .. } => ctx
                .registry
                .comparison_radius(next)
                .map(|radius| BoundingSphere::new(self.config.anchor, radius)),
        }
    }

    /// Handle a tween completion. Returns true when the id belonged to a
    /// comparison transition, current or stale.
    pub fn on_complete(&mut self, ctx: &mut EngineContext, id: TweenId) -> bool {
        let Some(transition) = self.pending.remove(&id) else {
            return false;
        };
        match self.resolve(ctx, transition) {
            Ok(()) => {}
            Err(OrreryError::StaleTransition { slot, generation }) => {
                log::trace!("comparison: ignoring stale {slot} completion (generation {generation})");
            }
            Err(err) => log::warn!("comparison: {err}"),
        }
        true
    }

    fn resolve(&mut self, ctx: &mut EngineContext, transition: Transition) -> Result<(), OrreryError> {
        let Transition { slot, generation, phase, .. } = transition;
        let stale = OrreryError::StaleTransition { slot, generation };
        if self.slot(slot).generation() != generation {
            return Err(stale);
        }

        match (phase, self.slot_mut(slot).take_state()) {
            (Phase::Exit, SlotState::Despawning { outgoing, next, .. }) => {
                ctx.registry.release(outgoing, &mut ctx.stage.scene);
                self.spawn_into(ctx, slot, &next, generation);
            }
            (Phase::Enter, SlotState::Populating { occupant }) => {
                reassert(ctx, occupant.node());
                log::debug!("comparison: {slot} slot active with {}", occupant.name());
                self.slot_mut(slot).state = SlotState::Active { occupant };
            }
            (_, state) => {
                self.slot_mut(slot).state = state;
                return Err(stale);
            }
        }

        if self.is_settled() {
            self.apply_layout(ctx);
        }
        Ok(())
    }

    /// Drive both occupants and the camera to their final framing.
    /// Re-running it re-issues the same targets.
    fn apply_layout(&mut self, ctx: &mut EngineContext) {
        let left = self.active_node(Slot::Left);
        let right = self.active_node(Slot::Right);
        let anchor = self.config.anchor;

        let (focus, distance) = match (left, right) {
            (Some(a), Some(b)) => {
                let (Some(sa), Some(sb)) = (sphere_at(ctx, a, anchor), sphere_at(ctx, b, anchor))
                else {
                    return;
                };
                let framing = frame_spheres(sa, sb, &self.config);
                self.settle_node(ctx, a, framing.target_a);
                self.settle_node(ctx, b, framing.target_b);
                (framing.center, framing.camera_distance)
            }
            (Some(lone), None) | (None, Some(lone)) => {
                let slot = if left.is_some() { Slot::Left } else { Slot::Right };
                let Some(sphere) = sphere_at(ctx, lone, anchor) else {
                    return;
                };
                let target = solo_target(slot, sphere.radius, &self.config);
                self.settle_node(ctx, lone, target);
                (target, solo_camera_distance(sphere.radius, &self.config))
            }
            (None, None) => return,
        };

        ctx.rig.frame_on(
            &mut ctx.stage,
            ctx.animator.as_mut(),
            focus,
            distance,
            self.config.zoom,
            self.config.camera_duration,
        );

        let snapshot = self.current();
        log::info!(
            "comparison ready: {} | {}",
            snapshot.left.as_deref().unwrap_or("-"),
            snapshot.right.as_deref().unwrap_or("-")
        );
        ctx.emit_notice(Notice::ComparisonReady {
            left: snapshot.left,
            right: snapshot.right,
        });
    }

    fn settle_node(&self, ctx: &mut EngineContext, node: NodeId, to: Vec3) {
        reassert(ctx, node);
        ctx.animator.animate(Tween::position(
            node,
            to,
            self.config.layout_duration,
            self.config.enter_easing,
        ));
    }

    fn active_node(&self, slot: Slot) -> Option<NodeId> {
        match self.slot(slot).state() {
            SlotState::Active { occupant } => Some(occupant.node()),
            _ => None,
        }
    }

    /// Framing of the two active occupants where they stand right now.
    pub fn framing(&self, scene: &Scene) -> Option<Framing> {
        let a = scene.get(self.active_node(Slot::Left)?)?;
        let b = scene.get(self.active_node(Slot::Right)?)?;
        Some(compute_framing(a, b, &self.config))
    }

    /// Release both slots at once. In-flight completions become stale.
    pub fn clear(&mut self, ctx: &mut EngineContext) {
        let mut released = 0;
        for slot in Slot::ALL {
            let state = self.slot_mut(slot);
            state.bump();
            match state.take_state() {
                SlotState::Empty => {}
                SlotState::Populating { occupant } | SlotState::Active { occupant } => {
                    ctx.registry.release(occupant, &mut ctx.stage.scene);
                    released += 1;
                }
                SlotState::Despawning { outgoing, .. } => {
                    ctx.registry.release(outgoing, &mut ctx.stage.scene);
                    released += 1;
                }
            }
        }
        if released > 0 {
            log::info!("comparison cleared");
        }
    }

    pub fn current(&self) -> ComparisonSnapshot {
        ComparisonSnapshot {
            left: self.slot(Slot::Left).target_name().map(str::to_string),
            right: self.slot(Slot::Right).target_name().map(str::to_string),
        }
    }

    /// No slot is entering or leaving.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|s| s.state().is_settled())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.phase() == SlotPhase::Empty)
    }

    /// Number of transitions still waiting on a completion (stale included).
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn reassert(ctx: &mut EngineContext, node: NodeId) {
    if let Some(n) = ctx.stage.scene.get_mut(node) {
        n.visible = true;
        n.set_opacity(1.0);
    }
}

fn sphere_at(ctx: &EngineContext, node: NodeId, anchor: Vec3) -> Option<BoundingSphere> {
    ctx.stage
        .scene
        .get(node)
        .map(|n| n.bounding_sphere().moved_to(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::config::OrreryConfig;
    use crate::assets::loader::CatalogLoader;
    use crate::core::stage::Stage;
    use crate::extensions::tween::TweenAnimator;

    fn setup() -> (ComparisonOrchestrator, EngineContext) {
        let config = OrreryConfig::default();
        let mut registry = BodyRegistry::new(&config.star, config.comparison.star_scale);
        let mut loader = CatalogLoader::new(&config.bodies);
        registry.load_all(&mut loader, config.bodies.iter().map(|b| b.name.as_str()));
        let ctx = EngineContext::new(
            Stage::new(config.comparison.zoom),
            registry,
            Box::new(TweenAnimator::new()),
        );
        (ComparisonOrchestrator::new(config.comparison), ctx)
    }

    fn step(orch: &mut ComparisonOrchestrator, ctx: &mut EngineContext, dt: f32) -> bool {
        ctx.animator.tick(dt, &mut ctx.stage);
        let completed = ctx.animator.drain_completed();
        for &id in &completed {
            if !orch.on_complete(ctx, id) {
                ctx.rig.on_complete(id, &mut ctx.stage);
            }
        }
        !completed.is_empty()
    }

    fn settle(orch: &mut ComparisonOrchestrator, ctx: &mut EngineContext) {
        for _ in 0..32 {
            let progressed = step(orch, ctx, 10.0);
            if !progressed && ctx.animator.is_idle() {
                return;
            }
        }
        panic!("comparison did not settle");
    }

    fn body_names(ctx: &EngineContext) -> Vec<String> {
        let mut names: Vec<String> = ctx.stage.scene.iter().map(|n| n.name.clone()).collect();
        names.sort();
        names
    }

    fn snapshot(left: &str, right: &str) -> ComparisonSnapshot {
        ComparisonSnapshot {
            left: Some(left.to_string()),
            right: Some(right.to_string()),
        }
    }

    #[test]
    fn cold_request_activates_both_slots() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        assert_eq!(orch.slot(Slot::Left).phase(), SlotPhase::Populating);
        assert_eq!(orch.slot(Slot::Right).phase(), SlotPhase::Populating);

        settle(&mut orch, &mut ctx);
        assert_eq!(orch.slot(Slot::Left).phase(), SlotPhase::Active);
        assert_eq!(orch.slot(Slot::Right).phase(), SlotPhase::Active);
        assert_eq!(body_names(&ctx), vec!["earth", "mars"]);

        let framing = orch.framing(&ctx.stage.scene).unwrap();
        let config = orch.config().clone();
        let left = ctx.stage.scene.get(orch.slot(Slot::Left).node().unwrap()).unwrap();
        let right = ctx.stage.scene.get(orch.slot(Slot::Right).node().unwrap()).unwrap();
        assert!(((left.position + right.position) * 0.5 - framing.center).length() < 1e-4);
        assert!((framing.center - config.anchor).length() < 1e-4);
        assert!(left.position.x < right.position.x);
        assert!(left.opacity() == 1.0 && right.opacity() == 1.0);

        assert!(config.zoom.contains(framing.camera_distance));
        assert!((ctx.stage.camera_distance() - framing.camera_distance).abs() < 1e-2);
        assert!(ctx.stage.controls.enabled);
        assert!(ctx
            .notices()
            .contains(&Notice::ComparisonReady { left: Some("earth".into()), right: Some("mars".into()) }));
    }

    #[test]
    fn settled_positions_are_the_final_layout() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "jupiter", "pluto").unwrap();
        settle(&mut orch, &mut ctx);
        let framing = orch.framing(&ctx.stage.scene).unwrap();
        let left = ctx.stage.scene.get(orch.slot(Slot::Left).node().unwrap()).unwrap();
        let right = ctx.stage.scene.get(orch.slot(Slot::Right).node().unwrap()).unwrap();
        assert!((framing.target_a - left.position).length() < 1e-3);
        assert!((framing.target_b - right.position).length() < 1e-3);
    }

    #[test]
    fn same_request_retains_instances() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);
        let before = (orch.slot(Slot::Left).node(), orch.slot(Slot::Right).node());
        let generation = orch.slot(Slot::Left).generation();

        orch.request(&mut ctx, "Earth", "MARS").unwrap();
        assert!(orch.is_settled());
        settle(&mut orch, &mut ctx);

        assert_eq!((orch.slot(Slot::Left).node(), orch.slot(Slot::Right).node()), before);
        assert_eq!(orch.slot(Slot::Left).generation(), generation);
        assert_eq!(ctx.registry.live_count("earth"), 1);
        assert_eq!(ctx.registry.live_count("mars"), 1);
    }

    #[test]
    fn newer_request_supersedes_in_flight_one() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        orch.request(&mut ctx, "venus", "jupiter").unwrap();
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.current(), snapshot("venus", "jupiter"));
        assert_eq!(body_names(&ctx), vec!["jupiter", "venus"]);
        assert_eq!(ctx.registry.live_count("earth"), 0);
        assert_eq!(ctx.registry.live_count("mars"), 0);
    }

    #[test]
    fn rapid_requests_end_on_the_last_one() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);

        orch.request(&mut ctx, "venus", "jupiter").unwrap();
        step(&mut orch, &mut ctx, 0.1);
        orch.request(&mut ctx, "saturn", "neptune").unwrap();
        step(&mut orch, &mut ctx, 0.3);
        orch.request(&mut ctx, "uranus", "mercury").unwrap();
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.current(), snapshot("uranus", "mercury"));
        assert_eq!(body_names(&ctx), vec!["mercury", "uranus"]);
        assert_eq!(orch.pending_len(), 0);
    }

    #[test]
    fn stale_completion_changes_nothing() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);

        orch.request(&mut ctx, "venus", "mars").unwrap();
        let stale: Vec<TweenId> = orch.pending.keys().copied().collect();
        orch.request(&mut ctx, "jupiter", "mars").unwrap();

        for id in stale {
            assert!(orch.on_complete(&mut ctx, id));
        }
        assert_eq!(orch.slot(Slot::Left).phase(), SlotPhase::Despawning);
        assert_eq!(orch.current(), snapshot("jupiter", "mars"));
        assert_eq!(ctx.registry.live_count("venus"), 0);
    }

    #[test]
    fn swap_exchanges_without_duplicates() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);
        orch.request(&mut ctx, "mars", "earth").unwrap();
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.current(), snapshot("mars", "earth"));
        assert_eq!(ctx.registry.live_count("earth"), 1);
        assert_eq!(ctx.registry.live_count("mars"), 1);
        assert_eq!(ctx.stage.scene.len(), 2);
        let left = ctx.stage.scene.get(orch.slot(Slot::Left).node().unwrap()).unwrap();
        assert_eq!(left.name, "mars");
        assert!(left.position.x < 0.0);
    }

    #[test]
    fn swap_back_mid_flight() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);
        orch.request(&mut ctx, "mars", "earth").unwrap();
        step(&mut orch, &mut ctx, 0.2);
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.current(), snapshot("earth", "mars"));
        assert_eq!(ctx.registry.live_count("earth"), 1);
        assert_eq!(ctx.registry.live_count("mars"), 1);
    }

    #[test]
    fn returning_to_leaving_body_keeps_instance() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);
        let earth = orch.slot(Slot::Left).node();

        orch.request(&mut ctx, "venus", "mars").unwrap();
        step(&mut orch, &mut ctx, 0.2);
        orch.request(&mut ctx, "earth", "mars").unwrap();
        assert_eq!(orch.slot(Slot::Left).phase(), SlotPhase::Populating);
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.slot(Slot::Left).node(), earth);
        assert_eq!(ctx.registry.live_count("venus"), 0);
        assert_eq!(ctx.stage.scene.get(earth.unwrap()).unwrap().opacity(), 1.0);
    }

    #[test]
    fn unknown_name_leaves_slots_alone() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "earth", "mars").unwrap();
        settle(&mut orch, &mut ctx);
        let generations = (orch.slot(Slot::Left).generation(), orch.slot(Slot::Right).generation());

        let err = orch.request(&mut ctx, "earth", "vulcan").unwrap_err();
        assert!(matches!(err, OrreryError::NotFound { ref name } if name == "vulcan"));
        assert_eq!(orch.current(), snapshot("earth", "mars"));
        assert_eq!(
            (orch.slot(Slot::Left).generation(), orch.slot(Slot::Right).generation()),
            generations
        );
        assert!(ctx.animator.is_idle());
    }

    #[test]
    fn malformed_requests_are_rejected() {
        let (mut orch, mut ctx) = setup();
        assert!(matches!(
            orch.request(&mut ctx, "earth", " Earth"),
            Err(OrreryError::InvalidComparison { .. })
        ));
        assert!(matches!(
            orch.request(&mut ctx, "", "mars"),
            Err(OrreryError::InvalidComparison { .. })
        ));
        assert!(orch.is_empty());
        assert!(ctx.stage.scene.is_empty());
    }

    #[test]
    fn star_moves_between_slots() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "sun", "earth").unwrap();
        settle(&mut orch, &mut ctx);
        let sun = orch.slot(Slot::Left).node().unwrap();
        let scale = ctx.stage.scene.get(sun).unwrap().scale;

        orch.request(&mut ctx, "earth", "sun").unwrap();
        settle(&mut orch, &mut ctx);

        assert_eq!(orch.current(), snapshot("earth", "sun"));
        assert_eq!(orch.slot(Slot::Right).node(), Some(sun));
        assert_eq!(ctx.registry.star_leases(), 1);
        let node = ctx.stage.scene.get(sun).unwrap();
        assert!(node.visible);
        assert_eq!(node.opacity(), 1.0);
        assert_eq!(node.scale, scale);
        assert!(node.position.x > 0.0);
    }

    #[test]
    fn clear_releases_everything() {
        let (mut orch, mut ctx) = setup();
        orch.request(&mut ctx, "sun", "earth").unwrap();
        step(&mut orch, &mut ctx, 0.1);
        orch.clear(&mut ctx);

        assert!(orch.is_empty());
        assert_eq!(orch.current(), ComparisonSnapshot::default());
        assert!(ctx.stage.scene.is_empty());
        assert_eq!(ctx.registry.star_leases(), 0);

        // In-flight completions drain away without effect.
        settle(&mut orch, &mut ctx);
        assert!(orch.is_empty());
        assert!(ctx.stage.scene.is_empty());
    }
}

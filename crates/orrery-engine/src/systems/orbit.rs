//! Kinematic orbit simulation.
//!
//! Each orbiting body advances along a flat circle around the star at an
//! angular speed derived from its real period. No gravity, no integration
//! error: the angle is the only state.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::api::context::EngineContext;
use crate::api::error::OrreryError;
use crate::api::types::{canonical_name, NodeId};
use crate::assets::config::{OrbitConfig, OrreryConfig, SECONDS_PER_DAY};
use crate::assets::registry::BodyInstance;
use crate::components::node::Node;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::extensions::easing::Easing;
use crate::extensions::tween::Tween;

/// Angular speed in radians per second for a body with the given period,
/// sped up by `time_warp`. A negative period gives a retrograde orbit.
pub fn angular_speed(period_days: f64, time_warp: f64) -> f64 {
    if period_days == 0.0 {
        return 0.0;
    }
    TAU / (period_days * SECONDS_PER_DAY) * time_warp
}

/// Advance `angle` by `delta` and wrap into [0, 2π).
/// A non-finite step leaves the angle where it was.
pub fn advance_angle(angle: f64, delta: f64) -> f64 {
    let wrapped = (angle + delta).rem_euclid(TAU);
    if !wrapped.is_finite() {
        return angle;
    }
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Position on a circle of `radius` in the XZ plane around `center`.
pub fn orbit_position(center: Vec3, radius: f32, angle: f64) -> Vec3 {
    center + Vec3::new(angle.cos() as f32, 0.0, angle.sin() as f32) * radius
}

/// Static plan for one orbiting body, taken from the configuration.
#[derive(Debug, Clone)]
struct OrbitPlan {
    name: String,
    period_days: f64,
    radius: f32,
    scale: f32,
}

/// Simulation state of one orbiting body.
#[derive(Debug)]
pub struct OrbitEntry {
    pub name: String,
    instance: BodyInstance,
    pub radius: f32,
    pub period_days: f64,
    /// Radians, always in [0, 2π).
    pub angle: f64,
    /// Radians per second; the sign encodes direction.
    pub speed: f64,
    /// Body-local pause. Never touches `angle` or `speed`.
    pub paused: bool,
}

impl OrbitEntry {
    pub fn node(&self) -> NodeId {
        self.instance.node()
    }
}

/// Owns every orbit-mode resource: entries, orbit lines and the star lease.
pub struct OrbitEngine {
    config: OrbitConfig,
    star_name: String,
    plans: Vec<OrbitPlan>,
    entries: Vec<OrbitEntry>,
    lines: Vec<NodeId>,
    star: Option<BodyInstance>,
    enabled: bool,
    global_pause: bool,
    rng: Rng,
}

impl OrbitEngine {
    pub fn new(config: &OrreryConfig) -> Self {
        let plans = config
            .orbiting()
            .map(|(body, orbit)| OrbitPlan {
                name: canonical_name(&body.name),
                period_days: orbit.period_days,
                radius: orbit.radius,
                scale: orbit.scale,
            })
            .collect();

        Self {
            config: config.orbit.clone(),
            star_name: canonical_name(&config.star),
            plans,
            entries: Vec::new(),
            lines: Vec::new(),
            star: None,
            enabled: false,
            global_pause: false,
            rng: Rng::new(config.orbit.seed),
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Enter orbit mode. Calling it while already enabled tears the previous
    /// session down first, so entries never accumulate.
    /// Returns the number of bodies now orbiting.
    pub fn enter(&mut self, ctx: &mut EngineContext) -> usize {
        if self.enabled {
            log::debug!("orbit: re-entering, resetting previous session");
            self.exit(ctx);
        }
        let registry = &mut ctx.registry;
        let scene = &mut ctx.stage.scene;

        match registry.spawn(&self.star_name, scene) {
            Ok(star) => {
                let base = registry
                    .template(&self.star_name)
                    .map_or(1.0, |t| t.prototype.scale);
                if let Some(node) = scene.get_mut(star.node()) {
                    node.position = self.config.center;
                    node.scale = base * self.config.star_scale;
                    node.visible = true;
                    node.set_opacity(1.0);
                }
                // The star node outlives comparison mode; take its channels
                // over from any comparison animation still in flight.
                let id = star.node();
                ctx.animator.animate(Tween::position(id, self.config.center, 0.0, Easing::Linear));
                ctx.animator.animate(Tween::opacity(id, 1.0, 0.0, Easing::Linear));
                // The comparison scale no longer holds.
                registry.invalidate_star_scale();
                self.star = Some(star);
            }
            Err(err) => log::warn!("orbit: star unavailable: {err}"),
        }

        for plan in &self.plans {
            let instance = match registry.spawn(&plan.name, scene) {
                Ok(instance) => instance,
                Err(err) => {
                    log::warn!("orbit: skipping `{}`: {err}", plan.name);
                    continue;
                }
            };

            let angle = self.rng.next_angle();
            let base = registry.template(&plan.name).map_or(1.0, |t| t.prototype.scale);
            if let Some(node) = scene.get_mut(instance.node()) {
                node.scale = base * plan.scale;
                node.position = orbit_position(self.config.center, plan.radius, angle);
                node.set_opacity(1.0);
            }

            let line_id = scene.alloc_id();
            scene.add(
                Node::orbit_line(
                    line_id,
                    format!("orbit:{}", plan.name),
                    plan.radius,
                    self.config.line_dash,
                    self.config.line_gap,
                )
                .with_position(self.config.center),
            );
            self.lines.push(line_id);

            self.entries.push(OrbitEntry {
                name: plan.name.clone(),
                instance,
                radius: plan.radius,
                period_days: plan.period_days,
                angle,
                speed: angular_speed(plan.period_days, self.config.time_warp),
                paused: false,
            });
        }

        self.enabled = true;
        log::info!("orbit mode on: {} bodies", self.entries.len());
        self.entries.len()
    }

    /// Leave orbit mode, releasing every instance and orbit line.
    pub fn exit(&mut self, ctx: &mut EngineContext) {
        let registry = &mut ctx.registry;
        let scene = &mut ctx.stage.scene;
        for entry in self.entries.drain(..) {
            registry.release(entry.instance, scene);
        }
        for line in self.lines.drain(..) {
            scene.remove(line);
        }
        if let Some(star) = self.star.take() {
            registry.release(star, scene);
        }
        if self.enabled {
            log::info!("orbit mode off");
        }
        self.enabled = false;
        self.global_pause = false;
    }

    /// Advance every unpaused body by `dt` seconds. Non-finite steps are
    /// ignored.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        if !self.enabled || self.global_pause || !dt.is_finite() {
            return;
        }
        let dt = f64::from(dt.max(0.0));
        let center = self.config.center;

        for entry in self.entries.iter_mut().filter(|e| !e.paused) {
            entry.angle = advance_angle(entry.angle, entry.speed * dt);
            if let Some(node) = scene.get_mut(entry.instance.node()) {
                node.position = orbit_position(center, entry.radius, entry.angle);
            }
        }
    }

    pub fn pause(&mut self, name: &str) -> Result<(), OrreryError> {
        self.entry_mut(name)?.paused = true;
        Ok(())
    }

    pub fn resume(&mut self, name: &str) -> Result<(), OrreryError> {
        self.entry_mut(name)?.paused = false;
        Ok(())
    }

    pub fn set_global_pause(&mut self, paused: bool) {
        self.global_pause = paused;
    }

    /// Flip the global pause. Returns the new state.
    pub fn toggle_global_pause(&mut self) -> bool {
        self.global_pause = !self.global_pause;
        self.global_pause
    }

    /// Change the time-warp factor. Angles are kept; only speeds change.
    pub fn set_time_warp(&mut self, time_warp: f64) {
        if !time_warp.is_finite() {
            log::warn!("orbit: ignoring non-finite time warp {time_warp}");
            return;
        }
        self.config.time_warp = time_warp;
        for entry in &mut self.entries {
            entry.speed = angular_speed(entry.period_days, time_warp);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_globally_paused(&self) -> bool {
        self.global_pause
    }

    pub fn entries(&self) -> &[OrbitEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&OrbitEntry> {
        let name = canonical_name(name);
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut OrbitEntry, OrreryError> {
        let name = canonical_name(name);
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or(OrreryError::NotFound { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::config::{DEFAULT_TIME_WARP, EARTH_PERIOD_DAYS};
    use crate::assets::loader::CatalogLoader;
    use crate::assets::registry::BodyRegistry;
    use crate::core::stage::Stage;
    use crate::extensions::tween::TweenAnimator;

    fn setup() -> (OrbitEngine, EngineContext) {
        let config = OrreryConfig::default();
        let mut registry = BodyRegistry::new(&config.star, config.comparison.star_scale);
        let mut loader = CatalogLoader::new(&config.bodies);
        registry.load_all(&mut loader, config.bodies.iter().map(|b| b.name.as_str()));
        let ctx = EngineContext::new(
            Stage::new(config.orbit.zoom),
            registry,
            Box::new(TweenAnimator::new()),
        );
        (OrbitEngine::new(&config), ctx)
    }

    #[test]
    fn earth_year_takes_a_minute() {
        let speed = angular_speed(EARTH_PERIOD_DAYS, DEFAULT_TIME_WARP);
        assert!((speed * 60.0 - TAU).abs() < 1e-9);
        assert!(angular_speed(-10.0, 1.0) < 0.0);
        assert_eq!(angular_speed(0.0, 1.0), 0.0);
    }

    #[test]
    fn wrap_stays_in_range() {
        for &(angle, delta) in &[
            (0.0, 0.0),
            (6.0, 1.0),
            (0.1, -0.2),
            (0.0, -1e-18),
            (TAU - 1e-16, 1e-17),
            (3.0, 1e6),
        ] {
            let wrapped = advance_angle(angle, delta);
            assert!((0.0..TAU).contains(&wrapped), "{angle} + {delta} -> {wrapped}");
        }
    }

    #[test]
    fn enter_places_star_and_bodies() {
        let (mut engine, mut ctx) = setup();
        let count = engine.enter(&mut ctx);
        assert_eq!(count, 9);
        assert_eq!(engine.line_count(), 9);

        let star = ctx.stage.scene.get_by_name("sun").unwrap();
        assert_eq!(star.position, Vec3::ZERO);
        assert!((star.scale - 0.1).abs() < 1e-6);

        let earth = engine.entry("earth").unwrap();
        let node = ctx.stage.scene.get(earth.node()).unwrap();
        assert!((node.position.length() - 42.0).abs() < 1e-3);
        assert!((node.scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reentering_does_not_accumulate() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        let nodes = ctx.stage.scene.len();
        engine.enter(&mut ctx);

        assert_eq!(engine.entries().len(), 9);
        assert_eq!(engine.line_count(), 9);
        assert_eq!(ctx.stage.scene.len(), nodes);
        assert_eq!(ctx.registry.live_count("earth"), 1);
        assert_eq!(ctx.registry.star_leases(), 1);
    }

    #[test]
    fn exit_removes_everything() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        engine.exit(&mut ctx);

        assert!(!engine.is_enabled());
        assert!(engine.entries().is_empty());
        assert!(ctx.stage.scene.is_empty());
        assert_eq!(ctx.registry.live_count("mars"), 0);
        assert_eq!(ctx.registry.star_leases(), 0);
    }

    #[test]
    fn paused_body_keeps_its_phase() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        engine.tick(0.25, &mut ctx.stage.scene);

        engine.pause("Earth").unwrap();
        let frozen = engine.entry("earth").unwrap().angle;
        let mars_before = engine.entry("mars").unwrap().angle;
        for _ in 0..10 {
            engine.tick(0.5, &mut ctx.stage.scene);
        }
        assert_eq!(engine.entry("earth").unwrap().angle, frozen);
        assert_ne!(engine.entry("mars").unwrap().angle, mars_before);

        engine.resume("earth").unwrap();
        assert_eq!(engine.entry("earth").unwrap().angle, frozen);
        engine.tick(0.1, &mut ctx.stage.scene);
        let expected = advance_angle(frozen, engine.entry("earth").unwrap().speed * 0.1_f32 as f64);
        assert!((engine.entry("earth").unwrap().angle - expected).abs() < 1e-12);
    }

    #[test]
    fn global_pause_freezes_all() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        let before: Vec<f64> = engine.entries().iter().map(|e| e.angle).collect();

        assert!(engine.toggle_global_pause());
        engine.tick(5.0, &mut ctx.stage.scene);
        let after: Vec<f64> = engine.entries().iter().map(|e| e.angle).collect();
        assert_eq!(before, after);

        engine.set_global_pause(false);
        engine.tick(5.0, &mut ctx.stage.scene);
        assert!(engine.entries().iter().zip(&before).all(|(e, &b)| e.angle != b));
    }

    #[test]
    fn angles_stay_wrapped_over_long_runs() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        for step in 0..500 {
            engine.tick(0.37 * step as f32, &mut ctx.stage.scene);
            assert!(engine.entries().iter().all(|e| (0.0..TAU).contains(&e.angle)));
        }
        engine.tick(-3.0, &mut ctx.stage.scene);
        assert!(engine.entries().iter().all(|e| (0.0..TAU).contains(&e.angle)));
    }

    #[test]
    fn disabled_engine_does_not_move() {
        let (mut engine, mut ctx) = setup();
        engine.tick(1.0, &mut ctx.stage.scene);
        assert!(engine.entries().is_empty());
    }

    #[test]
    fn unknown_body_cannot_be_paused() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        assert!(matches!(engine.pause("vulcan"), Err(OrreryError::NotFound { .. })));
        assert!(matches!(engine.resume("moon"), Err(OrreryError::NotFound { .. })));
    }

    #[test]
    fn infinite_step_keeps_angles_wrapped() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        let before: Vec<f64> = engine.entries().iter().map(|e| e.angle).collect();

        engine.tick(f32::INFINITY, &mut ctx.stage.scene);
        engine.tick(f32::NAN, &mut ctx.stage.scene);
        let after: Vec<f64> = engine.entries().iter().map(|e| e.angle).collect();
        assert_eq!(before, after);

        engine.tick(0.5, &mut ctx.stage.scene);
        assert!(engine.entries().iter().all(|e| (0.0..TAU).contains(&e.angle)));
        let earth = ctx.stage.scene.get(engine.entry("earth").unwrap().node()).unwrap();
        assert!(earth.position.is_finite());
    }

    #[test]
    fn non_finite_time_warp_is_rejected() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        let speed = engine.entry("mars").unwrap().speed;

        engine.set_time_warp(f64::NAN);
        engine.set_time_warp(f64::INFINITY);
        assert_eq!(engine.entry("mars").unwrap().speed, speed);
        assert_eq!(engine.config().time_warp, DEFAULT_TIME_WARP);

        engine.tick(0.016, &mut ctx.stage.scene);
        assert!(engine.entries().iter().all(|e| (0.0..TAU).contains(&e.angle)));
    }

    #[test]
    fn huge_step_stays_in_range() {
        assert_eq!(advance_angle(1.0, f64::INFINITY), 1.0);
        assert_eq!(advance_angle(1.0, f64::NAN), 1.0);
        assert!((0.0..TAU).contains(&advance_angle(1.0, 1e300)));
    }

    #[test]
    fn time_warp_changes_speed_not_angle() {
        let (mut engine, mut ctx) = setup();
        engine.enter(&mut ctx);
        let angle = engine.entry("venus").unwrap().angle;
        let speed = engine.entry("venus").unwrap().speed;
        engine.set_time_warp(DEFAULT_TIME_WARP * 2.0);
        assert_eq!(engine.entry("venus").unwrap().angle, angle);
        assert!((engine.entry("venus").unwrap().speed - speed * 2.0).abs() < 1e-12);
    }
}

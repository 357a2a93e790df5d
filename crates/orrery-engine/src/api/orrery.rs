use crate::api::context::EngineContext;
use crate::api::error::OrreryError;
use crate::api::types::{Notice, ViewMode};
use crate::assets::config::OrreryConfig;
use crate::assets::loader::{BodyLoader, CatalogLoader};
use crate::assets::registry::BodyRegistry;
use crate::core::stage::Stage;
use crate::extensions::tween::{Animator, TweenAnimator};
use crate::renderer::camera::ZoomBand;
use crate::systems::comparison::{ComparisonOrchestrator, ComparisonSnapshot};
use crate::systems::orbit::OrbitEngine;

/// The surface the UI layer talks to.
///
/// Owns all comparison and orbit state. Comparison and orbit mode are
/// mutually exclusive: entering one leaves the other.
pub struct Orrery {
    config: OrreryConfig,
    ctx: EngineContext,
    comparison: ComparisonOrchestrator,
    orbit: OrbitEngine,
    mode: ViewMode,
}

impl Orrery {
    /// Build from a configuration, using sphere proxies for every body.
    pub fn new(config: OrreryConfig) -> Self {
        let mut loader = CatalogLoader::new(&config.bodies);
        Self::with_loader(config, &mut loader, Box::new(TweenAnimator::new()))
    }

    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        Ok(Self::new(OrreryConfig::from_json(json)?))
    }

    /// Build with a custom loader and animator.
    pub fn with_loader(
        config: OrreryConfig,
        loader: &mut dyn BodyLoader,
        animator: Box<dyn Animator>,
    ) -> Self {
        let mut registry = BodyRegistry::new(&config.star, config.comparison.star_scale);
        registry.load_all(loader, config.bodies.iter().map(|b| b.name.as_str()));

        let ctx = EngineContext::new(Stage::new(config.comparison.zoom), registry, animator);
        Self {
            comparison: ComparisonOrchestrator::new(config.comparison.clone()),
            orbit: OrbitEngine::new(&config),
            ctx,
            config,
            mode: ViewMode::SolarSystem,
        }
    }

    // -- Comparison --

    /// Place `left` and `right` side by side. Rejections are also queued as
    /// a notice for the UI.
    pub fn request_comparison(&mut self, left: &str, right: &str) -> Result<(), OrreryError> {
        if let Err(err) = ComparisonOrchestrator::validate(&self.ctx.registry, left, right) {
            self.report(&err);
            return Err(err);
        }
        if self.mode == ViewMode::Orbit {
            self.exit_orbit_mode();
        }
        match self.comparison.request(&mut self.ctx, left, right) {
            Ok(()) => {
                self.mode = ViewMode::Comparison;
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Remove both compared bodies immediately.
    pub fn clear_comparison(&mut self) {
        self.comparison.clear(&mut self.ctx);
        if self.mode == ViewMode::Comparison {
            self.mode = ViewMode::SolarSystem;
        }
    }

    pub fn current_comparison(&self) -> ComparisonSnapshot {
        self.comparison.current()
    }

    // -- Orbit mode --

    /// Enter orbit mode (or restart it). Returns the number of orbiting bodies.
    pub fn enter_orbit_mode(&mut self) -> usize {
        if !self.comparison.is_empty() {
            self.comparison.clear(&mut self.ctx);
        }
        let count = self.orbit.enter(&mut self.ctx);
        self.mode = ViewMode::Orbit;

        let orbit = self.orbit.config();
        self.ctx.rig.frame_on(
            &mut self.ctx.stage,
            self.ctx.animator.as_mut(),
            orbit.center,
            orbit.camera_distance,
            orbit.zoom,
            orbit.camera_duration,
        );
        count
    }

    pub fn exit_orbit_mode(&mut self) {
        if !self.orbit.is_enabled() {
            return;
        }
        self.orbit.exit(&mut self.ctx);
        self.mode = ViewMode::SolarSystem;

        // Pull the camera back inside the solar-system band.
        let focus = self.ctx.stage.controls.target;
        let distance = self.ctx.stage.camera_distance();
        self.ctx.rig.frame_on(
            &mut self.ctx.stage,
            self.ctx.animator.as_mut(),
            focus,
            distance,
            self.config.comparison.zoom,
            self.config.comparison.camera_duration,
        );
    }

    pub fn pause_orbit_for_planet(&mut self, name: &str) -> Result<(), OrreryError> {
        self.orbit.pause(name).inspect_err(|err| log::warn!("pause: {err}"))
    }

    pub fn resume_orbit_for_planet(&mut self, name: &str) -> Result<(), OrreryError> {
        self.orbit.resume(name).inspect_err(|err| log::warn!("resume: {err}"))
    }

    pub fn set_orbit_paused(&mut self, paused: bool) {
        self.orbit.set_global_pause(paused);
    }

    pub fn toggle_orbit_paused(&mut self) -> bool {
        self.orbit.toggle_global_pause()
    }

    pub fn set_time_warp(&mut self, time_warp: f64) {
        self.orbit.set_time_warp(time_warp);
    }

    // -- Frame loop --

    /// Advance animations, dispatch their completions, then the orbit
    /// simulation. Negative or non-finite steps count as zero.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.ctx.animator.tick(dt, &mut self.ctx.stage);

        let mut completed = self.ctx.animator.drain_completed();
        completed.sort_unstable();
        for id in completed {
            if self.comparison.on_complete(&mut self.ctx, id) {
                continue;
            }
            if !self.ctx.rig.on_complete(id, &mut self.ctx.stage) {
                log::trace!("unclaimed completion {id:?}");
            }
        }

        self.orbit.tick(dt, &mut self.ctx.stage.scene);
    }

    /// No animation is in flight.
    pub fn is_idle(&self) -> bool {
        self.ctx.animator.is_idle()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.ctx.drain_notices()
    }

    fn report(&mut self, err: &OrreryError) {
        log::warn!("comparison rejected: {err}");
        let notice = match err {
            OrreryError::NotFound { name } => Notice::BodyNotFound { name: name.clone() },
            OrreryError::InvalidComparison { reason } => {
                Notice::ComparisonRejected { reason: reason.clone() }
            }
            _ => return,
        };
        self.ctx.emit_notice(notice);
    }

    // -- Accessors --

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Camera distance band for the active mode.
    pub fn zoom_band(&self) -> ZoomBand {
        match self.mode {
            ViewMode::Orbit => self.config.orbit.zoom,
            ViewMode::SolarSystem | ViewMode::Comparison => self.config.comparison.zoom,
        }
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.ctx.stage
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.ctx.registry
    }

    pub fn comparison(&self) -> &ComparisonOrchestrator {
        &self.comparison
    }

    pub fn orbit(&self) -> &OrbitEngine {
        &self.orbit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Slot;
    use crate::systems::comparison::SlotPhase;

    fn settle(orrery: &mut Orrery) {
        for _ in 0..32 {
            orrery.tick(10.0);
            if orrery.is_idle() {
                return;
            }
        }
        panic!("orrery did not settle");
    }

    fn names(orrery: &Orrery) -> Vec<String> {
        let mut names: Vec<String> = orrery.stage().scene.iter().map(|n| n.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn earth_and_mars_on_a_cold_start() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.request_comparison("earth", "mars").unwrap();
        assert_eq!(orrery.mode(), ViewMode::Comparison);
        settle(&mut orrery);

        let comparison = orrery.comparison();
        assert_eq!(comparison.slot(Slot::Left).phase(), SlotPhase::Active);
        assert_eq!(comparison.slot(Slot::Right).phase(), SlotPhase::Active);
        assert_eq!(names(&orrery), vec!["earth", "mars"]);

        let framing = comparison.framing(&orrery.stage().scene).unwrap();
        assert!(orrery.zoom_band().contains(framing.camera_distance));
        assert!(orrery.zoom_band().contains(orrery.stage().camera_distance() - 1e-3));
        assert!(orrery.stage().controls.enabled);

        let notices = orrery.drain_notices();
        assert!(matches!(notices.last(), Some(Notice::ComparisonReady { .. })));
    }

    #[test]
    fn rejected_requests_become_notices() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        assert!(orrery.request_comparison("venus", "VENUS").is_err());
        assert!(orrery.request_comparison("venus", "vulcan").is_err());
        assert_eq!(orrery.mode(), ViewMode::SolarSystem);
        assert_eq!(
            orrery.drain_notices(),
            vec![
                Notice::ComparisonRejected { reason: "select two different bodies".into() },
                Notice::BodyNotFound { name: "vulcan".into() },
            ]
        );
        assert!(orrery.stage().scene.is_empty());
    }

    #[test]
    fn entering_orbit_twice_is_a_reset() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        assert_eq!(orrery.enter_orbit_mode(), 9);
        settle(&mut orrery);
        assert_eq!(orrery.enter_orbit_mode(), 9);
        settle(&mut orrery);

        assert_eq!(orrery.orbit().entries().len(), 9);
        assert_eq!(orrery.orbit().line_count(), 9);
        assert_eq!(orrery.registry().live_count("jupiter"), 1);
        assert_eq!(orrery.stage().scene.len(), 1 + 9 + 9);
        assert!(orrery.config().orbit.zoom.contains(orrery.stage().camera_distance() - 1e-3));
        assert_eq!(orrery.stage().controls.max_distance, orrery.config().orbit.zoom.max);
    }

    #[test]
    fn orbit_mode_clears_comparison() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.request_comparison("sun", "earth").unwrap();
        orrery.tick(0.2);
        orrery.enter_orbit_mode();
        settle(&mut orrery);

        assert_eq!(orrery.mode(), ViewMode::Orbit);
        assert_eq!(orrery.current_comparison(), ComparisonSnapshot::default());
        assert_eq!(orrery.registry().live_count("earth"), 1);
        assert_eq!(orrery.registry().star_leases(), 1);
        let sun = orrery.stage().scene.get_by_name("sun").unwrap();
        assert_eq!(sun.position, orrery.config().orbit.center);
    }

    #[test]
    fn comparison_leaves_orbit_mode() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.enter_orbit_mode();
        settle(&mut orrery);
        orrery.request_comparison("sun", "jupiter").unwrap();
        settle(&mut orrery);

        assert_eq!(orrery.mode(), ViewMode::Comparison);
        assert!(!orrery.orbit().is_enabled());
        assert_eq!(names(&orrery), vec!["jupiter", "sun"]);

        // The star gets its comparison scale back.
        let sun = orrery.stage().scene.get_by_name("sun").unwrap();
        let config = orrery.config();
        let expected = config.comparison.star_scale;
        assert!((sun.scale - expected).abs() < 1e-6);
        assert_eq!(sun.opacity(), 1.0);
    }

    #[test]
    fn orbits_advance_and_pause_per_body() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.enter_orbit_mode();
        orrery.pause_orbit_for_planet("mars").unwrap();
        let mars = orrery.orbit().entry("mars").unwrap().angle;
        let earth = orrery.orbit().entry("earth").unwrap().angle;

        orrery.tick(1.0);
        assert_eq!(orrery.orbit().entry("mars").unwrap().angle, mars);
        assert_ne!(orrery.orbit().entry("earth").unwrap().angle, earth);

        orrery.resume_orbit_for_planet("mars").unwrap();
        orrery.set_orbit_paused(true);
        orrery.tick(1.0);
        assert_eq!(orrery.orbit().entry("mars").unwrap().angle, mars);

        assert!(orrery.pause_orbit_for_planet("vulcan").is_err());
        assert!(!orrery.toggle_orbit_paused());
    }

    #[test]
    fn bad_frame_steps_do_not_poison_orbits() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.enter_orbit_mode();
        orrery.tick(f32::INFINITY);
        orrery.tick(f32::NAN);
        orrery.set_time_warp(f64::NAN);
        orrery.tick(0.016);
        settle(&mut orrery);

        for entry in orrery.orbit().entries() {
            assert!((0.0..std::f64::consts::TAU).contains(&entry.angle), "{}", entry.name);
            let node = orrery.stage().scene.get(entry.node()).unwrap();
            assert!(node.position.is_finite());
        }
        assert!(orrery.stage().camera.position.is_finite());
    }

    #[test]
    fn exit_orbit_restores_solar_system_band() {
        let mut orrery = Orrery::new(OrreryConfig::default());
        orrery.enter_orbit_mode();
        settle(&mut orrery);
        orrery.exit_orbit_mode();
        settle(&mut orrery);

        assert_eq!(orrery.mode(), ViewMode::SolarSystem);
        assert!(orrery.stage().scene.is_empty());
        let band = orrery.config().comparison.zoom;
        assert_eq!(orrery.stage().controls.max_distance, band.max);
        assert!(band.contains(orrery.stage().camera_distance() - 1e-3));
    }

    #[test]
    fn builds_from_json() {
        let orrery = Orrery::from_json(r#"{ "comparison": { "margin": 4.0 } }"#).unwrap();
        assert_eq!(orrery.config().comparison.margin, 4.0);
        assert_eq!(orrery.registry().len(), orrery.config().bodies.len());
        assert!(Orrery::from_json("[").is_err());
    }
}

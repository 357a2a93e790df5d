use orrery_engine::{
    ComparisonSnapshot, Notice, Orrery, OrreryConfig, OrreryError, RenderBuffer, ViewMode,
};

/// Owns the orrery and the render snapshot the browser reads each frame.
///
/// `wasm-bindgen` cannot export this struct's borrows directly, so the
/// exports in `lib.rs` keep one runner in a `thread_local!` and forward.
pub struct OrreryRunner {
    orrery: Orrery,
    render_buffer: RenderBuffer,
}

impl OrreryRunner {
    pub fn new(config: OrreryConfig) -> Self {
        let mut runner = Self {
            orrery: Orrery::new(config),
            render_buffer: RenderBuffer::new(),
        };
        runner.rebuild();
        runner
    }

    /// Build from JSON; an empty string means the built-in configuration.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        if json.trim().is_empty() {
            return Ok(Self::new(OrreryConfig::default()));
        }
        Ok(Self::new(OrreryConfig::from_json(json)?))
    }

    /// Run one frame: animations, completions, orbits, then the snapshot.
    pub fn tick(&mut self, dt: f32) {
        self.orrery.tick(dt);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.render_buffer
            .build(self.orrery.stage(), self.orrery.registry());
    }

    pub fn request_comparison(&mut self, left: &str, right: &str) -> bool {
        self.orrery.request_comparison(left, right).is_ok()
    }

    pub fn clear_comparison(&mut self) {
        self.orrery.clear_comparison();
    }

    pub fn current_comparison(&self) -> ComparisonSnapshot {
        self.orrery.current_comparison()
    }

    pub fn enter_orbit_mode(&mut self) -> u32 {
        self.orrery.enter_orbit_mode() as u32
    }

    pub fn exit_orbit_mode(&mut self) {
        self.orrery.exit_orbit_mode();
    }

    pub fn pause_orbit_for_planet(&mut self, name: &str) -> bool {
        self.orrery.pause_orbit_for_planet(name).is_ok()
    }

    pub fn resume_orbit_for_planet(&mut self, name: &str) -> bool {
        self.orrery.resume_orbit_for_planet(name).is_ok()
    }

    pub fn set_orbit_paused(&mut self, paused: bool) {
        self.orrery.set_orbit_paused(paused);
    }

    pub fn toggle_orbit_paused(&mut self) -> bool {
        self.orrery.toggle_orbit_paused()
    }

    pub fn set_time_warp(&mut self, time_warp: f64) {
        self.orrery.set_time_warp(time_warp);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.orrery.drain_notices()
    }

    /// 0 = solar system, 1 = comparison, 2 = orbit.
    pub fn view_mode(&self) -> u32 {
        match self.orrery.mode() {
            ViewMode::SolarSystem => 0,
            ViewMode::Comparison => 1,
            ViewMode::Orbit => 2,
        }
    }

    // ---- Pointer accessors for the renderer ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.render_buffer.camera_ptr()
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }
}

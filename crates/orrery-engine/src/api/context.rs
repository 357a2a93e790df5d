use crate::api::types::Notice;
use crate::assets::registry::BodyRegistry;
use crate::core::stage::Stage;
use crate::extensions::tween::Animator;
use crate::systems::framing::CameraRig;

/// Mutable access to engine state, passed to the comparison and orbit
/// systems on every call.
pub struct EngineContext {
    pub stage: Stage,
    pub registry: BodyRegistry,
    pub animator: Box<dyn Animator>,
    pub rig: CameraRig,
    notices: Vec<Notice>,
}

impl EngineContext {
    pub fn new(stage: Stage, registry: BodyRegistry, animator: Box<dyn Animator>) -> Self {
        Self {
            stage,
            registry,
            animator,
            rig: CameraRig::new(),
            notices: Vec::new(),
        }
    }

    /// Queue a notification for the UI layer.
    pub fn emit_notice(&mut self, notice: Notice) {
        log::debug!("notice: {}", notice.message());
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take every queued notification.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

use std::fmt;

/// Unique identifier for a node in the scene.
/// Ids are handed out monotonically by the scene and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// One of the two comparison display positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Left, Slot::Right];

    /// The slot on the other side.
    pub fn other(self) -> Slot {
        match self {
            Slot::Left => Slot::Right,
            Slot::Right => Slot::Left,
        }
    }

    /// Direction along the layout side axis: -1 for left, +1 for right.
    pub fn side_sign(self) -> f32 {
        match self {
            Slot::Left => -1.0,
            Slot::Right => 1.0,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Left => f.write_str("left"),
            Slot::Right => f.write_str("right"),
        }
    }
}

/// Which display mode the orrery is in. Selects the camera zoom band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Free solar-system view (no comparison, no orbit simulation).
    #[default]
    SolarSystem,
    /// Two bodies side by side.
    Comparison,
    /// Bodies circling the star.
    Orbit,
}

/// A user-facing notification queued for the UI layer.
/// Failures are reported once through this channel, never as a panic.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A requested body has no template.
    BodyNotFound { name: String },
    /// A comparison request was rejected before any state changed.
    ComparisonRejected { reason: String },
    /// Both comparison slots reached a stable state.
    ComparisonReady { left: Option<String>, right: Option<String> },
}

impl Notice {
    /// Short message suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            Notice::BodyNotFound { name } => format!("No body named \"{name}\""),
            Notice::ComparisonRejected { reason } => reason.clone(),
            Notice::ComparisonReady { left, right } => format!(
                "Comparing {} and {}",
                left.as_deref().unwrap_or("nothing"),
                right.as_deref().unwrap_or("nothing"),
            ),
        }
    }
}

/// Canonical form of a body name: trimmed and lowercase.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

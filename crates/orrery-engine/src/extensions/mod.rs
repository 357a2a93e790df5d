// extensions/mod.rs
//
// Animation building blocks. Nothing here knows about comparison or orbit
// mode; both drive their motion through the `Animator` trait.

pub mod easing;
pub mod tween;

pub use easing::{ease, ease_vec3, lerp, Easing};
pub use tween::{Animator, Tween, TweenAnimator, TweenId, TweenTarget};

pub mod comparison;
pub mod framing;
pub mod layout;
pub mod orbit;

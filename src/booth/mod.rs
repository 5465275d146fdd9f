//! The photobooth component and its state machine.

mod component;
mod state;
mod view;

pub use component::{BoothStats, PhotoBooth, StartOutcome};
pub use state::{BoothError, BoothState, InvalidTransition, Phase, Transition};
pub use view::{Controls, PhotoPanel, View};

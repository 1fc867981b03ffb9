pub mod camera_rig;
pub mod context;
pub mod dispatch;
pub mod highlight;
pub mod input;
pub mod interactable;
pub mod prefs;
pub mod scene;
pub mod targeting;
pub mod tick;

pub use context::FlatviewContext;
pub use interactable::{Capability, Interactable};

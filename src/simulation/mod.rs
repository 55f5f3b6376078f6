pub mod controller;
pub mod events;

pub use controller::Controller;
pub use events::SimEvent;

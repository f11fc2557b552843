pub mod event;
pub mod participant;

pub use event::Event;
pub use participant::{NewParticipant, Participant};

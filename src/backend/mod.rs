//! Backend posting interface.
//!
//! The propagation engine is an external collaborator. The compiler talks to
//! it through the [`Backend`] trait: fresh-variable allocation per kind and a
//! posting channel that accepts one [`Posting`] at a time.
//!
//! # Key Types
//!
//! - [`Backend`]: allocation + posting interface
//! - [`Posting`]: primitive id, argument slots, relation, negation, strength,
//!   reification target and priority
//! - [`RecordingBackend`]: in-memory backend that validates and records postings

mod posting;
mod recording;
mod types;

pub use posting::{Arg, ChannelForm, Posting, Primitive, Priority, Relation, SetOp, Strength};
pub use recording::RecordingBackend;
pub use types::Backend;

//! Transition-Parser State Machinery
//!
//! Everything a shift-reduce constituency parser mutates while decoding,
//! separated from the network that decides what to mutate.
//!
//! ## Key Pieces
//!
//! - **[`Element`]**: tagged discrete payload of one stack slot
//! - **[`StackLstm`]**: stack whose top always carries an LSTM summary of
//!   the whole stack contents
//! - **[`ParserState`]**: buffer/stack/action-history triple plus decode
//!   bookkeeping, cloneable for branching
//! - **[`Beam`]**: width-bounded keeper pruning candidates by cumulative
//!   negative log-probability
//!
//! ## Branching Model
//!
//! Cloning a candidate is O(stack depths): the stacks share their immutable
//! frames behind `Arc`, so branches never alias mutable state and no
//! locking is ever involved. Decoding stays fully synchronous.

pub mod beam;
pub mod element;
pub mod stack;
pub mod state;


pub use beam::Beam;
pub use element::Element;
pub use stack::StackLstm;
pub use state::ParserState;

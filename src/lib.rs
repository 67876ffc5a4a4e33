//! Spalier: stack-LSTM state machinery for transition-based parsing.
//!
//! A Spalier is the frame a tree is trained to grow along. This crate is that
//! frame for constituency parse trees: it provides the stack triple a
//! shift-reduce parser mutates (input buffer, control stack, action history),
//! each slot carrying an incrementally updated LSTM summary vector, plus the
//! subtree composition functions invoked on reduce and a branchable candidate
//! state for beam-search decoding.
//!
//! Scoring networks, embedding lookup and the decode loop itself live outside
//! this crate; they consume the embeddings exposed here and drive the state
//! through pushes, pops and compositions.

pub mod compose;
pub mod transition;

pub use compose::{BiLstmComposer, Composer, SumComposer};
pub use transition::{Beam, Element, ParserState, StackLstm};

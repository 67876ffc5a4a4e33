//! Vector-augmented stacks
//!
//! The stack structure from Dyer et al.'s stack LSTM parser
//! (<https://arxiv.org/abs/1505.08075>): an ordinary discrete stack where
//! every slot additionally carries the LSTM state reached by reading the
//! pushed vectors bottom-up. The top slot's hidden vector therefore
//! summarizes the whole stack contents, and popping rewinds the summary to
//! the previous slot for free.

use std::fmt;
use std::sync::Arc;

use candle_core::{Result, Tensor};
use candle_nn::rnn::{LSTM, LSTMState, RNN};

use super::element::Element;

/// One immutable slot of a [`StackLstm`].
///
/// Frames are shared between branched stacks and never mutated after
/// construction.
#[derive(Clone, Debug)]
struct Frame {
    /// LSTM state after reading this slot's input vector.
    state: LSTMState,
    /// Hidden vector of `state`, shape `(1, hidden_dim)`.
    summary: Tensor,
    element: Element,
}

/// A stack of [`Element`]s where each slot carries an incrementally updated
/// LSTM summary vector.
///
/// The stack always holds one sentinel root frame built from the initial
/// state supplied at construction; [`StackLstm::len`] excludes it and it can
/// never be popped. Frames are stored behind `Arc`, so [`Clone`] copies only
/// the frame sequence: the clone costs O(depth), and a branched stack shares
/// frames with its origin without ever aliasing mutable state. Cell weights
/// are shared between branches the same way.
#[derive(Clone, Debug)]
pub struct StackLstm {
    cell: LSTM,
    /// Returned by [`StackLstm::embedding`] while the stack is empty,
    /// shape `(1, hidden_dim)`.
    empty: Tensor,
    /// Sentinel first, most recent push last.
    frames: Vec<Arc<Frame>>,
}

impl StackLstm {
    /// Builds a stack holding only the sentinel root frame.
    ///
    /// `initial_state` seeds the recurrence; its hidden vector becomes the
    /// sentinel's summary. `empty` is the designated embedding of an empty
    /// stack and must have shape `(1, hidden_dim)`.
    pub fn new(cell: LSTM, initial_state: LSTMState, empty: Tensor) -> Self {
        let summary = initial_state.h().clone();
        let sentinel = Frame {
            state: initial_state,
            summary,
            element: Element::Root,
        };
        Self {
            cell,
            empty,
            frames: vec![Arc::new(sentinel)],
        }
    }

    /// Reads `input` (shape `(1, input_dim)`) through the cell from the top
    /// frame's state and pushes the resulting frame for `element`.
    ///
    /// A wrong `input` dimensionality fails as a shape error from the cell.
    pub fn push(&mut self, input: &Tensor, element: Element) -> Result<()> {
        let top = self
            .frames
            .last()
            .expect("stack holds at least the sentinel frame");
        let state = self.cell.step(input, &top.state)?;
        let summary = state.h().clone();
        self.frames.push(Arc::new(Frame {
            state,
            summary,
            element,
        }));
        Ok(())
    }

    /// Removes the top frame and returns its summary vector and element.
    ///
    /// Panics if the stack is empty: popping the sentinel is a transition
    /// bug in the caller, not a runtime condition.
    pub fn pop(&mut self) -> (Tensor, Element) {
        assert!(
            !self.is_empty(),
            "cannot pop the sentinel root frame of a stack LSTM"
        );
        let frame = self
            .frames
            .pop()
            .expect("non-sentinel frame present after depth check");
        (frame.summary.clone(), frame.element)
    }

    /// Summary vector of the top frame, or the designated empty-stack
    /// embedding when nothing has been pushed.
    pub fn embedding(&self) -> Tensor {
        if self.is_empty() {
            return self.empty.clone();
        }
        self.frames
            .last()
            .expect("stack holds at least the sentinel frame")
            .summary
            .clone()
    }

    /// Element at `index` slots below the top; `0` is the most recent push.
    ///
    /// `index == len()` reaches the sentinel. Panics beyond that.
    pub fn element_from_top(&self, index: usize) -> Element {
        assert!(
            index < self.frames.len(),
            "element_from_top({}) out of range for stack of depth {}",
            index,
            self.len()
        );
        self.frames[self.frames.len() - 1 - index].element
    }

    /// Number of pushed frames, the sentinel excluded.
    pub fn len(&self) -> usize {
        self.frames.len() - 1
    }

    /// True when only the sentinel remains.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for StackLstm {
    /// Renders the element chain bottom-up, e.g. `Root->tok:3->nt:1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{}", frame.element)?;
        }
        Ok(())
    }
}

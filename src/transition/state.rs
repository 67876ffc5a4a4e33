//! Beam-search candidate state

use std::cmp::Ordering;

use super::stack::StackLstm;

/// Full mutable state of one shift-reduce parse, branchable for beam search.
///
/// The decode loop owns the transition logic. It reads the three stack
/// embeddings to build scorer input, then applies each chosen action through
/// pushes and pops and writes the bookkeeping fields directly. This type
/// only holds the values and keeps `Clone` cheap and safe, so a candidate
/// can be snapshotted right before the beam branches.
///
/// Candidates order by [`ParserState::neg_log_prob`] ascending, so sorting a
/// batch of them puts the most probable parse first.
#[derive(Clone, Debug)]
pub struct ParserState {
    /// Input tokens still to be shifted, rightmost at the bottom so the next
    /// token sits on top.
    pub buffer: StackLstm,
    /// Control stack of tokens, open nonterminals and completed subtrees.
    pub stack: StackLstm,
    /// Every action taken so far, most recent on top.
    pub action_history: StackLstm,

    /// Ids of the actions predicted so far, in order.
    pub predicted_actions: Vec<usize>,
    /// Score of each predicted action, parallel to `predicted_actions`.
    pub action_scores: Vec<f32>,
    /// How many nonterminals are currently open on `stack`.
    pub open_nt_count: usize,
    /// For each `stack` slot bottom-up, whether it is an open nonterminal.
    pub is_open_nt: Vec<bool>,
    /// Cumulative negative log-probability of the action sequence; lower
    /// means a more probable parse.
    pub neg_log_prob: f32,
    /// Set by the decode loop when it hits an action it cannot apply; the
    /// candidate keeps running and gets penalized or dropped later.
    pub found_unsupported: bool,
}

impl ParserState {
    /// Wraps three freshly built stacks into a candidate with empty
    /// bookkeeping.
    ///
    /// Each stack carries its own cell, initial state and empty-stack
    /// marker; see [`StackLstm::new`].
    pub fn new(buffer: StackLstm, stack: StackLstm, action_history: StackLstm) -> Self {
        Self {
            buffer,
            stack,
            action_history,
            predicted_actions: Vec::new(),
            action_scores: Vec::new(),
            open_nt_count: 0,
            is_open_nt: Vec::new(),
            neg_log_prob: 0.0,
            found_unsupported: false,
        }
    }

    /// True once the parse is done: the buffer is drained and the control
    /// stack holds exactly one entry above the sentinel, the finished tree.
    ///
    /// Recomputed from the stacks on every call, never cached.
    pub fn finished(&self) -> bool {
        self.stack.len() == 1 && self.buffer.is_empty()
    }
}

/// Candidates compare by `neg_log_prob` alone.
///
/// `total_cmp` gives a lawful total order even for NaN scores, which keeps
/// beam sorting unambiguous.
impl Ord for ParserState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.neg_log_prob.total_cmp(&other.neg_log_prob)
    }
}

impl PartialOrd for ParserState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParserState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParserState {}

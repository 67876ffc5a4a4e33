//! Width-bounded candidate keeper

use super::state::ParserState;

/// Keeps the top-K parser candidates between decode steps.
///
/// Each decode step drains the beam with [`Beam::take`] and expands every
/// candidate. The expansions come back through [`Beam::offer`], and
/// [`Beam::prune`] then drops everything past the configured width. Ranking
/// comes from the candidates' own ordering (cumulative negative
/// log-probability ascending), so the most probable parses survive.
#[derive(Clone, Debug)]
pub struct Beam {
    width: usize,
    states: Vec<ParserState>,
}

impl Beam {
    /// Creates an empty beam keeping at most `width` candidates. Panics if
    /// `width` is zero.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "beam width must be at least 1");
        Self {
            width,
            states: Vec::new(),
        }
    }

    /// Adds a candidate without pruning; call [`Beam::prune`] once the
    /// step's expansions are all in.
    pub fn offer(&mut self, state: ParserState) {
        self.states.push(state);
    }

    /// Sorts candidates best-first and drops everything past the width.
    pub fn prune(&mut self) {
        self.states.sort();
        if self.states.len() > self.width {
            log::debug!(
                "beam prune: keeping {} of {} candidates",
                self.width,
                self.states.len()
            );
            for state in &self.states[self.width..] {
                log::trace!("pruned candidate with neg_log_prob {}", state.neg_log_prob);
            }
            self.states.truncate(self.width);
        }
    }

    /// Current candidates; best-first right after a [`Beam::prune`].
    pub fn states(&self) -> &[ParserState] {
        &self.states
    }

    /// Removes and returns the most probable candidate.
    pub fn pop_best(&mut self) -> Option<ParserState> {
        let best = self
            .states
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(i, _)| i)?;
        Some(self.states.remove(best))
    }

    /// Drains the beam best-first, handing the candidates to the next
    /// decode step.
    pub fn take(&mut self) -> Vec<ParserState> {
        self.states.sort();
        std::mem::take(&mut self.states)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

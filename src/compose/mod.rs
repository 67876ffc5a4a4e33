//! Subtree Composition Functions
//!
//! When the decode loop reduces, the vectors of a completed constituent's
//! children have to collapse into one parent vector that goes back onto the
//! control stack. The two combinators here are interchangeable strategies
//! for that collapse:
//!
//! - [`BiLstmComposer`]: order-sensitive, reads the children through a
//!   forward and a backward LSTM pass both anchored on the nonterminal.
//! - [`SumComposer`]: order-insensitive elementwise sum, much cheaper.
//!
//! Both end in the same `Linear` + `tanh` projection back to the stack
//! dimensionality, and both are pure functions of their inputs and weights:
//! recurrent passes always start from the cell's zero state, so repeated
//! calls with the same inputs return the same vector.
//!
//! ## Input order
//!
//! Reduces pop children off the control stack top-down, so `compose` takes
//! them the way they come off: in reverse (right-to-left) order of
//! appearance, with the nonterminal's own vector appended last. Reducing
//! `(NP the cat)` therefore passes `[cat, the, NP]`.

use candle_core::{Result, Tensor};
use candle_nn::rnn::{lstm, LSTM, LSTMConfig, RNN};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Combines an ordered group of `(1, dim)` vectors into one `(1, dim)`
/// parent vector.
///
/// Implementations hold learned parameters but no per-call state. See the
/// module docs for the input-order contract; every implementation panics on
/// an empty input list, since a reduce always consumes at least the
/// nonterminal.
pub trait Composer {
    fn compose(&self, xs: &[Tensor]) -> Result<Tensor>;
}

/// Runs `cell` over `xs` from its zero state and returns the final hidden
/// vector.
fn final_hidden(cell: &LSTM, xs: &[&Tensor]) -> Result<Tensor> {
    let mut state = cell.zero_state(1)?;
    for x in xs {
        state = cell.step(x, &state)?;
    }
    Ok(state.h().clone())
}

/// Order-sensitive composition through a pair of LSTMs.
///
/// The forward pass reads `[nonterminal, children left-to-right]`, the
/// backward pass `[nonterminal, children right-to-left]`; both final hidden
/// vectors are concatenated and projected through `Linear(2 * dim -> dim)`
/// followed by `tanh`. Anchoring both passes on the nonterminal lets the
/// label condition how its children combine.
pub struct BiLstmComposer {
    fwd: LSTM,
    rev: LSTM,
    proj: Linear,
}

impl BiLstmComposer {
    /// Builds the composer for `dim`-sized vectors, drawing weights from
    /// `vb` (under `fwd`, `rev` and `proj`). The parameters belong to the
    /// scoring model's variable store, not to this crate.
    pub fn new(dim: usize, vb: VarBuilder) -> Result<Self> {
        let fwd = lstm(dim, dim, LSTMConfig::default(), vb.pp("fwd"))?;
        let rev = lstm(dim, dim, LSTMConfig::default(), vb.pp("rev"))?;
        let proj = linear(2 * dim, dim, vb.pp("proj"))?;
        Ok(Self { fwd, rev, proj })
    }
}

impl Composer for BiLstmComposer {
    fn compose(&self, xs: &[Tensor]) -> Result<Tensor> {
        let (nonterminal, reversed_children) = xs
            .split_last()
            .expect("composition input holds at least the nonterminal vector");

        // children arrive reversed, so .rev() restores surface order
        let mut fwd_input: Vec<&Tensor> = Vec::with_capacity(xs.len());
        fwd_input.push(nonterminal);
        fwd_input.extend(reversed_children.iter().rev());

        let mut rev_input: Vec<&Tensor> = Vec::with_capacity(xs.len());
        rev_input.push(nonterminal);
        rev_input.extend(reversed_children.iter());

        let fwd_h = final_hidden(&self.fwd, &fwd_input)?;
        let rev_h = final_hidden(&self.rev, &rev_input)?;
        let combined = Tensor::cat(&[&fwd_h, &rev_h], 1)?;
        self.proj.forward(&combined)?.tanh()
    }
}

/// Order-insensitive composition: elementwise sum of all inputs, then
/// `Linear(dim -> dim)` and `tanh`.
pub struct SumComposer {
    proj: Linear,
}

impl SumComposer {
    /// Builds the composer for `dim`-sized vectors, drawing weights from
    /// `vb` (under `proj`).
    pub fn new(dim: usize, vb: VarBuilder) -> Result<Self> {
        let proj = linear(dim, dim, vb.pp("proj"))?;
        Ok(Self { proj })
    }
}

impl Composer for SumComposer {
    fn compose(&self, xs: &[Tensor]) -> Result<Tensor> {
        assert!(
            !xs.is_empty(),
            "composition input holds at least the nonterminal vector"
        );
        let summed = Tensor::cat(xs, 0)?.sum_keepdim(0)?;
        self.proj.forward(&summed)?.tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    const DIM: usize = 6;

    fn builder() -> VarBuilder<'static> {
        VarBuilder::from_varmap(&VarMap::new(), DType::F32, &Device::Cpu)
    }

    fn vector(fill: f32, spike: usize) -> Result<Tensor> {
        let mut vals = vec![fill; DIM];
        vals[spike] = 1.0;
        Ok(Tensor::from_vec(vals, (1, DIM), &Device::Cpu)?)
    }

    fn flatten(t: &Tensor) -> Result<Vec<f32>> {
        Ok(t.to_vec2::<f32>()?.remove(0))
    }

    fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn outputs_keep_dimensionality() -> Result<()> {
        let vb = builder();
        let bi = BiLstmComposer::new(DIM, vb.pp("bi"))?;
        let sum = SumComposer::new(DIM, vb.pp("sum"))?;
        let xs = vec![vector(0.1, 0)?, vector(0.2, 1)?, vector(0.3, 2)?];

        assert_eq!(bi.compose(&xs)?.dims(), &[1, DIM]);
        assert_eq!(sum.compose(&xs)?.dims(), &[1, DIM]);
        Ok(())
    }

    #[test]
    fn repeated_calls_are_deterministic() -> Result<()> {
        let vb = builder();
        let bi = BiLstmComposer::new(DIM, vb.pp("bi"))?;
        let sum = SumComposer::new(DIM, vb.pp("sum"))?;
        let xs = vec![vector(0.4, 3)?, vector(-0.2, 1)?, vector(0.0, 5)?];

        assert_eq!(flatten(&bi.compose(&xs)?)?, flatten(&bi.compose(&xs)?)?);
        assert_eq!(flatten(&sum.compose(&xs)?)?, flatten(&sum.compose(&xs)?)?);
        Ok(())
    }

    #[test]
    fn sum_ignores_child_order() -> Result<()> {
        let vb = builder();
        let sum = SumComposer::new(DIM, vb)?;
        let (a, b, nt) = (vector(0.5, 0)?, vector(-0.5, 2)?, vector(0.1, 4)?);

        let out_ab = flatten(&sum.compose(&[a.clone(), b.clone(), nt.clone()])?)?;
        let out_ba = flatten(&sum.compose(&[b, a, nt])?)?;
        // permuting the summands can wobble the last bit, nothing more
        assert!(max_abs_diff(&out_ab, &out_ba) < 1e-6);
        Ok(())
    }

    #[test]
    fn bilstm_is_order_sensitive() -> Result<()> {
        let vb = builder();
        let bi = BiLstmComposer::new(DIM, vb)?;
        let (a, b, nt) = (vector(0.5, 0)?, vector(-0.5, 2)?, vector(0.1, 4)?);

        let out_ab = flatten(&bi.compose(&[a.clone(), b.clone(), nt.clone()])?)?;
        let out_ba = flatten(&bi.compose(&[b, a, nt])?)?;
        assert!(max_abs_diff(&out_ab, &out_ba) > 1e-6);
        Ok(())
    }

    #[test]
    fn lone_nonterminal_composes() -> Result<()> {
        // reducing an empty constituent passes only the nonterminal vector
        let vb = builder();
        let bi = BiLstmComposer::new(DIM, vb.pp("bi"))?;
        let sum = SumComposer::new(DIM, vb.pp("sum"))?;
        let nt = vector(0.3, 1)?;

        assert_eq!(bi.compose(&[nt.clone()])?.dims(), &[1, DIM]);
        assert_eq!(sum.compose(&[nt])?.dims(), &[1, DIM]);
        Ok(())
    }
}

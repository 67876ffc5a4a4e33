// Walks one sentence through a scripted shift-reduce derivation, then
// shows how a beam keeps the best few branches of the same state.
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::rnn::{lstm, LSTMConfig, RNN};
use candle_nn::{VarBuilder, VarMap};

use spalier::{Beam, BiLstmComposer, Composer, Element, ParserState, StackLstm};

const DIM: usize = 16;

const SHIFT: usize = 0;
const REDUCE: usize = 1;
const OPEN_S: usize = 2;
const OPEN_NP: usize = 3;
const OPEN_VP: usize = 4;

fn action_name(idx: usize) -> &'static str {
    match idx {
        SHIFT => "SHIFT",
        REDUCE => "REDUCE",
        OPEN_S => "NT(S)",
        OPEN_NP => "NT(NP)",
        OPEN_VP => "NT(VP)",
        _ => "?",
    }
}

fn fresh_stack(vb: &VarBuilder, tag: &str, dev: &Device) -> Result<StackLstm> {
    let cell = lstm(DIM, DIM, LSTMConfig::default(), vb.pp(tag))?;
    let init = cell.zero_state(1)?;
    let empty = Tensor::zeros((1, DIM), DType::F32, dev)?;
    Ok(StackLstm::new(cell, init, empty))
}

fn random_vectors(n: usize, dev: &Device) -> Result<Vec<Tensor>> {
    (0..n)
        .map(|_| Ok(Tensor::randn(0f32, 1f32, (1, DIM), dev)?))
        .collect()
}

/// Applies one action to the state, scoring it with a made-up log
/// probability so the bookkeeping has something to track.
fn apply(
    state: &mut ParserState,
    action: usize,
    log_prob: f32,
    actions: &[Tensor],
    nonterminals: &[Tensor],
    composer: &BiLstmComposer,
) -> Result<()> {
    match action {
        SHIFT => {
            let (word, element) = state.buffer.pop();
            state.stack.push(&word, element)?;
            state.is_open_nt.push(false);
        }
        REDUCE => {
            let mut reps = Vec::new();
            while !state.stack.element_from_top(0).is_open_nonterminal() {
                let (summary, _) = state.stack.pop();
                state.is_open_nt.pop();
                reps.push(summary);
            }
            let (nt_summary, nt) = state.stack.pop();
            state.is_open_nt.pop();
            reps.push(nt_summary);

            let id = match nt {
                Element::Nonterminal(id) => id,
                other => unreachable!("reduce stopped on {other}"),
            };
            let subtree = composer.compose(&reps)?;
            state.stack.push(&subtree, Element::Subtree(id))?;
            state.is_open_nt.push(false);
            state.open_nt_count -= 1;
        }
        open => {
            let id = open - OPEN_S;
            state.stack.push(&nonterminals[id], Element::Nonterminal(id))?;
            state.is_open_nt.push(true);
            state.open_nt_count += 1;
        }
    }

    state.action_history.push(&actions[action], Element::Action(action))?;
    state.predicted_actions.push(action);
    state.action_scores.push(log_prob);
    state.neg_log_prob -= log_prob;
    Ok(())
}

fn main() -> Result<()> {
    let dev = Device::Cpu;
    let vb = VarBuilder::from_varmap(&VarMap::new(), DType::F32, &dev);

    let words = ["the", "cat", "sleeps"];
    let word_vecs = random_vectors(words.len(), &dev)?;
    let nonterminals = random_vectors(3, &dev)?;
    let action_vecs = random_vectors(5, &dev)?;
    let composer = BiLstmComposer::new(DIM, vb.pp("compose"))?;

    let mut state = ParserState::new(
        fresh_stack(&vb, "buffer", &dev)?,
        fresh_stack(&vb, "stack", &dev)?,
        fresh_stack(&vb, "actions", &dev)?,
    );

    // load the buffer back to front so pops read left to right
    for (id, vec) in word_vecs.iter().enumerate().rev() {
        state.buffer.push(vec, Element::Token(id))?;
    }
    println!("sentence: {}", words.join(" "));
    println!("buffer:   {}\n", state.buffer);

    // (S (NP the cat) (VP sleeps))
    let derivation = [
        (OPEN_S, -0.05),
        (OPEN_NP, -0.10),
        (SHIFT, -0.02),
        (SHIFT, -0.04),
        (REDUCE, -0.01),
        (OPEN_VP, -0.20),
        (SHIFT, -0.03),
        (REDUCE, -0.01),
        (REDUCE, -0.02),
    ];
    for (action, log_prob) in derivation {
        apply(&mut state, action, log_prob, &action_vecs, &nonterminals, &composer)?;
        println!("{:8} stack: {}", action_name(action), state.stack);
    }

    println!("\nfinished:     {}", state.finished());
    println!("neg log prob: {:.3}", state.neg_log_prob);
    println!(
        "actions:      {}",
        state
            .predicted_actions
            .iter()
            .map(|&a| action_name(a))
            .collect::<Vec<_>>()
            .join(" ")
    );

    // Branch the finished state three ways and let a width-2 beam pick.
    // Cloning shares the pushed frames, so this is cheap.
    let mut beam = Beam::new(2);
    for (label, penalty) in [("a", 0.9), ("b", 0.1), ("c", 0.4)] {
        let mut branch = state.clone();
        branch.neg_log_prob += penalty;
        println!("offering branch {label} at {:.3}", branch.neg_log_prob);
        beam.offer(branch);
    }
    beam.prune();
    println!("beam kept {} of 3", beam.len());
    let best = beam.pop_best().expect("beam holds the pruned survivors");
    println!("best branch:  {:.3}", best.neg_log_prob);
    Ok(())
}

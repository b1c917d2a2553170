//! The `dot` module contains the conversion of NFAs and DFAs to the graphviz dot format.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use crate::{Dfa, Nfa};

/// Render the NFA to a graphviz dot format.
/// The start state is drawn blue, accept states are drawn red.
pub fn nfa_render<W: Write>(nfa: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in nfa.states() {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&state.id().to_string());
            if state.id() == nfa.start_state() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if nfa.accept_states().contains(&state.id()) {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            format!("node_{}", state.id())
        };
        for (symbol, targets) in state.transitions() {
            for target_state in targets {
                digraph
                    .edge(&source_id, &format!("node_{}", target_state))
                    .attributes()
                    .set_label(&symbol.escape_default().to_string());
            }
        }
        for target_state in state.epsilon_transitions() {
            digraph
                .edge(&source_id, &format!("node_{}", target_state))
                .attributes()
                .set_label("ε");
        }
    }
}

/// Render a DFA to a graphviz dot format.
pub fn dfa_render<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    // Render the states of the DFA
    for state in dfa.states() {
        let mut source_node = digraph.node_auto();
        source_node.set_label(&state.id().to_string());
        if state.id() == dfa.start_state() {
            source_node
                .set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
        if dfa.is_accepting(state.id()) {
            source_node
                .set_color(dot_writer::Color::Red)
                .set_pen_width(3.0);
        }
    }
    // Render the transitions of the DFA
    for (source_id, targets) in dfa.transitions() {
        for (symbol, target_id) in targets {
            digraph
                .edge(
                    &format!("node_{}", source_id),
                    &format!("node_{}", target_id),
                )
                .attributes()
                .set_label(&symbol.escape_default().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfa_render() {
        let nfa = Nfa::from_regex("a|b").unwrap();
        let mut output = Vec::new();
        nfa_render(&nfa, "a_or_b", &mut output);
        let dot = String::from_utf8(output).unwrap();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("a_or_b"));
        assert!(dot.contains("node_4 -> node_0"));
        assert!(dot.contains("ε"));
    }

    #[test]
    fn test_dfa_render() {
        let nfa = Nfa::from_regex("ab").unwrap();
        let dfa = Dfa::from_nfa(&nfa, &nfa.alphabet());
        let mut output = Vec::new();
        dfa_render(&dfa, "ab", &mut output);
        let dot = String::from_utf8(output).unwrap();
        assert!(dot.contains("node_0 -> node_1"));
        assert!(dot.contains("node_1 -> node_2"));
        assert!(!dot.contains("ε"));
    }
}

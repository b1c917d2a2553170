//! This module contains the conversion of an infix regex into postfix notation.
//! Implicit concatenation is made explicit with the `.` operator first, then the classic
//! shunting-yard algorithm reorders the symbols by operator precedence.

use log::trace;

use crate::{Alphabet, LexGenError, LexGenErrorKind, Result};

/// A symbol of a regex, either an operand or an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegexSymbol {
    /// An alphanumeric operand that matches exactly itself.
    Literal(char),
    /// The binary union operator `|`.
    Union,
    /// The binary concatenation operator `.`.
    Concat,
    /// The unary postfix Kleene star `*`.
    Star,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl RegexSymbol {
    /// Classify a character of an infix regex.
    fn classify(c: char, position: usize) -> Result<Self> {
        match c {
            '|' => Ok(RegexSymbol::Union),
            '.' => Ok(RegexSymbol::Concat),
            '*' => Ok(RegexSymbol::Star),
            '(' => Ok(RegexSymbol::LeftParen),
            ')' => Ok(RegexSymbol::RightParen),
            c if c.is_ascii_alphanumeric() => Ok(RegexSymbol::Literal(c)),
            _ => Err(LexGenError::new(LexGenErrorKind::UnsupportedCharacter {
                character: c,
                position,
            })),
        }
    }

    /// The binding strength of an operator. Parentheses and operands have none.
    pub fn precedence(&self) -> u8 {
        match self {
            RegexSymbol::Star => 3,
            RegexSymbol::Concat => 2,
            RegexSymbol::Union => 1,
            _ => 0,
        }
    }

    /// Returns true for literals.
    pub fn is_operand(&self) -> bool {
        matches!(self, RegexSymbol::Literal(_))
    }

    // A concatenation is implied between `self` and a directly following `next`.
    fn implies_concat_with(&self, next: &RegexSymbol) -> bool {
        matches!(
            self,
            RegexSymbol::Literal(_) | RegexSymbol::RightParen | RegexSymbol::Star
        ) && matches!(next, RegexSymbol::Literal(_) | RegexSymbol::LeftParen)
    }
}

impl std::fmt::Display for RegexSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            RegexSymbol::Literal(c) => *c,
            RegexSymbol::Union => '|',
            RegexSymbol::Concat => '.',
            RegexSymbol::Star => '*',
            RegexSymbol::LeftParen => '(',
            RegexSymbol::RightParen => ')',
        };
        write!(f, "{}", c)
    }
}

/// A regex in postfix notation. It contains no parentheses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix(Vec<RegexSymbol>);

impl Postfix {
    /// The symbols in evaluation order.
    pub fn symbols(&self) -> &[RegexSymbol] {
        &self.0
    }

    /// Returns true if there are no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The set of literals used by the regex.
    pub fn literals(&self) -> Alphabet {
        self.0
            .iter()
            .filter_map(|symbol| match symbol {
                RegexSymbol::Literal(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for Postfix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|symbol| write!(f, "{}", symbol))
    }
}

/// Parses a regex that is already written in postfix notation, e.g. `ab.c*|`.
impl std::str::FromStr for Postfix {
    type Err = LexGenError;

    fn from_str(s: &str) -> Result<Self> {
        s.char_indices()
            .map(|(position, c)| match RegexSymbol::classify(c, position)? {
                RegexSymbol::LeftParen | RegexSymbol::RightParen => {
                    Err(LexGenError::new(LexGenErrorKind::MalformedRegex(format!(
                        "parenthesis at position {} in postfix regex",
                        position
                    ))))
                }
                symbol => Ok(symbol),
            })
            .collect::<Result<Vec<_>>>()
            .map(Postfix)
    }
}

/// Split the infix regex into symbols and insert the implicit concatenations.
/// Each symbol is paired with its byte offset; an inserted `.` takes the offset of the symbol
/// that follows it.
fn explicit_concatenation(infix: &str) -> Result<Vec<(usize, RegexSymbol)>> {
    let mut symbols: Vec<(usize, RegexSymbol)> = Vec::with_capacity(infix.len() * 2);
    for (position, c) in infix.char_indices() {
        let symbol = RegexSymbol::classify(c, position)?;
        if let Some((_, previous)) = symbols.last() {
            if previous.implies_concat_with(&symbol) {
                symbols.push((position, RegexSymbol::Concat));
            }
        }
        symbols.push((position, symbol));
    }
    Ok(symbols)
}

/// Convert an infix regex into postfix notation.
///
/// # Errors
/// * `MismatchedParentheses` if a `)` has no opening partner or a `(` is never closed.
/// * `UnsupportedCharacter` for characters outside the operand and operator set.
pub fn to_postfix(infix: &str) -> Result<Postfix> {
    let mut output = Vec::with_capacity(infix.len() * 2);
    let mut operators: Vec<(usize, RegexSymbol)> = Vec::new();

    for (position, symbol) in explicit_concatenation(infix)? {
        match symbol {
            RegexSymbol::Literal(_) => output.push(symbol),
            RegexSymbol::LeftParen => operators.push((position, symbol)),
            RegexSymbol::RightParen => loop {
                match operators.pop() {
                    Some((_, RegexSymbol::LeftParen)) => break,
                    Some((_, operator)) => output.push(operator),
                    None => {
                        return Err(LexGenError::new(
                            LexGenErrorKind::MismatchedParentheses { position },
                        ))
                    }
                }
            },
            operator => {
                while let Some((_, top)) = operators.last() {
                    if top.precedence() < operator.precedence() {
                        break;
                    }
                    output.push(*top);
                    operators.pop();
                }
                operators.push((position, operator));
            }
        }
    }

    while let Some((position, operator)) = operators.pop() {
        if operator == RegexSymbol::LeftParen {
            return Err(LexGenError::new(LexGenErrorKind::MismatchedParentheses {
                position,
            }));
        }
        output.push(operator);
    }

    let postfix = Postfix(output);
    trace!("Postfix of '{}' is '{}'", infix, postfix);
    Ok(postfix)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_implicit_concatenation() {
        let rendered = |infix: &str| {
            explicit_concatenation(infix)
                .unwrap()
                .iter()
                .map(|(_, s)| s.to_string())
                .collect::<String>()
        };
        assert_eq!(rendered("ab"), "a.b");
        assert_eq!(rendered("a(b)"), "a.(b)");
        assert_eq!(rendered("(a)b"), "(a).b");
        assert_eq!(rendered("a*b"), "a*.b");
        assert_eq!(rendered("a*(b)"), "a*.(b)");
        assert_eq!(rendered("(a)(b)"), "(a).(b)");
        assert_eq!(rendered("a|b"), "a|b");
        assert_eq!(rendered("a.b"), "a.b");
    }

    #[test]
    fn test_to_postfix() {
        let cases = [
            ("a", "a"),
            ("ab", "ab."),
            ("a|b", "ab|"),
            ("a(b|c)*", "abc|*."),
            ("ab|c*", "ab.c*|"),
            ("0|1|2", "01|2|"),
            ("abc", "ab.c."),
            ("(a|b)*abb", "ab|*a.b.b."),
            ("a**", "a**"),
            ("if", "if."),
        ];
        for (infix, expected) in cases {
            assert_eq!(to_postfix(infix).unwrap().to_string(), expected, "{}", infix);
        }
    }

    #[test]
    fn test_mismatched_parentheses() {
        for (infix, expected_position) in [("(a", 0), ("a)", 1), ("(a))", 3), ("((a)", 0)] {
            let error = to_postfix(infix).unwrap_err();
            assert!(
                matches!(
                    error.kind(),
                    LexGenErrorKind::MismatchedParentheses { position } if *position == expected_position
                ),
                "{}: {}",
                infix,
                error
            );
        }
    }

    #[test]
    fn test_unsupported_character() {
        let error = to_postfix("a+").unwrap_err();
        assert!(matches!(
            error.kind(),
            LexGenErrorKind::UnsupportedCharacter {
                character: '+',
                position: 1
            }
        ));
        assert!(to_postfix("a b").is_err());
    }

    #[test]
    fn test_postfix_from_str() {
        let postfix: Postfix = "ab.c*|".parse().unwrap();
        assert_eq!(postfix.symbols().len(), 6);
        assert_eq!(postfix.to_string(), "ab.c*|");
        assert_eq!(postfix.literals().to_string(), "{a, b, c}");
        assert!("a(b".parse::<Postfix>().is_err());
    }

    // Evaluates a postfix regex over sets of strings, keeping only strings up to `max_len`.
    fn language(postfix: &Postfix, max_len: usize) -> BTreeSet<String> {
        let concat = |a: &BTreeSet<String>, b: &BTreeSet<String>| -> BTreeSet<String> {
            a.iter()
                .flat_map(|x| b.iter().map(move |y| format!("{}{}", x, y)))
                .filter(|s| s.len() <= max_len)
                .collect()
        };
        let mut stack: Vec<BTreeSet<String>> = Vec::new();
        for symbol in postfix.symbols() {
            let set = match symbol {
                RegexSymbol::Literal(c) => BTreeSet::from([c.to_string()]),
                RegexSymbol::Concat => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    concat(&a, &b)
                }
                RegexSymbol::Union => {
                    let b = stack.pop().unwrap();
                    let mut a = stack.pop().unwrap();
                    a.extend(b);
                    a
                }
                RegexSymbol::Star => {
                    let a = stack.pop().unwrap();
                    let mut result = BTreeSet::from([String::new()]);
                    loop {
                        let next: BTreeSet<String> =
                            result.union(&concat(&result, &a)).cloned().collect();
                        if next == result {
                            break result;
                        }
                        result = next;
                    }
                }
                _ => unreachable!(),
            };
            stack.push(set);
        }
        assert_eq!(stack.len(), 1);
        stack.pop().unwrap()
    }

    #[test]
    fn test_postfix_preserves_language() {
        let mut inputs = vec![String::new()];
        for _ in 0..4 {
            let longer: Vec<String> = inputs
                .iter()
                .flat_map(|prefix| "abc".chars().map(move |c| format!("{}{}", prefix, c)))
                .collect();
            inputs.extend(longer);
            inputs.sort();
            inputs.dedup();
        }
        for infix in ["a(b|c)*", "ab|c*", "(a|b)*abb", "a*b*", "(ab|b)*a", "a|bc*"] {
            let words = language(&to_postfix(infix).unwrap(), 4);
            let oracle = regex::Regex::new(&format!("^(?:{})$", infix)).unwrap();
            for input in &inputs {
                assert_eq!(
                    words.contains(input),
                    oracle.is_match(input),
                    "{} on '{}'",
                    infix,
                    input
                );
            }
        }
    }

    #[test]
    fn test_empty_regex() {
        assert!(to_postfix("").unwrap().is_empty());
        assert!(to_postfix("()").unwrap().is_empty());
    }
}

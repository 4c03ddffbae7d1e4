//! Literal masking for GraphQL query text.
//!
//! This is a single left-to-right character scan, not a grammar. The scanner
//! only needs to know whether it is inside a string literal and whether it is
//! inside argument parentheses; everything else is copied through. Inside
//! parentheses, bare words are buffered until a delimiter and replaced by the
//! marker only if they parse as numbers, so field names, enum values and
//! `$variable` references survive.
//!
//! Nesting is tracked with a single flag: the first `)` closes the argument
//! list no matter how many `(` preceded it.

use std::mem;

use crate::policy::REDACTION_MARKER;

/// Masks every string and numeric literal that appears inside argument
/// parentheses of `query`.
///
/// String literals are replaced by `"***"` and numbers by a bare `***`.
/// Operation, field and directive names and `$variable` references are never
/// touched. An unterminated string literal is masked at end of input.
///
/// ```rust
/// use netredact::mask_literals;
///
/// assert_eq!(
///     mask_literals(r#"user(age: 25, role: "admin", id: $id) { name }"#),
///     r#"user(age: ***, role: "***", id: $id) { name }"#,
/// );
/// ```
pub fn mask_literals(query: &str) -> String {
    query
        .chars()
        .fold(Scanner::with_capacity(query.len()), Scanner::step)
        .finish()
}

/// Explicit scan state threaded through the fold.
///
/// The content of a string literal is never buffered; it is dropped as it is
/// scanned and replaced by the marker when the literal closes.
#[derive(Debug, Default)]
struct Scanner {
    output: String,
    pending: String,
    in_string: bool,
    in_parens: bool,
    escape_next: bool,
}

impl Scanner {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn step(mut self, ch: char) -> Self {
        if self.escape_next {
            self.escape_next = false;
            self.accept(ch);
            return self;
        }

        match ch {
            '\\' => {
                self.escape_next = true;
                if !self.in_string {
                    self.flush_checked();
                    self.output.push(ch);
                }
            }
            '"' => self.quote(),
            '(' if !self.in_string => {
                self.flush_verbatim();
                self.output.push(ch);
                self.in_parens = true;
            }
            ')' if !self.in_string => {
                self.flush_checked();
                self.output.push(ch);
                self.in_parens = false;
            }
            ' ' | '\n' | '\t' | ',' | ':' if !self.in_string => {
                self.flush_checked();
                self.output.push(ch);
            }
            _ => self.accept(ch),
        }
        self
    }

    /// Routes an ordinary character to the active buffer.
    fn accept(&mut self, ch: char) {
        if self.in_string {
            return;
        }
        if self.in_parens {
            self.pending.push(ch);
        } else {
            self.output.push(ch);
        }
    }

    fn quote(&mut self) {
        if self.in_string {
            self.in_string = false;
            self.push_masked_string();
        } else if self.in_parens {
            self.flush_checked();
            self.in_string = true;
        } else {
            self.output.push('"');
        }
    }

    fn push_masked_string(&mut self) {
        self.output.push('"');
        self.output.push_str(REDACTION_MARKER);
        self.output.push('"');
    }

    fn flush_verbatim(&mut self) {
        let token = mem::take(&mut self.pending);
        self.output.push_str(&token);
    }

    fn flush_checked(&mut self) {
        let token = mem::take(&mut self.pending);
        if is_numeric_literal(&token) {
            self.output.push_str(REDACTION_MARKER);
        } else {
            self.output.push_str(&token);
        }
    }

    fn finish(mut self) -> String {
        if self.in_string {
            diagnostic!("unterminated string literal, masking it");
            self.push_masked_string();
        } else {
            self.flush_verbatim();
        }
        self.output
    }
}

/// `true` for a bare token that is a number rather than a name or `$variable`.
fn is_numeric_literal(token: &str) -> bool {
    let token = token.trim();
    !token.is_empty() && !token.starts_with('$') && token.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::{is_numeric_literal, mask_literals};

    #[test]
    fn masks_numbers_and_strings_in_arguments() {
        let masked = mask_literals(r#"user(age: 25, role: "admin")"#);
        assert_eq!(masked, r#"user(age: ***, role: "***")"#);
    }

    #[test]
    fn variable_references_are_untouched() {
        let query = "user(id: $userId)";
        assert_eq!(mask_literals(query), query);
    }

    #[test]
    fn text_outside_parentheses_is_copied() {
        let query = "query GetUser { user { id name friends { id } } }";
        assert_eq!(mask_literals(query), query);
    }

    #[test]
    fn unterminated_string_is_masked() {
        let masked = mask_literals(r#"query Q { f(x: "unterminated"#);
        assert_eq!(masked, r#"query Q { f(x: "***""#);
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let masked = mask_literals(r#"f(x: "say \"hi\" now")"#);
        assert_eq!(masked, r#"f(x: "***")"#);
    }

    #[test]
    fn delimiters_and_parens_inside_strings_are_content() {
        let masked = mask_literals(r#"f(x: "a, b: (c)\td")"#);
        assert_eq!(masked, r#"f(x: "***")"#);
    }

    #[test]
    fn enum_and_boolean_arguments_survive() {
        let query = "users(order: DESC, active: true, limit: 10)";
        assert_eq!(
            mask_literals(query),
            "users(order: DESC, active: true, limit: ***)"
        );
    }

    #[test]
    fn directives_keep_names_and_variables() {
        let query = "{ a @include(if: $flag) b @skip(if: false) }";
        assert_eq!(mask_literals(query), query);
    }

    #[test]
    fn variable_default_values_are_masked() {
        let masked = mask_literals("query Q($n: Int = 5, $s: String = \"x\") { f(n: $n) }");
        assert_eq!(
            masked,
            "query Q($n: Int = ***, $s: String = \"***\") { f(n: $n) }"
        );
    }

    #[test]
    fn quotes_outside_parentheses_are_structural() {
        let query = r#"{ a "b" c }"#;
        assert_eq!(mask_literals(query), query);
    }

    #[test]
    fn escaped_character_inside_arguments_goes_through_numeric_check() {
        assert_eq!(mask_literals(r"f(x: \5)"), r"f(x: \***)");
    }

    #[test]
    fn trailing_token_after_unclosed_parens_is_kept() {
        assert_eq!(mask_literals("f(x: abc"), "f(x: abc");
    }

    #[test]
    fn truncated_number_at_end_of_input_is_kept() {
        assert_eq!(mask_literals("f(x: 5"), "f(x: 5");
    }

    #[test]
    fn first_closing_paren_ends_arguments() {
        assert_eq!(mask_literals("f(a: g(1), b: 2)"), "f(a: g(***), b: 2)");
    }

    #[test]
    fn nested_object_argument_uses_single_flag() {
        let masked = mask_literals(r#"f(input: {name: "x", age: 5 }) { id }"#);
        assert_eq!(masked, r#"f(input: {name: "***", age: *** }) { id }"#);
    }

    #[test]
    fn empty_input() {
        assert_eq!(mask_literals(""), "");
    }

    #[test]
    fn numeric_check() {
        assert!(is_numeric_literal("25"));
        assert!(is_numeric_literal("-3.5e2"));
        assert!(is_numeric_literal(" 7 "));
        assert!(!is_numeric_literal(""));
        assert!(!is_numeric_literal("$n"));
        assert!(!is_numeric_literal("DESC"));
        assert!(!is_numeric_literal("5}"));
    }
}

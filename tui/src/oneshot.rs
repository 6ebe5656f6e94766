//! Headless conversion
//!
//! Runs a single submission without the terminal surface and prints the
//! result, for `--once INPUT` and for input piped on stdin.

use std::io::{self, Write};

use masq_core::{Conductor, Submission, TokenizerAdapter};

/// Convert `input` and write the outcome
///
/// The result goes to `out` (as JSON when `json` is set); a conversion
/// failure goes to `err`. Blank input prints nothing. Returns whether the
/// conversion succeeded.
pub fn run_once<T: TokenizerAdapter>(
    tokenizer: T,
    input: &str,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let mut conductor = Conductor::new(tokenizer);
    conductor.set_input(input);

    match conductor.submit() {
        Submission::Converted(conversion) => {
            if json {
                let encoded = serde_json::to_string(&conversion).map_err(io::Error::other)?;
                writeln!(out, "{encoded}")?;
            } else {
                writeln!(out, "{}", conversion.output)?;
            }
            Ok(true)
        }
        Submission::Failed(e) => {
            writeln!(err, "error: {e}")?;
            Ok(false)
        }
        Submission::Skipped => {
            tracing::debug!("Blank input, nothing to convert");
            Ok(true)
        }
    }
}

/// Drop the line terminator a pipe usually appends
pub fn trim_piped(input: &str) -> &str {
    input
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use masq_core::{TokenId, TokenizerError};
    use pretty_assertions::assert_eq;

    struct CharTokenizer;

    impl TokenizerAdapter for CharTokenizer {
        fn name(&self) -> &str {
            "chars"
        }

        fn encode(&self, text: &str) -> Vec<TokenId> {
            text.chars().map(u32::from).collect()
        }

        fn decode(&self, tokens: &[TokenId]) -> Result<String, TokenizerError> {
            tokens
                .iter()
                .map(|&t| char::from_u32(t).ok_or(TokenizerError::UnknownToken(t)))
                .collect()
        }
    }

    fn run(input: &str, json: bool) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run_once(CharTokenizer, input, json, &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_plain_output() {
        assert_eq!(run("hi", false), (true, "104 105\n".into(), String::new()));
        assert_eq!(run("104 105", false), (true, "hi\n".into(), String::new()));
    }

    #[test]
    fn test_json_output() {
        let (ok, out, _) = run("104 105", true);
        assert!(ok);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["mode"], "decode");
        assert_eq!(value["output"], "hi");
        assert_eq!(value["token_count"], 2);
    }

    #[test]
    fn test_failure_goes_to_err() {
        let (ok, out, err) = run("1 2 3 4 5 x", false);
        assert!(!ok);
        assert_eq!(out, "");
        assert_eq!(err, "error: Invalid token: x\n");
    }

    #[test]
    fn test_blank_input_prints_nothing() {
        assert_eq!(run("  \n", false), (true, String::new(), String::new()));
    }

    #[test]
    fn test_trim_piped() {
        assert_eq!(trim_piped("15339 1917\n"), "15339 1917");
        assert_eq!(trim_piped("hello\r\n"), "hello");
        assert_eq!(trim_piped("a\n\n"), "a\n");
        assert_eq!(trim_piped("plain"), "plain");
    }
}

//! Input parsing for the interactive `play` command.
//!
//! A human turn is two prompts: pick a hand card by its 1-based index, then
//! pick one of the listed capture options, `d` to discard or `b` to go back.
//! `q` quits at either prompt.

/// Outcome of parsing one line of player input.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<T> {
    Choice(T),
    /// User entered quit command (q or quit)
    Quit,
    Invalid(String),
}

/// What to do with the selected card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChoice {
    /// 0-based index into the listed capture options
    Take(usize),
    Discard,
    Back,
}

fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "quit")
}

fn parse_index(input: &str, len: usize) -> Result<usize, String> {
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        Ok(_) => Err(format!("Choose a number between 1 and {}", len)),
        Err(_) => Err(format!("Unrecognized input '{}'", input)),
    }
}

/// Parses a hand card selection; returns the 0-based hand index.
///
/// ```rust
/// # use scopa_cli::validation::{parse_card_choice, ParseResult};
/// assert_eq!(parse_card_choice("2", 3), ParseResult::Choice(1));
/// assert_eq!(parse_card_choice(" Q ", 3), ParseResult::Quit);
/// assert!(matches!(parse_card_choice("4", 3), ParseResult::Invalid(_)));
/// ```
pub fn parse_card_choice(input: &str, hand_len: usize) -> ParseResult<usize> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return ParseResult::Invalid("Empty input".to_string());
    }
    if is_quit(&input) {
        return ParseResult::Quit;
    }
    match parse_index(&input, hand_len) {
        Ok(i) => ParseResult::Choice(i),
        Err(msg) => ParseResult::Invalid(msg),
    }
}

/// Parses the answer to the capture prompt for a card with `options`
/// listed captures. With no options an empty answer confirms the discard.
pub fn parse_capture_choice(input: &str, options: usize) -> ParseResult<CaptureChoice> {
    let input = input.trim().to_lowercase();
    if is_quit(&input) {
        return ParseResult::Quit;
    }
    match input.as_str() {
        "d" | "discard" => ParseResult::Choice(CaptureChoice::Discard),
        "b" | "back" => ParseResult::Choice(CaptureChoice::Back),
        "" if options == 0 => ParseResult::Choice(CaptureChoice::Discard),
        "" => ParseResult::Invalid("Empty input".to_string()),
        _ if options == 0 => ParseResult::Invalid(
            "This card cannot capture; enter d to discard or b to go back".to_string(),
        ),
        other => match parse_index(other, options) {
            Ok(i) => ParseResult::Choice(CaptureChoice::Take(i)),
            Err(msg) => ParseResult::Invalid(format!("{}, d or b", msg)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_choice_is_one_based() {
        assert_eq!(parse_card_choice("1", 3), ParseResult::Choice(0));
        assert_eq!(parse_card_choice("3", 3), ParseResult::Choice(2));
        assert!(matches!(parse_card_choice("0", 3), ParseResult::Invalid(_)));
    }

    #[test]
    fn card_choice_rejects_garbage() {
        match parse_card_choice("seven", 3) {
            ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parse_card_choice("   ", 3), ParseResult::Invalid(_)));
    }

    #[test]
    fn quit_works_at_both_prompts() {
        assert_eq!(parse_card_choice("quit", 2), ParseResult::Quit);
        assert_eq!(parse_capture_choice("Q", 2), ParseResult::Quit);
    }

    #[test]
    fn capture_choice_variants() {
        assert_eq!(parse_capture_choice("2", 2), ParseResult::Choice(CaptureChoice::Take(1)));
        assert_eq!(parse_capture_choice("D", 2), ParseResult::Choice(CaptureChoice::Discard));
        assert_eq!(parse_capture_choice("b", 2), ParseResult::Choice(CaptureChoice::Back));
        assert!(matches!(parse_capture_choice("3", 2), ParseResult::Invalid(_)));
        assert!(matches!(parse_capture_choice("", 2), ParseResult::Invalid(_)));
    }

    #[test]
    fn enter_confirms_discard_without_options() {
        assert_eq!(parse_capture_choice("", 0), ParseResult::Choice(CaptureChoice::Discard));
        assert!(matches!(parse_capture_choice("1", 0), ParseResult::Invalid(_)));
    }
}

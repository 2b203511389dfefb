use crate::{AppCommand, AppError};

/// WHAT: Every documented command word parses
/// WHY: The operator drives the whole workflow from these words
#[test]
#[allow(clippy::unwrap_used)]
fn given_command_words_when_parsing_then_commands_returned() {
    // Given: Each command word with its expected command
    let cases = [
        ("preview", AppCommand::Preview),
        ("start", AppCommand::Start),
        ("pause", AppCommand::Pause),
        ("resume", AppCommand::Resume),
        ("stop", AppCommand::Stop),
        ("discard", AppCommand::Discard),
        ("save", AppCommand::Save),
        ("video", AppCommand::ToggleVideo),
        ("audio", AppCommand::ToggleAudio),
        ("status", AppCommand::Status),
        ("quit", AppCommand::Quit),
    ];

    for (input, expected) in cases {
        // When: Parsing
        let parsed = input.parse::<AppCommand>().unwrap();

        // Then: Matches
        assert_eq!(parsed, expected, "input {:?}", input);
    }
}

/// WHAT: Parsing ignores case and surrounding whitespace
/// WHY: Terminal input often carries stray spaces
#[test]
#[allow(clippy::unwrap_used)]
fn given_padded_uppercase_input_when_parsing_then_accepted() {
    // Given/When: Padded mixed-case input
    let parsed = "  Stop \n".parse::<AppCommand>().unwrap();

    // Then: Recognised
    assert_eq!(parsed, AppCommand::Stop);
}

/// WHAT: Unknown words are rejected with the trimmed input
/// WHY: Typos must not silently trigger a transition
#[test]
fn given_unknown_word_when_parsing_then_invalid_command() {
    // Given/When: A typo
    let result = " strat ".parse::<AppCommand>();

    // Then: InvalidCommand carrying the input
    assert!(
        matches!(&result, Err(AppError::InvalidCommand { input, .. }) if input == "strat"),
        "expected InvalidCommand, got {:?}",
        result
    );
}

use chatcmd::{Configuration, Error, parse};
use proptest::prelude::*;

const MAX_INPUT_CHARS: usize = 128;

fn token() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}"
}

proptest! {
    #[test]
    fn parse_never_panics_and_errors_stay_in_bounds(
        input in proptest::collection::vec(
            prop_oneof![
                Just('!'), Just('-'), Just(':'), Just(' '), Just('"'), Just('\''),
                Just('\\'), Just('a'), Just('é'),
            ],
            0..=MAX_INPUT_CHARS,
        )
    ) {
        let source: String = input.iter().collect();
        match parse(&source, &Configuration::default()) {
            Ok(cmd) => prop_assert!(!cmd.name().is_empty()),
            Err(Error::Parse(e)) => prop_assert!(e.index <= input.len()),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn plain_tokens_come_back_in_order(name in token(), args in proptest::collection::vec(token(), 0..8)) {
        let source = format!("!{} {}", name, args.join(" "));
        let cmd = parse(&source, &Configuration::default()).unwrap();
        prop_assert_eq!(cmd.name(), name.as_str());
        prop_assert_eq!(cmd.arguments(), args.as_slice());
    }

    #[test]
    fn quoted_text_survives_escaping(text in "[a-z \"'\\\\]{0,24}") {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        let source = format!("!say \"{}\"", escaped);
        let cmd = parse(&source, &Configuration::default()).unwrap();
        prop_assert_eq!(cmd.arguments(), [text]);
    }
}

//! Property-based tests for IRC message parsing.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Parsing never panics, whatever the input
//! 2. Serialized messages re-parse to the same message (roundtrip)
//! 3. Out-of-range parameter access yields the empty sentinel

use botko_proto::{Command, Message, Prefix};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("~?[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

fn server_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9-]+)+").expect("valid regex")
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        server_strategy().prop_map(Prefix::Server),
        (nickname_strategy(), username_strategy(), hostname_strategy())
            .prop_map(|(n, u, h)| Prefix::new(n, u, h)),
        (nickname_strategy(), hostname_strategy()).prop_map(|(n, h)| Prefix::new(n, "", h)),
        nickname_strategy().prop_map(|n| Prefix::new(n, "", "")),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        prop::string::string_regex("[A-Za-z]{1,12}")
            .expect("valid regex")
            .prop_map(|c| Command::named(&c)),
        (1u16..=999).prop_map(Command::Numeric),
    ]
}

fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^ :\r\n\0][^ \r\n\0]{0,15}").expect("valid regex")
}

fn trailing_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        Just(":".to_string()),
        Just(": trailing".to_string()),
        Just("multiple   spaces   here".to_string()),
        prop::string::string_regex("[^\r\n\0]{0,200}").expect("valid regex"),
    ]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (
        prop::option::of(prefix_strategy()),
        command_strategy(),
        prop::collection::vec(middle_strategy(), 0..=14),
        prop::option::of(trailing_strategy()),
    )
        .prop_map(|(prefix, command, params, trailing)| {
            let mut msg = match command {
                Command::Numeric(code) => Message::numeric(code, params),
                Command::Named(name) => Message::new(&name, params),
            };
            if let Some(prefix) = prefix {
                msg = msg.with_prefix(prefix);
            }
            if let Some(trailing) = trailing {
                msg = msg.with_trailing(trailing);
            }
            msg
        })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn parse_never_panics(line in any::<String>()) {
        let _ = line.parse::<Message>();
    }

    #[test]
    fn roundtrip_serialize_parse(msg in message_strategy()) {
        let wire = msg.to_string();
        let parsed: Message = wire.parse().expect("serialized message must parse");
        prop_assert_eq!(&parsed, &msg);
        prop_assert_eq!(parsed.raw, wire);
    }

    #[test]
    fn exactly_one_of_code_or_command(msg in message_strategy()) {
        let parsed: Message = msg.to_string().parse().expect("serialized message must parse");
        prop_assert!((parsed.code() != 0) ^ !parsed.command_name().is_empty());
    }

    #[test]
    fn out_of_range_index_is_empty(msg in message_strategy(), extra in 0usize..64) {
        prop_assert_eq!(&msg.params[msg.params.len() + extra], "");
        prop_assert_eq!(&msg.tokens[msg.tokens.len() + extra], "");
    }

    #[test]
    fn tokens_split_trailing(msg in message_strategy()) {
        let expected: Vec<&str> = msg.text().split_whitespace().collect();
        let actual: Vec<&str> = msg.tokens.iter().collect();
        prop_assert_eq!(actual, expected);
    }
}

//! Line grammar checks against representative server traffic.

use botko_proto::response::{JOIN_REPLIES, NICK_REPLIES, codes};
use botko_proto::{Message, Response};

#[test]
fn welcome_from_server() {
    let msg: Message = ":irc.example.net 001 botko :Welcome to the Example IRC Network botko"
        .parse()
        .unwrap();
    assert_eq!(msg.code(), Response::RPL_WELCOME.code());
    assert_eq!(msg.server(), "irc.example.net");
    assert_eq!(&msg.params[0], "botko");
    assert!(codes(NICK_REPLIES).contains(&msg.code()));
}

#[test]
fn end_of_names() {
    let msg: Message = ":irc.example.net 366 botko #rust :End of /NAMES list."
        .parse()
        .unwrap();
    assert_eq!(msg.code(), 366);
    assert_eq!(&msg.params[1], "#rust");
    assert_eq!(&msg.tokens[0], "End");
    assert!(codes(JOIN_REPLIES).contains(&msg.code()));
}

#[test]
fn ctcp_action_in_channel() {
    let msg: Message = ":nick!~u@h.example PRIVMSG #chan :\x01ACTION waves\x01"
        .parse()
        .unwrap();
    assert!(msg.is_ctcp());
    assert_eq!(&msg.tokens[0], "\x01ACTION");
}

#[test]
fn nickname_in_use_without_prefix_nick() {
    let msg: Message = ":irc.example.net 433 * botko :Nickname is already in use."
        .parse()
        .unwrap();
    assert_eq!(msg.code(), 433);
    assert_eq!(&msg.params[0], "*");
    assert_eq!(&msg.params[1], "botko");
}

#[test]
fn trailing_without_colon_after_fourteen_middles() {
    let msg: Message = "CMD 1 2 3 4 5 6 7 8 9 10 11 12 13 14 rest of line"
        .parse()
        .unwrap();
    assert_eq!(msg.params.len(), 14);
    assert_eq!(msg.text(), "rest of line");
}

#[test]
fn malformed_lines_are_rejected() {
    for line in [
        "",
        "   ",
        ":only.prefix",
        "0001 x",
        "PRIVMSG\0 #a",
        ":nick!user PRIVMSG #a :x",
        "!bang",
    ] {
        assert!(line.parse::<Message>().is_err(), "{:?} should fail", line);
    }
}

use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_plain_question() {
    let text = "what is a normal heart rate?";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        assert!(SlashCommand::parse(text).unwrap().is_quit());
    }
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_page_with_arg() {
    let cmd = SlashCommand::parse("/page  assessment").unwrap();
    assert!(cmd.is_page());
    assert_eq!(cmd.arg(), Some("assessment"));
}
#[test]
fn it_is_short_page() {
    let cmd = SlashCommand::parse("/p queue").unwrap();
    assert!(cmd.is_page());
}

#[test]
fn it_is_step() {
    let cmd = SlashCommand::parse("/step vitals").unwrap();
    assert!(cmd.is_step());
    assert_eq!(cmd.arg(), Some("vitals"));
}
#[test]
fn it_is_step_without_arg() {
    let cmd = SlashCommand::parse("/st").unwrap();
    assert!(cmd.is_step());
    assert_eq!(cmd.arg(), None);
}

#[test]
fn it_is_patient() {
    let cmd = SlashCommand::parse("/patient ./patient.json").unwrap();
    assert!(cmd.is_patient());
    assert_eq!(cmd.args, vec!["./patient.json".to_string()]);
}

#[test]
fn it_is_context() {
    assert!(SlashCommand::parse("/ctx").unwrap().is_context());
    assert!(SlashCommand::parse("/context").unwrap().is_context());
}

#[test]
fn it_is_prompt() {
    assert!(SlashCommand::parse("/prompt").unwrap().is_prompt());
}

#[test]
fn it_is_suggest() {
    let cmd = SlashCommand::parse("/s 2").unwrap();
    assert!(cmd.is_suggest());
    assert_eq!(cmd.arg(), Some("2"));
}

#[test]
fn it_is_cancel_and_clear() {
    assert!(SlashCommand::parse("/cancel").unwrap().is_cancel());
    assert!(SlashCommand::parse("/clear").unwrap().is_clear());
    assert!(!SlashCommand::parse("/clear").unwrap().is_cancel());
}

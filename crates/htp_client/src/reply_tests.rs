use super::*;

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_single_line_success_strips_marker() {
    assert_eq!(Reply::from_lines(&lines(&["=id text\n"])), Reply::Ok("id text".into()));
    assert_eq!(Reply::from_lines(&lines(&["= e5 \n"])), Reply::Ok("e5".into()));
}

#[test]
fn test_empty_success() {
    assert_eq!(Reply::from_lines(&lines(&["=\n"])), Reply::Ok(String::new()));
    assert_eq!(Reply::from_lines(&lines(&["= \n"])), Reply::Ok(String::new()));
}

#[test]
fn test_multi_line_success_keeps_following_lines_verbatim() {
    let reply = Reply::from_lines(&lines(&["= \n", "line1\n", "line2\n"]));
    assert_eq!(reply, Reply::Ok("line1\nline2\n".into()));

    let reply = Reply::from_lines(&lines(&["=\n", "  a . .\n", "   . b .\n"]));
    assert_eq!(reply, Reply::Ok("  a . .\n   . b .\n".into()));
}

#[test]
fn test_denial_reason() {
    let reply = Reply::from_lines(&lines(&["? unknown command\n"]));
    assert_eq!(reply, Reply::Denied("unknown command".into()));
}

#[test]
fn test_denial_spanning_lines() {
    let reply = Reply::from_lines(&lines(&["? illegal move\n", "cell occupied\n"]));
    assert_eq!(reply, Reply::Denied("illegal move\ncell occupied".into()));
}

#[test]
fn test_denial_with_bare_marker() {
    assert_eq!(Reply::from_lines(&lines(&["?\n"])), Reply::Denied(String::new()));
}

#[test]
fn test_empty_answer_is_denied() {
    assert!(matches!(Reply::from_lines(&[]), Reply::Denied(_)));
}

#[test]
fn test_terminator() {
    assert!(is_terminator("\n"));
    assert!(is_terminator("\r\n"));
    assert!(!is_terminator(" \n"));
    assert!(!is_terminator("= \n"));
    assert!(!is_terminator(""));
}

#[test]
fn test_reply_helpers() {
    assert!(Reply::Ok("x".into()).is_ok());
    assert!(Reply::Died.is_died());
    assert_eq!(Reply::Ok("x".into()).ok(), Some("x".to_string()));
    assert_eq!(Reply::Denied("no".into()).ok(), None);
}

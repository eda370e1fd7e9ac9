use symhop_attrs::ErrorKind;
use symhop_error::{Error, ErrorKind};

#[derive(Debug, ErrorKind)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is never closed"],
    help = "add a `)` at the end of the expression",
)]
struct UnclosedParenthesis;

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = [format!("called with {} argument(s)", arity), String::new()],
)]
struct UnknownFunction {
    name: String,
    arity: usize,
}

fn render(err: &Error, src: &str) -> String {
    let bytes = strip_ansi_escapes::strip(err.render("input", src));
    String::from_utf8(bytes).unwrap()
}

#[test]
fn report_contains_message_label_and_help() {
    let src = "sin(x";
    let err = Error::new(vec![3..4], UnclosedParenthesis);
    let report = render(&err, src);

    assert!(report.contains("unclosed parenthesis"));
    assert!(report.contains("this parenthesis is never closed"));
    assert!(report.contains("add a `)` at the end of the expression"));
    assert!(report.contains("sin(x"));
}

#[test]
fn message_uses_struct_fields() {
    let kind = UnknownFunction { name: "foo".to_string(), arity: 2 };
    assert_eq!(kind.message(), "unknown function `foo`");

    let err = Error::new(vec![0..3, 4..5], kind);
    assert_eq!(err.to_string(), "unknown function `foo` (at 0..3)");

    let report = render(&err, "foo(a,b)");
    assert!(report.contains("called with 2 argument(s)"));
}

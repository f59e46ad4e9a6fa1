//! Extraction behaviour through the typed accessors.

use std::net::IpAddr;
use std::time::Duration;

use cmdtree_core::{CommandError, Context, O, Opt, OptionExtractor, ReqOpt, Value, ValueType};
use cmdtree_getopt::Getopt;

fn extract<'a>(args: &[&str], opts: &[O]) -> Result<Context<'a>, CommandError> {
    Getopt::new().extract_options(Context::new(args.iter().copied()), opts)
}

#[test]
fn test_long_separated_value() {
    let foo = ReqOpt::<String>::new("foo");
    let ctx = extract(&["--foo", "bar"], &[foo.clone().into()]).unwrap();
    assert_eq!(foo.get(&ctx), "bar");
    assert!(ctx.args.is_empty());
}

#[test]
fn test_short_switch() {
    let foo = ReqOpt::<bool>::new("foo,f");
    let ctx = extract(&["-f"], &[foo.clone().into()]).unwrap();
    assert!(foo.get(&ctx));
    assert_eq!(ctx.strings["foo"], "");
}

#[test]
fn test_short_assignment_parses_address() {
    let addr = ReqOpt::<IpAddr>::new("ipaddr,a");
    let ctx = extract(&["-a=192.168.2.100"], &[addr.clone().into()]).unwrap();
    assert_eq!(addr.get(&ctx).to_string(), "192.168.2.100");
    assert_eq!(ctx.strings["ipaddr"], "192.168.2.100");
}

#[test]
fn test_long_assignment() {
    let number = ReqOpt::<i64>::new("number,n");
    let ctx = extract(&["--number=69420"], &[number.clone().into()]).unwrap();
    assert_eq!(number.get(&ctx), 69420);
}

#[test]
fn test_assignment_to_short_alias_with_long_prefix() {
    let number = ReqOpt::<i64>::new("number,n");
    let ctx = extract(&["--n=7"], &[number.clone().into()]).unwrap();
    assert_eq!(number.get(&ctx), 7);
}

#[test]
fn test_last_assignment_wins() {
    let number = ReqOpt::<i64>::new("number,n");
    let ctx = extract(
        &["--number", "69420", "-n", "1", "--number", "9004"],
        &[number.clone().into()],
    )
    .unwrap();
    assert_eq!(number.get(&ctx), 9004);
    assert_eq!(ctx.strings["number"], "9004");
}

#[test]
fn test_custom_parser() {
    let foo = ReqOpt::<i32>::new("foo").with_parser(|s| match s {
        "nice" => Ok(69),
        other => Err(format!("unexpected input {other:?}").into()),
    });
    let ctx = extract(&["--foo", "nice"], &[foo.clone().into()]).unwrap();
    assert_eq!(foo.get(&ctx), 69);

    let err = extract(&["--foo", "mean"], &[foo.into()]).unwrap_err();
    assert!(matches!(err, CommandError::ParseFailure { name, .. } if name == "foo"));
}

#[test]
fn test_untyped_descriptor_with_parser() {
    let opts = vec![O::new("size", ValueType::Custom("Size".into()))
        .with_parser(|s| Ok(Value::new(s.len() as u32)))];
    let ctx = extract(&["--size", "xxl"], &opts).unwrap();
    assert_eq!(ctx.values.get::<u32>("size"), Ok(3));
}

#[test]
fn test_duration_value() {
    let timeout = Opt::<Duration>::new("timeout,t");
    let ctx = extract(&["-t", "1m30s"], &[timeout.clone().into()]).unwrap();
    assert_eq!(timeout.get(&ctx), Ok(Duration::from_secs(90)));
}

#[test]
fn test_value_may_look_like_a_flag() {
    let pattern = ReqOpt::<String>::new("pattern");
    let ctx = extract(&["--pattern", "--weird", "rest"], &[pattern.clone().into()]).unwrap();
    assert_eq!(pattern.get(&ctx), "--weird");
    assert_eq!(ctx.args, vec!["rest"]);
}

#[test]
fn test_positional_stops_extraction() {
    let verbose = Opt::<bool>::new("verbose,v");
    let ctx = extract(&["-v", "query", "-v"], &[verbose.into()]).unwrap();
    assert_eq!(ctx.args, vec!["query", "-v"]);
}

#[test]
fn test_double_dash_is_consumed() {
    let verbose = Opt::<bool>::new("verbose,v");
    let ctx = extract(&["-v", "--", "--not-an-option"], &[verbose.into()]).unwrap();
    assert_eq!(ctx.args, vec!["--not-an-option"]);
}

#[test]
fn test_single_dash_is_positional() {
    let verbose = Opt::<bool>::new("verbose,v");
    let ctx = extract(&["-", "-v"], &[verbose.into()]).unwrap();
    assert_eq!(ctx.args, vec!["-", "-v"]);
}

#[test]
fn test_empty_token_stops_extraction() {
    let verbose = Opt::<bool>::new("verbose,v");
    let ctx = extract(&["", "-v"], &[verbose.into()]).unwrap();
    assert_eq!(ctx.args, vec!["", "-v"]);
}

#[test]
fn test_absent_option_is_not_present() {
    let depth = Opt::<i64>::new("depth");
    let ctx = extract(&[], &[depth.clone().into()]).unwrap();
    assert!(depth.get(&ctx).is_err());
    assert!(ctx.values.is_empty());
}

#[test]
fn test_long_switch_with_explicit_value() {
    let verbose = Opt::<bool>::new("verbose,v");
    let ctx = extract(&["--verbose=false"], &[verbose.clone().into()]).unwrap();
    assert_eq!(verbose.get(&ctx), Ok(false));
}

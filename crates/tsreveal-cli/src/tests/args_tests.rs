use super::args::{CliArgs, Naming};
use clap::Parser;
use std::path::PathBuf;

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("tsreveal").chain(args.iter().copied()))
        .expect("arguments parse")
}

#[test]
fn test_defaults() {
    let args = parse(&["types.ts"]);
    assert_eq!(args.file, PathBuf::from("types.ts"));
    assert!(!args.watch);
    assert!(!args.shallow);
    assert!(!args.json);
    assert!(!args.no_lib);
    assert_eq!(args.out, None);
    assert_eq!(args.debounce_ms, None);
    assert_eq!(args.print_width, None);
    assert_eq!(args.naming, None);
}

#[test]
fn test_short_and_long_flags() {
    let args = parse(&[
        "-w",
        "-o",
        "out.d.ts",
        "--debounce-ms",
        "1500",
        "--print-width",
        "100",
        "--naming",
        "fixed",
        "--shallow",
        "types.ts",
    ]);
    assert!(args.watch);
    assert!(args.shallow);
    assert_eq!(args.out, Some(PathBuf::from("out.d.ts")));
    assert_eq!(args.debounce_ms, Some(1500));
    assert_eq!(args.print_width, Some(100));
    assert_eq!(args.naming, Some(Naming::Fixed));
}

#[test]
fn test_naming_values_are_kebab_case() {
    assert_eq!(
        parse(&["--naming", "swap-extension", "a.ts"]).naming,
        Some(Naming::SwapExtension)
    );
}

#[test]
fn test_no_lib_accepts_camel_case_alias() {
    assert!(parse(&["--noLib", "a.ts"]).no_lib);
    assert!(parse(&["--no-lib", "a.ts"]).no_lib);
}

#[test]
fn test_file_is_required() {
    assert!(CliArgs::try_parse_from(["tsreveal", "--json"]).is_err());
}

#[test]
fn test_rejects_non_numeric_debounce() {
    assert!(CliArgs::try_parse_from(["tsreveal", "--debounce-ms", "soon", "a.ts"]).is_err());
}

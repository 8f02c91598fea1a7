use clap::Parser;
use hugo_wrapper::cli::Args;
use std::path::PathBuf;

#[test]
fn test_no_arguments() {
    let args = Args::try_parse_from(["hugo-wrapper"]).unwrap();

    assert_eq!(args.hugo_version, None);
    assert!(!args.skip_checksum);
    assert!(!args.no_retry);
    assert!(args.hugo_args.is_empty());
}

#[test]
fn test_wrapper_flags() {
    let args = Args::try_parse_from([
        "hugo-wrapper",
        "--hugo-version",
        "0.73-extended",
        "--install-dir",
        "/opt/hugo",
        "--wrapper-config",
        "wrapper.toml",
        "--max-retries",
        "5",
        "--skip-checksum",
        "--wrapper-verbose",
    ])
    .unwrap();

    assert_eq!(args.hugo_version.as_deref(), Some("0.73-extended"));
    assert_eq!(args.install_dir.as_deref(), Some("/opt/hugo"));
    assert_eq!(args.wrapper_config, Some(PathBuf::from("wrapper.toml")));
    assert_eq!(args.max_retries, Some(5));
    assert!(args.skip_checksum);
    assert!(args.wrapper_verbose);
}

#[test]
fn test_hugo_arguments_pass_through() {
    let args = Args::try_parse_from([
        "hugo-wrapper",
        "--hugo-version",
        "latest",
        "server",
        "-D",
        "--config",
        "config.toml",
        "--verbose",
    ])
    .unwrap();

    assert_eq!(args.hugo_version.as_deref(), Some("latest"));
    assert_eq!(
        args.hugo_args,
        vec!["server", "-D", "--config", "config.toml", "--verbose"]
    );
}

#[test]
fn test_leading_hugo_flag_passes_through() {
    let args = Args::try_parse_from(["hugo-wrapper", "--minify", "--gc"]).unwrap();

    assert_eq!(args.hugo_version, None);
    assert_eq!(args.hugo_args, vec!["--minify", "--gc"]);
}

#[test]
fn test_wrapper_flags_after_hugo_args_belong_to_hugo() {
    let args = Args::try_parse_from(["hugo-wrapper", "server", "--skip-checksum"]).unwrap();

    assert!(!args.skip_checksum);
    assert_eq!(args.hugo_args, vec!["server", "--skip-checksum"]);
}

#[test]
fn test_no_retry_conflicts_with_max_retries() {
    let result = Args::try_parse_from(["hugo-wrapper", "--no-retry", "--max-retries", "2"]);
    assert!(result.is_err());
}

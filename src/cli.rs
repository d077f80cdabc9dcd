//! Command line interface

use crate::{ConvertOptions, FetcherSpec, Result, Size};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

const AFTER_HELP: &str = "Examples:
  svg2png -i sample.svg -o sample.png --sizes [256] --executable-path /usr/bin/chromium
  svg2png -i sample.svg -o sample.png --sizes [[24,32],256] --fetcher-revision 782078 --fetcher-path ./renderer";

/// Create PNG files from an SVG file with a headless Chromium renderer
#[derive(Parser, Debug)]
#[command(name = "svg2png", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Path of the input SVG file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Path of the output PNG file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Sizes of the output PNG files as a JSON array; a number is a square,
    /// a two-element array is [width,height], e.g. [256,[256,128]]
    #[arg(long, value_parser = parse_sizes, default_value = "[]", value_name = "SIZES")]
    sizes: Sizes,

    /// Path of an installed renderer executable; when usable, the
    /// --fetcher-* options are ignored
    #[arg(long, value_name = "FILE")]
    executable_path: Option<PathBuf>,

    /// Revision of the renderer to download
    #[arg(long, value_name = "REV")]
    fetcher_revision: Option<String>,

    /// Directory the downloaded renderer is cached in
    #[arg(long, value_name = "DIR")]
    fetcher_path: Option<PathBuf>,
}

/// Parsed value of the `--sizes` option
#[derive(Debug, Clone)]
struct Sizes(Vec<Size>);

/// Parse one element of the `--sizes` array
///
/// A bare number is a square; a one-element array is a square; two or more
/// elements are width and height. Anything else is skipped.
fn parse_size_value(value: &serde_json::Value) -> Option<Size> {
    match value {
        serde_json::Value::Number(n) => {
            let edge = n.as_i64()? as i32;
            Some(Size::square(edge))
        }
        serde_json::Value::Array(items) => match items.as_slice() {
            [] => None,
            [edge] => Some(Size::square(edge.as_i64()? as i32)),
            [width, height, ..] => Some(Size::new(width.as_i64()? as i32, height.as_i64()? as i32)),
        },
        _ => None,
    }
}

fn parse_sizes(arg: &str) -> std::result::Result<Sizes, String> {
    let value: serde_json::Value =
        serde_json::from_str(arg).map_err(|e| format!("`sizes` is not valid JSON: {}", e))?;

    let Some(items) = value.as_array() else {
        return Ok(Sizes(Vec::new()));
    };
    Ok(Sizes(items.iter().filter_map(parse_size_value).collect()))
}

/// Parse the command line and run the conversion
///
/// Invoked with no arguments at all, prints help and returns an empty
/// result instead of converting.
pub fn run() -> Result<Vec<PathBuf>> {
    if std::env::args().len() < 2 {
        let _ = Cli::command().print_help();
        return Ok(Vec::new());
    }

    let cli = Cli::parse();
    let options = ConvertOptions {
        input: cli.input,
        output: cli.output,
        sizes: cli.sizes.0,
        executable_path: cli.executable_path,
        fetcher: cli.fetcher_revision.map(|revision| FetcherSpec {
            revision,
            dir: cli.fetcher_path,
        }),
    };
    crate::svg2png(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_sizes() {
        let sizes = parse_sizes("[256,[24,32]]").unwrap();
        assert_eq!(sizes.0, vec![Size::square(256), Size::new(24, 32)]);
    }

    #[test]
    fn test_parse_single_element_array_is_square() {
        let sizes = parse_sizes("[[24]]").unwrap();
        assert_eq!(sizes.0, vec![Size::square(24)]);
    }

    #[test]
    fn test_parse_skips_unrecognized_elements() {
        let sizes = parse_sizes(r#"[256,"wide",[],null,[24,32]]"#).unwrap();
        assert_eq!(sizes.0, vec![Size::square(256), Size::new(24, 32)]);
    }

    #[test]
    fn test_parse_non_array_is_empty() {
        let sizes = parse_sizes("256").unwrap();
        assert!(sizes.0.is_empty());
        let sizes = parse_sizes("{\"width\":1}").unwrap();
        assert!(sizes.0.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_sizes("[256,").is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "svg2png",
            "-i",
            "sample.svg",
            "-o",
            "sample.png",
            "--sizes",
            "[256]",
            "--fetcher-revision",
            "782078",
        ]);
        assert_eq!(cli.input, PathBuf::from("sample.svg"));
        assert_eq!(cli.output, PathBuf::from("sample.png"));
        assert_eq!(cli.sizes.0, vec![Size::square(256)]);
        assert_eq!(cli.fetcher_revision.as_deref(), Some("782078"));
        assert!(cli.executable_path.is_none());
    }
}

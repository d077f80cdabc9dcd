//! svg2png
//!
//! Create PNG files from an SVG file using a headless Chromium renderer
//! driven over the Chrome DevTools Protocol.
//!
//! The source document is loaded once into a single renderer tab and then
//! captured at every requested size, so converting an icon to a whole set of
//! dimensions costs one process launch and one parse of the SVG.
//!
//! # Example
//!
//! ```no_run
//! use svg2png::{ConvertOptions, Size};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ConvertOptions {
//!     input: "sample.svg".into(),
//!     output: "sample.png".into(),
//!     sizes: vec![Size::square(256), Size::new(24, 32)],
//!     executable_path: Some("/usr/bin/chromium".into()),
//!     fetcher: None,
//! };
//!
//! let paths = svg2png::svg2png(options)?;
//! for path in paths {
//!     println!("created {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod async_api;
pub mod cli;
mod convert;
mod fetch;

/// Width and height in pixels of one output PNG
///
/// Dimensions are signed so that out-of-range user input flows through
/// [`optimize_sizes`] instead of failing at construction; anything with a
/// dimension of zero or less is dropped there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a size from explicit width and height
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Create a square size
    pub fn square(edge: i32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }
}

/// Which Chromium revision to download and where to cache it
#[derive(Debug, Clone)]
pub struct FetcherSpec {
    /// Revision of the renderer to download
    pub revision: String,
    /// Cache directory; the fetcher's default location is used when `None`
    /// or when the directory does not exist
    pub dir: Option<PathBuf>,
}

/// Options for one conversion call
///
/// Checked once by [`check_options`] at the start of [`svg2png`] and passed
/// by value through the rest of the pipeline, never mutated afterward.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path of the input SVG file
    pub input: PathBuf,
    /// Path of the output PNG file; with more than one size this is the
    /// base name that per-size siblings are derived from
    pub output: PathBuf,
    /// Requested output sizes
    pub sizes: Vec<Size>,
    /// Path of an already installed renderer executable
    pub executable_path: Option<PathBuf>,
    /// Download spec used when no usable executable path is given
    pub fetcher: Option<FetcherSpec>,
}

/// Where the renderer executable comes from, as decided by [`locate_renderer`]
#[derive(Debug, Clone)]
pub enum RendererLocation {
    /// Use an already installed executable
    Installed(PathBuf),
    /// Download the given revision into a local cache
    Download(FetcherSpec),
}

/// Validate and deduplicate the requested sizes
///
/// Sizes with a non-positive dimension are dropped. Duplicates (same width
/// and height) keep their first occurrence, preserving relative order.
/// Fails when nothing survives the filtering.
pub fn optimize_sizes(sizes: &[Size]) -> Result<Vec<Size>> {
    let mut results: Vec<Size> = Vec::new();
    for size in sizes {
        if size.width <= 0 || size.height <= 0 {
            continue;
        }
        if results.iter().any(|s| s == size) {
            continue;
        }
        results.push(*size);
    }

    if results.is_empty() {
        return Err(Error::InvalidInput(
            "there is no valid `sizes` specification".to_string(),
        ));
    }
    Ok(results)
}

/// Parent directory of a path, treating a bare file name as the current dir
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Check options and correct what can be corrected
///
/// The input file must exist. A missing output directory is not an error:
/// output is silently redirected into the input file's directory, keeping
/// only the output base name. Sizes are normalized via [`optimize_sizes`].
pub fn check_options(options: ConvertOptions) -> Result<ConvertOptions> {
    let mut opts = options;

    if !opts.input.exists() {
        return Err(Error::InvalidInput(
            "the file specified in `input` does not exist".to_string(),
        ));
    }

    if !parent_dir(&opts.output).exists() {
        if let Some(name) = opts.output.file_name() {
            opts.output = parent_dir(&opts.input).join(name);
        }
    }

    opts.sizes = optimize_sizes(&opts.sizes)?;
    Ok(opts)
}

/// Decide where the renderer executable comes from
///
/// An executable path that is configured and exists on disk wins; one that
/// is configured but missing falls through to the fetcher spec.
pub fn locate_renderer(options: &ConvertOptions) -> Result<RendererLocation> {
    if let Some(path) = &options.executable_path {
        if path.exists() {
            return Ok(RendererLocation::Installed(path.clone()));
        }
    }

    match &options.fetcher {
        Some(spec) => Ok(RendererLocation::Download(spec.clone())),
        None => Err(Error::ConfigError(
            "`fetcher` is not specified even though `executable_path` is omitted; specify either"
                .to_string(),
        )),
    }
}

/// Turn a renderer location into a concrete executable path
pub fn resolve_renderer(location: RendererLocation) -> Result<PathBuf> {
    match location {
        RendererLocation::Installed(path) => Ok(path),
        RendererLocation::Download(spec) => fetch::fetch_renderer(&spec.revision, spec.dir.as_deref()),
    }
}

/// Create PNG files from an SVG file
///
/// Checks the options, resolves the renderer executable, renders every
/// requested size against a single loaded document, and returns the output
/// paths in size order. The renderer process is terminated on every exit
/// path, including failures part-way through the size list.
pub fn svg2png(options: ConvertOptions) -> Result<Vec<PathBuf>> {
    let options = check_options(options)?;
    let executable = resolve_renderer(locate_renderer(&options)?)?;
    convert::convert(&options, &executable)
}

//! Render session and the sequential conversion loop

use crate::{ConvertOptions, Error, Result, Size};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page, DOM};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-page script that pins the root `<svg>` element to the requested pixel
/// size. A document with no recognizable root element is left untouched and
/// still captured at the raw viewport size.
///
/// Built from a template with token substitution to avoid having to escape
/// braces for `format!`.
const FIX_SIZE_SCRIPT: &str = r#"(function() {
    const elm = document.querySelector('svg');
    if (!elm) {
        return;
    }
    elm.setAttribute('width', '{{WIDTH}}px');
    elm.setAttribute('height', '{{HEIGHT}}px');
})()"#;

/// Wrap the SVG markup in a minimal host document that pins it to the
/// top-left corner with no margin, so the captured region exactly matches
/// the document's own bounding box.
fn build_page(svg: &str) -> String {
    format!(
        "<!DOCTYPE html><style>html, body {{ margin: 0; padding: 0; }} svg {{ position: absolute; top: 0; left: 0; }}</style>{}",
        svg
    )
}

/// Output file path for one size
///
/// The single requested size reuses the user's exact output path. With more
/// than one size, each output is a sibling named `{name}-{width}{ext}` for
/// squares and `{name}-{width}x{height}{ext}` otherwise; deduplicated sizes
/// guarantee the generated names never collide.
fn output_file_path(output: &Path, size: Size, is_only_size: bool) -> PathBuf {
    if is_only_size {
        return output.to_path_buf();
    }

    let name = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let file_name = if size.width == size.height {
        format!("{}-{}{}", name, size.width, ext)
    } else {
        format!("{}-{}x{}{}", name, size.width, size.height, ext)
    };
    output.with_file_name(file_name)
}

/// Smallest window able to contain every requested capture region
fn window_size(sizes: &[Size]) -> (u32, u32) {
    let mut window = (1, 1);
    for size in sizes {
        window.0 = window.0.max(size.width as u32);
        window.1 = window.1.max(size.height as u32);
    }
    window
}

/// Whether the current process runs with root privileges
///
/// Chromium refuses sandboxed execution under root, so the launcher needs to
/// know. Read from `/proc/self` ownership; anywhere that is unavailable the
/// process is assumed unprivileged and the sandbox stays on.
#[cfg(unix)]
fn running_as_root() -> bool {
    use std::os::unix::fs::MetadataExt;
    fs::metadata("/proc/self")
        .map(|meta| meta.uid() == 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

/// One renderer process plus one tab with the source document loaded
///
/// Exists between open and close and is never shared across conversions.
/// `Browser`'s drop kills the child process, so an error unwinding past the
/// explicit close still releases the renderer.
struct RenderSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl RenderSession {
    /// Launch the renderer process and open its single tab
    fn open(executable: &Path, window: (u32, u32), sandbox: bool) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(sandbox)
            .path(Some(executable.to_path_buf()))
            .window_size(Some(window))
            .build()
            .map_err(|e| Error::LaunchError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::LaunchError(format!("Failed to launch renderer: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::LaunchError(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Read the SVG file and load it into the tab as a `data:` URL
    ///
    /// Also clears the default white page background so every later capture
    /// comes out with a transparent background.
    fn load_svg(&self, path: &Path) -> Result<()> {
        let svg = fs::read_to_string(path)
            .map_err(|e| Error::SourceError(format!("{}: {}", path.display(), e)))?;

        let html = build_page(&svg);
        let url = format!(
            "data:text/html;base64,{}",
            Base64Engine::encode(&base64::engine::general_purpose::STANDARD, html)
        );

        self.tab
            .navigate_to(&url)
            .map_err(|e| Error::EngineError(format!("Navigation failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::EngineError(format!("Wait for navigation failed: {}", e)))?;

        self.tab
            .call_method(Emulation::SetDefaultBackgroundColorOverride {
                color: Some(DOM::RGBA {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: Some(0.0),
                }),
            })
            .map_err(|e| Error::EngineError(format!("Failed to clear background: {}", e)))?;

        Ok(())
    }

    /// Render the loaded document at one size and write the PNG file
    fn render_to_file(&self, size: Size, path: &Path) -> Result<()> {
        let script = FIX_SIZE_SCRIPT
            .replace("{{WIDTH}}", &size.width.to_string())
            .replace("{{HEIGHT}}", &size.height.to_string());

        self.tab
            .evaluate(&script, false)
            .map_err(|e| Error::RenderError(format!("Size fixup failed: {}", e)))?;

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(size.width),
            height: f64::from(size.height),
            scale: 1.0,
        };
        let png = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))?;

        fs::write(path, &png)
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Terminate the renderer process and release all resources
    fn close(self) -> Result<()> {
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

fn render_all(session: &RenderSession, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    session.load_svg(&options.input)?;

    let is_only_size = options.sizes.len() == 1;
    let mut results = Vec::with_capacity(options.sizes.len());
    for &size in &options.sizes {
        let path = output_file_path(&options.output, size, is_only_size);
        session.render_to_file(size, &path)?;
        debug!("rendered {}x{} to {}", size.width, size.height, path.display());
        results.push(path);
    }
    Ok(results)
}

/// Render every size in `options` against a single loaded document
///
/// Expects checked options and a resolved executable. The session is closed
/// on both the success and the failure path; a render failure takes
/// precedence over a close failure.
pub(crate) fn convert(options: &ConvertOptions, executable: &Path) -> Result<Vec<PathBuf>> {
    let session = RenderSession::open(executable, window_size(&options.sizes), !running_as_root())?;
    let rendered = render_all(&session, options);
    let closed = session.close();

    let paths = rendered?;
    closed?;
    Ok(paths)
}

//! [`ImageEngine`] backed by the ImageMagick command line tools.
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::ImageSize;
use crate::render::{ImageEngine, RenderRequest};

/// A program plus the leading arguments that select the tool, e.g. `magick identify`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tool {
    program: PathBuf,
    prefix: Vec<OsString>,
}

impl Tool {
    fn new(program: impl Into<PathBuf>, prefix: &[&str]) -> Self {
        Self {
            program: program.into(),
            prefix: prefix.iter().map(OsString::from).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix);
        cmd
    }
}

/// Runs `convert`/`identify` (ImageMagick 6) or `magick` (ImageMagick 7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMagick {
    convert: Tool,
    identify: Tool,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self::legacy()
    }
}

impl ImageMagick {
    /// ImageMagick 6 style separate `convert` and `identify` binaries.
    pub fn legacy() -> Self {
        Self {
            convert: Tool::new("convert", &[]),
            identify: Tool::new("identify", &[]),
        }
    }

    /// ImageMagick 7 single `magick` binary.
    pub fn magick() -> Self {
        Self::with_magick_binary("magick")
    }

    /// ImageMagick 7 using a specific `magick` binary.
    pub fn with_magick_binary(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self {
            convert: Tool::new(program.clone(), &[]),
            identify: Tool::new(program, &["identify"]),
        }
    }

    /// Arguments passed to the convert tool for `request`.
    pub fn convert_args(request: &RenderRequest) -> Vec<OsString> {
        let settings = &request.settings;
        let mut args: Vec<OsString> = vec![request.source.clone().into_os_string()];
        if settings.strip_metadata {
            args.push("-strip".into());
        }
        args.push("-quality".into());
        args.push(format!("{}%", settings.quality).into());
        args.push("-font".into());
        args.push(settings.font.clone().into());
        args.push("-gravity".into());
        args.push(settings.gravity.clone().into());
        for directive in &request.directives {
            args.push("-fill".into());
            args.push(directive.color.to_string().into());
            args.push("-pointsize".into());
            args.push(directive.pointsize.to_string().into());
            args.push("-annotate".into());
            args.push(directive.geometry().into());
            args.push(annotate_text(&directive.text).into());
        }
        args.push(request.destination.clone().into_os_string());
        args
    }
}

/// ImageMagick reads the annotation from a file when the text starts with `@`.
/// A leading backslash keeps it literal.
fn annotate_text(text: &str) -> String {
    if text.starts_with('@') {
        format!("\\{text}")
    } else {
        text.to_owned()
    }
}

fn run(mut cmd: Command, what: &str) -> Result<Vec<u8>> {
    debug!("Running {:?}.", cmd);
    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Render(format!(
            "{what} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// Parse the `"<width> <height>"` output of `identify -format "%w %h"`.
pub fn parse_dimensions(output: &str) -> Result<ImageSize> {
    let mut parts = output.split_whitespace().map(str::parse::<u32>);
    match (parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height))) => Ok(ImageSize::new(width, height)),
        _ => Err(Error::Render(format!(
            "unexpected identify output '{}'",
            output.trim()
        ))),
    }
}

impl ImageEngine for ImageMagick {
    fn dimensions(&self, path: &Path) -> Result<ImageSize> {
        let mut cmd = self.identify.command();
        // `[0]` restricts multi-frame inputs to their first frame.
        let mut target = path.as_os_str().to_owned();
        target.push(OsStr::new("[0]"));
        cmd.arg("-format").arg("%w %h").arg(target);
        let stdout = run(cmd, "identify")?;
        parse_dimensions(&String::from_utf8_lossy(&stdout))
    }

    fn render(&self, request: &RenderRequest) -> Result<()> {
        let mut cmd = self.convert.command();
        cmd.args(Self::convert_args(request));
        run(cmd, "convert")?;
        info!(
            "Rendered {} phrases onto {}.",
            request.directives.len(),
            request.destination.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::render::{DrawDirective, RenderSettings};

    fn request() -> RenderRequest {
        RenderRequest {
            source: "doge.jpg".into(),
            destination: "out.jpg".into(),
            settings: RenderSettings::default(),
            directives: vec![
                DrawDirective {
                    text: "wow".into(),
                    color: Color::rgb(255, 0, 0),
                    pointsize: 20,
                    x_offset: 42,
                    y_offset: -17,
                },
                DrawDirective {
                    text: "such args".into(),
                    color: Color::WHITE,
                    pointsize: 18,
                    x_offset: -100,
                    y_offset: 0,
                },
            ],
        }
    }

    #[test]
    fn convert_args_follow_directive_order() {
        let args: Vec<String> = ImageMagick::convert_args(&request())
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "doge.jpg",
                "-strip",
                "-quality",
                "95%",
                "-font",
                "Comic-Sans-MS",
                "-gravity",
                "Center",
                "-fill",
                "rgb(255,0,0)",
                "-pointsize",
                "20",
                "-annotate",
                "+42-17",
                "wow",
                "-fill",
                "rgb(255,255,255)",
                "-pointsize",
                "18",
                "-annotate",
                "-100+0",
                "such args",
                "out.jpg",
            ]
        );
    }

    #[test]
    fn strip_can_be_disabled() {
        let mut req = request();
        req.settings.strip_metadata = false;
        let args = ImageMagick::convert_args(&req);
        assert!(!args.iter().any(|a| a == "-strip"));
    }

    #[test]
    fn leading_at_sign_is_escaped() {
        let mut req = request();
        req.directives[0].text = "@/etc/passwd".into();
        req.directives[1].text = "such @doge".into();
        let args = ImageMagick::convert_args(&req);
        assert!(args.iter().any(|a| a == r"\@/etc/passwd"));
        assert!(!args.iter().any(|a| a == "@/etc/passwd"));
        assert!(args.iter().any(|a| a == "such @doge"));
    }

    #[test]
    fn parses_identify_output() {
        assert_eq!(
            parse_dimensions("900 600\n").unwrap(),
            ImageSize::new(900, 600)
        );
        assert!(parse_dimensions("900").is_err());
        assert!(parse_dimensions("wide tall").is_err());
    }

    #[test]
    fn magick_uses_identify_subcommand() {
        let engine = ImageMagick::magick();
        assert_eq!(engine.identify.prefix, vec![OsString::from("identify")]);
        assert_eq!(engine.convert.program, PathBuf::from("magick"));
        assert_ne!(engine, ImageMagick::legacy());
    }

    #[test]
    fn missing_binary_surfaces_io_error() {
        let engine = ImageMagick::with_magick_binary("/nonexistent/phrase-scatter-magick");
        let err = engine.render(&request()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

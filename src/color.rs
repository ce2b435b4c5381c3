//! Color token normalization.
//!
//! Legend color stops arrive in one of two textual surface forms:
//! `#RRGGBB` (hex, case-insensitive) or `rgb(r,g,b)` (decimal 0-255).
//! A conversion run picks one target [`ColorMode`] and every stop in the
//! document is normalized to it — never a partial mix.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Target color encoding for a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// `#RRGGBB`, uppercase, zero-padded
    #[default]
    Hex,
    /// `rgb(r,g,b)`, decimal, unpadded
    Rgb,
}

impl ColorMode {
    /// Name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Hex => "hex",
            ColorMode::Rgb => "rgb",
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hex" => Ok(ColorMode::Hex),
            "rgb" => Ok(ColorMode::Rgb),
            other => Err(Error::Other(format!(
                "Invalid color mode '{}' (expected 'hex' or 'rgb')",
                other
            ))),
        }
    }
}

fn rgb_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^rgb\((\d{1,3}),\s*(\d{1,3}),\s*(\d{1,3})\)$").unwrap())
}

fn hex_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap())
}

/// Normalize a color token to the target mode, leniently.
///
/// Tokens that match neither surface form are returned unchanged — callers
/// pass through free text that happens to sit near color fields, and that
/// text must survive untouched. Tokens already in the target mode are
/// returned unchanged (idempotent).
pub fn normalize(token: &str, mode: ColorMode) -> String {
    match convert(token, mode) {
        Ok(Some(converted)) => converted,
        _ => token.to_string(),
    }
}

/// Normalize a legend color stop, strictly.
///
/// Unlike [`normalize`], a token that matches neither surface form is an
/// [`Error::ColorFormat`], as is an `rgb()` channel outside 0-255. Rejection
/// rather than clamping: a silently clamped channel would corrupt the
/// legend's color semantics.
pub fn normalize_stop(token: &str, mode: ColorMode) -> Result<String> {
    match convert(token, mode)? {
        Some(converted) => Ok(converted),
        None => Err(Error::ColorFormat(token.to_string())),
    }
}

/// Shared conversion core.
///
/// `Ok(None)` means the token matches neither form; `Err` means the token
/// matches the `rgb()` form but a channel is out of range.
fn convert(token: &str, mode: ColorMode) -> Result<Option<String>> {
    let token = token.trim();

    if hex_pattern().is_match(token) {
        return match mode {
            ColorMode::Hex => Ok(Some(token.to_string())),
            ColorMode::Rgb => {
                let r = u8::from_str_radix(&token[1..3], 16).expect("validated hex digits");
                let g = u8::from_str_radix(&token[3..5], 16).expect("validated hex digits");
                let b = u8::from_str_radix(&token[5..7], 16).expect("validated hex digits");
                Ok(Some(format!("rgb({},{},{})", r, g, b)))
            }
        };
    }

    if let Some(caps) = rgb_pattern().captures(token) {
        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let raw: u16 = caps[i + 1].parse().map_err(|_| {
                Error::ColorFormat(format!("{} (channel {} not a number)", token, i + 1))
            })?;
            if raw > 255 {
                return Err(Error::ColorFormat(format!(
                    "{} (channel value {} out of range 0-255)",
                    token, raw
                )));
            }
            *channel = raw as u8;
        }
        let [r, g, b] = channels;
        return match mode {
            ColorMode::Rgb => Ok(Some(token.to_string())),
            ColorMode::Hex => Ok(Some(format!("#{:02X}{:02X}{:02X}", r, g, b))),
        };
    }

    Ok(None)
}

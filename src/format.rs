/*============================================================
  Bundlescope
  Module: bundlescope::format
  ------------------------------------------------------------
  Purpose:
    Human-readable size figures and the impact tiers shown on
    the results card.

  Security / Safety Notes:
    Pure functions; no I/O performed in this module.

  Revision History:
    2026-10-16  Authored size formatting and impact tiers.
============================================================*/

use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// `"<n> B"` below 1 KiB, otherwise two-decimal KB or MB. Exact ties
/// round up (`1152` → `"1.13 KB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        two_decimals(bytes, KIB, "KB")
    } else {
        two_decimals(bytes, MIB, "MB")
    }
}

fn two_decimals(bytes: u64, unit: u64, suffix: &str) -> String {
    let unit = u128::from(unit);
    let hundredths = (u128::from(bytes) * 100 + unit / 2) / unit;
    format!("{}.{:02} {suffix}", hundredths / 100, hundredths % 100)
}

/// Coarse bucket of a package's minified size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Minimal,
    Small,
    Moderate,
    Significant,
    Large,
}

impl Impact {
    /// Classify by minified size; gzip size plays no part.
    pub fn classify(size: u64) -> Self {
        match size {
            0..=9_999 => Impact::Minimal,
            10_000..=49_999 => Impact::Small,
            50_000..=99_999 => Impact::Moderate,
            100_000..=249_999 => Impact::Significant,
            _ => Impact::Large,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::Minimal => "minimal",
            Impact::Small => "small",
            Impact::Moderate => "moderate",
            Impact::Significant => "significant",
            Impact::Large => "large",
        }
    }

    /// Display colour group for the badge.
    pub fn color(self) -> &'static str {
        match self {
            Impact::Minimal => "green",
            Impact::Small => "blue",
            Impact::Moderate => "yellow",
            Impact::Significant => "orange",
            Impact::Large => "red",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

//! Application configuration constants.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    settings_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                settings_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the working directory.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }
}

// ---- CLI ----

/// Exit code for any argument error (wrong count or invalid value).
pub const ARGUMENT_ERR_CODE: u8 = 1;

/// Value meaning "no constraint" for the size / uid / gid arguments.
pub const NO_CONSTRAINT: i64 = -1;

/// One-line usage printed to stderr on argument errors.
pub fn usage_line() -> String {
    format!(
        "Usage: {} <buffsize> <filesize> <uid> <gid> <string>",
        PackagePaths::get().pkg_name()
    )
}

// ---- Output ----

/// Final line printed by the sink.
pub fn summary_line(matches: u64) -> String {
    format!("***** You found {} matches *****", matches)
}

// ---- I/O ----

/// Read buffer for the line emitter (bytes). 64 KB.
pub const LINE_READ_BUFFER_SIZE: usize = 64 * 1024;

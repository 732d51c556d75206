//! Nerd Font glyph resolver.
//!
//! Stands in for the OS icon lookup on terminals: a file's icon depends on
//! its extension alone, and every directory gets the folder glyph.

use std::path::Path;

use super::cache::{file_extension, IconHandle, IconResolver};

const FOLDER: &str = "\u{f07b}";
const GENERIC_FILE: &str = "\u{f15b}";

/// Resolves icons to Nerd Font glyphs.
///
/// Large icons are padded to two cells, which is how the glyphs render
/// next to a label; small icons are the bare glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphResolver;

impl GlyphResolver {
    fn handle(glyph: &str, large: bool) -> IconHandle {
        if large {
            IconHandle::new(format!("{glyph} "))
        } else {
            IconHandle::new(glyph)
        }
    }
}

impl IconResolver for GlyphResolver {
    fn resolve_file(&self, path: &Path, large: bool) -> Option<IconHandle> {
        let name = path.file_name()?.to_str()?;
        let ext = file_extension(name).trim_start_matches('.');
        Some(Self::handle(glyph_for_extension(ext), large))
    }

    fn resolve_directory(&self, _path: &Path, large: bool) -> Option<IconHandle> {
        Some(Self::handle(FOLDER, large))
    }
}

fn glyph_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        // Source code
        "rs" => "\u{e7a8}",
        "py" | "pyw" => "\u{e73c}",
        "js" | "mjs" | "cjs" => "\u{e74e}",
        "ts" => "\u{e628}",
        "go" => "\u{e724}",
        "java" | "jar" => "\u{e738}",
        "c" | "h" => "\u{e61e}",
        "cpp" | "cc" | "hpp" => "\u{e61d}",
        "cs" => "\u{f031b}",
        "sh" | "bash" | "zsh" | "ps1" | "bat" => "\u{f489}",

        // Config & markup
        "toml" | "ini" | "cfg" | "conf" => "\u{e615}",
        "yaml" | "yml" => "\u{e6a8}",
        "json" => "\u{e60b}",
        "xml" => "\u{e619}",
        "html" | "htm" => "\u{e736}",
        "md" | "markdown" => "\u{e73e}",

        // Documents
        "txt" | "text" | "log" => "\u{f15c}",
        "pdf" => "\u{f1c1}",
        "doc" | "docx" | "rtf" => "\u{f1c2}",
        "xls" | "xlsx" | "csv" => "\u{f1c3}",
        "ppt" | "pptx" => "\u{f1c4}",

        // Media & archives
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "ico" | "svg" => "\u{f1c5}",
        "mp3" | "wav" | "flac" | "ogg" | "m4a" => "\u{f001}",
        "mp4" | "avi" | "mkv" | "mov" | "wmv" => "\u{f03d}",
        "zip" | "tar" | "gz" | "7z" | "rar" => "\u{f410}",
        "exe" | "msi" | "lnk" => "\u{f013}",

        _ => GENERIC_FILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_glyph(path: &str) -> String {
        GlyphResolver
            .resolve_file(Path::new(path), false)
            .unwrap()
            .as_str()
            .to_string()
    }

    #[test]
    fn directory_gets_folder_glyph() {
        let icon = GlyphResolver.resolve_directory(Path::new(""), false);
        assert_eq!(icon, Some(IconHandle::new(FOLDER)));
    }

    #[test]
    fn large_icons_are_padded() {
        let icon = GlyphResolver
            .resolve_directory(Path::new(""), true)
            .unwrap();
        assert_eq!(icon.as_str(), "\u{f07b} ");
    }

    #[test]
    fn rust_file_gets_rust_glyph() {
        assert_eq!(file_glyph("/src/main.rs"), "\u{e7a8}");
    }

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(file_glyph("C:/photos/IMG_1.JPG"), "\u{f1c5}");
    }

    #[test]
    fn file_name_does_not_change_the_glyph() {
        assert_eq!(file_glyph("/repo/Cargo.toml"), file_glyph("/etc/app.toml"));
        assert_eq!(file_glyph("/repo/Makefile"), GENERIC_FILE);
    }

    #[test]
    fn unknown_extension_gets_generic_glyph() {
        assert_eq!(file_glyph("/data/blob.xyz"), GENERIC_FILE);
        assert_eq!(file_glyph("/usr/bin/tool"), GENERIC_FILE);
    }

    #[test]
    fn path_without_file_name_is_not_found() {
        assert!(GlyphResolver.resolve_file(Path::new("/"), true).is_none());
        assert!(GlyphResolver.resolve_file(Path::new(""), true).is_none());
    }
}

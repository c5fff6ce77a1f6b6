//! Output file naming

use std::path::{Path, PathBuf};

/// Name of the file an updated target is written to:
/// `<stem>_updated-<lang><extension>`, next to the original. The original
/// input file is never overwritten.
pub fn updated_file_name(path: &Path, lang: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_updated-{lang}{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_lift_file_when_naming_output_then_stem_gets_lang_suffix() {
        let out = updated_file_name(Path::new("/data/gbeya.lift"), "sg");
        assert_eq!(out, PathBuf::from("/data/gbeya_updated-sg.lift"));
    }

    #[test]
    fn given_file_without_extension_when_naming_output_then_no_trailing_dot() {
        let out = updated_file_name(Path::new("lexicon"), "en");
        assert_eq!(out, PathBuf::from("lexicon_updated-en"));
    }

    #[test]
    fn given_relative_path_when_naming_output_then_stays_alongside_input() {
        let out = updated_file_name(Path::new("db/sango.lift"), "fr");
        assert_eq!(out, PathBuf::from("db/sango_updated-fr.lift"));
    }
}

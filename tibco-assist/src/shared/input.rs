//! Collecting the process text an action works on.
//!
//! Text can be given inline, read from a file, or piped on stdin. Uploaded
//! bytes are decoded as UTF-8 first and fall back to Latin-1, so decoding
//! never fails.

use crate::internal::interaction::UserInteraction;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// File extensions accepted for uploaded process definitions.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["xml", "txt", "bwp", "process"];

/// Files larger than this (in characters) only get a truncated preview.
pub const LARGE_FILE_CHARS: usize = 5000;
/// Number of characters shown in a truncated preview.
pub const PREVIEW_CHARS: usize = 2000;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unable to find/open {file_name}")]
    FileNotFound { file_name: String },
    #[error("Unsupported file type for {file_name}, expected one of: {allowed}")]
    UnsupportedExtension { file_name: String, allowed: String },
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Where the process text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Text typed or pasted directly
    Text(String),
    /// A process definition file on disk
    File(PathBuf),
    /// Read everything from standard input
    Stdin,
}

impl InputSource {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Interpret a CLI location: `-` means stdin, anything else is a path.
    pub fn from_location(location: &str) -> Self {
        match location {
            "-" => Self::Stdin,
            path => Self::from_file(path),
        }
    }

    pub async fn read(&self) -> Result<CollectedInput, InputError> {
        match self {
            InputSource::Text(text) => Ok(CollectedInput {
                text: text.clone(),
                file_name: None,
            }),
            InputSource::File(path) => {
                check_extension(path)?;
                if !path.exists() {
                    return Err(InputError::FileNotFound {
                        file_name: path.display().to_string(),
                    });
                }
                let bytes = tokio::fs::read(path).await?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(CollectedInput {
                    text: decode_bytes(&bytes),
                    file_name: path.file_name().map(|x| x.to_string_lossy().to_string()),
                })
            }
            InputSource::Stdin => {
                let mut bytes = Vec::new();
                tokio::io::stdin().read_to_end(&mut bytes).await?;
                Ok(CollectedInput {
                    text: decode_bytes(&bytes),
                    file_name: None,
                })
            }
        }
    }

    /// Read the input, reporting problems to the user instead of failing.
    ///
    /// A source that can't be read yields empty text, which the action then
    /// rejects as missing input.
    pub async fn collect(&self, interaction: &dyn UserInteraction) -> CollectedInput {
        match self.read().await {
            Ok(input) => {
                if let Some(name) = &input.file_name {
                    let size = input.char_count();
                    interaction.notify(&format!(
                        "File loaded: {} ({} characters)",
                        name,
                        group_thousands(size)
                    ));
                    if input.is_large() {
                        interaction.warn(&format!(
                            "Large file detected ({} characters). Only a preview is shown.",
                            group_thousands(size)
                        ));
                    }
                }
                input
            }
            Err(e) => {
                interaction.error(&format!("Error reading file: {}", e));
                CollectedInput::default()
            }
        }
    }
}

/// Text gathered for one action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedInput {
    pub text: String,
    pub file_name: Option<String>,
}

impl CollectedInput {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_large(&self) -> bool {
        self.char_count() > LARGE_FILE_CHARS
    }

    /// The text to show back to the user, truncated for large inputs.
    pub fn preview(&self) -> String {
        if self.is_large() {
            let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1.
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            debug!("Input is not valid UTF-8 ({}), decoding as Latin-1", e);
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

fn check_extension(path: &Path) -> Result<(), InputError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(|x| x.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(InputError::UnsupportedExtension {
            file_name: path.display().to_string(),
            allowed: ALLOWED_EXTENSIONS.join(", "),
        })
    }
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::interaction::MockUserInteraction;
    use std::io::Write;

    #[test]
    fn test_decode_valid_utf8() {
        assert_eq!(
            "<pd:name>Café</pd:name>",
            decode_bytes("<pd:name>Café</pd:name>".as_bytes())
        );
    }

    #[test]
    fn test_decode_falls_back_to_latin1() {
        // 0xE9 is 'é' in Latin-1 and a dangling lead byte in UTF-8
        let bytes = b"<name>Caf\xE9</name>";
        assert!(std::str::from_utf8(bytes).is_err());
        assert_eq!("<name>Café</name>", decode_bytes(bytes));
    }

    #[test]
    fn test_decode_never_fails() {
        let every_byte: Vec<u8> = (0..=255u8).collect();
        let decoded = decode_bytes(&every_byte);
        assert_eq!(256, decoded.chars().count());

        assert_eq!("", decode_bytes(&[]));
        assert_eq!("\u{ff}\u{fe}", decode_bytes(&[0xff, 0xfe]));
    }

    #[test]
    fn test_from_location() {
        assert_eq!(InputSource::Stdin, InputSource::from_location("-"));
        assert_eq!(
            InputSource::File(PathBuf::from("a/b.bwp")),
            InputSource::from_location("a/b.bwp")
        );
    }

    #[test]
    fn test_extension_allow_list() {
        assert!(check_extension(Path::new("Process.bwp")).is_ok());
        assert!(check_extension(Path::new("Process.PROCESS")).is_ok());
        assert!(check_extension(Path::new("notes.txt")).is_ok());
        assert!(check_extension(Path::new("a.xml")).is_ok());
        assert!(matches!(
            check_extension(Path::new("archive.zip")),
            Err(InputError::UnsupportedExtension { .. })
        ));
        assert!(check_extension(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!("0", group_thousands(0));
        assert_eq!("999", group_thousands(999));
        assert_eq!("5,001", group_thousands(5001));
        assert_eq!("1,234,567", group_thousands(1234567));
    }

    #[test]
    fn test_preview_truncates_large_input() {
        let small = CollectedInput {
            text: "<process/>".to_string(),
            file_name: None,
        };
        assert_eq!("<process/>", small.preview());

        let large = CollectedInput {
            text: "x".repeat(LARGE_FILE_CHARS + 1),
            file_name: None,
        };
        assert!(large.is_large());
        assert_eq!(PREVIEW_CHARS + 3, large.preview().len());
        assert!(large.preview().ends_with("..."));
    }

    #[tokio::test]
    async fn test_read_latin1_file() {
        let mut file = tempfile::Builder::new().suffix(".bwp").tempfile().unwrap();
        file.write_all(b"<pd:name>Gr\xFC\xDFe</pd:name>").unwrap();

        let input = InputSource::from_file(file.path()).read().await.unwrap();
        assert_eq!("<pd:name>Grüße</pd:name>", input.text);
        assert!(input.file_name.unwrap().ends_with(".bwp"));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported_and_yields_empty_text() {
        let mut interaction = MockUserInteraction::new();
        interaction
            .expect_error()
            .times(1)
            .withf(|msg| msg.starts_with("Error reading file:"))
            .return_const(());

        let source = InputSource::from_file("/does/not/exist.xml");
        let input = source.collect(&interaction).await;
        assert_eq!(CollectedInput::default(), input);
    }

    #[tokio::test]
    async fn test_loaded_file_is_announced() {
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(b"<process/>").unwrap();

        let mut interaction = MockUserInteraction::new();
        interaction
            .expect_notify()
            .times(1)
            .withf(|msg| msg.starts_with("File loaded:") && msg.ends_with("(10 characters)"))
            .return_const(());
        interaction.expect_warn().times(0);

        let input = InputSource::from_file(file.path()).collect(&interaction).await;
        assert_eq!("<process/>", input.text);
    }

    #[tokio::test]
    async fn test_inline_text_is_passed_through() {
        let interaction = MockUserInteraction::new();
        let input = InputSource::Text("  <process/>  ".to_string())
            .collect(&interaction)
            .await;
        assert_eq!("  <process/>  ", input.text);
        assert_eq!(None, input.file_name);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whatever front end shows failures.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::PixelwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must do something (pick another file, fix a setting).
    ActionRequired,
    /// Cannot be fixed by retrying — bad data or an internal fault.
    Permanent,
    /// The user stopped the operation; nothing went wrong.
    Informational,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `PixelwerkError` into a `HumanError`.
pub fn humanize_error(err: &PixelwerkError) -> HumanError {
    match err {
        PixelwerkError::Decode(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        PixelwerkError::UnsupportedType(detail) => HumanError {
            message: "Please select image files only.".into(),
            suggestion: format!("JPEG and PNG images are supported. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PixelwerkError::Encode(_) => HumanError {
            message: "The enhanced image couldn't be saved in that format.".into(),
            suggestion: "Try downloading as PNG instead, or pick a JPEG quality between 0 and 100%.".into(),
            severity: Severity::ActionRequired,
        },

        PixelwerkError::Geometry(_) => HumanError {
            message: "This image can't be placed on the page.".into(),
            suggestion: "The image may be empty, or the margin may be too large for the page size. Try a smaller margin.".into(),
            severity: Severity::ActionRequired,
        },

        PixelwerkError::InvalidPolicy(detail) => HumanError {
            message: "One of the settings isn't recognised.".into(),
            suggestion: format!("Check the value and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PixelwerkError::Pdf(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Try again with fewer images. If this keeps happening, please report it.".into(),
            severity: Severity::Permanent,
        },

        PixelwerkError::Cancelled => HumanError {
            message: "Conversion stopped.".into(),
            suggestion: "No file was saved. Start again whenever you're ready.".into(),
            severity: Severity::Informational,
        },

        PixelwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file or folder.".into(),
                    suggestion: "Check the permissions, or choose a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        PixelwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check the file is valid JSON, or delete it to go back to the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_asks_for_images() {
        let human = humanize_error(&PixelwerkError::UnsupportedType("text/plain".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("text/plain"));
    }

    #[test]
    fn cancel_is_informational() {
        let human = humanize_error(&PixelwerkError::Cancelled);
        assert_eq!(human.severity, Severity::Informational);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = PixelwerkError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}

//! Field rules shared by the form controllers.
//!
//! Each rule reports a [`ValidationError`]; the controllers decide which
//! message the user sees for it.

use shared::models::MediaAttachment;

/// Largest avatar accepted for upload.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Largest post attachment accepted for upload.
pub const MAX_POST_MEDIA_BYTES: usize = 10 * 1024 * 1024;

/// Default minimum password length for new accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const AVATAR_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Validation errors that can occur during form validation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    /// Field is required but empty
    Required,
    /// Email address is invalid (missing @ symbol)
    InvalidEmail,
    /// Password is shorter than the configured minimum
    PasswordTooShort { min: usize },
    /// Password confirmation doesn't match password
    PasswordsDoNotMatch,
    /// File is not of an accepted media type
    UnsupportedMediaType,
    /// File exceeds the size limit
    FileTooLarge { limit: usize },
}

/// Validates that a field is not blank.
///
/// # Errors
/// [`ValidationError::Required`] when `value` is empty or whitespace.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

/// Validates an email address.
///
/// # Validation rules
/// - Email must not be empty
/// - Email must contain an '@' symbol
///
/// # Errors
/// Returns the first rule that fails.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_required(email)?;
    if email.trim().contains('@') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validates an email address that may be left empty.
///
/// # Errors
/// [`ValidationError::InvalidEmail`] when a value is given without an '@'.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        Ok(())
    } else {
        validate_email(email)
    }
}

/// Validates a password.
///
/// # Validation rules
/// - Password must not be empty
/// - Password must be at least `min_length` characters long, when set
///
/// # Errors
/// Returns the first rule that fails.
pub fn validate_password(password: &str, min_length: Option<usize>) -> Result<(), ValidationError> {
    validate_required(password)?;
    match min_length {
        Some(min) if password.chars().count() < min => {
            Err(ValidationError::PasswordTooShort { min })
        }
        _ => Ok(()),
    }
}

/// Validates that the password confirmation matches the password.
///
/// # Errors
/// [`ValidationError::Required`] when empty and
/// [`ValidationError::PasswordsDoNotMatch`] when it differs.
pub fn validate_confirm_password(
    confirm_password: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_required(confirm_password)?;
    if confirm_password == password {
        Ok(())
    } else {
        Err(ValidationError::PasswordsDoNotMatch)
    }
}

/// Validates a profile photo: JPEG, PNG or GIF up to [`MAX_AVATAR_BYTES`].
///
/// # Errors
/// Returns the first rule that fails; the type is checked before the size.
pub fn validate_avatar(file: &MediaAttachment) -> Result<(), ValidationError> {
    let mime = file.mime_type.trim().to_ascii_lowercase();
    if !AVATAR_MIME_TYPES.contains(&mime.as_str()) {
        return Err(ValidationError::UnsupportedMediaType);
    }
    if file.size() > MAX_AVATAR_BYTES {
        return Err(ValidationError::FileTooLarge {
            limit: MAX_AVATAR_BYTES,
        });
    }
    Ok(())
}

/// Validates a post attachment: any image or video up to [`MAX_POST_MEDIA_BYTES`].
///
/// # Errors
/// Returns the first rule that fails; the size is checked before the type.
pub fn validate_post_media(file: &MediaAttachment) -> Result<(), ValidationError> {
    if file.size() > MAX_POST_MEDIA_BYTES {
        return Err(ValidationError::FileTooLarge {
            limit: MAX_POST_MEDIA_BYTES,
        });
    }
    if !(file.is_image() || file.is_video()) {
        return Err(ValidationError::UnsupportedMediaType);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn file(mime: &str, size: usize) -> MediaAttachment {
        MediaAttachment {
            file_name: "upload.bin".to_string(),
            mime_type: mime.to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("a").is_ok());
        assert_eq!(validate_required(""), Err(ValidationError::Required));
        assert_eq!(validate_required(" \t"), Err(ValidationError::Required));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("@").is_ok());
        assert_eq!(validate_email(""), Err(ValidationError::Required));
        assert_eq!(
            validate_email("userexample.com"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_validate_optional_email() {
        assert!(validate_optional_email("").is_ok());
        assert!(validate_optional_email("a@b").is_ok());
        assert_eq!(
            validate_optional_email("nope"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123", Some(8)).is_ok());
        assert!(validate_password("12345678", Some(8)).is_ok());
        assert!(validate_password("x", None).is_ok());
        assert_eq!(validate_password("", None), Err(ValidationError::Required));
        assert_eq!(
            validate_password("1234567", Some(8)),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
    }

    #[test]
    fn test_validate_password_counts_characters() {
        assert!(validate_password("пароль12", Some(8)).is_ok());
    }

    #[test]
    fn test_validate_confirm_password() {
        assert!(validate_confirm_password("secret", "secret").is_ok());
        assert_eq!(
            validate_confirm_password("", "secret"),
            Err(ValidationError::Required)
        );
        assert_eq!(
            validate_confirm_password("Secret", "secret"),
            Err(ValidationError::PasswordsDoNotMatch)
        );
    }

    #[test_case("image/jpeg" ; "jpeg")]
    #[test_case("image/jpg" ; "jpg")]
    #[test_case("image/png" ; "png")]
    #[test_case("IMAGE/GIF" ; "gif uppercase")]
    fn test_validate_avatar_accepts(mime: &str) {
        assert!(validate_avatar(&file(mime, 1024)).is_ok());
    }

    #[test_case("image/webp" ; "webp")]
    #[test_case("application/pdf" ; "pdf")]
    #[test_case("" ; "unknown")]
    fn test_validate_avatar_rejects_type(mime: &str) {
        assert_eq!(
            validate_avatar(&file(mime, 1024)),
            Err(ValidationError::UnsupportedMediaType)
        );
    }

    #[test]
    fn test_validate_avatar_size_limit() {
        assert!(validate_avatar(&file("image/png", MAX_AVATAR_BYTES)).is_ok());
        assert_eq!(
            validate_avatar(&file("image/png", MAX_AVATAR_BYTES + 1)),
            Err(ValidationError::FileTooLarge {
                limit: MAX_AVATAR_BYTES
            })
        );
    }

    #[test]
    fn test_validate_post_media() {
        assert!(validate_post_media(&file("image/webp", 10)).is_ok());
        assert!(validate_post_media(&file("video/mp4", MAX_POST_MEDIA_BYTES)).is_ok());
        assert_eq!(
            validate_post_media(&file("application/zip", 10)),
            Err(ValidationError::UnsupportedMediaType)
        );
        assert_eq!(
            validate_post_media(&file("video/mp4", MAX_POST_MEDIA_BYTES + 1)),
            Err(ValidationError::FileTooLarge {
                limit: MAX_POST_MEDIA_BYTES
            })
        );
    }
}

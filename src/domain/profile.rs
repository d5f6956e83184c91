//! Profile self-service types and validation.
//!
//! The update workflow is message passing: an immutable
//! [`ProfileUpdateRequest`] comes in, and either a fully-validated
//! [`ProfileChanges`] set or the complete [`ProfileErrors`] collection
//! comes out. Nothing is persisted until every check has passed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::password::{Password, PasswordPolicy};
use super::user::User;
use crate::config::NAME_MAX_LENGTH;

/// Form fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    CurrentPassword,
    NewPassword,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::CurrentPassword => "current_password",
            ProfileField::NewPassword => "new_password",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    MaxLength,
    Invalid,
    ConfirmationMismatch,
    Weak,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::MaxLength => "max_length",
            ErrorKind::Invalid => "invalid",
            ErrorKind::ConfirmationMismatch => "confirmation_mismatch",
            ErrorKind::Weak => "weak",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-scoped validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ProfileField,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(field: ProfileField, kind: ErrorKind) -> Self {
        Self { field, kind }
    }

    /// Human-readable message for form display
    pub fn message(&self) -> String {
        match (self.field, self.kind) {
            (ProfileField::Name, ErrorKind::Required) => "Name is required".to_string(),
            (ProfileField::Name, ErrorKind::MaxLength) => {
                format!("Name must not exceed {} characters", NAME_MAX_LENGTH)
            }
            (ProfileField::CurrentPassword, ErrorKind::Required) => {
                "Current password is required to change your password".to_string()
            }
            (ProfileField::CurrentPassword, ErrorKind::Invalid) => {
                "Current password is incorrect".to_string()
            }
            (ProfileField::NewPassword, ErrorKind::Required) => {
                "New password is required".to_string()
            }
            (ProfileField::NewPassword, ErrorKind::ConfirmationMismatch) => {
                "New password confirmation does not match".to_string()
            }
            (ProfileField::NewPassword, ErrorKind::Weak) => {
                "New password does not meet the strength requirements".to_string()
            }
            (field, kind) => format!("{} is {}", field, kind),
        }
    }
}

/// Ordered collection of field-scoped validation failures.
///
/// All failures from one update attempt are reported together so the
/// form layer can attach each error to its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileErrors(Vec<FieldError>);

impl ProfileErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: ProfileField, kind: ErrorKind) {
        self.0.push(FieldError::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn contains(&self, field: ProfileField, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.field == field && e.kind == kind)
    }
}

impl IntoIterator for ProfileErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Transient field set for one profile update submission.
///
/// Exists only for the duration of the call; password fields are never
/// persisted or echoed back.
#[derive(Clone, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Current password, required when changing the password
    #[serde(default)]
    pub current_password: String,
    /// New password, empty when only the name changes
    #[serde(default)]
    pub new_password: String,
    /// Must match the new password exactly
    #[serde(default)]
    pub new_password_confirmation: String,
}

// Keep submitted passwords out of debug output
impl std::fmt::Debug for ProfileUpdateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileUpdateRequest")
            .field("name", &self.name)
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("new_password_confirmation", &"[REDACTED]")
            .finish()
    }
}

impl ProfileUpdateRequest {
    /// A pure name update requests no password change at all
    pub fn wants_password_change(&self) -> bool {
        !self.current_password.is_empty() || !self.new_password.is_empty()
    }
}

/// Form state handed back after processing a submission.
///
/// Password fields are always cleared; name and email are re-populated
/// from the persisted user for display continuity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileForm {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

impl ProfileForm {
    /// Fill the form from a persisted user, with password fields empty
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            current_password: String::new(),
            new_password: String::new(),
            new_password_confirmation: String::new(),
        }
    }
}

/// Fully-validated change set produced by [`validate_update`].
///
/// `new_password` is still plaintext here; hashing happens at apply time.
#[derive(Clone, Default)]
pub struct ProfileChanges {
    /// New display name, when it differs from the stored value
    pub name: Option<String>,
    /// Approved new password awaiting hashing
    pub new_password: Option<String>,
}

impl std::fmt::Debug for ProfileChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileChanges")
            .field("name", &self.name)
            .field(
                "new_password",
                &self.new_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ProfileChanges {
    pub fn is_noop(&self) -> bool {
        self.name.is_none() && self.new_password.is_none()
    }
}

/// Validate a profile update against the principal's stored state.
///
/// Runs every check and collects all failures; never short-circuits.
/// Returns the change set only when the whole submission is valid, so
/// a failing password section blocks the name change too.
///
/// Rules, in order:
/// 1. If both password fields are empty the password section is skipped.
/// 2. Supplying either of `current_password`/`new_password` makes the
///    other required.
/// 3. A supplied `current_password` must verify against the stored hash.
/// 4. A supplied `new_password` must equal its confirmation and satisfy
///    the strength policy; both checks run independently.
/// 5. `name` is required and capped at 255 characters, independent of
///    the password section.
pub fn validate_update(
    principal: &User,
    request: &ProfileUpdateRequest,
    policy: &PasswordPolicy,
) -> Result<ProfileChanges, ProfileErrors> {
    let mut errors = ProfileErrors::new();

    if request.wants_password_change() {
        if request.current_password.is_empty() {
            errors.push(ProfileField::CurrentPassword, ErrorKind::Required);
        }
        if request.new_password.is_empty() {
            errors.push(ProfileField::NewPassword, ErrorKind::Required);
        }

        if !request.current_password.is_empty() {
            let stored = Password::from_hash(principal.password_hash.clone());
            if !stored.verify(&request.current_password) {
                errors.push(ProfileField::CurrentPassword, ErrorKind::Invalid);
            }
        }

        if !request.new_password.is_empty() {
            if request.new_password != request.new_password_confirmation {
                errors.push(ProfileField::NewPassword, ErrorKind::ConfirmationMismatch);
            }
            if !policy.check(&request.new_password) {
                errors.push(ProfileField::NewPassword, ErrorKind::Weak);
            }
        }
    }

    if request.name.is_empty() {
        errors.push(ProfileField::Name, ErrorKind::Required);
    } else if request.name.chars().count() > NAME_MAX_LENGTH {
        errors.push(ProfileField::Name, ErrorKind::MaxLength);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProfileChanges {
        name: (request.name != principal.name).then(|| request.name.clone()),
        new_password: (!request.new_password.is_empty()).then(|| request.new_password.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn principal_with_password(plain: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "staff@example.com".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            name: "Old Name".to_string(),
            role: crate::domain::UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn name_only(name: &str) -> ProfileUpdateRequest {
        ProfileUpdateRequest {
            name: name.to_string(),
            current_password: String::new(),
            new_password: String::new(),
            new_password_confirmation: String::new(),
        }
    }

    #[test]
    fn test_name_only_update_skips_password_section() {
        let user = principal_with_password("old-password");
        let changes =
            validate_update(&user, &name_only("New Name"), &PasswordPolicy::default()).unwrap();

        assert_eq!(changes.name.as_deref(), Some("New Name"));
        assert!(changes.new_password.is_none());
    }

    #[test]
    fn test_identical_name_is_noop() {
        let user = principal_with_password("old-password");
        let changes =
            validate_update(&user, &name_only("Old Name"), &PasswordPolicy::default()).unwrap();

        assert!(changes.is_noop());
    }

    #[test]
    fn test_either_password_field_requires_the_other() {
        let user = principal_with_password("old-password");

        let mut request = name_only("Old Name");
        request.current_password = "old-password".to_string();
        let errors =
            validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::NewPassword, ErrorKind::Required));

        let mut request = name_only("Old Name");
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "P@ssword123!".to_string();
        let errors =
            validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::CurrentPassword, ErrorKind::Required));
    }

    #[test]
    fn test_wrong_current_password() {
        let user = principal_with_password("old-password");
        let mut request = name_only("Old Name");
        request.current_password = "wrong".to_string();
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "P@ssword123!".to_string();

        let errors = validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::CurrentPassword, ErrorKind::Invalid));
    }

    #[test]
    fn test_confirmation_mismatch() {
        let user = principal_with_password("old-password");
        let mut request = name_only("Old Name");
        request.current_password = "old-password".to_string();
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "MISMATCH".to_string();

        let errors = validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::NewPassword, ErrorKind::ConfirmationMismatch));
    }

    #[test]
    fn test_weak_new_password() {
        let user = principal_with_password("old-password");
        let mut request = name_only("Old Name");
        request.current_password = "old-password".to_string();
        request.new_password = "short".to_string();
        request.new_password_confirmation = "short".to_string();

        let errors = validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::NewPassword, ErrorKind::Weak));
    }

    #[test]
    fn test_wrong_current_password_and_invalid_name_both_reported() {
        let user = principal_with_password("old-password");
        let mut request = name_only("");
        request.current_password = "wrong".to_string();
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "P@ssword123!".to_string();

        let errors = validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::CurrentPassword, ErrorKind::Invalid));
        assert!(errors.contains(ProfileField::Name, ErrorKind::Required));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_name_length_boundary() {
        let user = principal_with_password("old-password");

        let at_limit = "a".repeat(255);
        assert!(validate_update(&user, &name_only(&at_limit), &PasswordPolicy::default()).is_ok());

        let over_limit = "a".repeat(256);
        let errors = validate_update(&user, &name_only(&over_limit), &PasswordPolicy::default())
            .unwrap_err();
        assert!(errors.contains(ProfileField::Name, ErrorKind::MaxLength));
    }

    #[test]
    fn test_valid_password_change() {
        let user = principal_with_password("old-password");
        let mut request = name_only("Old Name");
        request.current_password = "old-password".to_string();
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "P@ssword123!".to_string();

        let changes = validate_update(&user, &request, &PasswordPolicy::default()).unwrap();
        assert!(changes.name.is_none());
        assert_eq!(changes.new_password.as_deref(), Some("P@ssword123!"));
    }

    #[test]
    fn test_mismatch_and_weak_are_both_reported() {
        let user = principal_with_password("old-password");
        let mut request = name_only("Old Name");
        request.current_password = "old-password".to_string();
        request.new_password = "short".to_string();
        request.new_password_confirmation = "other".to_string();

        let errors = validate_update(&user, &request, &PasswordPolicy::default()).unwrap_err();
        assert!(errors.contains(ProfileField::NewPassword, ErrorKind::ConfirmationMismatch));
        assert!(errors.contains(ProfileField::NewPassword, ErrorKind::Weak));
    }
}

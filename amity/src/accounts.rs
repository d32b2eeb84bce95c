//! Account registration and profile maintenance.

use chrono::Utc;

use crate::{
    errors::{SocialError, Subject, ValidationError, ValidationIssue, ValidationResult},
    id::generate_record_id,
    models::{IdSet, NewUser, ProfilePatch, User, UserProfile},
    store::IdentityStore,
    validators::{is_present, is_valid_email, is_valid_url, require_id},
};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const EMAIL_MAX_CHARS: usize = 50;

pub struct AccountDirectory<S> {
    store: S,
}

impl<S> AccountDirectory<S>
where
    S: IdentityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an account. The friend list always starts empty.
    pub async fn register(&self, new_user: NewUser) -> Result<UserProfile, SocialError> {
        validate_new_user(&new_user)?;

        let now = Utc::now();
        let user = User {
            id: generate_record_id(),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            email: new_user.email.trim().to_string(),
            password_hash: new_user.password_hash,
            picture_ref: new_user.picture_ref,
            location: new_user.location,
            occupation: new_user.occupation,
            twitter: new_user.twitter,
            linkedin: new_user.linkedin,
            friends: IdSet::new(),
            viewed_profile: 0,
            impressions: 0,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_user(&user)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))?;
        log::debug!("registered user {}", user.id);
        Ok(UserProfile::from(&user))
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, SocialError> {
        require_id(user_id, "user id")?;
        let user = self
            .store
            .find_user(user_id)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))?
            .ok_or_else(|| SocialError::not_found(Subject::User, user_id))?;
        Ok(UserProfile::from(&user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<UserProfile, SocialError> {
        require_id(email, "email")?;
        let user = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))?
            .ok_or_else(|| SocialError::not_found(Subject::User, email.trim()))?;
        Ok(UserProfile::from(&user))
    }

    /// Applies a profile edit. Posts and comments written earlier keep their
    /// author snapshots.
    pub async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> Result<UserProfile, SocialError> {
        require_id(user_id, "user id")?;
        validate_patch(&patch)?;
        let patch = patch.normalized();
        if patch.is_empty() {
            return self.profile(user_id).await;
        }

        let user = self
            .store
            .update_profile(user_id, &patch, Utc::now())
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))?;
        log::debug!("updated profile of {user_id}");
        Ok(UserProfile::from(&user))
    }
}

fn check_name(field: &'static str, value: &str, issues: &mut Vec<ValidationIssue>) {
    let len = value.trim().chars().count();
    if len < NAME_MIN_CHARS || len > NAME_MAX_CHARS {
        issues.push(ValidationIssue::new(
            field,
            "validation.length",
            format!("length must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS}"),
        ));
    }
}

fn check_link(field: &'static str, value: &str, issues: &mut Vec<ValidationIssue>) {
    if is_present(value) && !is_valid_url(value.trim()) {
        issues.push(ValidationIssue::new(field, "validation.url", "must be a valid URL"));
    }
}

fn validate_new_user(new_user: &NewUser) -> ValidationResult<()> {
    let mut issues = Vec::new();
    check_name("first_name", &new_user.first_name, &mut issues);
    check_name("last_name", &new_user.last_name, &mut issues);

    let email = new_user.email.trim();
    if email.is_empty() {
        issues.push(ValidationIssue::new("email", "validation.required", "email is required"));
    } else if email.chars().count() > EMAIL_MAX_CHARS {
        issues.push(ValidationIssue::new(
            "email",
            "validation.length",
            format!("length must be at most {EMAIL_MAX_CHARS}"),
        ));
    } else if !is_valid_email(email) {
        issues.push(ValidationIssue::new("email", "validation.email", "must be a valid email address"));
    }

    if !is_present(&new_user.password_hash) {
        issues.push(ValidationIssue::new(
            "password_hash",
            "validation.required",
            "password hash is required",
        ));
    }
    check_link("twitter", &new_user.twitter, &mut issues);
    check_link("linkedin", &new_user.linkedin, &mut issues);

    ValidationError::new(issues).into_result()
}

fn validate_patch(patch: &ProfilePatch) -> ValidationResult<()> {
    let mut issues = Vec::new();
    for (field, name) in [("first_name", &patch.first_name), ("last_name", &patch.last_name)] {
        if let Some(name) = name.as_deref().filter(|n| is_present(n)) {
            check_name(field, name, &mut issues);
        }
    }
    if let Some(twitter) = &patch.twitter {
        check_link("twitter", twitter, &mut issues);
    }
    if let Some(linkedin) = &patch.linkedin {
        check_link("linkedin", linkedin, &mut issues);
    }
    ValidationError::new(issues).into_result()
}

//! Form rules for upload, auth and report submissions.
//!
//! Every validator returns the first failing rule; callers show its message and
//! stop before any backend call is made.

use thiserror::Error;

pub(crate) const MIN_SEMESTER: u8 = 1;
pub(crate) const MAX_SEMESTER: u8 = 8;
pub(crate) const MAX_SUBJECT_CHARS: usize = 100;
pub(crate) const MAX_TOPIC_CHARS: usize = 200;
pub(crate) const MAX_TAGS_RAW_CHARS: usize = 500;
pub(crate) const MAX_TAGS: usize = 10;
pub(crate) const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub(crate) const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub(crate) const MIN_REASON_CHARS: usize = 10;
pub(crate) const MAX_REASON_CHARS: usize = 1000;

pub(crate) const MAX_EMAIL_CHARS: usize = 255;
pub(crate) const MIN_PASSWORD_CHARS: usize = 6;
pub(crate) const MAX_PASSWORD_CHARS: usize = 72;
pub(crate) const MAX_FULL_NAME_CHARS: usize = 100;
pub(crate) const MAX_UNIVERSITY_CHARS: usize = 200;
pub(crate) const MAX_COURSE_CHARS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Semester must be a whole number")]
    SemesterNotANumber,
    #[error("Semester must be at least 1")]
    SemesterTooLow,
    #[error("Semester cannot exceed 8")]
    SemesterTooHigh,
    #[error("Subject is required")]
    SubjectRequired,
    #[error("Subject must be less than 100 characters")]
    SubjectTooLong,
    #[error("Topic is required")]
    TopicRequired,
    #[error("Topic must be less than 200 characters")]
    TopicTooLong,
    #[error("Tags must be less than 500 characters")]
    TagsTooLong,
    #[error("File size must be less than 10MB")]
    FileTooLarge,
    #[error("File must be a PDF or image (JPG, PNG, GIF, WEBP)")]
    FileTypeNotAllowed,

    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Email must be less than 255 characters")]
    EmailTooLong,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Password must be less than 72 characters")]
    PasswordTooLong,
    #[error("Full name is required")]
    FullNameRequired,
    #[error("Full name must be less than 100 characters")]
    FullNameTooLong,
    #[error("University name must be less than 200 characters")]
    UniversityTooLong,
    #[error("Course name must be less than 100 characters")]
    CourseTooLong,

    #[error("Please provide a reason")]
    ReasonRequired,
    #[error("Reason must be at least 10 characters")]
    ReasonTooShort,
    #[error("Reason must be less than 1000 characters")]
    ReasonTooLong,
}

pub(crate) type ValidationResult<T> = Result<T, ValidationError>;

/// File picked in the upload form. `bytes` is filled once the browser has read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PickedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Extension used for the storage key; falls back to the MIME subtype.
    pub fn extension(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
            _ => self
                .mime
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("bin")
                .to_string(),
        }
    }
}

/// Raw upload form state, exactly as typed.
#[derive(Clone, Debug, Default)]
pub(crate) struct UploadDraft {
    pub semester: String,
    pub subject: String,
    pub topic: String,
    pub tags: String,
    pub file: Option<PickedFile>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ValidUpload {
    pub semester: u8,
    pub subject: String,
    pub topic: String,
    pub tags: Vec<String>,
    pub file: PickedFile,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Comma-separated tags: trimmed, empties dropped, at most ten kept.
pub(crate) fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

pub(crate) fn validate_semester(semester: i64) -> ValidationResult<u8> {
    if semester < i64::from(MIN_SEMESTER) {
        return Err(ValidationError::SemesterTooLow);
    }
    if semester > i64::from(MAX_SEMESTER) {
        return Err(ValidationError::SemesterTooHigh);
    }
    Ok(semester as u8)
}

pub(crate) fn validate_file(file: &PickedFile) -> ValidationResult<()> {
    if file.size > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    if !ALLOWED_MIME_TYPES.contains(&file.mime.as_str()) {
        return Err(ValidationError::FileTypeNotAllowed);
    }
    Ok(())
}

fn required_trimmed(
    value: &str,
    max: usize,
    empty: ValidationError,
    too_long: ValidationError,
) -> ValidationResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(empty);
    }
    if char_len(v) > max {
        return Err(too_long);
    }
    Ok(v.to_string())
}

pub(crate) fn validate_upload(draft: &UploadDraft) -> ValidationResult<ValidUpload> {
    let Some(file) = draft.file.as_ref() else {
        return Err(ValidationError::MissingFields);
    };
    if draft.semester.trim().is_empty()
        || draft.subject.trim().is_empty()
        || draft.topic.trim().is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let semester = draft
        .semester
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::SemesterNotANumber)
        .and_then(validate_semester)?;

    let subject = required_trimmed(
        &draft.subject,
        MAX_SUBJECT_CHARS,
        ValidationError::SubjectRequired,
        ValidationError::SubjectTooLong,
    )?;
    let topic = required_trimmed(
        &draft.topic,
        MAX_TOPIC_CHARS,
        ValidationError::TopicRequired,
        ValidationError::TopicTooLong,
    )?;

    if char_len(&draft.tags) > MAX_TAGS_RAW_CHARS {
        return Err(ValidationError::TagsTooLong);
    }
    let tags = parse_tags(&draft.tags);

    validate_file(file)?;

    Ok(ValidUpload {
        semester,
        subject,
        topic,
        tags,
        file: file.clone(),
    })
}

#[derive(Clone, Debug, Default)]
pub(crate) struct AuthDraft {
    pub email: String,
    pub password: String,
    /// `Some` only on the sign-up tab.
    pub full_name: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ValidAuth {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || s.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}

fn optional_trimmed(
    value: Option<&String>,
    max: usize,
    too_long: ValidationError,
) -> ValidationResult<Option<String>> {
    match value.map(|v| v.trim()) {
        None => Ok(None),
        Some(v) if char_len(v) > max => Err(too_long),
        Some("") => Ok(None),
        Some(v) => Ok(Some(v.to_string())),
    }
}

pub(crate) fn validate_auth(draft: &AuthDraft) -> ValidationResult<ValidAuth> {
    let email = draft.email.trim();
    if !looks_like_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if char_len(email) > MAX_EMAIL_CHARS {
        return Err(ValidationError::EmailTooLong);
    }

    let pw_len = char_len(&draft.password);
    if pw_len < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if pw_len > MAX_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooLong);
    }

    let full_name = match draft.full_name.as_ref() {
        None => None,
        Some(name) => Some(required_trimmed(
            name,
            MAX_FULL_NAME_CHARS,
            ValidationError::FullNameRequired,
            ValidationError::FullNameTooLong,
        )?),
    };

    Ok(ValidAuth {
        email: email.to_string(),
        password: draft.password.clone(),
        full_name,
        university: optional_trimmed(
            draft.university.as_ref(),
            MAX_UNIVERSITY_CHARS,
            ValidationError::UniversityTooLong,
        )?,
        course: optional_trimmed(
            draft.course.as_ref(),
            MAX_COURSE_CHARS,
            ValidationError::CourseTooLong,
        )?,
    })
}

pub(crate) fn validate_report_reason(reason: &str) -> ValidationResult<String> {
    let r = reason.trim();
    if r.is_empty() {
        return Err(ValidationError::ReasonRequired);
    }
    let n = char_len(r);
    if n < MIN_REASON_CHARS {
        return Err(ValidationError::ReasonTooShort);
    }
    if n > MAX_REASON_CHARS {
        return Err(ValidationError::ReasonTooLong);
    }
    Ok(r.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(size: u64) -> PickedFile {
        PickedFile {
            name: "notes.pdf".to_string(),
            mime: "application/pdf".to_string(),
            size,
            bytes: vec![],
        }
    }

    fn draft() -> UploadDraft {
        UploadDraft {
            semester: "3".to_string(),
            subject: "  Data Structures ".to_string(),
            topic: "Binary Search Trees".to_string(),
            tags: "bst, trees".to_string(),
            file: Some(pdf(1024)),
        }
    }

    #[test]
    fn tags_are_trimmed_empties_dropped_and_capped() {
        let tags = parse_tags("a, b,,c ,d,e,f,g,h,i,j,k");
        assert_eq!(tags.len(), 10);
        assert_eq!(tags.first().map(String::as_str), Some("a"));
        assert_eq!(tags.last().map(String::as_str), Some("j"));
        assert!(!tags.iter().any(|t| t == "k"));
    }

    #[test]
    fn tag_parsing_is_idempotent() {
        let once = parse_tags(" x ,y,, z");
        let twice = parse_tags(&once.join(","));
        assert_eq!(once, twice);
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn valid_upload_is_normalised() {
        let v = validate_upload(&draft()).expect("draft should be valid");
        assert_eq!(v.semester, 3);
        assert_eq!(v.subject, "Data Structures");
        assert_eq!(v.tags, vec!["bst".to_string(), "trees".to_string()]);
    }

    #[test]
    fn semester_bounds() {
        for (raw, err) in [
            ("0", ValidationError::SemesterTooLow),
            ("9", ValidationError::SemesterTooHigh),
            ("-2", ValidationError::SemesterTooLow),
            ("3.5", ValidationError::SemesterNotANumber),
            ("3abc", ValidationError::SemesterNotANumber),
        ] {
            let d = UploadDraft {
                semester: raw.to_string(),
                ..draft()
            };
            assert_eq!(validate_upload(&d).unwrap_err(), err, "semester {raw}");
        }
        let d = UploadDraft {
            semester: "8".to_string(),
            ..draft()
        };
        assert!(validate_upload(&d).is_ok());
    }

    #[test]
    fn subject_and_topic_lengths() {
        let d = UploadDraft {
            subject: "s".repeat(101),
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::SubjectTooLong);

        let d = UploadDraft {
            topic: "t".repeat(201),
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::TopicTooLong);

        let d = UploadDraft {
            topic: "   ".to_string(),
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::MissingFields);
    }

    #[test]
    fn raw_tags_over_limit_rejected_before_parsing() {
        let d = UploadDraft {
            tags: ",".repeat(501),
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::TagsTooLong);
    }

    #[test]
    fn file_size_and_type() {
        let d = UploadDraft {
            file: Some(pdf(MAX_FILE_BYTES + 1)),
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::FileTooLarge);

        let d = UploadDraft {
            file: Some(pdf(MAX_FILE_BYTES)),
            ..draft()
        };
        assert!(validate_upload(&d).is_ok());

        let zip = PickedFile {
            name: "a.zip".to_string(),
            mime: "application/zip".to_string(),
            size: 10,
            bytes: vec![],
        };
        assert_eq!(validate_file(&zip).unwrap_err(), ValidationError::FileTypeNotAllowed);
    }

    #[test]
    fn missing_file_blocks() {
        let d = UploadDraft {
            file: None,
            ..draft()
        };
        assert_eq!(validate_upload(&d).unwrap_err(), ValidationError::MissingFields);
    }

    #[test]
    fn extension_falls_back_to_mime() {
        assert_eq!(pdf(1).extension(), "pdf");
        let f = PickedFile {
            name: "scan".to_string(),
            mime: "image/webp".to_string(),
            ..Default::default()
        };
        assert_eq!(f.extension(), "webp");
        let f = PickedFile {
            name: "Photo.JPG".to_string(),
            mime: "image/jpeg".to_string(),
            ..Default::default()
        };
        assert_eq!(f.extension(), "jpg");
    }

    #[test]
    fn auth_rules() {
        let ok = AuthDraft {
            email: " a@b.co ".to_string(),
            password: "secret1".to_string(),
            ..Default::default()
        };
        let v = validate_auth(&ok).expect("valid sign-in");
        assert_eq!(v.email, "a@b.co");
        assert!(v.full_name.is_none());

        let bad = AuthDraft {
            email: "nope".to_string(),
            ..ok.clone()
        };
        assert_eq!(validate_auth(&bad).unwrap_err(), ValidationError::InvalidEmail);

        let short = AuthDraft {
            password: "12345".to_string(),
            ..ok.clone()
        };
        assert_eq!(validate_auth(&short).unwrap_err(), ValidationError::PasswordTooShort);

        let long = AuthDraft {
            password: "p".repeat(73),
            ..ok.clone()
        };
        assert_eq!(validate_auth(&long).unwrap_err(), ValidationError::PasswordTooLong);

        let nameless = AuthDraft {
            full_name: Some("  ".to_string()),
            ..ok.clone()
        };
        assert_eq!(validate_auth(&nameless).unwrap_err(), ValidationError::FullNameRequired);

        let signup = AuthDraft {
            full_name: Some(" Asha ".to_string()),
            university: Some(" ".to_string()),
            course: Some("B.Tech".to_string()),
            ..ok
        };
        let v = validate_auth(&signup).expect("valid sign-up");
        assert_eq!(v.full_name.as_deref(), Some("Asha"));
        assert!(v.university.is_none());
        assert_eq!(v.course.as_deref(), Some("B.Tech"));
    }

    #[test]
    fn report_reason_bounds() {
        assert_eq!(validate_report_reason("   ").unwrap_err(), ValidationError::ReasonRequired);
        assert_eq!(validate_report_reason("too short").unwrap_err(), ValidationError::ReasonTooShort);
        assert_eq!(
            validate_report_reason(&"r".repeat(1001)).unwrap_err(),
            ValidationError::ReasonTooLong
        );
        assert_eq!(
            validate_report_reason("  copied from a textbook  ").as_deref(),
            Ok("copied from a textbook")
        );
    }
}

use once_cell::sync::Lazy;
/// Input validation for Nexus query arguments
/// Rejects malformed coordinates before any request leaves the server
use regex::Regex;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: String,
    },
    TooLong {
        field: String,
        max_length: usize,
        actual: usize,
    },
    InvalidFormat {
        field: String,
        expected: String,
        got: String,
    },
    Suspicious {
        field: String,
        reason: String,
    },
}

impl ValidationError {
    /// Name of the argument that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Empty { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Suspicious { field, .. } => field,
        }
    }

    /// Failure reason without the rejected value, for audit events.
    pub fn reason(&self) -> String {
        match self {
            ValidationError::Empty { .. } => "empty".to_string(),
            ValidationError::TooLong {
                max_length, actual, ..
            } => format!("{} characters (max: {})", actual, max_length),
            ValidationError::InvalidFormat { expected, .. } => format!("expected {}", expected),
            ValidationError::Suspicious { reason, .. } => reason.clone(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Empty { field } => {
                write!(f, "Field '{}' cannot be empty", field)
            }
            ValidationError::TooLong {
                field,
                max_length,
                actual,
            } => {
                write!(
                    f,
                    "Field '{}' too long: {} characters (max: {})",
                    field, actual, max_length
                )
            }
            ValidationError::InvalidFormat {
                field,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Field '{}' has invalid format. Expected: {}, got: '{}'",
                    field, expected, got
                )
            }
            ValidationError::Suspicious { field, reason } => {
                write!(f, "Field '{}' is suspicious: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum lengths for various input types
const MAX_REPOSITORY_LEN: usize = 200;
const MAX_COORDINATE_LEN: usize = 255;
const MAX_VERSION_LEN: usize = 128;
const MAX_IMAGE_NAME_LEN: usize = 255;
const MAX_CURSOR_LEN: usize = 1024;

/// Regex patterns for validation
static REPOSITORY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_\-\.]*$").unwrap());

static MAVEN_COORDINATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9_\-\.]*$").unwrap());

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_\-\.\+]*$").unwrap());

/// PEP 508 project names
static PYTHON_PACKAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9_\-\.]*[a-zA-Z0-9])$").unwrap()
});

/// Docker repository paths: lowercase components separated by `/`
static IMAGE_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+([._\-][a-z0-9]+)*(/[a-z0-9]+([._\-][a-z0-9]+)*)*$").unwrap()
});

static CURSOR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+$").unwrap());

fn check_basic(field: &str, value: &str, max_length: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }

    if value.len() > max_length {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length,
            actual: value.len(),
        });
    }

    if value.chars().any(char::is_control) {
        return Err(ValidationError::Suspicious {
            field: field.to_string(),
            reason: "contains control characters".to_string(),
        });
    }

    if value.contains("..") {
        return Err(ValidationError::Suspicious {
            field: field.to_string(),
            reason: "contains '..'".to_string(),
        });
    }

    Ok(())
}

fn check_pattern(
    field: &str,
    value: &str,
    pattern: &Regex,
    expected: &str,
) -> Result<(), ValidationError> {
    if !pattern.is_match(value) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: expected.to_string(),
            got: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a Nexus repository name (e.g. `maven-releases`, `pypi-proxy`)
pub fn validate_repository_name(name: &str) -> Result<(), ValidationError> {
    check_basic("repository", name, MAX_REPOSITORY_LEN)?;
    check_pattern(
        "repository",
        name,
        &REPOSITORY_PATTERN,
        "alphanumeric, underscore, hyphen, dot only",
    )
}

/// Validate a Maven groupId or artifactId
///
/// `field` names the argument in the error (`group_id`, `artifact_id`).
pub fn validate_maven_coordinate(field: &str, value: &str) -> Result<(), ValidationError> {
    check_basic(field, value, MAX_COORDINATE_LEN)?;
    check_pattern(
        field,
        value,
        &MAVEN_COORDINATE_PATTERN,
        "alphanumeric, underscore, hyphen, dot only",
    )?;

    if value.ends_with('.') {
        return Err(ValidationError::Suspicious {
            field: field.to_string(),
            reason: "cannot end with dot".to_string(),
        });
    }

    Ok(())
}

/// Validate a version string
pub fn validate_version(version: &str) -> Result<(), ValidationError> {
    check_basic("version", version, MAX_VERSION_LEN)?;
    check_pattern(
        "version",
        version,
        &VERSION_PATTERN,
        "alphanumeric, underscore, hyphen, dot, plus only",
    )
}

/// Validate a Python project name
pub fn validate_python_package_name(name: &str) -> Result<(), ValidationError> {
    check_basic("package_name", name, MAX_COORDINATE_LEN)?;
    check_pattern(
        "package_name",
        name,
        &PYTHON_PACKAGE_PATTERN,
        "PEP 508 project name",
    )
}

/// Validate a Docker image name (e.g. `library/nginx`)
pub fn validate_image_name(name: &str) -> Result<(), ValidationError> {
    check_basic("image_name", name, MAX_IMAGE_NAME_LEN)?;
    check_pattern(
        "image_name",
        name,
        &IMAGE_NAME_PATTERN,
        "lowercase path components separated by '/'",
    )
}

/// Validate the shape of a continuation token; its content is checked by
/// the pagination engine.
pub fn validate_continuation_token(token: &str) -> Result<(), ValidationError> {
    if token.len() > MAX_CURSOR_LEN {
        return Err(ValidationError::TooLong {
            field: "continuation_token".to_string(),
            max_length: MAX_CURSOR_LEN,
            actual: token.len(),
        });
    }
    if !token.is_empty() && !CURSOR_PATTERN.is_match(token) {
        return Err(ValidationError::InvalidFormat {
            field: "continuation_token".to_string(),
            expected: "token returned by a previous call".to_string(),
            got: token.chars().take(32).collect(),
        });
    }
    Ok(())
}

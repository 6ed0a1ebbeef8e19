//! Constants shared across the letter core.

/// Number of steps in the letter wizard.
pub const STEP_COUNT: u8 = 7;

/// Title printed at the top of every rendered letter.
pub const LETTER_TITLE: &str = "Letter of Medical Necessity";

/// Salutation used when the insurance contact name is blank.
pub const SALUTATION_FALLBACK: &str = "Sir/Madam";

/// Fixed closing paragraph.
pub const CLOSING_MESSAGE: &str = "If you require any additional information, please don't hesitate to contact my office. Thank you for your prompt attention to this matter.";

/// Sign-off line preceding the signature block.
pub const SIGN_OFF: &str = "Sincerely,";

/// Where the profile banner sends users to complete their profile.
pub const PROFILE_SETUP_PATH: &str = "/profile/setup";

/// Default REST backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";

/// Fixed outbound request timeout for the REST backend.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default directory for exported letters.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Idle time after which a REST wizard session is discarded.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

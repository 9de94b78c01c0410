//! Shared HTTP constants (headers, cookies, problem URIs, page sizes).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const SESSION_COOKIE: &str = "RECIPIO_SESSION";
pub(crate) const LOGIN_PATH: &str = "/login";

pub(crate) const PROBLEM_INTERNAL: &str = "https://recipio.dev/problems/internal";
pub(crate) const PROBLEM_UNAUTHORIZED: &str = "https://recipio.dev/problems/unauthorized";
pub(crate) const PROBLEM_INVALID_CREDENTIALS: &str =
    "https://recipio.dev/problems/invalid-credentials";
pub(crate) const PROBLEM_EMAIL_UNCONFIRMED: &str = "https://recipio.dev/problems/email-unconfirmed";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://recipio.dev/problems/bad-request";
pub(crate) const PROBLEM_REGISTRATION_REJECTED: &str =
    "https://recipio.dev/problems/registration-rejected";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://recipio.dev/problems/not-found";
pub(crate) const PROBLEM_SERVICE_UNAVAILABLE: &str =
    "https://recipio.dev/problems/service-unavailable";

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 24;
pub(crate) const MAX_PAGE_SIZE: u32 = 100;
pub(crate) const FEATURED_RECIPES: u32 = 6;
pub(crate) const FEATURED_CATEGORIES: usize = 6;

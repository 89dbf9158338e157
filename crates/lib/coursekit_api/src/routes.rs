//! Route paths.

pub const GET_HEALTHZ: &str = "/healthz";

pub const POST_AUTH_REGISTER: &str = "/auth/register";
pub const POST_AUTH_LOGIN: &str = "/auth/login";
pub const POST_AUTH_REFRESH: &str = "/auth/refresh";
pub const POST_AUTH_LOGOUT: &str = "/auth/logout";
pub const GET_AUTH_ME: &str = "/auth/me";

/// `GET` list, `POST` create.
pub const USERS: &str = "/api/users";
/// `GET`, `PATCH`, `DELETE` a single account.
pub const USER_BY_ID: &str = "/api/users/{id}";

/// Path the refresh cookie is scoped to.
pub const AUTH_COOKIE_PATH: &str = "/auth";

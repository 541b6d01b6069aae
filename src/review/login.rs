//! Identity string normalisation to canonical reviewer logins.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ReviewError;

#[expect(clippy::expect_used, reason = "pattern is a fixed literal")]
static PARENTHESISED_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(@([\w-]+)\)").expect("parenthesised handle pattern compiles"));

#[expect(clippy::expect_used, reason = "pattern is a fixed literal")]
static LOGIN_WITH_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+)\s*<[^<>]*>$").expect("login with email pattern compiles"));

#[expect(clippy::expect_used, reason = "pattern is a fixed literal")]
static BARE_LOGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("bare login pattern compiles"));

/// Canonical lowercase reviewer handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Login(String);

impl Login {
    /// Normalises an identity string into a login.
    ///
    /// Recognised shapes, tried in order of specificity:
    ///
    /// 1. a parenthesised `(@handle)` anywhere in the string,
    /// 2. a leading bare handle followed by an angle-bracketed email,
    /// 3. a bare handle with no decoration.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidIdentity`] for any other shape. Guessing
    /// at a malformed identity would risk crediting a sign-off to the wrong
    /// person, so unrecognised input is rejected outright.
    pub fn parse(identity: &str) -> Result<Self, ReviewError> {
        let trimmed = identity.trim();

        let handle = PARENTHESISED_HANDLE
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .or_else(|| {
                LOGIN_WITH_EMAIL
                    .captures(trimmed)
                    .and_then(|captures| captures.get(1))
            })
            .map(|capture| capture.as_str());

        match handle {
            Some(token) => Ok(Self::from_handle(token)),
            None if BARE_LOGIN.is_match(trimmed) => Ok(Self::from_handle(trimmed)),
            None => Err(ReviewError::InvalidIdentity {
                identity: identity.to_owned(),
            }),
        }
    }

    /// Wraps a handle that is already bare, such as a login returned by the
    /// hosting service, lowercasing it for comparison.
    #[must_use]
    pub fn from_handle(handle: &str) -> Self {
        Self(handle.trim().to_lowercase())
    }

    /// Borrow the login value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Review rules binding reviewer lists to the files they guard.

use std::collections::BTreeSet;

use super::error::ReviewError;
use super::glob;
use super::login::Login;

/// Named review requirement produced by a provider.
///
/// A rule applies when its glob matches a changed file and is satisfied once
/// `required` of its listed logins have signed off. Rules are validated on
/// construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRule {
    name: String,
    logins: Vec<Login>,
    glob: Option<String>,
    required: usize,
}

impl ReviewRule {
    /// Builds a rule from raw identity strings.
    ///
    /// Identities are normalised to logins, preserving first-seen order and
    /// dropping duplicates. A missing glob means the rule guards every file.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidIdentity`] when an identity cannot be
    /// normalised, [`ReviewError::InvalidGlob`] when the pattern does not
    /// compile, and [`ReviewError::UnsatisfiableRule`] when `required`
    /// exceeds the number of distinct logins, which would gate the rule
    /// forever.
    pub fn new<I, S>(
        name: impl Into<String>,
        identities: I,
        glob: Option<String>,
        required: usize,
    ) -> Result<Self, ReviewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();

        let mut logins: Vec<Login> = Vec::new();
        for identity in identities {
            let login = Login::parse(identity.as_ref())?;
            if !logins.contains(&login) {
                logins.push(login);
            }
        }

        if let Some(pattern) = glob.as_deref() {
            glob::build_matcher(pattern).map_err(|error| ReviewError::InvalidGlob {
                rule: name.clone(),
                pattern: pattern.to_owned(),
                message: error.to_string(),
            })?;
        }

        if required > logins.len() {
            return Err(ReviewError::UnsatisfiableRule {
                rule: name,
                required,
                available: logins.len(),
            });
        }

        Ok(Self {
            name,
            logins,
            glob,
            required,
        })
    }

    /// Rule name as written in the backing source.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Logins allowed to satisfy the rule, in source order.
    #[must_use]
    pub fn logins(&self) -> &[Login] {
        &self.logins
    }

    /// Glob pattern guarding the rule, when present.
    #[must_use]
    pub fn glob(&self) -> Option<&str> {
        self.glob.as_deref()
    }

    /// Distinct sign-offs the rule demands.
    #[must_use]
    pub const fn required(&self) -> usize {
        self.required
    }

    /// Reports whether the rule applies to the changed-file set.
    ///
    /// An empty file set applies to no rule. A rule without a glob applies to
    /// any non-empty file set.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidGlob`] when the pattern fails to
    /// compile.
    pub fn applies_to<S: AsRef<str>>(&self, files: &[S]) -> Result<bool, ReviewError> {
        if files.is_empty() {
            return Ok(false);
        }
        let Some(pattern) = self.glob.as_deref() else {
            return Ok(true);
        };
        glob::is_match(files, pattern).map_err(|error| ReviewError::InvalidGlob {
            rule: self.name.clone(),
            pattern: pattern.to_owned(),
            message: error.to_string(),
        })
    }

    /// Counts sign-offs from logins the rule lists.
    #[must_use]
    pub fn approvals(&self, sign_offs: &BTreeSet<Login>) -> usize {
        self.logins
            .iter()
            .filter(|login| sign_offs.contains(login))
            .count()
    }

    /// Sign-offs still needed before the rule is satisfied.
    #[must_use]
    pub fn missing_count(&self, sign_offs: &BTreeSet<Login>) -> usize {
        self.required.saturating_sub(self.approvals(sign_offs))
    }

    /// Reports whether enough listed logins have signed off.
    #[must_use]
    pub fn is_satisfied_by(&self, sign_offs: &BTreeSet<Login>) -> bool {
        self.missing_count(sign_offs) == 0
    }

    /// Listed logins that have not signed off, in source order.
    #[must_use]
    pub fn outstanding(&self, sign_offs: &BTreeSet<Login>) -> Vec<Login> {
        self.logins
            .iter()
            .filter(|login| !sign_offs.contains(login))
            .cloned()
            .collect()
    }
}

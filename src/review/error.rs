//! Error types surfaced while loading rules or evaluating a pull request.

use thiserror::Error;

use crate::github::GithubError;

/// Errors raised by review rule providers and the review evaluator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// GitHub access failed.
    #[error(transparent)]
    Github(#[from] GithubError),

    /// The provider configuration is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the inconsistency.
        message: String,
    },

    /// Configuration enabled a provider the registry does not know.
    #[error("unknown review provider: {name}")]
    UnknownProvider {
        /// Provider name as written in the configuration.
        name: String,
    },

    /// A provider could not parse its backing document.
    #[error("provider {provider} failed to read {path}: {message}")]
    Provider {
        /// Provider that reported the failure.
        provider: String,
        /// Repository path of the offending document.
        path: String,
        /// Parse or validation detail.
        message: String,
    },

    /// An identity string matched none of the recognised shapes.
    #[error("cannot extract a login from identity {identity:?}")]
    InvalidIdentity {
        /// Raw identity string as written in the rule source.
        identity: String,
    },

    /// A rule carries a glob pattern that does not compile.
    #[error("invalid glob {pattern:?} in rule {rule:?}: {message}")]
    InvalidGlob {
        /// Rule the pattern belongs to.
        rule: String,
        /// Offending glob pattern.
        pattern: String,
        /// Compiler failure detail.
        message: String,
    },

    /// A rule demands more sign-offs than it lists reviewers.
    #[error("rule {rule:?} requires {required} sign-offs but lists only {available} reviewers")]
    UnsatisfiableRule {
        /// Rule that can never be satisfied.
        rule: String,
        /// Sign-offs the rule demands.
        required: usize,
        /// Reviewers the rule lists.
        available: usize,
    },
}

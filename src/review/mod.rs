//! Review evaluation core: rules, sign-offs, and the pass/fail decision.
//!
//! The core is deliberately stateless. Each evaluation re-reads the pull
//! request from GitHub, loads rules from the configured providers, matches
//! rule globs against the changed files, counts sign-offs per rule, and
//! reports the verdict as a commit status. Idempotence falls out of
//! re-fetching truth rather than remembering it.

pub mod comments;
pub mod error;
pub mod glob;
pub mod login;
pub mod provider;
pub mod reviewer;
pub mod rule;

pub use error::ReviewError;
pub use login::Login;
pub use provider::{
    MaintainersFileProvider, ProviderOptions, ProviderSetting, ReviewProvider, RulesFileProvider,
    build_providers,
};
pub use reviewer::{ReviewOutcome, Reviewer, RuleDecision, STATUS_CONTEXT, StatusUpdate};
pub use rule::ReviewRule;

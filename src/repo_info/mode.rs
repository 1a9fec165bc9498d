//! Revision modes and the base/target pair derived from an expression.

/// Separator between the base and target of a range expression.
pub const RANGE_SEPARATOR: &str = "..";

/// Reference substituted for the `@` shorthand and for empty range sides.
pub const CURRENT_CHECKOUT: &str = "HEAD";

/// How a request for repository state is served.
///
/// A non-empty expression selects one of the explicit modes. An empty
/// expression starts at [`RevisionMode::Staged`]; the resolver then steps
/// `Staged` → `Unstaged` → `FallbackToHead` → `ExplicitSingle("HEAD")` while
/// each stage finds nothing to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionMode {
    /// `base..target` was given.
    ExplicitRange {
        /// Expression for the older side.
        base: String,
        /// Expression for the newer side.
        target: String,
    },
    /// A single revision was given; it is compared with its first parent.
    ExplicitSingle {
        /// Expression for the revision.
        target: String,
    },
    /// Describe changes staged in the index.
    Staged,
    /// Describe changes in the working tree that are not staged.
    Unstaged,
    /// Nothing is staged or modified: describe the last commit.
    FallbackToHead,
}

impl RevisionMode {
    /// Selects the mode for a user-supplied expression.
    ///
    /// `@` is replaced by `HEAD` everywhere, and a range is split on the
    /// first `..`. An empty side of a range stands for `HEAD`.
    #[must_use]
    pub fn from_expression(expression: &str) -> Self {
        if expression.is_empty() {
            return Self::Staged;
        }
        let expression = expression.replace('@', CURRENT_CHECKOUT);
        match expression.split_once(RANGE_SEPARATOR) {
            Some((base, target)) => Self::ExplicitRange {
                base: or_current_checkout(base),
                target: or_current_checkout(target),
            },
            None => Self::ExplicitSingle { target: expression },
        }
    }
}

/// Two revision expressions to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    /// Older side of the comparison.
    pub base: String,
    /// Newer side of the comparison.
    pub target: String,
}

impl RevisionPair {
    /// Pairs `target` with its immediate parent.
    #[must_use]
    pub fn single(target: &str) -> Self {
        Self { base: format!("{target}~"), target: target.to_string() }
    }
}

fn or_current_checkout(side: &str) -> String {
    if side.is_empty() {
        CURRENT_CHECKOUT.to_string()
    } else {
        side.to_string()
    }
}

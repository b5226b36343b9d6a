use crate::runner::Outcome;
use sdk_smoke_core::{CheckFailure, HarnessError};
use std::fmt;

/// Soft checks recorded by one scenario.
///
/// A failed check does not stop the scenario; every failure is kept and
/// [`into_result`](Self::into_result) fails the scenario if there was any.
///
/// ```
/// use sdk_smoke::CheckReport;
///
/// let offers = vec![3u64, 0];
/// let mut report = CheckReport::new();
/// report.check_non_empty("offers", &offers);
/// for (i, amount) in offers.iter().enumerate() {
///     report.check(format!("offer {i} amount"), *amount > 0, "receive amount is zero");
/// }
/// assert_eq!(report.passed(), 2);
/// assert_eq!(report.failures().len(), 1);
/// assert!(report.into_result::<std::io::Error>().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    passed: usize,
    failures: Vec<CheckFailure>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a check. `detail` describes what was observed when `ok` is false.
    pub fn check(&mut self, name: impl Into<String>, ok: bool, detail: impl fmt::Display) -> bool {
        if ok {
            self.passed += 1;
        } else {
            self.failures.push(CheckFailure {
                name: name.into(),
                detail: detail.to_string(),
            });
        }
        ok
    }

    /// Checks that `actual == expected`.
    pub fn check_eq<T>(&mut self, name: impl Into<String>, actual: &T, expected: &T) -> bool
    where
        T: PartialEq + fmt::Debug + ?Sized,
    {
        let ok = actual == expected;
        self.check(
            name,
            ok,
            format_args!("expected {expected:?}, got {actual:?}"),
        )
    }

    /// Checks that `items` is not empty.
    pub fn check_non_empty<T>(&mut self, name: impl Into<String>, items: &[T]) -> bool {
        self.check(name, !items.is_empty(), "is empty")
    }

    /// Checks that `value` is present and returns it.
    pub fn check_some<'a, T>(&mut self, name: impl Into<String>, value: &'a Option<T>) -> Option<&'a T> {
        self.check(name, value.is_some(), "is missing");
        value.as_ref()
    }

    /// Number of checks that held.
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Checks that failed, in recording order.
    pub fn failures(&self) -> &[CheckFailure] {
        &self.failures
    }

    /// Returns `true` if no check failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` if every check held, otherwise an assertion error listing all failures.
    pub fn into_result<E>(self) -> Result<(), HarnessError<E>> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(HarnessError::Assertion {
                failures: self.failures,
            })
        }
    }
}

/// Tally of scenario outcomes over a suite run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    passed: Vec<String>,
    failed: Vec<(String, String)>,
    skipped: Vec<(String, String)>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of scenario `name`.
    pub fn record<E: fmt::Display>(&mut self, name: impl Into<String>, outcome: &Outcome<E>) {
        let name = name.into();
        match outcome {
            Outcome::Passed => self.passed.push(name),
            Outcome::Failed { error } => self.failed.push((name, error.to_string())),
            Outcome::Skipped { reason } => self.skipped.push((name, reason.clone())),
        }
    }

    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    /// Failed scenarios with their error messages.
    pub fn failed(&self) -> &[(String, String)] {
        &self.failed
    }

    /// Skipped scenarios with their skip reasons.
    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }

    /// A run succeeds when nothing failed. Skips do not count against it.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed.len(),
            self.failed.len(),
            self.skipped.len()
        )?;
        for (name, error) in &self.failed {
            write!(f, "\n  FAILED {name}: {error}")?;
        }
        for (name, reason) in &self.skipped {
            write!(f, "\n  SKIPPED {name}: {reason}")?;
        }
        Ok(())
    }
}

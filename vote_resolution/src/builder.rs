pub use crate::config::*;

/// A builder for adding votes one at a time.
///
/// ```
/// pub use vote_resolution::builder::Builder;
/// pub use vote_resolution::AuditRules;
/// # use vote_resolution::AuditErrors;
///
/// let mut builder = Builder::new(&AuditRules::DEFAULT_RULES)?;
///
/// builder.add_vote("Anna", Some(1_600_000_000), Some("192.168.0.7"))?;
/// builder.add_vote("Ana", None, None)?;
/// assert!(builder.add_vote(" ", None, None).is_err());
///
/// let outcome = builder.run()?;
/// assert_eq!(outcome.ranking, vec![("Anna".to_string(), 2)]);
///
/// # Ok::<(), AuditErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AuditRules,
    pub(crate) _records: Vec<VoteRecord>,
}

impl Builder {
    pub fn new(rules: &AuditRules) -> Result<Builder, AuditErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _records: Vec::new(),
        })
    }

    /// Adds a vote.
    ///
    /// The name is trimmed. Votes with an empty name are rejected.
    pub fn add_vote(
        &mut self,
        name: &str,
        timestamp: Option<i64>,
        ip: Option<&str>,
    ) -> Result<(), AuditErrors> {
        self.add_record(&VoteRecord::new(name.trim(), timestamp, ip))
    }

    pub fn add_record(&mut self, record: &VoteRecord) -> Result<(), AuditErrors> {
        if record.raw_name.trim().is_empty() {
            return Err(AuditErrors::EmptyName);
        }
        self._records.push(record.clone());
        Ok(())
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self._records
    }

    pub fn run(&self) -> Result<AuditOutcome, AuditErrors> {
        crate::run_audit(&self._records, &self._rules)
    }
}

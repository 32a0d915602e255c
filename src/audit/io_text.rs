// Primitives for reading line-oriented vote logs.

use regex::Regex;

use crate::audit::{io_common::make_record, *};

pub struct LineParser {
    candidate: Regex,
    details: Regex,
}

impl LineParser {
    pub fn new() -> AuditResult<LineParser> {
        let candidate =
            Regex::new(r"candidate:\s*(.+)$").whatever_context("invalid candidate pattern")?;
        let details = Regex::new(r"time:\s*([^,]+),\s*ip:\s*([^,]+),\s*candidate:")
            .whatever_context("invalid details pattern")?;
        Ok(LineParser { candidate, details })
    }

    /// The vote on this line, if any.
    pub fn parse_line(&self, line: &str) -> Option<VoteRecord> {
        let name = self.candidate.captures(line)?.get(1)?.as_str();
        match self.details.captures(line) {
            Some(caps) => make_record(
                name,
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map(|m| m.as_str()),
            ),
            None => make_record(name, None, None),
        }
    }

    pub fn parse_text(&self, contents: &str) -> Vec<VoteRecord> {
        let mut res: Vec<VoteRecord> = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            match self.parse_line(line) {
                Some(r) => res.push(r),
                None => debug!("read_text: line {}: no vote in {:?}", idx + 1, line),
            }
        }
        res
    }
}

pub fn read_text_records(path: &str) -> AuditResult<Vec<VoteRecord>> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let parser = LineParser::new()?;
    Ok(parser.parse_text(&contents))
}

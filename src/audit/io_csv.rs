// Primitives for reading CSV files.

use std::io::Read;

use crate::audit::{io_common::make_record, *};

/// Reads the rows `time,ip,candidate`. A header row is skipped.
pub fn read_csv_records(path: &str) -> AuditResult<Vec<VoteRecord>> {
    let file = fs::File::open(path).context(OpeningFileSnafu { path })?;
    parse_csv(file)
}

pub fn parse_csv<R: Read>(input: R) -> AuditResult<Vec<VoteRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut res: Vec<VoteRecord> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        if lineno == 1 && line.get(0).map(|s| s.trim().eq_ignore_ascii_case("time")) == Some(true) {
            continue;
        }
        match line.get(2).and_then(|name| make_record(name, line.get(0), line.get(1))) {
            Some(r) => res.push(r),
            None => debug!("read_csv: line {}: no vote in {:?}", lineno, line),
        }
    }
    Ok(res)
}

use chrono::{DateTime, Local};
use iterdig_domain::{DnsMessage, DomainName, RecordType, ResourceRecord};
use std::fmt::Write;
use std::time::Duration;

/// Everything printed after a successful resolution.
pub struct Report<'a> {
    pub name: &'a DomainName,
    pub record_type: RecordType,
    pub response: &'a DnsMessage,
    pub elapsed: Duration,
    pub when: DateTime<Local>,
    pub dnssec: bool,
}

impl Report<'_> {
    /// dig-style text. An empty answer section shows the authority records
    /// in its place, and they are not repeated below.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "QUESTION SECTION:");
        let _ = writeln!(out, "{}\t\tIN\t{}", self.name, self.record_type);
        let _ = writeln!(out);

        let answers_empty = self.response.answers.is_empty();
        let answer_section = if answers_empty {
            &self.response.authority
        } else {
            &self.response.answers
        };
        section(&mut out, "ANSWER SECTION:", answer_section);

        if !answers_empty && !self.response.authority.is_empty() {
            section(&mut out, "AUTHORITY SECTION:", &self.response.authority);
        }
        if !self.response.additional.is_empty() {
            section(&mut out, "ADDITIONAL SECTION:", &self.response.additional);
        }

        let _ = writeln!(out, "Query time: {} msec", self.elapsed.as_millis());
        let _ = writeln!(out, "WHEN: {}", self.when.format("%a %b %e %H:%M:%S %Y"));
        if self.dnssec {
            let _ = writeln!(out, "DNSSEC: validated");
        }

        out
    }
}

fn section(out: &mut String, title: &str, records: &[ResourceRecord]) {
    let _ = writeln!(out, "{}", title);
    for record in records {
        let _ = writeln!(out, "{}", record);
    }
    let _ = writeln!(out);
}

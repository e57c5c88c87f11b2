// src/report.rs
//
// The delivered artifact: the current snapshot as an HTML table (added keys
// wrapped in the marker) followed by two summary paragraphs. Every value is
// escaped, so the result can go straight into an HTML mail body.

use crate::config::ReportOptions;
use crate::core::sanitize::escape_html;
use crate::diff::Diff;
use crate::snapshot::Snapshot;

pub fn render(current: &Snapshot, diff: &Diff, opts: &ReportOptions) -> String {
    let mut out = String::with_capacity(256 + current.len() * 64);

    out.push_str("<table border=\"1\" class=\"listing\">\n  <thead>\n    <tr>\n      <th></th>\n");
    for col in current.columns() {
        out.push_str(&format!("      <th>{}</th>\n", escape_html(col)));
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for rec in current.records() {
        let key = if diff.is_added(rec.key()) {
            join!(&opts.marker, rec.key(), &opts.marker)
        } else {
            s!(rec.key())
        };
        out.push_str("    <tr>\n");
        out.push_str(&format!("      <th>{}</th>\n", escape_html(&key)));
        for v in rec.values() {
            out.push_str(&format!("      <td>{}</td>\n", escape_html(v)));
        }
        out.push_str("    </tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");

    out.push_str(&summary_line(diff.added.len(), "new", &diff.added, &opts.noun));
    out.push_str(&summary_line(diff.removed.len(), "dropped", &diff.removed, &opts.noun));
    out
}

fn summary_line(count: usize, what: &str, keys: &[String], noun: &str) -> String {
    let noun = escape_html(noun);
    if keys.is_empty() {
        return format!("<p>There are {count} {what} {noun}(s).</p>\n");
    }
    let list = keys.iter().map(|k| escape_html(k)).collect::<Vec<_>>().join(", ");
    format!("<p>There are {count} {what} {noun}(s): {list}</p>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ListingRecord;
    use chrono::Utc;

    fn current() -> Snapshot {
        let rec = |k: &str, rent: &str| {
            ListingRecord::new(k, vec![(s!("Rent"), s!(rent)), (s!("Bedroom"), s!("2"))])
        };
        Snapshot::new(
            Utc::now(),
            vec![s!("Rent"), s!("Bedroom")],
            vec![rec("Tower 102", "$2,150"), rec("Tower 101", "<$2,100>")],
        )
        .unwrap()
    }

    #[test]
    fn marks_added_keys_and_keeps_order() {
        let diff = Diff { added: vec![s!("Tower 102")], removed: vec![s!("Annex 7"), s!("Annex 8")] };
        let html = render(&current(), &diff, &ReportOptions::default());

        let marked = html.find("<th>***Tower 102***</th>").unwrap();
        let plain = html.find("<th>Tower 101</th>").unwrap();
        assert!(marked < plain);
        assert!(!html.contains("***Tower 101***"));
        assert!(html.contains("<th>Rent</th>"));
        assert!(html.contains("<td>&lt;$2,100&gt;</td>"));
        assert!(html.contains("<p>There are 1 new listing(s): Tower 102</p>"));
        assert!(html.contains("<p>There are 2 dropped listing(s): Annex 7, Annex 8</p>"));
        assert!(html.find("</table>").unwrap() < html.find("<p>").unwrap());
    }

    #[test]
    fn no_changes_reads_naturally() {
        let html = render(&current(), &Diff::default(), &ReportOptions::default());
        assert!(html.contains("<p>There are 0 new listing(s).</p>"));
        assert!(html.contains("<p>There are 0 dropped listing(s).</p>"));
        assert!(!html.contains("***"));
    }

    #[test]
    fn custom_marker_and_noun() {
        let opts = ReportOptions { marker: s!("**"), noun: s!("house") };
        let diff = Diff { added: vec![s!("Tower 101")], removed: vec![] };
        let html = render(&current(), &diff, &opts);
        assert!(html.contains("<th>**Tower 101**</th>"));
        assert!(html.contains("There are 1 new house(s): Tower 101"));
    }
}

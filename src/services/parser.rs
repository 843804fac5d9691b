// src/services/parser.rs

//! Status-page HTML parsing.
//!
//! Extracts accepted submissions and the next-page link from a judge
//! status page. Row-level problems skip the row; a missing results table
//! fails the whole page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Submission;
use crate::utils::log;
use crate::utils::resolve_url;

/// Result of parsing one status page.
#[derive(Debug)]
pub struct StatusPage {
    /// Accepted submissions in page order (newest first)
    pub submissions: Vec<Submission>,

    /// Absolute URL of the next page, if pagination continues
    pub next_page: Option<String>,
}

/// Parser for the judge's status-table markup.
pub struct StatusParser {
    table_sel: Selector,
    row_sel: Selector,
    cell_sel: Selector,
    link_sel: Selector,
    next_page_sel: Selector,
}

impl StatusParser {
    /// Build the parser, compiling its CSS selectors.
    pub fn new() -> Result<Self> {
        Ok(Self {
            table_sel: parse_selector("table#status-table")?,
            row_sel: parse_selector("tr")?,
            cell_sel: parse_selector("td")?,
            link_sel: parse_selector("a")?,
            next_page_sel: parse_selector("a#next_page")?,
        })
    }

    /// Parse a status page document.
    ///
    /// The next-page href is resolved against `base_url`. Parsing the same
    /// document twice yields the same records in the same order.
    pub fn parse(&self, document: &Html, base_url: &Url) -> Result<StatusPage> {
        let table = document
            .select(&self.table_sel)
            .next()
            .ok_or_else(|| AppError::parse("status page", "table#status-table not found"))?;

        let mut submissions = Vec::new();
        for row in table.select(&self.row_sel) {
            let cells: Vec<ElementRef> = row.select(&self.cell_sel).collect();
            if cells.is_empty() {
                // Header row carries <th> cells only.
                continue;
            }
            if cells.len() < 6 {
                log::warn(&format!(
                    "Skipping status row with {} cells (expected a full result row)",
                    cells.len()
                ));
                continue;
            }
            match self.parse_row(&cells) {
                Some(submission) => submissions.push(submission),
                None => log::warn("Skipping status row with missing fields"),
            }
        }

        let next_page = document
            .select(&self.next_page_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_url(base_url, href));

        Ok(StatusPage {
            submissions,
            next_page,
        })
    }

    /// Extract one submission from a row's cells, or None if any field
    /// is absent.
    fn parse_row(&self, cells: &[ElementRef]) -> Option<Submission> {
        let submission_id = cell_text(cells.first()?);

        let problem_link = cells.get(2)?.select(&self.link_sel).next()?;
        let problem_id = problem_link.text().collect::<String>().trim().to_string();
        let problem_title = problem_link.value().attr("title")?.trim().to_string();

        let language = cell_text(cells.get(6)?);

        let time_link = cells.get(8)?.select(&self.link_sel).next()?;
        let submission_time = time_link.value().attr("title")?.trim().to_string();

        if submission_id.is_empty() || problem_id.is_empty() || submission_time.is_empty() {
            return None;
        }

        Some(Submission {
            submission_id,
            problem_id,
            problem_title,
            language,
            submission_time,
        })
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_PAGE: &str = r##"
        <html><body>
        <table id="status-table">
          <thead>
            <tr><th>#</th><th>User</th><th>Problem</th><th>Result</th>
                <th>Memory</th><th>Time</th><th>Language</th><th>Length</th>
                <th>Submitted</th></tr>
          </thead>
          <tbody>
            <tr>
              <td>90000001</td>
              <td><a href="/user/alice">alice</a></td>
              <td><a href="/problem/1000" title="A+B">1000</a></td>
              <td><span class="result-ac">Accepted</span></td>
              <td>2024 KB</td>
              <td>0 ms</td>
              <td><a href="/source/90000001">Rust 2021</a></td>
              <td>312 B</td>
              <td><a href="#" title="2024-01-15 21:03:44">3 days ago</a></td>
            </tr>
            <tr>
              <td>90000000</td>
              <td><a href="/user/alice">alice</a></td>
              <td><a href="/problem/2557" title="Hello World">2557</a></td>
              <td><span class="result-ac">Accepted</span></td>
              <td>2020 KB</td>
              <td>0 ms</td>
              <td><a href="/source/90000000">C++17</a></td>
              <td>90 B</td>
              <td><a href="#" title="2024-01-14 09:12:01">4 days ago</a></td>
            </tr>
          </tbody>
        </table>
        <a id="next_page" href="/status?user_id=alice&amp;result_id=4&amp;top=90000000">Next</a>
        </body></html>
    "##;

    fn base_url() -> Url {
        Url::parse("https://www.acmicpc.net/status?user_id=alice&result_id=4").unwrap()
    }

    #[test]
    fn test_parse_extracts_all_fields() {
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(STATUS_PAGE);
        let page = parser.parse(&document, &base_url()).unwrap();

        assert_eq!(page.submissions.len(), 2);
        let first = &page.submissions[0];
        assert_eq!(first.submission_id, "90000001");
        assert_eq!(first.problem_id, "1000");
        assert_eq!(first.problem_title, "A+B");
        assert_eq!(first.language, "Rust 2021");
        assert_eq!(first.submission_time, "2024-01-15 21:03:44");
    }

    #[test]
    fn test_parse_resolves_next_page_link() {
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(STATUS_PAGE);
        let page = parser.parse(&document, &base_url()).unwrap();

        assert_eq!(
            page.next_page.as_deref(),
            Some("https://www.acmicpc.net/status?user_id=alice&result_id=4&top=90000000")
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(STATUS_PAGE);
        let first = parser.parse(&document, &base_url()).unwrap();
        let second = parser.parse(&document, &base_url()).unwrap();
        assert_eq!(first.submissions, second.submissions);
        assert_eq!(first.next_page, second.next_page);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document("<html><body><p>maintenance</p></body></html>");
        assert!(parser.parse(&document, &base_url()).is_err());
    }

    #[test]
    fn test_absent_next_link_ends_pagination() {
        let html = r#"
            <table id="status-table">
              <tr><th>h</th></tr>
            </table>
        "#;
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(html);
        let page = parser.parse(&document, &base_url()).unwrap();
        assert!(page.submissions.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_bad_row_is_skipped_not_fatal() {
        let html = r##"
            <table id="status-table">
              <tr><th>h</th></tr>
              <tr><td>only</td><td>three</td><td>cells</td></tr>
              <tr>
                <td>90000002</td><td>alice</td>
                <td><a href="/problem/1000" title="A+B">1000</a></td>
                <td>ok</td><td>kb</td><td>ms</td>
                <td>Rust 2021</td><td>312 B</td>
                <td><a href="#" title="2024-01-16 08:00:00">now</a></td>
              </tr>
            </table>
        "##;
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(html);
        let page = parser.parse(&document, &base_url()).unwrap();
        assert_eq!(page.submissions.len(), 1);
        assert_eq!(page.submissions[0].submission_id, "90000002");
    }

    #[test]
    fn test_row_without_time_title_is_skipped() {
        let html = r##"
            <table id="status-table">
              <tr>
                <td>90000003</td><td>alice</td>
                <td><a href="/problem/1000" title="A+B">1000</a></td>
                <td>ok</td><td>kb</td><td>ms</td>
                <td>Rust 2021</td><td>312 B</td>
                <td><a href="#">no title attr</a></td>
              </tr>
            </table>
        "##;
        let parser = StatusParser::new().unwrap();
        let document = Html::parse_document(html);
        let page = parser.parse(&document, &base_url()).unwrap();
        assert!(page.submissions.is_empty());
    }
}

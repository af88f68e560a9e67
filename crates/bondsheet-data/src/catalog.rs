//! Discovery of workbook links on the Fair Trading listing page.
//!
//! The listing page groups its downloads into accordion panels, one per
//! dataset. Lodgements and refunds link their workbooks from a table,
//! holdings from a plain list. Monthly and quarterly workbooks share a fixed
//! asset-URL prefix; yearly roll-ups carry "year" in the URL and are
//! skipped because the monthly files already cover them.

use std::fmt;

use scraper::{Html, Selector};

/// Listing page for the rental bond data publications.
pub const DATA_LIST_URL: &str =
    "https://www.fairtrading.nsw.gov.au/about-fair-trading/rental-bond-data";

/// Asset-URL prefix shared by every workbook download.
pub const WORKBOOK_PREFIX: &str =
    "https://www.fairtrading.nsw.gov.au/__data/assets/excel_doc/";

/// The three published datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Lodgements,
    Refunds,
    Holdings,
}

impl Dataset {
    /// Every dataset, in refresh order.
    pub const ALL: [Dataset; 3] = [Dataset::Holdings, Dataset::Lodgements, Dataset::Refunds];

    /// Accordion panel that carries this dataset's links.
    pub fn panel_id(self) -> &'static str {
        match self {
            Dataset::Lodgements => "panel1",
            Dataset::Refunds => "panel2",
            Dataset::Holdings => "panel3",
        }
    }

    /// Element the workbook anchors sit in within the panel.
    fn link_container(self) -> &'static str {
        match self {
            Dataset::Lodgements | Dataset::Refunds => "table",
            Dataset::Holdings => "ul",
        }
    }

    /// CSV file this dataset exports to.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Lodgements => "lodgements.csv",
            Dataset::Refunds => "refunds.csv",
            Dataset::Holdings => "holdings.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Lodgements => "lodgements",
            Dataset::Refunds => "refunds",
            Dataset::Holdings => "holdings",
        }
    }

    fn link_selector(self) -> Selector {
        let selector = format!("#{} div {} a", self.panel_id(), self.link_container());
        Selector::parse(&selector).expect("Dataset selector is valid")
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extract this dataset's workbook URLs from listing-page HTML, in document
/// order.
pub fn extract_workbook_links(html: &str, dataset: Dataset) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = dataset.link_selector();
    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| is_workbook_link(href))
        .map(str::to_string)
        .collect()
}

fn is_workbook_link(href: &str) -> bool {
    href.starts_with(WORKBOOK_PREFIX) && !href.to_ascii_lowercase().contains("year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing_page() -> String {
        format!(
            r#"<html><body>
            <div id="panel1"><div><table>
                <tr><td><a href="{prefix}0019/1.xlsx">Jan 2024</a></td></tr>
                <tr><td><a href="{prefix}0020/2.xlsx">Feb 2024</a></td></tr>
                <tr><td><a href="{prefix}0021/Year-2023.xlsx">2023 summary</a></td></tr>
                <tr><td><a href="https://example.com/other.xlsx">elsewhere</a></td></tr>
            </table></div></div>
            <div id="panel2"><div><table>
                <tr><td><a href="{prefix}0030/refunds-jan.xlsx">Jan 2024</a></td></tr>
            </table></div></div>
            <div id="panel3"><div><ul>
                <li><a href="{prefix}0040/holdings-june.xlsx">June 2024</a></li>
                <li><a href="{prefix}0041/holdings-yearly.xlsx">Yearly</a></li>
            </ul></div></div>
            </body></html>"#,
            prefix = WORKBOOK_PREFIX
        )
    }

    #[test]
    fn lodgement_links_come_from_the_first_panel_in_order() {
        let links = extract_workbook_links(&listing_page(), Dataset::Lodgements);

        assert_eq!(
            links,
            vec![
                format!("{WORKBOOK_PREFIX}0019/1.xlsx"),
                format!("{WORKBOOK_PREFIX}0020/2.xlsx"),
            ]
        );
    }

    #[test]
    fn yearly_workbooks_and_foreign_hosts_are_skipped() {
        let links = extract_workbook_links(&listing_page(), Dataset::Lodgements);
        assert!(links.iter().all(|l| !l.to_lowercase().contains("year")));

        let holdings = extract_workbook_links(&listing_page(), Dataset::Holdings);
        assert_eq!(holdings, vec![format!("{WORKBOOK_PREFIX}0040/holdings-june.xlsx")]);
    }

    #[test]
    fn panels_do_not_leak_into_each_other() {
        let refunds = extract_workbook_links(&listing_page(), Dataset::Refunds);

        assert_eq!(refunds, vec![format!("{WORKBOOK_PREFIX}0030/refunds-jan.xlsx")]);
    }

    #[test]
    fn missing_panel_yields_no_links() {
        let links = extract_workbook_links("<html><body></body></html>", Dataset::Holdings);
        assert!(links.is_empty());
    }

    #[test]
    fn refresh_order_covers_every_dataset() {
        assert_eq!(Dataset::ALL.len(), 3);
        assert_eq!(Dataset::ALL[0], Dataset::Holdings);
        assert_eq!(Dataset::Holdings.file_name(), "holdings.csv");
        assert_eq!(Dataset::Refunds.to_string(), "refunds");
    }
}

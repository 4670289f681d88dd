//! HTML document pages.
//!
//! Indexed documents are scraped HTML articles. Search results and context
//! responses need three things from a page: its heading (first `h1`), its
//! breadcrumb trail (the `.breadcrumbs` element and the links inside it),
//! and its plain text for context-window extraction.
//!
//! Text values follow "strip each text node, then concatenate" semantics,
//! so `<h1> Homily  <em>II</em> </h1>` yields `"HomilyII"` the same way the
//! scraper that built the corpus saw it. The plain text is every text node
//! of the document unmodified, including `title`, `script` and `style`
//! contents, so window offsets line up with the indexed text.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Search-result title when a page has no `h1`.
pub const NO_TITLE: &str = "No title";
/// Context-response title when a page has no `h1`.
pub const NO_TITLE_FOUND: &str = "No title found";
/// Context-response breadcrumb when a page has no `.breadcrumbs`.
pub const NO_BREADCRUMB_FOUND: &str = "No breadcrumb found";

/// Separator between breadcrumb links in search results.
pub const BREADCRUMB_SEPARATOR: &str = " > ";

fn selector(cell: &'static OnceLock<Selector>, css: &'static str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector is valid"))
}

fn h1() -> &'static Selector {
    static CELL: OnceLock<Selector> = OnceLock::new();
    selector(&CELL, "h1")
}

fn breadcrumbs() -> &'static Selector {
    static CELL: OnceLock<Selector> = OnceLock::new();
    selector(&CELL, ".breadcrumbs")
}

fn breadcrumb_links() -> &'static Selector {
    static CELL: OnceLock<Selector> = OnceLock::new();
    selector(&CELL, ".breadcrumbs a")
}

/// The parts of an HTML page the query engine uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentPage {
    /// Stripped text of the first `h1`.
    pub title: Option<String>,
    /// Stripped text of every `.breadcrumbs a`, in document order.
    pub breadcrumb_links: Vec<String>,
    /// Stripped text of the whole first `.breadcrumbs` element.
    pub breadcrumb_text: Option<String>,
    /// Every text node of the document, unmodified and concatenated.
    pub text: String,
}

impl DocumentPage {
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title = doc.select(h1()).next().map(stripped_text);
        let breadcrumb_links = doc.select(breadcrumb_links()).map(stripped_text).collect();
        let breadcrumb_text = doc.select(breadcrumbs()).next().map(stripped_text);

        Self {
            title,
            breadcrumb_links,
            breadcrumb_text,
            text: plain_text(&doc),
        }
    }

    /// Breadcrumb links joined by `" > "`; empty when there are none.
    pub fn breadcrumb_trail(&self) -> String {
        self.breadcrumb_links.join(BREADCRUMB_SEPARATOR)
    }
}

fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

fn plain_text(doc: &Html) -> String {
    doc.root_element().text().collect()
}

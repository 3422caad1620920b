//! Built-in HTML renderer for catalog views.
//!
//! # Invariants
//! - Every interpolated value is HTML-escaped.
//! - `index` is a full document; every other view is a fragment.

use bookstore_core::{BookProjection, RenderError, ViewData, ViewName, ViewRenderer};
use std::fmt::Write;

const STYLESHEET_HREF: &str = "/css/style.css";

/// Renders each named view into UTF-8 HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: ViewName, data: &ViewData) -> Result<Vec<u8>, RenderError> {
        let html = match (view, data) {
            (ViewName::Index, ViewData::Empty) => index_page(),
            (ViewName::SearchBar, ViewData::Empty) => search_bar(),
            (ViewName::BookTable, ViewData::Books(books)) => book_table(books),
            (ViewName::Authors, ViewData::Authors { authors }) => {
                value_list("authors", authors)
            }
            (ViewName::Years, ViewData::Years { years }) => value_list("years", years),
            (view, _) => return Err(RenderError::DataMismatch { view }),
        };
        Ok(html.into_bytes())
    }
}

fn index_page() -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>Bookstore</title>
<link rel=\"stylesheet\" href=\"{STYLESHEET_HREF}\">
</head>
<body>
<h1>Bookstore</h1>
<nav>
<a href=\"/books\">Books</a>
<a href=\"/authors\">Authors</a>
<a href=\"/years\">Years</a>
<a href=\"/search\">Search</a>
</nav>
<main id=\"content\"></main>
</body>
</html>
"
    )
}

fn search_bar() -> String {
    "<form class=\"search-bar\" method=\"get\" action=\"/api/books\">
<input type=\"search\" name=\"id\" placeholder=\"Book id\">
<button type=\"submit\">Search</button>
</form>
"
    .to_string()
}

fn book_table(books: &[BookProjection]) -> String {
    let mut html = String::from(
        "<table class=\"book-table\">
<thead><tr><th>ID</th><th>Title</th><th>Author</th><th>Pages</th><th>Edition</th><th>Year</th></tr></thead>
<tbody>
",
    );
    for book in books {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&book.id),
            escape(&book.title),
            escape(&book.author),
            escape(&book.pages),
            escape(&book.edition),
            escape(&book.year),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn value_list(class: &str, values: &[String]) -> String {
    let mut html = format!("<ul class=\"{class}\">\n");
    for value in values {
        let _ = writeln!(html, "<li>{}</li>", escape(value));
    }
    html.push_str("</ul>\n");
    html
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

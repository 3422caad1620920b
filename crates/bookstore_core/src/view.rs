//! Renderer adapter for HTML views.
//!
//! # Responsibility
//! - Name the views the HTML surface renders.
//! - Shape catalog projections and aggregates into renderer input.
//!
//! # Invariants
//! - No business rules here; every `ViewData` is a structural copy of
//!   service output.

use crate::model::book::BookProjection;
use crate::repo::catalog_repo::CatalogRepository;
use crate::service::catalog_service::{CatalogService, ServiceResult};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Views known to the HTML surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    Index,
    BookTable,
    Authors,
    Years,
    SearchBar,
}

impl ViewName {
    /// Template name the renderer resolves.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::BookTable => "book-table",
            Self::Authors => "authors.html",
            Self::Years => "years.html",
            Self::SearchBar => "search-bar",
        }
    }
}

impl Display for ViewName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renderer input. Serializes to the shape template engines expect:
/// a bare list for `Books`, `{"Authors": [...]}` and `{"Years": [...]}`
/// for the aggregates, `null` for `Empty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViewData {
    Empty,
    Books(Vec<BookProjection>),
    Authors {
        #[serde(rename = "Authors")]
        authors: Vec<String>,
    },
    Years {
        #[serde(rename = "Years")]
        years: Vec<String>,
    },
}

/// Renderer failure.
#[derive(Debug)]
pub enum RenderError {
    /// The renderer cannot draw `view` from the supplied data variant.
    DataMismatch { view: ViewName },
    Backend(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataMismatch { view } => write!(f, "unexpected data for view `{view}`"),
            Self::Backend(message) => write!(f, "render failed: {message}"),
        }
    }
}

impl Error for RenderError {}

/// Capability `render(viewName, data) -> bytes`.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: ViewName, data: &ViewData) -> Result<Vec<u8>, RenderError>;
}

/// A view paired with the data it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub view: ViewName,
    pub data: ViewData,
}

impl ViewModel {
    fn new(view: ViewName, data: ViewData) -> Self {
        Self { view, data }
    }

    pub fn render(&self, renderer: &dyn ViewRenderer) -> Result<Vec<u8>, RenderError> {
        renderer.render(self.view, &self.data)
    }
}

/// Builds view models for each HTML route from the catalog service.
pub struct CatalogViews;

impl CatalogViews {
    pub fn index() -> ViewModel {
        ViewModel::new(ViewName::Index, ViewData::Empty)
    }

    pub fn search_bar() -> ViewModel {
        ViewModel::new(ViewName::SearchBar, ViewData::Empty)
    }

    pub fn book_table<R: CatalogRepository>(
        service: &CatalogService<R>,
    ) -> ServiceResult<ViewModel> {
        let books = service.list_books()?;
        Ok(ViewModel::new(ViewName::BookTable, ViewData::Books(books)))
    }

    pub fn authors<R: CatalogRepository>(service: &CatalogService<R>) -> ServiceResult<ViewModel> {
        let authors = service.distinct_authors()?;
        Ok(ViewModel::new(ViewName::Authors, ViewData::Authors { authors }))
    }

    pub fn years<R: CatalogRepository>(service: &CatalogService<R>) -> ServiceResult<ViewModel> {
        let years = service.distinct_years()?;
        Ok(ViewModel::new(ViewName::Years, ViewData::Years { years }))
    }
}

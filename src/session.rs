//! Editing session: the document, its settings and the page balancer

use crate::codec::{self, ExportOptions};
use crate::error::Result;
use crate::markup::{self, Element};
use crate::model::PageSettings;
use crate::paginate::{BlockId, Measure, PaginationConfig, Paginator, Selection};

/// What a [`Session::pump`] call did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PumpReport {
    /// Balancing runs performed
    pub ticks: usize,
    /// Pages appended and removed on the engine's request
    pub pages_created: usize,
    pub pages_destroyed: usize,
    /// Latest markup emitted, if any run changed the document
    pub markup: Option<String>,
    /// Latest caret the host should scroll to
    pub scroll_into_view: Option<Selection>,
    /// `false` when the tick limit stopped the pump with work left
    pub converged: bool,
}

/// Single-owner editing session.
///
/// Holds the document (as paginated blocks) and its page settings, and
/// plays the host for the pagination engine: page create and destroy
/// requests are applied immediately and the engine is re-run until idle.
#[derive(Debug)]
pub struct Session {
    paginator: Paginator,
    settings: PageSettings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}

impl Session {
    /// A session holding one empty paragraph
    pub fn new(config: PaginationConfig) -> Self {
        let mut paginator = Paginator::new(config);
        paginator.replace_document(vec![Element::new("p").into()]);
        Self {
            paginator,
            settings: PageSettings::default(),
        }
    }

    /// Replace the document with markup
    pub fn load_markup(&mut self, markup: &str) -> Result<()> {
        let nodes = markup::parse(markup)?;
        self.paginator.replace_document(nodes);
        Ok(())
    }

    /// Replace the document with an imported package.
    ///
    /// On failure the session is left untouched. Settings are replaced only
    /// when the package carries section properties.
    pub fn import_docx(&mut self, bytes: &[u8]) -> Result<()> {
        let imported = codec::import_docx(bytes)?;
        let nodes = markup::parse(&imported.markup)?;

        self.paginator.replace_document(nodes);
        if let Some(settings) = imported.settings {
            self.settings = settings;
        }
        log::debug!("imported document, {} blocks", self.paginator.arena().len());
        Ok(())
    }

    /// Serialize the current document and settings
    pub fn export_docx(&self, options: &ExportOptions) -> Result<Vec<u8>> {
        codec::export_docx(&self.current_markup(), &self.settings, options)
    }

    /// Canonical markup of the whole document in page order
    pub fn current_markup(&self) -> String {
        self.paginator.markup()
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Replace the page settings and re-balance every page
    pub fn apply_settings_update(&mut self, settings: PageSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.paginator.notify_pages_changed();
        }
    }

    pub fn notify_content_changed(&mut self, page: usize) {
        self.paginator.notify_content_changed(page);
    }

    pub fn notify_pages_changed(&mut self) {
        self.paginator.notify_pages_changed();
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.paginator.set_selection(selection);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.paginator.selection()
    }

    /// Replace what one page hosts after a direct edit
    pub fn edit_page(&mut self, page: usize, markup: &str) -> Result<Vec<BlockId>> {
        let nodes = markup::parse(markup)?;
        Ok(self.paginator.replace_page(page, nodes))
    }

    /// Run the engine until it is idle, applying its page requests
    pub fn pump<M: Measure + ?Sized>(&mut self, oracle: &M) -> PumpReport {
        let mut report = PumpReport::default();
        let max_ticks = self.paginator.config().max_ticks;

        while report.ticks < max_ticks {
            let Some(effects) = self.paginator.tick(oracle) else {
                report.converged = true;
                return report;
            };
            report.ticks += 1;

            if effects.create_page {
                self.paginator.add_page();
                report.pages_created += 1;
            }
            if let Some(index) = effects.destroy_page {
                if self.paginator.remove_page(index) {
                    report.pages_destroyed += 1;
                }
            }
            if effects.scroll_into_view.is_some() {
                report.scroll_into_view = effects.scroll_into_view;
            }
            if effects.markup.is_some() {
                report.markup = effects.markup;
            }
        }

        report.converged = self.paginator.is_idle();
        if !report.converged {
            log::warn!("pagination stopped after {} ticks with work pending", max_ticks);
        }
        report
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count()
    }

    /// Markup hosted by one page
    pub fn page_markup(&self, page: usize) -> Option<String> {
        self.paginator.page_markup(page)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }
}

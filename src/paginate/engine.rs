//! The balancing passes and their trigger queue

use std::collections::VecDeque;

use super::arena::{BlockArena, BlockId};
use super::measure::Measure;
use super::page::{Page, Selection};
use super::PaginationConfig;
use crate::markup::Node;

/// Why a balancing run was scheduled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The page at this index was edited directly
    ContentChanged(usize),
    /// A page was created or destroyed
    PagesChanged,
    /// The whole document was replaced
    DocumentReplaced,
}

impl Trigger {
    fn start_page(self) -> usize {
        match self {
            Trigger::ContentChanged(index) => index,
            Trigger::PagesChanged | Trigger::DocumentReplaced => 0,
        }
    }
}

/// Requests and output produced by one balancing run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    /// Append a trailing page; the run stopped early and resumes once the
    /// page exists
    pub create_page: bool,
    /// Remove the page at this index
    pub destroy_page: Option<usize>,
    /// The selected block moved; the host should bring it into view
    pub scroll_into_view: Option<Selection>,
    /// New document markup, set only when something moved or a page is to be
    /// created or destroyed
    pub markup: Option<String>,
}

impl Effects {
    /// Whether the run changed anything
    pub fn is_noop(&self) -> bool {
        self.markup.is_none()
    }
}

/// Result of the forward pass
enum Forward {
    Done,
    /// A new trailing page is needed before the pass can continue
    NeedsPage,
}

/// Balances the document's blocks across pages
#[derive(Debug)]
pub struct Paginator {
    config: PaginationConfig,
    arena: BlockArena,
    pages: Vec<Page>,
    selection: Option<Selection>,
    queue: VecDeque<Trigger>,
    /// Content was dropped outside a run; the next run re-emits markup
    dirty: bool,
}

impl Paginator {
    /// A single empty page
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            config,
            arena: BlockArena::new(),
            pages: vec![Page::new()],
            selection: None,
            queue: VecDeque::new(),
            dirty: false,
        }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn arena(&self) -> &BlockArena {
        &self.arena
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set the caret. A selection naming an unknown block is dropped.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.filter(|s| self.arena.contains(s.block));
    }

    /// Whether no run is pending
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending triggers in processing order
    pub fn pending(&self) -> impl Iterator<Item = &Trigger> {
        self.queue.iter()
    }

    /// Replace the whole document: one page holding every block, previous
    /// pending work discarded
    pub fn replace_document(&mut self, nodes: Vec<Node>) {
        self.arena.clear();
        let blocks = nodes
            .into_iter()
            .filter(|n| !n.is_blank_text())
            .map(|n| self.arena.insert(n))
            .collect();
        self.pages = vec![Page::with_blocks(blocks)];
        self.selection = None;
        self.queue.clear();
        self.queue.push_back(Trigger::DocumentReplaced);
        log::debug!("document replaced with {} blocks", self.arena.len());
    }

    /// Replace the blocks hosted by one page after a direct edit and schedule
    /// a run from that page. Returns the new blocks' ids.
    pub fn replace_page(&mut self, index: usize, nodes: Vec<Node>) -> Vec<BlockId> {
        let Some(page) = self.pages.get_mut(index) else {
            log::warn!("edit of page {} ignored, {} pages", index, self.pages.len());
            return Vec::new();
        };
        for id in page.take_blocks() {
            self.arena.remove(id);
        }
        let ids: Vec<BlockId> = nodes
            .into_iter()
            .filter(|n| !n.is_blank_text())
            .map(|n| self.arena.insert(n))
            .collect();
        *page = Page::with_blocks(ids.clone());

        if let Some(selection) = self.selection {
            if !self.arena.contains(selection.block) {
                self.selection = None;
            }
        }
        self.notify_content_changed(index);
        ids
    }

    pub fn notify_content_changed(&mut self, index: usize) {
        self.queue.push_back(Trigger::ContentChanged(index));
    }

    pub fn notify_pages_changed(&mut self) {
        self.queue.push_back(Trigger::PagesChanged);
    }

    /// Append an empty trailing page (the host fulfilling a create request)
    pub fn add_page(&mut self) {
        self.pages.push(Page::new());
        log::debug!("page {} created", self.pages.len() - 1);
        self.notify_pages_changed();
    }

    /// Remove a page (the host fulfilling a destroy request).
    ///
    /// A blank page's placeholder paragraph is dropped; any other hosted
    /// blocks move to the neighbouring page so nothing is lost. The last
    /// remaining page is never removed.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }

        let mut page = self.pages.remove(index);
        if page.is_blank(&self.arena) {
            for id in page.take_blocks() {
                self.arena.remove(id);
                self.dirty = true;
            }
        } else if index > 0 {
            let previous = &mut self.pages[index - 1];
            for id in page.take_blocks() {
                previous.push(id);
            }
        } else {
            let next = &mut self.pages[0];
            for id in page.take_blocks().into_iter().rev() {
                next.prepend(id);
            }
        }

        if let Some(selection) = self.selection {
            if !self.arena.contains(selection.block) {
                self.selection = None;
            }
        }
        log::debug!("page {} destroyed", index);
        self.notify_pages_changed();
        true
    }

    /// Blocks in page order
    pub fn blocks(&self) -> impl Iterator<Item = &Node> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks().iter())
            .filter_map(|id| self.arena.get(*id))
    }

    /// Concatenation of every page's content
    pub fn markup(&self) -> String {
        self.blocks().map(Node::to_markup).collect()
    }

    /// Markup of one page's content
    pub fn page_markup(&self, index: usize) -> Option<String> {
        let page = self.pages.get(index)?;
        Some(
            page.blocks()
                .iter()
                .filter_map(|id| self.arena.get(*id))
                .map(Node::to_markup)
                .collect(),
        )
    }

    /// Process the oldest pending trigger. Returns `None` when idle.
    pub fn tick<M: Measure + ?Sized>(&mut self, oracle: &M) -> Option<Effects> {
        let trigger = self.queue.pop_front()?;
        Some(self.run(trigger, oracle))
    }

    fn run<M: Measure + ?Sized>(&mut self, trigger: Trigger, oracle: &M) -> Effects {
        log::debug!("pagination run: {:?}, {} pages", trigger, self.pages.len());

        let mut effects = Effects::default();
        let mut changed = std::mem::take(&mut self.dirty);
        let start = trigger.start_page().min(self.pages.len() - 1);

        match self.forward_pass(start, oracle, &mut effects, &mut changed) {
            Forward::NeedsPage => {
                log::debug!("requesting page {}", self.pages.len());
                effects.create_page = true;
                changed = true;
            }
            Forward::Done => {
                self.backward_pass(oracle, &mut effects, &mut changed);
                if let Some(index) = self.trailing_blank_page() {
                    log::debug!("requesting removal of page {}", index);
                    effects.destroy_page = Some(index);
                    changed = true;
                }
            }
        }

        if changed {
            effects.markup = Some(self.markup());
        }
        effects
    }

    fn overflows<M: Measure + ?Sized>(&self, index: usize, oracle: &M) -> bool {
        oracle.rendered_height(&self.pages[index], &self.arena)
            > oracle.box_height(index) + self.config.epsilon
    }

    /// Push the last block of each overflowing page to the front of the next
    fn forward_pass<M: Measure + ?Sized>(
        &mut self,
        start: usize,
        oracle: &M,
        effects: &mut Effects,
        changed: &mut bool,
    ) -> Forward {
        for index in start..self.pages.len() {
            while self.overflows(index, oracle) {
                if self.pages[index].len() <= 1 {
                    // A lone block taller than the page stays where it is
                    log::debug!(
                        "page {} overflows with a single {:?} block, accepted",
                        index,
                        self.pages[index].first().and_then(|id| self.arena.kind(id))
                    );
                    break;
                }
                if index + 1 == self.pages.len() {
                    return Forward::NeedsPage;
                }
                let Some(id) = self.pages[index].pop_last() else {
                    break;
                };
                self.pages[index + 1].prepend(id);
                self.moved(id, index, index + 1, effects);
                *changed = true;
            }
        }
        Forward::Done
    }

    /// Pull blocks back into pages that have room for them
    fn backward_pass<M: Measure + ?Sized>(&mut self, oracle: &M, effects: &mut Effects, changed: &mut bool) {
        for index in 0..self.pages.len().saturating_sub(1) {
            while let Some(id) = self.pages[index + 1].pop_first() {
                self.pages[index].push(id);
                // An empty page keeps even a block taller than itself
                if self.overflows(index, oracle) && self.pages[index].len() > 1 {
                    self.pages[index].pop_last();
                    self.pages[index + 1].prepend(id);
                    break;
                }
                self.moved(id, index + 1, index, effects);
                *changed = true;
            }
        }
    }

    fn moved(&self, id: BlockId, from: usize, to: usize, effects: &mut Effects) {
        log::trace!("block {} moved from page {} to page {}", id.index(), from, to);
        if let Some(selection) = self.selection.filter(|s| s.block == id) {
            effects.scroll_into_view = Some(selection);
        }
    }

    /// Index of a trailing page that is blank, unfocused and not the first
    fn trailing_blank_page(&self) -> Option<usize> {
        let index = self.pages.len() - 1;
        if index == 0 {
            return None;
        }
        let page = &self.pages[index];
        let focused = self.selection.map(|s| page.contains(s.block)).unwrap_or(false);
        (page.is_blank(&self.arena) && !focused).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{self, Element};
    use crate::paginate::StackedHeights;
    use pretty_assertions::assert_eq;

    /// Blocks carry their height in a `data-h` attribute
    fn oracle(box_height: f64) -> StackedHeights<impl Fn(&Node) -> f64> {
        StackedHeights::new(box_height, |node: &Node| {
            node.as_element()
                .and_then(|e| e.attr("data-h"))
                .and_then(|h| h.parse().ok())
                .unwrap_or(10.0)
        })
    }

    fn block(height: f64, text: &str) -> Node {
        Element::new("p")
            .with_attr("data-h", height.to_string())
            .with_text(text)
            .into()
    }

    /// Play the host until no work is left
    fn settle<M: Measure>(paginator: &mut Paginator, oracle: &M) -> Vec<Effects> {
        let mut all = Vec::new();
        for _ in 0..256 {
            let Some(effects) = paginator.tick(oracle) else {
                return all;
            };
            if effects.create_page {
                paginator.add_page();
            }
            if let Some(index) = effects.destroy_page {
                paginator.remove_page(index);
            }
            all.push(effects);
        }
        panic!("pagination did not converge");
    }

    fn page_heights<M: Measure>(paginator: &Paginator, oracle: &M) -> Vec<f64> {
        paginator
            .pages()
            .iter()
            .map(|p| oracle.rendered_height(p, paginator.arena()))
            .collect()
    }

    fn text(paginator: &Paginator) -> String {
        paginator.blocks().map(Node::text_content).collect()
    }

    #[test]
    fn test_overflow_moves_forward() {
        let oracle = oracle(297.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document((0..4).map(|i| block(100.0, &i.to_string())).collect());

        // First run stops to ask for a page
        let first = paginator.tick(&oracle).unwrap();
        assert!(first.create_page);
        assert_eq!(paginator.page_count(), 1);
        paginator.add_page();

        settle(&mut paginator, &oracle);
        assert_eq!(paginator.page_count(), 2);
        assert_eq!(page_heights(&paginator, &oracle), vec![200.0, 200.0]);
        assert!(page_heights(&paginator, &oracle)[0] <= 297.0 + 1.0);
        assert_eq!(text(&paginator), "0123");
    }

    #[test]
    fn test_underflow_pulls_back() {
        let oracle = oracle(297.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(100.0, "a"), block(50.0, "b"), block(50.0, "c")]);
        settle(&mut paginator, &oracle);
        assert_eq!(paginator.page_count(), 1);

        // Page 0 holds 100, page 1 starts with a 50 block
        let ids = paginator.pages()[0].blocks().to_vec();
        paginator.add_page();
        paginator.pages[0] = Page::with_blocks(vec![ids[0]]);
        paginator.pages[1] = Page::with_blocks(vec![ids[1], ids[2]]);
        paginator.queue.clear();
        paginator.notify_content_changed(0);

        let effects = paginator.tick(&oracle).unwrap();
        assert_eq!(paginator.pages()[0].blocks(), &ids[..]);
        assert!(paginator.pages()[1].is_empty());
        assert_eq!(effects.destroy_page, Some(1));
        assert!(effects.markup.is_some());

        assert!(paginator.remove_page(1));
        settle(&mut paginator, &oracle);
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(text(&paginator), "abc");
    }

    #[test]
    fn test_pull_stops_at_first_block_that_does_not_fit() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(60.0, "a"), block(30.0, "b"), block(30.0, "c")]);
        settle(&mut paginator, &oracle);

        assert_eq!(paginator.page_count(), 2);
        assert_eq!(page_heights(&paginator, &oracle), vec![90.0, 30.0]);
        assert_eq!(paginator.page_markup(1).unwrap(), r#"<p data-h="30">c</p>"#);
    }

    #[test]
    fn test_epsilon_tolerates_rounding() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default().with_epsilon(1.0));
        paginator.replace_document(vec![block(50.5, "a"), block(50.0, "b")]);
        let effects = paginator.tick(&oracle).unwrap();
        assert!(effects.is_noop());
        assert_eq!(paginator.page_count(), 1);
    }

    #[test]
    fn test_single_oversized_block_is_accepted() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(20.0, "a"), block(500.0, "tall"), block(20.0, "b")]);
        let effects = settle(&mut paginator, &oracle);

        assert_eq!(paginator.page_count(), 3);
        assert_eq!(page_heights(&paginator, &oracle), vec![20.0, 500.0, 20.0]);
        assert!(effects.iter().filter(|e| e.create_page).count() <= 2);
        assert_eq!(text(&paginator), "atallb");
    }

    #[test]
    fn test_oversized_block_pulled_into_empty_page_stays() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![
            block(50.0, "a"),
            block(45.0, "b"),
            block(10.0, "c"),
            block(200.0, "d"),
        ]);
        settle(&mut paginator, &oracle);
        assert_eq!(page_heights(&paginator, &oracle), vec![95.0, 10.0, 200.0]);

        paginator.replace_page(0, vec![block(50.0, "a")]);
        settle(&mut paginator, &oracle);
        assert_eq!(page_heights(&paginator, &oracle), vec![60.0, 200.0]);
        assert!(paginator.pages().iter().all(|p| !p.is_blank(paginator.arena())));
        assert_eq!(text(&paginator), "acd");
    }

    #[test]
    fn test_minimum_one_page() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(10.0, "a")]);
        settle(&mut paginator, &oracle);

        paginator.replace_page(0, Vec::new());
        let effects = paginator.tick(&oracle).unwrap();
        assert_eq!(effects.destroy_page, None);
        assert!(!paginator.remove_page(0));
        assert_eq!(paginator.page_count(), 1);
    }

    #[test]
    fn test_trailing_blank_page_keeps_focus() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(95.0, "a"), Element::new("p").with_attr("data-h", "20").into()]);

        // The caret sits in the empty paragraph, so its page survives
        let empty = paginator.pages()[0].blocks()[1];
        paginator.set_selection(Some(Selection::new(empty, 0)));
        settle(&mut paginator, &oracle);
        assert_eq!(paginator.page_count(), 2);
        assert!(paginator.pages()[1].contains(empty));

        // Without the caret the placeholder page goes away
        paginator.set_selection(None);
        paginator.notify_pages_changed();
        let effects = paginator.tick(&oracle).unwrap();
        assert_eq!(effects.destroy_page, Some(1));
        assert!(paginator.remove_page(1));
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.arena().len(), 1);
    }

    #[test]
    fn test_selection_follows_moved_block() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(60.0, "a"), block(30.0, "b")]);
        settle(&mut paginator, &oracle);

        let ids = paginator.replace_page(0, vec![block(60.0, "a"), block(30.0, "b"), block(30.0, "typed")]);
        let caret = Selection::new(ids[2], 3);
        paginator.set_selection(Some(caret));

        let effects = settle(&mut paginator, &oracle);
        assert!(effects.iter().any(|e| e.scroll_into_view == Some(caret)));
        assert_eq!(paginator.selection(), Some(caret));
        assert!(paginator.pages()[1].contains(caret.block));
    }

    #[test]
    fn test_noop_run_emits_nothing() {
        let oracle = oracle(100.0);
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(vec![block(10.0, "a"), block(10.0, "b")]);
        assert!(paginator.tick(&oracle).unwrap().is_noop());

        paginator.notify_content_changed(0);
        assert_eq!(paginator.tick(&oracle), Some(Effects::default()));
        assert_eq!(paginator.tick(&oracle), None);
    }

    #[test]
    fn test_converges_without_losing_content() {
        let oracle = oracle(100.0);
        let heights = [35.0, 80.0, 5.0, 65.0, 40.0, 99.0, 12.0, 150.0, 1.0, 60.0, 60.0, 60.0];
        let mut paginator = Paginator::new(PaginationConfig::default());
        paginator.replace_document(
            heights
                .iter()
                .enumerate()
                .map(|(i, h)| block(*h, &format!("[{}]", i)))
                .collect(),
        );
        let expected = text(&paginator);

        settle(&mut paginator, &oracle);
        assert_eq!(text(&paginator), expected);

        // Every page fits unless it holds a single oversized block, and no
        // page could take the next page's first block
        let pages = paginator.pages();
        for (i, page) in pages.iter().enumerate() {
            let height = oracle.rendered_height(page, paginator.arena());
            assert!(height <= 101.0 || page.len() == 1, "page {} is {}", i, height);
            if let Some(next) = pages.get(i + 1).and_then(Page::first) {
                let next_height = oracle.rendered_height(&Page::with_blocks(vec![next]), paginator.arena());
                assert!(height + next_height > 101.0, "page {} could pull more", i);
            }
        }

        // Round trip through markup keeps the same layout input
        let reparsed = markup::parse(&paginator.markup()).unwrap();
        assert_eq!(markup::to_string(&reparsed), paginator.markup());
    }
}

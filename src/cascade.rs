//! Class → Section → (subjects, periods, students) selection chain.
//!
//! Every fetch issued by the selector carries a ticket. A response is applied
//! only while its ticket is still the latest one for its level, so a late
//! answer for a previously selected class can never fill the lists of the
//! current one.

use tracing::debug;

use crate::model::Lookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    NoClassSelected,
    ClassSelected { class_id: i64 },
    SectionSelected { class_id: i64, section_id: i64 },
}

/// Fetches the caller has to run after a class was picked: the sections of
/// the class and anything scoped to the class alone (subjects).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRequest {
    pub ticket: u64,
    pub class_id: i64,
}

/// Fetch scoped to one (class, section) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRequest {
    pub ticket: u64,
    pub class_id: i64,
    pub section_id: i64,
}

#[derive(Debug, Clone)]
pub struct CascadingSelector<T = Lookup> {
    state: CascadeState,
    next_ticket: u64,
    class_ticket: Option<u64>,
    section_ticket: Option<u64>,
    pending_section: Option<i64>,
    sections: Vec<Lookup>,
    class_items: Vec<Lookup>,
    section_items: Vec<T>,
}

impl<T> Default for CascadingSelector<T> {
    fn default() -> Self {
        Self {
            state: CascadeState::NoClassSelected,
            next_ticket: 0,
            class_ticket: None,
            section_ticket: None,
            pending_section: None,
            sections: Vec::new(),
            class_items: Vec::new(),
            section_items: Vec::new(),
        }
    }
}

impl<T: Clone> CascadingSelector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn class_id(&self) -> Option<i64> {
        match self.state {
            CascadeState::NoClassSelected => None,
            CascadeState::ClassSelected { class_id } | CascadeState::SectionSelected { class_id, .. } => Some(class_id),
        }
    }

    pub fn section_id(&self) -> Option<i64> {
        match self.state {
            CascadeState::SectionSelected { section_id, .. } => Some(section_id),
            _ => None,
        }
    }

    pub fn selected_section(&self) -> Option<&Lookup> {
        let id = self.section_id()?;
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sections(&self) -> &[Lookup] {
        &self.sections
    }

    /// Items scoped to the class alone (subjects of the class).
    pub fn class_items(&self) -> &[Lookup] {
        &self.class_items
    }

    /// Items scoped to the selected (class, section) pair.
    pub fn section_items(&self) -> &[T] {
        &self.section_items
    }

    pub fn section_items_mut(&mut self) -> &mut Vec<T> {
        &mut self.section_items
    }

    fn issue(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Picks a class. The section and everything below it is cleared before
    /// the new class' data is requested.
    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        let ticket = self.issue();
        debug!(class_id, ticket, "class selected");
        self.state = CascadeState::ClassSelected { class_id };
        self.class_ticket = Some(ticket);
        self.section_ticket = None;
        self.pending_section = None;
        self.sections.clear();
        self.class_items.clear();
        self.section_items.clear();
        ClassRequest { ticket, class_id }
    }

    /// Selects a class and remembers `section_id` to be applied as soon as
    /// the sections of that class arrive (used to prefill edit forms).
    pub fn preselect(&mut self, class_id: i64, section_id: i64) -> ClassRequest {
        let request = self.select_class(class_id);
        self.pending_section = Some(section_id);
        request
    }

    /// Picks a section of the current class. Returns `None` when no class is
    /// selected or the section does not belong to it.
    pub fn select_section(&mut self, section_id: i64) -> Option<SectionRequest> {
        let class_id = self.class_id()?;
        if !self.sections.iter().any(|s| s.id == section_id) {
            debug!(class_id, section_id, "section not offered for class, ignored");
            return None;
        }
        let ticket = self.issue();
        self.state = CascadeState::SectionSelected { class_id, section_id };
        self.section_ticket = Some(ticket);
        self.pending_section = None;
        self.section_items.clear();
        Some(SectionRequest { ticket, class_id, section_id })
    }

    pub fn clear(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self { next_ticket, ..Self::default() };
    }

    /// Applies the sections for `ticket`. Failures and stale tickets leave an
    /// empty list. When an edit prefill was waiting for these sections the
    /// section is selected and its request returned.
    pub fn accept_sections(&mut self, ticket: u64, result: Result<Vec<Lookup>, String>) -> Option<SectionRequest> {
        if self.class_ticket != Some(ticket) {
            debug!(ticket, "stale sections response dropped");
            return None;
        }
        self.sections = result.unwrap_or_default();
        match self.pending_section.take() {
            Some(section_id) => self.select_section(section_id),
            None => None,
        }
    }

    pub fn accept_class_items(&mut self, ticket: u64, result: Result<Vec<Lookup>, String>) -> bool {
        if self.class_ticket != Some(ticket) {
            debug!(ticket, "stale class-scoped response dropped");
            return false;
        }
        self.class_items = result.unwrap_or_default();
        true
    }

    pub fn accept_section_items(&mut self, ticket: u64, result: Result<Vec<T>, String>) -> bool {
        if self.section_ticket != Some(ticket) {
            debug!(ticket, "stale section-scoped response dropped");
            return false;
        }
        self.section_items = result.unwrap_or_default();
        true
    }

    /// Ticket of the current section, used to re-fetch section items after a
    /// successful write.
    pub fn refresh(&mut self) -> Option<SectionRequest> {
        let CascadeState::SectionSelected { class_id, section_id } = self.state else {
            return None;
        };
        let ticket = self.issue();
        self.section_ticket = Some(ticket);
        Some(SectionRequest { ticket, class_id, section_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<Lookup> {
        vec![Lookup::new(1, "A"), Lookup::new(2, "B")]
    }

    #[test]
    fn full_chain_reaches_section_selected() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        assert_eq!(sel.state(), CascadeState::NoClassSelected);
        let req = sel.select_class(1);
        assert_eq!(sel.state(), CascadeState::ClassSelected { class_id: 1 });
        sel.accept_sections(req.ticket, Ok(sections()));
        let sreq = sel.select_section(1).unwrap();
        assert_eq!((sreq.class_id, sreq.section_id), (1, 1));
        assert!(sel.accept_section_items(sreq.ticket, Ok(vec![Lookup::new(9, "Math")])));
        assert_eq!(sel.state(), CascadeState::SectionSelected { class_id: 1, section_id: 1 });
        assert_eq!(sel.section_items().len(), 1);
    }

    #[test]
    fn changing_class_drops_section_and_downstream() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        let req = sel.select_class(1);
        sel.accept_sections(req.ticket, Ok(sections()));
        sel.accept_class_items(req.ticket, Ok(vec![Lookup::new(5, "English")]));
        let sreq = sel.select_section(2).unwrap();
        sel.accept_section_items(sreq.ticket, Ok(vec![Lookup::new(9, "P1")]));

        sel.select_class(2);
        assert_eq!(sel.state(), CascadeState::ClassSelected { class_id: 2 });
        assert!(sel.sections().is_empty());
        assert!(sel.class_items().is_empty());
        assert!(sel.section_items().is_empty());
        assert_eq!(sel.section_id(), None);
    }

    #[test]
    fn late_response_for_old_class_is_ignored() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        let first = sel.select_class(1);
        let second = sel.select_class(2);
        sel.accept_sections(first.ticket, Ok(sections()));
        assert!(sel.sections().is_empty());
        sel.accept_sections(second.ticket, Ok(vec![Lookup::new(3, "A")]));
        assert_eq!(sel.sections(), &[Lookup::new(3, "A")]);
    }

    #[test]
    fn late_section_items_after_class_change_are_ignored() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        let req = sel.select_class(1);
        sel.accept_sections(req.ticket, Ok(sections()));
        let sreq = sel.select_section(1).unwrap();
        sel.select_class(2);
        assert!(!sel.accept_section_items(sreq.ticket, Ok(vec![Lookup::new(1, "stale")])));
        assert!(sel.section_items().is_empty());
    }

    #[test]
    fn failed_fetch_leaves_empty_options() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        let req = sel.select_class(1);
        sel.accept_sections(req.ticket, Err("connection refused".into()));
        assert!(sel.sections().is_empty());
        assert_eq!(sel.state(), CascadeState::ClassSelected { class_id: 1 });
    }

    #[test]
    fn section_must_belong_to_class() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        assert!(sel.select_section(1).is_none());
        let req = sel.select_class(1);
        sel.accept_sections(req.ticket, Ok(sections()));
        assert!(sel.select_section(7).is_none());
    }

    #[test]
    fn preselect_applies_section_once_sections_arrive() {
        let mut sel: CascadingSelector<Lookup> = CascadingSelector::new();
        let req = sel.preselect(1, 2);
        let sreq = sel.accept_sections(req.ticket, Ok(sections())).unwrap();
        assert_eq!(sreq.section_id, 2);
        assert_eq!(sel.selected_section().map(|s| s.name.as_str()), Some("B"));
    }
}

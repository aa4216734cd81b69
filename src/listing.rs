/// Case-insensitive substring filter over a display key.
pub fn filter_by<'a, T>(items: &'a [T], query: &str, key: impl Fn(&T) -> String) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| query.is_empty() || key(item).to_lowercase().contains(&query))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self { page: 0, page_size: page_size.max(1) }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Slice of `items` shown on the current page. The page is clamped to the
    /// last one when the list shrank under it.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.page.min(self.page_count(items.len()) - 1);
        let start = (page * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn next(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn label(&self, total: usize) -> String {
        let page = self.page.min(self.page_count(total) - 1);
        let first = if total == 0 { 0 } else { page * self.page_size + 1 };
        let last = ((page + 1) * self.page_size).min(total);
        format!("{first}–{last} of {total}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_case_insensitively() {
        let names = vec!["Ravi Kumar".to_string(), "Asha Rao".to_string(), "Kiran".to_string()];
        let hits = filter_by(&names, "  RA", |n| n.clone());
        assert_eq!(hits.len(), 3);
        let hits = filter_by(&names, "rao", |n| n.clone());
        assert_eq!(hits, vec![&names[1]]);
        assert_eq!(filter_by(&names, "", |n| n.clone()).len(), 3);
    }

    #[test]
    fn pages_are_clamped() {
        let items: Vec<i32> = (1..=12).collect();
        let mut pager = Pager::new(5);
        assert_eq!(pager.page_count(items.len()), 3);
        assert_eq!(pager.slice(&items), &[1, 2, 3, 4, 5]);
        pager.next(items.len());
        pager.next(items.len());
        pager.next(items.len());
        assert_eq!(pager.slice(&items), &[11, 12]);
        assert_eq!(pager.label(items.len()), "11–12 of 12");
        assert_eq!(pager.slice(&items[..3]), &[1, 2, 3]);
        assert_eq!(Pager::new(0).page_size, 1);
        assert_eq!(Pager::new(5).label(0), "0–0 of 0");
    }
}

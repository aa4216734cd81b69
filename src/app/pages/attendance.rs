//! Daily marking plus weekly and monthly presence summaries.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use crate::cascade::{CascadingSelector, ClassRequest, SectionRequest};
use crate::forms::DATE_FORMAT;
use crate::model::{AttendanceMark, StudentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendanceTab {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl AttendanceTab {
    pub const ALL: [AttendanceTab; 3] = [AttendanceTab::Daily, AttendanceTab::Weekly, AttendanceTab::Monthly];
}

impl fmt::Display for AttendanceTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            AttendanceTab::Daily => "Daily",
            AttendanceTab::Weekly => "Weekly",
            AttendanceTab::Monthly => "Monthly",
        })
    }
}

/// The seven days of the week (Sunday first) that contains `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let sunday = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    sunday.iter_days().take(7).collect()
}

pub fn month_days(date: NaiveDate) -> Vec<NaiveDate> {
    let first = date.with_day(1).unwrap_or(date);
    first.iter_days().take_while(|d| d.month() == first.month()).collect()
}

/// One student's row of a weekly or monthly summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRow {
    pub student_id: i64,
    pub name: String,
    /// `None` where no mark was saved for the day.
    pub days: Vec<Option<bool>>,
}

impl PresenceRow {
    /// Share of marked days the student was present, in percent.
    pub fn percent(&self) -> Option<f64> {
        let marked: Vec<bool> = self.days.iter().flatten().copied().collect();
        if marked.is_empty() {
            return None;
        }
        let present = marked.iter().filter(|p| **p).count();
        Some(present as f64 * 100.0 / marked.len() as f64)
    }
}

#[derive(Debug, Clone)]
pub struct AttendancePage {
    pub tab: AttendanceTab,
    pub date: NaiveDate,
    pub cascade: CascadingSelector<AttendanceMark>,
    /// Checkbox state of the daily tab.
    pub present: BTreeMap<i64, bool>,
    pub saving: bool,
}

impl AttendancePage {
    pub fn new(today: NaiveDate) -> Self {
        Self { tab: AttendanceTab::Daily, date: today, cascade: CascadingSelector::new(), present: BTreeMap::new(), saving: false }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        match self.tab {
            AttendanceTab::Daily => vec![self.date],
            AttendanceTab::Weekly => week_days(self.date),
            AttendanceTab::Monthly => month_days(self.date),
        }
    }

    /// First and last day covered by the current tab, formatted for queries.
    pub fn range(&self) -> (String, String) {
        let days = self.days();
        let first = days.first().copied().unwrap_or(self.date);
        let last = days.last().copied().unwrap_or(self.date);
        (first.format(DATE_FORMAT).to_string(), last.format(DATE_FORMAT).to_string())
    }

    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.present.clear();
        self.cascade.select_class(class_id)
    }

    pub fn select_section(&mut self, section_id: i64) -> Option<SectionRequest> {
        self.present.clear();
        self.cascade.select_section(section_id)
    }

    /// Tab or date changes re-fetch the marks of the selected section.
    pub fn set_tab(&mut self, tab: AttendanceTab) -> Option<SectionRequest> {
        self.tab = tab;
        self.cascade.refresh()
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Option<SectionRequest> {
        self.date = date;
        self.present.clear();
        self.cascade.refresh()
    }

    pub fn accept_marks(&mut self, ticket: u64, marks: Vec<AttendanceMark>) {
        if !self.cascade.accept_section_items(ticket, Ok(marks)) {
            return;
        }
        let day = self.date.format(DATE_FORMAT).to_string();
        self.present = self
            .cascade
            .section_items()
            .iter()
            .filter(|m| m.date == day)
            .map(|m| (m.student_id, m.present))
            .collect();
    }

    pub fn roster<'a>(&self, students: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        let (Some(class_id), Some(section_id)) = (self.cascade.class_id(), self.cascade.section_id()) else {
            return Vec::new();
        };
        students
            .iter()
            .filter(|s| s.id.is_some() && s.class_id == class_id && s.section_id == section_id)
            .collect()
    }

    /// Students without a saved mark start out present.
    pub fn is_present(&self, student_id: i64) -> bool {
        self.present.get(&student_id).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, student_id: i64, present: bool) {
        self.present.insert(student_id, present);
    }

    pub fn daily_marks(&self, roster: &[&StudentRecord]) -> Vec<AttendanceMark> {
        let (Some(class_id), Some(section_id)) = (self.cascade.class_id(), self.cascade.section_id()) else {
            return Vec::new();
        };
        let date = self.date.format(DATE_FORMAT).to_string();
        roster
            .iter()
            .filter_map(|s| s.id)
            .map(|student_id| AttendanceMark {
                date: date.clone(),
                class_id,
                section_id,
                student_id,
                present: self.is_present(student_id),
            })
            .collect()
    }

    pub fn summary(&self, roster: &[&StudentRecord]) -> Vec<PresenceRow> {
        let days: Vec<String> = self.days().iter().map(|d| d.format(DATE_FORMAT).to_string()).collect();
        let marks = self.cascade.section_items();
        roster
            .iter()
            .filter_map(|s| Some((s.id?, s.full_name())))
            .map(|(student_id, name)| PresenceRow {
                student_id,
                name,
                days: days
                    .iter()
                    .map(|day| {
                        marks.iter().find(|m| m.student_id == student_id && &m.date == day).map(|m| m.present)
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lookup;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mark(day: &str, student_id: i64, present: bool) -> AttendanceMark {
        AttendanceMark { date: day.into(), class_id: 1, section_id: 1, student_id, present }
    }

    fn ready(page: &mut AttendancePage) -> SectionRequest {
        let req = page.select_class(1);
        page.cascade.accept_sections(req.ticket, Ok(vec![Lookup::new(1, "A")]));
        page.select_section(1).unwrap()
    }

    fn students() -> Vec<StudentRecord> {
        vec![
            StudentRecord { id: Some(1), first_name: "Ravi".into(), class_id: 1, section_id: 1, ..Default::default() },
            StudentRecord { id: Some(2), first_name: "Asha".into(), class_id: 1, section_id: 1, ..Default::default() },
            StudentRecord { id: Some(3), first_name: "Kiran".into(), class_id: 1, section_id: 2, ..Default::default() },
        ]
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-07-03 is a Wednesday.
        let days = week_days(date(2024, 7, 3));
        assert_eq!(days.first(), Some(&date(2024, 6, 30)));
        assert_eq!(days.last(), Some(&date(2024, 7, 6)));
        assert_eq!(week_days(date(2024, 6, 30))[0], date(2024, 6, 30));
    }

    #[test]
    fn month_covers_every_day() {
        assert_eq!(month_days(date(2024, 2, 17)).len(), 29);
        assert_eq!(month_days(date(2023, 2, 1)).len(), 28);
        assert_eq!(month_days(date(2024, 7, 31))[0], date(2024, 7, 1));
    }

    #[test]
    fn roster_is_the_selected_section() {
        let mut page = AttendancePage::new(date(2024, 7, 3));
        assert!(page.roster(&students()).is_empty());
        ready(&mut page);
        assert_eq!(page.roster(&students()).len(), 2);
    }

    #[test]
    fn daily_marks_default_to_present() {
        let mut page = AttendancePage::new(date(2024, 7, 3));
        let req = ready(&mut page);
        page.accept_marks(req.ticket, vec![mark("2024-07-03", 2, false)]);
        let students = students();
        let roster = page.roster(&students);
        let marks = page.daily_marks(&roster);
        assert_eq!(marks.len(), 2);
        assert!(marks[0].present);
        assert!(!marks[1].present);
        page.toggle(1, false);
        assert!(!page.daily_marks(&roster)[0].present);
    }

    #[test]
    fn weekly_summary_and_percent() {
        let mut page = AttendancePage::new(date(2024, 7, 3));
        ready(&mut page);
        let req = page.set_tab(AttendanceTab::Weekly).unwrap();
        assert_eq!(page.range(), ("2024-06-30".to_string(), "2024-07-06".to_string()));
        page.accept_marks(req.ticket, vec![
            mark("2024-07-01", 1, true),
            mark("2024-07-02", 1, false),
            mark("2024-07-03", 1, true),
            mark("2024-07-04", 1, true),
        ]);
        let students = students();
        let rows = page.summary(&page.roster(&students));
        assert_eq!(rows[0].days.len(), 7);
        assert_eq!(rows[0].days[1], Some(true));
        assert_eq!(rows[0].days[0], None);
        assert_eq!(rows[0].percent(), Some(75.0));
        assert_eq!(rows[1].percent(), None);
    }

    #[test]
    fn stale_marks_after_date_change_are_dropped() {
        let mut page = AttendancePage::new(date(2024, 7, 3));
        let old = ready(&mut page);
        page.set_date(date(2024, 7, 4));
        page.accept_marks(old.ticket, vec![mark("2024-07-03", 1, false)]);
        assert!(page.cascade.section_items().is_empty());
    }
}

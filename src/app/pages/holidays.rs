use crate::forms::{FormState, SubmitBlocked, parse_date, schemas};
use crate::model::Holiday;

#[derive(Debug, Clone)]
pub struct HolidaysPage {
    pub form: FormState,
}

impl Default for HolidaysPage {
    fn default() -> Self {
        Self { form: FormState::new(schemas::holiday()) }
    }
}

/// Holidays by date, undated entries last.
pub fn sorted(holidays: &[Holiday]) -> Vec<&Holiday> {
    let mut sorted: Vec<&Holiday> = holidays.iter().collect();
    sorted.sort_by_key(|h| (parse_date(&h.date).is_none(), parse_date(&h.date), h.id));
    sorted
}

impl HolidaysPage {
    pub fn submit(&mut self) -> Result<(String, String), SubmitBlocked> {
        self.form.begin_submit()?;
        Ok((self.form.value("name").trim().to_string(), self.form.value("date").trim().to_string()))
    }

    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(id: i64, date: &str) -> Holiday {
        Holiday { id, name: format!("H{id}"), date: date.into() }
    }

    #[test]
    fn sorted_by_date() {
        let holidays = vec![holiday(1, "2024-12-25"), holiday(2, "bad"), holiday(3, "2024-08-15")];
        let ids: Vec<i64> = sorted(&holidays).iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn holiday_needs_a_valid_date() {
        let mut page = HolidaysPage::default();
        page.form.set("name", "Diwali");
        page.form.set("date", "01/11/2024");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit() else {
            panic!("bad date accepted");
        };
        assert_eq!(errors.get("date"), Some("Date must be a date (YYYY-MM-DD)"));
        page.form.set("date", "2024-11-01");
        assert_eq!(page.submit().unwrap(), ("Diwali".to_string(), "2024-11-01".to_string()));
    }
}

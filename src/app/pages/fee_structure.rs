use crate::fees::{compute_per_term, total_amount};
use crate::forms::{FormState, SubmitBlocked, ValidationErrors, schemas};
use crate::model::{FeeItem, FeeStructure, Lookup};

use super::{id_string, lookup_or_default};

#[derive(Debug, Clone)]
pub struct FeeStructurePage {
    pub form: FormState,
    pub item_form: FormState,
    pub items: Vec<FeeItem>,
    /// Index of the item loaded into the sub-form.
    pub editing_item: Option<usize>,
    pub editing: Option<i64>,
    pub show_form: bool,
    pub items_error: Option<String>,
}

impl Default for FeeStructurePage {
    fn default() -> Self {
        Self {
            form: FormState::new(schemas::fee_structure()),
            item_form: FormState::new(schemas::fee_item()),
            items: Vec::new(),
            editing_item: None,
            editing: None,
            show_form: false,
            items_error: None,
        }
    }
}

impl FeeStructurePage {
    pub fn open_new(&mut self) {
        *self = Self { show_form: true, ..Self::default() };
    }

    pub fn open_edit(&mut self, structure: &FeeStructure) {
        self.open_new();
        self.form.load([
            ("class_id", structure.class_id.to_string()),
            ("academic_year", structure.academic_year.clone()),
            ("number_of_terms", structure.number_of_terms.to_string()),
            ("is_active", structure.is_active.to_string()),
        ]);
        self.items = structure.fee_items.clone();
        self.editing = structure.id;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> f64 {
        total_amount(&self.items)
    }

    pub fn per_term(&self) -> f64 {
        compute_per_term(self.total(), self.form.integer("number_of_terms"))
    }

    /// Validates the item sub-form. The item being edited is replaced in
    /// place, anything else is appended.
    pub fn add_item(&mut self, fee_types: &[Lookup]) -> Result<(), ValidationErrors> {
        self.item_form.validate_all()?;
        let form = &self.item_form;
        let description = form.value("description").trim();
        let edited = self.editing_item.take().and_then(|i| self.items.get_mut(i));
        let fee_type = match lookup_or_default(fee_types, form.id("fee_type")) {
            found if found.is_unset() => edited
                .as_ref()
                .map(|item| item.fee_type.clone())
                .filter(|t| Some(t.id) == form.id("fee_type"))
                .unwrap_or_default(),
            found => found,
        };
        let item = FeeItem {
            id: edited.as_ref().map_or(0, |item| item.id),
            name: form.value("name").trim().to_string(),
            amount: form.number("amount"),
            fee_type,
            description: (!description.is_empty()).then(|| description.to_string()),
            is_required: form.flag("is_required"),
        };
        match edited {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
        self.items_error = None;
        self.item_form.reset();
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.items.remove(index);
        match self.editing_item {
            Some(i) if i == index => {
                self.editing_item = None;
                self.item_form.reset();
            }
            Some(i) if i > index => self.editing_item = Some(i - 1),
            _ => {}
        }
    }

    /// Loads an item into the sub-form. It stays on the list until the
    /// edit is applied.
    pub fn edit_item(&mut self, index: usize) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        self.editing_item = Some(index);
        self.item_form.load([
            ("name", item.name.clone()),
            ("fee_type", id_string(&item.fee_type)),
            ("amount", item.amount.to_string()),
            ("description", item.description.clone().unwrap_or_default()),
            ("is_required", item.is_required.to_string()),
        ]);
    }

    pub fn submit(&mut self, classes: &[Lookup]) -> Result<FeeStructure, SubmitBlocked> {
        if self.form.is_pending() {
            return Err(SubmitBlocked::Pending);
        }
        self.items_error = self.items.is_empty().then(|| "Add at least one fee item".to_string());
        let header = self.form.begin_submit();
        if let Some(message) = self.items_error.clone() {
            if header.is_ok() {
                self.form.finish_submit(false);
            }
            let mut errors = match header {
                Err(SubmitBlocked::Invalid(errors)) => errors,
                _ => ValidationErrors::default(),
            };
            errors.0.insert("fee_items", message);
            return Err(SubmitBlocked::Invalid(errors));
        }
        header?;

        let class = lookup_or_default(classes, self.form.id("class_id"));
        let mut structure = FeeStructure {
            id: self.editing,
            class_id: class.id,
            class_name: class.name,
            academic_year: self.form.value("academic_year").trim().to_string(),
            total_amount: 0.0,
            fee_items: self.items.clone(),
            number_of_terms: self.form.integer("number_of_terms").max(1),
            is_active: self.form.flag("is_active"),
        };
        structure.recompute_total();
        Ok(structure)
    }

    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(success);
        if success {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee_types() -> Vec<Lookup> {
        crate::model::default_fee_types()
    }

    fn add(page: &mut FeeStructurePage, name: &str, amount: &str) {
        page.item_form.set("name", name.to_string());
        page.item_form.set("fee_type", "1");
        page.item_form.set("amount", amount.to_string());
        page.add_item(&fee_types()).unwrap();
    }

    #[test]
    fn total_and_per_term_follow_items() {
        let mut page = FeeStructurePage::default();
        page.open_new();
        add(&mut page, "Tuition", "6000");
        add(&mut page, "Books", "3000");
        page.form.set("number_of_terms", "3");
        assert_eq!(page.total(), 9000.0);
        assert_eq!(page.per_term(), 3000.0);
        page.remove_item(1);
        assert_eq!(page.total(), 6000.0);
    }

    #[test]
    fn needs_at_least_one_item() {
        let mut page = FeeStructurePage::default();
        page.open_new();
        page.form.set("class_id", "1");
        page.form.set("academic_year", "2024-25");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(&[Lookup::new(1, "LKG")]) else {
            panic!("expected the missing items error");
        };
        assert_eq!(errors.get("fee_items"), Some("Add at least one fee item"));
        assert!(!page.form.is_pending());
    }

    #[test]
    fn submit_computes_total_from_items() {
        let mut page = FeeStructurePage::default();
        page.open_new();
        page.form.set("class_id", "1");
        page.form.set("academic_year", "2024-25");
        page.form.set("number_of_terms", "2");
        add(&mut page, "Tuition", "5000");
        add(&mut page, "Uniform", "1500.50");
        let structure = page.submit(&[Lookup::new(1, "LKG")]).unwrap();
        assert_eq!(structure.class_name, "LKG");
        assert_eq!(structure.total_amount, 6500.5);
        assert_eq!(structure.fee_items[0].fee_type.name, "School Fee");
        assert!(page.form.is_pending());
    }

    #[test]
    fn bad_item_is_not_added() {
        let mut page = FeeStructurePage::default();
        page.item_form.set("name", "Books");
        page.item_form.set("amount", "-10");
        let errors = page.add_item(&fee_types()).unwrap_err();
        assert_eq!(errors.get("amount"), Some("Amount must be positive"));
        assert_eq!(errors.get("fee_type"), Some("Fee type is required"));
        assert!(page.items.is_empty());
    }

    #[test]
    fn edited_item_stays_listed_until_applied() {
        let mut page = FeeStructurePage::default();
        page.open_new();
        page.form.set("class_id", "1");
        page.form.set("academic_year", "2024-25");
        add(&mut page, "Tuition", "5000");
        add(&mut page, "Books", "800");
        page.edit_item(0);
        assert_eq!(page.item_form.value("name"), "Tuition");
        assert_eq!(page.item_form.value("fee_type"), "1");

        let structure = page.submit(&[Lookup::new(1, "LKG")]).unwrap();
        assert_eq!(structure.fee_items.len(), 2);
        assert_eq!(structure.total_amount, 5800.0);
    }

    #[test]
    fn applied_edit_replaces_the_item_in_place() {
        let mut page = FeeStructurePage::default();
        add(&mut page, "Tuition", "5000");
        add(&mut page, "Books", "800");
        page.edit_item(0);
        page.item_form.set("amount", "5500");
        page.add_item(&fee_types()).unwrap();
        let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tuition", "Books"]);
        assert_eq!(page.items[0].amount, 5500.0);
        assert_eq!(page.editing_item, None);
    }

    #[test]
    fn removing_the_edited_item_clears_the_sub_form() {
        let mut page = FeeStructurePage::default();
        add(&mut page, "Tuition", "5000");
        add(&mut page, "Books", "800");
        page.edit_item(1);
        page.remove_item(0);
        assert_eq!(page.editing_item, Some(0));
        page.remove_item(0);
        assert_eq!(page.editing_item, None);
        assert_eq!(page.item_form.value("name"), "");
    }
}

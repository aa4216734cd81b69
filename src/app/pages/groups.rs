use crate::forms::{FormState, SubmitBlocked, ValidationErrors, schemas};
use crate::model::{Group, GroupMember, Lookup, StudentRecord};

/// Everyone who can be added to a group: students with an id, then teachers.
pub fn candidates(students: &[StudentRecord], teachers: &[Lookup]) -> Vec<GroupMember> {
    let students = students.iter().filter_map(|s| {
        Some(GroupMember::Student {
            id: s.id?,
            name: s.full_name(),
            class_name: s.class_name.clone(),
            section_name: s.section_name.clone(),
        })
    });
    let teachers = teachers.iter().map(|t| GroupMember::Teacher { id: t.id, name: t.name.clone() });
    students.chain(teachers).collect()
}

#[derive(Debug, Clone)]
pub struct GroupsPage {
    pub form: FormState,
    pub members: Vec<GroupMember>,
    pub editing: Option<i64>,
    pub show_form: bool,
}

impl Default for GroupsPage {
    fn default() -> Self {
        Self { form: FormState::new(schemas::group()), members: Vec::new(), editing: None, show_form: false }
    }
}

impl GroupsPage {
    pub fn open_new(&mut self) {
        *self = Self { show_form: true, ..Self::default() };
    }

    pub fn open_edit(&mut self, group: &Group) {
        self.open_new();
        self.form.load([("name", group.name.clone())]);
        self.members = group.members.clone();
        self.editing = Some(group.id);
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Adds `member` unless it is already in the group.
    pub fn add_member(&mut self, member: GroupMember) -> bool {
        if self.members.iter().any(|m| m.key() == member.key()) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn remove_member(&mut self, key: &str) {
        self.members.retain(|m| m.key() != key);
    }

    /// Candidates not yet in the group.
    pub fn available(&self, candidates: Vec<GroupMember>) -> Vec<GroupMember> {
        candidates.into_iter().filter(|c| !self.members.iter().any(|m| m.key() == c.key())).collect()
    }

    pub fn submit(&mut self) -> Result<Group, SubmitBlocked> {
        if self.form.is_pending() {
            return Err(SubmitBlocked::Pending);
        }
        let header = self.form.begin_submit();
        if self.members.is_empty() {
            if header.is_ok() {
                self.form.finish_submit(false);
            }
            let mut errors = match header {
                Err(SubmitBlocked::Invalid(errors)) => errors,
                _ => ValidationErrors::default(),
            };
            errors.0.insert("members", "Add at least one member".into());
            return Err(SubmitBlocked::Invalid(errors));
        }
        header?;
        Ok(Group {
            id: self.editing.unwrap_or_default(),
            name: self.form.value("name").trim().to_string(),
            members: self.members.clone(),
        })
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

    fn teacher(id: i64) -> GroupMember {
        GroupMember::Teacher { id, name: format!("Teacher {id}") }
    }

    #[test]
    fn group_needs_a_member() {
        let mut page = GroupsPage::default();
        page.open_new();
        page.form.set("name", "Science Club");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit() else {
            panic!("empty group accepted");
        };
        assert_eq!(errors.get("members"), Some("Add at least one member"));
        assert!(!page.form.is_pending());

        page.add_member(teacher(1));
        let group = page.submit().unwrap();
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.id, 0);
    }

    #[test]
    fn members_are_unique() {
        let mut page = GroupsPage::default();
        assert!(page.add_member(teacher(1)));
        assert!(!page.add_member(teacher(1)));
        assert_eq!(page.available(vec![teacher(1), teacher(2)]), vec![teacher(2)]);
        page.remove_member("teacher-1");
        assert!(page.members.is_empty());
    }

    #[test]
    fn candidates_skip_students_without_id() {
        let students = vec![
            StudentRecord { id: Some(3), first_name: "Ravi".into(), class_name: "LKG".into(), section_name: "A".into(), ..Default::default() },
            StudentRecord { first_name: "Unsaved".into(), ..Default::default() },
        ];
        let all = candidates(&students, &[Lookup::new(2, "Mary Johnson")]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].to_string(), "Ravi (LKG-A)");
        assert_eq!(all[1].key(), "teacher-2");
    }
}

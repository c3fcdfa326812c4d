use std::fmt;

use crate::model::{Action, Statement};

/// Which statement kinds to keep in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    update: bool,
    delete: bool,
    insert: bool,
}

impl Selection {
    pub fn all() -> Self {
        Self {
            update: true,
            delete: true,
            insert: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action) -> Self {
        match action {
            Action::Update => self.update = true,
            Action::Delete => self.delete = true,
            Action::Insert => self.insert = true,
        }
        self
    }

    pub fn contains(&self, action: Action) -> bool {
        match action {
            Action::Update => self.update,
            Action::Delete => self.delete,
            Action::Insert => self.insert,
        }
    }

    pub fn is_all(&self) -> bool {
        self.update && self.delete && self.insert
    }

    pub fn is_empty(&self) -> bool {
        !(self.update || self.delete || self.insert)
    }

    pub fn actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.contains(*a))
            .collect()
    }

    pub fn apply(&self, statements: Vec<Statement>) -> Vec<Statement> {
        if self.is_all() {
            return statements;
        }
        if self.is_empty() {
            return Vec::new();
        }
        statements
            .into_iter()
            .filter(|s| self.contains(s.action))
            .collect()
    }
}

impl FromIterator<Action> for Selection {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(Selection::none(), Selection::with)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.actions().into_iter().map(Action::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmts() -> Vec<Statement> {
        [Action::Insert, Action::Update, Action::Delete, Action::Update]
            .into_iter()
            .enumerate()
            .map(|(i, action)| Statement {
                record_id: i as u64 + 1,
                article_title: String::new(),
                action,
                changes: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn all_is_identity() {
        assert_eq!(Selection::all().apply(stmts()), stmts());
    }

    #[test]
    fn none_is_empty() {
        assert!(Selection::none().apply(stmts()).is_empty());
    }

    #[test]
    fn subset_keeps_order() {
        let sel: Selection = [Action::Update, Action::Insert].into_iter().collect();
        let kept: Vec<_> = sel.apply(stmts()).into_iter().map(|s| s.record_id).collect();
        assert_eq!(kept, [1, 2, 4]);
        assert_eq!(sel.to_string(), "update,insert");
    }
}

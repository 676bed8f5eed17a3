//! Dynamic `UPDATE` construction for partial patches.
//!
//! Column names come from a closed enum, never from caller input; every
//! value is bound as a positional parameter.

use rusqlite::types::Value;

use crate::models::TaskPatch;

/// A column that a patch is allowed to assign.
pub trait Column: Copy + PartialEq {
    fn name(self) -> &'static str;
}

/// Mutable columns of the `tasks` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskColumn {
    Title,
    Description,
    Completed,
}

impl Column for TaskColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Completed => "completed",
        }
    }
}

/// A ready-to-execute statement and its parameters in order.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Collects column assignments and renders a single `UPDATE ... WHERE id = ?`.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<C: Column> {
    table: &'static str,
    assignments: Vec<(C, Value)>,
}

impl<C: Column> UpdateBuilder<C> {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
        }
    }

    /// Assigns `value` to `column`. A repeated column keeps the last value.
    pub fn set(mut self, column: C, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
        self
    }

    pub fn set_opt<V: Into<Value>>(self, column: C, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders the statement for row `id`, or `None` if nothing was assigned.
    pub fn build(self, id: &str) -> Option<UpdateStatement> {
        if self.assignments.is_empty() {
            return None;
        }

        let set_clause = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column.name(), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_index = self.assignments.len() + 1;

        let mut params: Vec<Value> = self.assignments.into_iter().map(|(_, v)| v).collect();
        params.push(Value::Text(id.to_string()));

        Some(UpdateStatement {
            sql: format!(
                "UPDATE {} SET {} WHERE id = ?{}",
                self.table, set_clause, id_index
            ),
            params,
        })
    }
}

impl From<TaskPatch> for UpdateBuilder<TaskColumn> {
    fn from(patch: TaskPatch) -> Self {
        UpdateBuilder::new("tasks")
            .set_opt(TaskColumn::Title, patch.title)
            .set_opt(TaskColumn::Description, patch.description)
            .set_opt(TaskColumn::Completed, patch.completed)
    }
}

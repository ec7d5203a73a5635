use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// How a column value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    #[default]
    Text,
    /// Prefixed with `$`.
    Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub format: CellFormat,
}

impl Column {
    pub fn text(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            format: CellFormat::Text,
        }
    }

    pub fn currency(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            format: CellFormat::Currency,
        }
    }
}

/// Maps a posted form field name onto the record field it edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub source: String,
}

impl FormField {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityOperation {
    List,
    Create,
    Update,
    Delete,
    BulkDelete,
}

impl fmt::Display for EntityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityOperation::List => "list",
            EntityOperation::Create => "create",
            EntityOperation::Update => "update",
            EntityOperation::Delete => "delete",
            EntityOperation::BulkDelete => "bulk delete",
        };
        f.write_str(label)
    }
}

/// Endpoint and field contract of one list screen.
///
/// Paths are relative to the backend base URL; `{id}` in update/delete
/// templates is replaced with the row id. Operations without a path are not
/// offered by the backend for this entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    pub plural: String,
    pub list_path: String,
    pub list_key: String,
    pub record_key: String,
    pub search_param: String,
    pub filter_param: String,
    pub sort_param: String,
    pub create_path: Option<String>,
    pub update_path: Option<String>,
    pub delete_path: Option<String>,
    pub bulk_delete_path: Option<String>,
    pub bulk_id_key: String,
    pub columns: Vec<Column>,
    pub form_fields: Vec<FormField>,
    pub counters: Vec<String>,
    #[serde(default)]
    pub counter_format: CellFormat,
    /// Re-run the list query after a create instead of appending the row.
    pub refresh_after_create: bool,
    pub empty_message: String,
}

impl EntityDescriptor {
    pub fn new(name: &str, plural: &str) -> Self {
        Self {
            name: name.to_string(),
            plural: plural.to_string(),
            list_path: format!("{}/", plural),
            list_key: plural.to_string(),
            record_key: name.to_string(),
            search_param: "search".to_string(),
            filter_param: "filter_type".to_string(),
            sort_param: "sort_by".to_string(),
            create_path: None,
            update_path: None,
            delete_path: None,
            bulk_delete_path: None,
            bulk_id_key: format!("{}_ids", name),
            columns: Vec::new(),
            form_fields: Vec::new(),
            counters: Vec::new(),
            counter_format: CellFormat::Text,
            refresh_after_create: false,
            empty_message: format!("No {} found.", plural),
        }
    }

    pub fn with_list(mut self, path: &str, key: &str) -> Self {
        self.list_path = path.to_string();
        self.list_key = key.to_string();
        self
    }

    pub fn with_search_param(mut self, param: &str) -> Self {
        self.search_param = param.to_string();
        self
    }

    pub fn with_create(mut self, path: &str) -> Self {
        self.create_path = Some(path.to_string());
        self
    }

    pub fn with_update(mut self, template: &str) -> Self {
        self.update_path = Some(template.to_string());
        self
    }

    pub fn with_delete(mut self, template: &str) -> Self {
        self.delete_path = Some(template.to_string());
        self
    }

    pub fn with_bulk_delete(mut self, path: &str) -> Self {
        self.bulk_delete_path = Some(path.to_string());
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_form_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.form_fields = fields
            .iter()
            .map(|(name, source)| FormField::new(name, source))
            .collect();
        self
    }

    pub fn with_counters(mut self, counters: &[&str]) -> Self {
        self.counters = counters.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_counter_format(mut self, format: CellFormat) -> Self {
        self.counter_format = format;
        self
    }

    pub fn refreshing_after_create(mut self) -> Self {
        self.refresh_after_create = true;
        self
    }

    /// Relative endpoint path for `operation`, or `None` when unsupported.
    pub fn endpoint(&self, operation: EntityOperation, id: Option<&RecordId>) -> Option<String> {
        let template = match operation {
            EntityOperation::List => Some(&self.list_path),
            EntityOperation::Create => self.create_path.as_ref(),
            EntityOperation::Update => self.update_path.as_ref(),
            EntityOperation::Delete => self.delete_path.as_ref(),
            EntityOperation::BulkDelete => self.bulk_delete_path.as_ref(),
        }?;

        if template.contains("{id}") {
            let id = id?;
            Some(template.replace("{id}", &id.to_string()))
        } else {
            Some(template.clone())
        }
    }

    pub fn supports(&self, operation: EntityOperation) -> bool {
        match operation {
            EntityOperation::List => true,
            EntityOperation::Create => self.create_path.is_some(),
            EntityOperation::Update => self.update_path.is_some(),
            EntityOperation::Delete => self.delete_path.is_some(),
            EntityOperation::BulkDelete => self.bulk_delete_path.is_some(),
        }
    }

    pub fn students() -> Self {
        Self::new("student", "students")
            .with_create("add-student/")
            .with_update("update-student/{id}/")
            .with_delete("delete-student/{id}/")
            .with_bulk_delete("bulk-delete-students/")
            .with_columns(vec![
                Column::text("name", "Name"),
                Column::text("type", "Type"),
                Column::text("category", "Category"),
                Column::text("program", "Program"),
                Column::text("level", "Level"),
            ])
            .with_form_fields(&[
                ("student-name", "name"),
                ("student-type", "type"),
                ("student-program", "program"),
                ("student-level", "level"),
            ])
            .with_counters(&["total_students", "iot_students", "sod_students"])
    }

    pub fn employees() -> Self {
        Self::new("employee", "employees")
            .with_create("add-employee/")
            .with_update("update-employee/{id}/")
            .with_delete("delete-employee/{id}/")
            .with_bulk_delete("bulk-delete-employees/")
            .with_columns(vec![
                Column::text("name", "Name"),
                Column::text("position", "Position"),
                Column::text("department", "Department"),
                Column::text("salary", "Salary"),
            ])
            .with_form_fields(&[
                ("employee-name", "name"),
                ("employee-position", "position"),
                ("employee-department", "department"),
                ("employee-salary", "salary"),
            ])
            .with_counters(&["total_employees"])
    }

    /// Financial transactions. New rows come from the expense form and the
    /// whole list is reloaded afterwards.
    pub fn transactions() -> Self {
        Self::new("transaction", "transactions")
            .with_list("recent-transactions/", "transactions")
            .with_create("add-expense/")
            .with_update("update-transaction/{id}/")
            .with_delete("ajax-delete-transaction/{id}/")
            .with_columns(vec![
                Column::text("date", "Date"),
                Column::text("type", "Type"),
                Column::text("description", "Description"),
                Column::currency("amount", "Amount"),
            ])
            .with_form_fields(&[
                ("expense-type", "type"),
                ("expense-description", "description"),
                ("expense-amount", "amount"),
            ])
            .with_counters(&[
                "total_salaries",
                "transport_expenses",
                "other_expenses",
                "total_expenses",
            ])
            .with_counter_format(CellFormat::Currency)
            .refreshing_after_create()
    }

    pub fn activities() -> Self {
        Self::new("activity", "activities")
            .with_list("recent-activities/", "activities")
            .with_search_param("action_search")
            .with_delete("delete-recent-activity/{id}/")
            .with_columns(vec![
                Column::text("action", "Action"),
                Column::text("user", "User"),
                Column::text("timestamp", "When"),
            ])
    }

    pub fn presets() -> Vec<Self> {
        vec![
            Self::students(),
            Self::employees(),
            Self::transactions(),
            Self::activities(),
        ]
    }

    /// Looks up a preset by singular or plural name.
    pub fn preset(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::presets()
            .into_iter()
            .find(|entity| entity.name == wanted || entity.plural == wanted)
    }
}

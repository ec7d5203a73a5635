use panelsync_protocol::entity::EntityDescriptor;
use panelsync_protocol::mutation::{FormPayload, MutationRequest};
use panelsync_protocol::record::{RecordId, RowRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Update(RecordId),
}

/// Add/update form state for one entity.
///
/// The form stays open after a rejected submission so the user can fix the
/// input; it is reset and closed once the server accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityForm {
    mode: FormMode,
    fields: FormPayload,
    open: bool,
}

impl EntityForm {
    pub fn for_create(entity: &EntityDescriptor) -> Self {
        let mut fields = FormPayload::new();
        for field in &entity.form_fields {
            fields.set(&field.name, "");
        }
        Self {
            mode: FormMode::Add,
            fields,
            open: true,
        }
    }

    /// Opens the form prefilled from the row being edited.
    pub fn for_update(entity: &EntityDescriptor, record: &RowRecord) -> Self {
        let mut fields = FormPayload::new();
        for field in &entity.form_fields {
            fields.set(&field.name, record.text(&field.source));
        }
        Self {
            mode: FormMode::Update(record.id.clone()),
            fields,
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.set(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FormPayload {
        &self.fields
    }

    pub fn title(&self, entity: &EntityDescriptor) -> String {
        let verb = match self.mode {
            FormMode::Add => "Add",
            FormMode::Update(_) => "Update",
        };
        format!("{} {}", verb, capitalize(&entity.name))
    }

    pub fn request(&self) -> MutationRequest {
        match &self.mode {
            FormMode::Add => MutationRequest::Create {
                form: self.fields.clone(),
            },
            FormMode::Update(id) => MutationRequest::Update {
                id: id.clone(),
                form: self.fields.clone(),
            },
        }
    }

    /// Clears every value and closes the form.
    pub fn close(&mut self) {
        for (_, value) in self.fields.0.iter_mut() {
            value.clear();
        }
        self.open = false;
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

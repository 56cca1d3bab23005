// Edit surface for one card: the modal's state machine and its form.
//
// States
// - Closed, CreatingDraft, EditingExisting { card_id }.
// - Opening seeds the form; Save validates the whole form, dispatches commands, then closes;
//   Delete removes the card being edited, then closes; Cancel closes without dispatching.
//
// Notes
// - The tab, the actual-time toggle and the subtask inputs are view state only.
//   Nothing here is persisted.

use crate::modules::cards::core::state::Card;
use crate::modules::cards::use_cases::manage_cards::handler::{
    ApplicationError, CardCommandHandler,
};
use crate::shared::infrastructure::document_store::DocumentStore;
use crate::shared::infrastructure::list_directory::ListDirectory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("title is required")]
    TitleRequired,

    #[error("{field} must be a finite, non-negative number of hours")]
    InvalidHours { field: &'static str },

    #[error("editor is not open")]
    NotOpen,

    #[error("only an existing card can be deleted")]
    NotEditingExisting,

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    CreatingDraft,
    EditingExisting { card_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Edit,
    Preview,
}

/// `None` hours mean the field was left empty, which is not the same as zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardForm {
    pub title: String,
    pub content: String,
    pub estimated: Option<f64>,
    pub actual: Option<f64>,
}

impl CardForm {
    fn seeded_from(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            content: card.content.clone(),
            estimated: non_zero(card.spent_time_in_hour.estimated),
            actual: non_zero(card.spent_time_in_hour.actual),
        }
    }
}

fn check_hours(field: &'static str, hours: Option<f64>) -> Result<(), EditorError> {
    match hours {
        Some(hours) if !hours.is_finite() || hours < 0.0 => {
            Err(EditorError::InvalidHours { field })
        }
        _ => Ok(()),
    }
}

fn non_zero(hours: f64) -> Option<f64> {
    (hours != 0.0).then_some(hours)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskEdit {
    pub sub_task_id: String,
    pub title: String,
}

#[derive(Debug)]
pub struct CardEditor {
    state: EditorState,
    last_is_creating: bool,
    form: CardForm,
    tab: EditorTab,
    editing_actual_time: bool,
    sub_task_input: String,
    sub_task_edit: Option<SubTaskEdit>,
}

impl Default for CardEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CardEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Closed,
            last_is_creating: true,
            form: CardForm::default(),
            tab: EditorTab::Edit,
            editing_actual_time: false,
            sub_task_input: String::new(),
            sub_task_edit: None,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != EditorState::Closed
    }

    /// Open for a new card (`None`) or for an existing one.
    pub fn start_edit(&mut self, card: Option<&Card>) {
        match card {
            Some(card) => {
                self.state = EditorState::EditingExisting {
                    card_id: card.id.clone(),
                };
                self.form = CardForm::seeded_from(card);
                self.tab = EditorTab::Preview;
            }
            None => {
                self.state = EditorState::CreatingDraft;
                self.form = CardForm::default();
                self.tab = EditorTab::Edit;
            }
        }
        self.last_is_creating = card.is_none();
        self.editing_actual_time = false;
        self.sub_task_input.clear();
        self.sub_task_edit = None;
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }

    fn is_creating(&self) -> bool {
        match self.state {
            EditorState::CreatingDraft => true,
            EditorState::EditingExisting { .. } => false,
            EditorState::Closed => self.last_is_creating,
        }
    }

    pub fn title_label(&self) -> &'static str {
        if self.is_creating() {
            "Create a new card"
        } else {
            "Edit"
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.is_creating() { "Create" } else { "Save" }
    }

    pub fn form(&self) -> &CardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CardForm {
        &mut self.form
    }

    pub fn tab(&self) -> EditorTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: EditorTab) {
        self.tab = tab;
    }

    pub fn is_editing_actual_time(&self) -> bool {
        self.editing_actual_time
    }

    pub fn toggle_editing_actual_time(&mut self) {
        self.editing_actual_time = !self.editing_actual_time;
    }

    /// Validate, dispatch, close. Returns the id of the saved card.
    ///
    /// On any error the editor stays open with the form untouched.
    pub async fn save<TStore, TLists>(
        &mut self,
        handler: &CardCommandHandler<TStore, TLists>,
        list_id: &str,
    ) -> Result<String, EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        if !self.is_open() {
            return Err(EditorError::NotOpen);
        }
        if self.form.title.trim().is_empty() {
            return Err(EditorError::TitleRequired);
        }
        check_hours("estimated time", self.form.estimated)?;
        check_hours("actual time", self.form.actual)?;

        let form = &self.form;
        let card_id = match &self.state {
            EditorState::EditingExisting { card_id } => {
                handler.rename_card(card_id, &form.title).await?;
                handler.set_content(card_id, &form.content).await?;
                handler
                    .set_estimated_time(card_id, form.estimated.unwrap_or(0.0))
                    .await?;
                if let Some(actual) = form.actual {
                    handler.set_actual_time(card_id, actual).await?;
                }
                card_id.clone()
            }
            _ => {
                let card_id = handler.new_card_id();
                handler
                    .add_card(&card_id, list_id, &form.title, &form.content)
                    .await?;
                handler
                    .set_estimated_time(&card_id, form.estimated.unwrap_or(0.0))
                    .await?;
                card_id
            }
        };
        self.state = EditorState::Closed;
        Ok(card_id)
    }

    /// Deletes the card being edited and closes. Drafts have nothing to delete.
    pub async fn delete<TStore, TLists>(
        &mut self,
        handler: &CardCommandHandler<TStore, TLists>,
        list_id: &str,
    ) -> Result<(), EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        let card_id = match &self.state {
            EditorState::EditingExisting { card_id } => card_id,
            EditorState::CreatingDraft => return Err(EditorError::NotEditingExisting),
            EditorState::Closed => return Err(EditorError::NotOpen),
        };
        handler.delete_card(card_id, list_id).await?;
        self.state = EditorState::Closed;
        Ok(())
    }

    fn editing_card_id(&self) -> Result<&str, EditorError> {
        match &self.state {
            EditorState::EditingExisting { card_id } => Ok(card_id),
            _ => Err(EditorError::NotOpen),
        }
    }

    pub fn sub_task_input(&self) -> &str {
        &self.sub_task_input
    }

    pub fn set_sub_task_input(&mut self, value: impl Into<String>) {
        self.sub_task_input = value.into();
    }

    /// Adds the typed subtask and clears the input. Blank input is ignored (`Ok(None)`).
    pub async fn add_sub_task<TStore, TLists>(
        &mut self,
        handler: &CardCommandHandler<TStore, TLists>,
    ) -> Result<Option<String>, EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        let card_id = self.editing_card_id()?;
        let title = self.sub_task_input.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let (sub_task_id, _task) = handler.add_sub_task(card_id, title).await?;
        self.sub_task_input.clear();
        Ok(Some(sub_task_id))
    }

    pub async fn toggle_sub_task<TStore, TLists>(
        &self,
        handler: &CardCommandHandler<TStore, TLists>,
        sub_task_id: &str,
    ) -> Result<(), EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        handler
            .toggle_sub_task(self.editing_card_id()?, sub_task_id)
            .await?;
        Ok(())
    }

    pub async fn delete_sub_task<TStore, TLists>(
        &self,
        handler: &CardCommandHandler<TStore, TLists>,
        sub_task_id: &str,
    ) -> Result<(), EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        handler
            .delete_sub_task(self.editing_card_id()?, sub_task_id)
            .await?;
        Ok(())
    }

    pub fn sub_task_edit(&self) -> Option<&SubTaskEdit> {
        self.sub_task_edit.as_ref()
    }

    pub fn start_sub_task_edit(
        &mut self,
        sub_task_id: impl Into<String>,
        title: impl Into<String>,
    ) {
        self.sub_task_edit = Some(SubTaskEdit {
            sub_task_id: sub_task_id.into(),
            title: title.into(),
        });
    }

    pub fn set_sub_task_edit_title(&mut self, title: impl Into<String>) {
        if let Some(edit) = self.sub_task_edit.as_mut() {
            edit.title = title.into();
        }
    }

    pub fn cancel_sub_task_edit(&mut self) {
        self.sub_task_edit = None;
    }

    /// Saves the inline rename. A blank title keeps the edit open and dispatches nothing.
    pub async fn save_sub_task_edit<TStore, TLists>(
        &mut self,
        handler: &CardCommandHandler<TStore, TLists>,
    ) -> Result<bool, EditorError>
    where
        TStore: DocumentStore + ?Sized + 'static,
        TLists: ListDirectory + ?Sized,
    {
        let card_id = self.editing_card_id()?;
        let Some(edit) = self.sub_task_edit.as_ref() else {
            return Ok(false);
        };
        let title = edit.title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        handler
            .update_sub_task(card_id, &edit.sub_task_id, title)
            .await?;
        self.sub_task_edit = None;
        Ok(true)
    }
}

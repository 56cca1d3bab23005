use crate::modules::cards::use_cases::list_cards::queries_port::CardQueries;
use crate::modules::cards::use_cases::manage_cards::handler::CardCommandHandler;
use crate::shared::infrastructure::document_store::DocumentStore;
use crate::shared::infrastructure::list_directory::ListDirectory;
use std::sync::Arc;

/// The command handler as the shell holds it: collaborators chosen at startup.
pub type AppCommandHandler = CardCommandHandler<dyn DocumentStore, dyn ListDirectory>;

#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<dyn CardQueries>,
    pub handler: Arc<AppCommandHandler>,
}

impl AppState {
    /// Reads are served by the projection the handler writes to.
    pub fn new(handler: Arc<AppCommandHandler>) -> Self {
        let queries: Arc<dyn CardQueries> = handler.projection().clone();
        Self { queries, handler }
    }
}

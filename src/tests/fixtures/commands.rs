// Shared command fixtures.

use crate::modules::cards::use_cases::manage_cards::command::CardCommand;
use crate::tests::fixtures::cards::CardBuilder;

/// AddCard for the canonical card.
pub fn add_card_command() -> CardCommand {
    let card = CardBuilder::new().build();
    CardCommand::AddCard {
        card_id: card.id,
        title: card.title,
        content: card.content,
        created_time: card.created_time,
    }
}

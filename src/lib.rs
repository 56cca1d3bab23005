pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod document_store;
        pub mod list_directory;
    }
}

pub mod modules {
    pub mod cards {
        pub mod core {
            pub mod events;
            pub mod evolve;
            pub mod intents;
            pub mod state;
        }
        pub mod use_cases {
            pub mod manage_cards {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod list_cards {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod queries_port;
            }
            pub mod edit_card {
                pub mod editor;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod card_store;
                pub mod persistence_queue;
                pub mod projections_in_memory;
            }
        }
    }
}

pub mod shell;

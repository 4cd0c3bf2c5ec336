pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod event_store;
        pub mod key_value;
    }
}

pub mod modules {
    pub mod attendance {
        pub mod core {
            pub mod decision;
            pub mod events;
            pub mod evolve;
            pub mod projections;
            pub mod record;
            pub mod state;
        }
        pub mod use_cases {
            pub mod command_pipeline;
            pub mod record_attendance {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod delete_attendance {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod list_attendance {
                pub mod handler;
                pub mod projection;
                pub mod queries_port;
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod graphql;
            }
            pub mod outbound {
                pub mod local_store;
                pub mod projections;
                pub mod projections_in_memory;
                pub mod record_store;
                pub mod synchronized_store;
            }
        }
    }

    pub mod session {
        pub mod core {
            pub mod session;
        }
        pub mod use_cases {
            pub mod session_gate;
        }
        pub mod adapters {
            pub mod inbound {
                pub mod graphql;
            }
            pub mod outbound {
                pub mod identity;
                pub mod identity_in_memory;
                pub mod identity_local;
            }
        }
    }

    pub mod dashboard {
        pub mod core {
            pub mod renderer;
            pub mod view;
        }
        pub mod use_cases {
            pub mod dashboard;
            pub mod viewers;
        }
        pub mod adapters {
            pub mod inbound {
                pub mod html;
                pub mod http;
            }
        }
    }
}

pub mod shell;

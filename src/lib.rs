pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod intent_outbox;
    }
}

pub mod modules {
    pub mod attendance {
        pub mod core {
            pub mod capability;
            pub mod events;
            pub mod finalize;
            pub mod guards;
            pub mod intents;
            pub mod record;
            pub mod shift_policy;
            pub mod status;
            pub mod work_time;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod track_attendance {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod reconcile_day {
                pub mod command;
                pub mod job;
                pub mod scheduler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod resolve_correction {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod override_record {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod monthly_summary {
                pub mod aggregate;
                pub mod handler;
                pub mod projection;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod collaborators;
                pub mod collaborators_in_memory;
                pub mod intent_outbox;
                pub mod records;
                pub mod records_in_memory;
            }
        }
    }
}

pub mod shell;

pub mod shared {
    pub mod infrastructure {
        pub mod bounded_fetch;
        pub mod seed_list;
        pub mod watch_store;
    }
}

pub mod modules {
    pub mod artist_watch {
        pub mod core {
            pub mod baseline;
            pub mod creator;
            pub mod delta;
            pub mod membership;
            pub mod settings;
            pub mod snapshot;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod run_poll_cycle {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod reconcile_watch_set {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod manage_seeds {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod control_schedule {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod notifier;
                pub mod notifier_in_memory;
                pub mod notifier_webhook;
                pub mod upstream;
                pub mod upstream_http;
                pub mod upstream_in_memory;
            }
        }
    }
}

pub mod shell;

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod google_play_developer_api_datasource;
        pub(crate) mod service_account_credentials;
        #[cfg(test)]
        pub(crate) mod test_support;
        pub(crate) mod utils;
    }
    pub(crate) mod models {
        pub(crate) mod google_play_developer_api {
            pub(crate) mod product_purchase_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod receipt_payload;
        pub mod verification_result;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod config;
mod constants;
pub mod errors;
pub mod secrets;
pub mod util;

pub use data::datasources::service_account_credentials::ServiceAccountCredentials;

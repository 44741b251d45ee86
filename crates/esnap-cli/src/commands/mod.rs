pub mod list;
pub mod rotate;

use esnap_core::esnap_core_types::schema::OP_LOAD_CONFIG;
use esnap_core::{log_op_end, log_op_error, Config, Result};
use std::time::Instant;

/// Load the configuration from the environment, logging the outcome
pub(crate) fn load_config() -> Result<Config> {
    let started = Instant::now();
    match Config::from_env() {
        Ok(config) => {
            log_op_end!(
                OP_LOAD_CONFIG,
                duration_ms = started.elapsed().as_millis() as u64,
                endpoint = %config.base_url.redacted(),
                repository = %config.repository,
                retention_limit = config.retention.get()
            );
            Ok(config)
        }
        Err(err) => {
            log_op_error!(
                OP_LOAD_CONFIG,
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

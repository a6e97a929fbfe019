//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{CampusHubError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_smtp_config(&settings.smtp)?;
    validate_scheduler_config(&settings.scheduler)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusHubError::Config("Database URL is required".to_string()));
    }

    if !config.url.starts_with("postgres://") && !config.url.starts_with("postgresql://") {
        return Err(CampusHubError::Config(
            "Database URL must be a PostgreSQL connection string".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusHubError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusHubError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate SMTP configuration
fn validate_smtp_config(config: &super::SmtpConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CampusHubError::Config("SMTP host is required".to_string()));
    }

    if config.port == 0 {
        return Err(CampusHubError::Config("SMTP port is required".to_string()));
    }

    if config.username.is_empty() {
        return Err(CampusHubError::Config("SMTP username is required".to_string()));
    }

    Ok(())
}

/// Validate scheduler configuration
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if config.status_interval_secs == 0 || config.reminder_interval_secs == 0 {
        return Err(CampusHubError::Config(
            "Scheduler intervals must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

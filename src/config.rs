use config::{Config, ConfigError, File, FileFormat};
use tracing::{error, info};
use trax_drivetrain::DriveConfig;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Loads the drive configuration, layering `config/default.toml` over the
/// built-in defaults.
pub fn load_config() -> Result<DriveConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(Config::try_from(&DriveConfig::default())?)
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false))
        .build();

    match settings {
        Ok(settings) => match settings.try_deserialize::<DriveConfig>() {
            Ok(drive_config) => {
                info!("Successfully loaded configuration: {:?}", drive_config);
                Ok(drive_config)
            }
            Err(e) => {
                error!("Failed to parse configuration: {}", e);
                Err(e)
            }
        },
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

//! Process-wide runtime and service handles shared by the view models.

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use cityscope_core::Config;
use cityscope_directory::{CitySource, DirectoryClient};
use cityscope_weather::{WeatherProvider, WeatherSource};
use parking_lot::RwLock;

// Static tokio runtime that lives for the duration of the application
static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

// Replaced wholesale on re-initialization
static SERVICES: RwLock<Option<Services>> = RwLock::new(None);

#[derive(Clone)]
struct Services {
    directory: Arc<dyn CitySource>,
    weather: Arc<dyn WeatherSource>,
}

/// Initialize the tokio runtime (idempotent)
fn get_or_init_runtime() -> Result<tokio::runtime::Handle> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime.handle().clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("cityscope-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    // Another thread may have won the race; either runtime is fine
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .map(|r| r.handle().clone())
        .context("Tokio runtime unavailable")
}

/// Build the directory and weather clients from `config` and publish them.
/// Must be called before any model is created.
pub fn initialize_services(config: &Config) -> Result<()> {
    get_or_init_runtime()?;

    let directory =
        DirectoryClient::new(&config.directory).context("Failed to create directory client")?;
    let weather =
        WeatherProvider::new(&config.weather).context("Failed to create weather provider")?;

    if !config.weather.is_configured() {
        tracing::warn!("No weather API key configured - every weather lookup will fail");
    }

    install_services(Arc::new(directory), Arc::new(weather));
    tracing::info!(
        "Services initialized (directory: {}, page size {})",
        config.directory.base_url,
        config.directory.page_size
    );
    Ok(())
}

/// Publish arbitrary sources, replacing any previous ones.
pub fn install_services(directory: Arc<dyn CitySource>, weather: Arc<dyn WeatherSource>) {
    *SERVICES.write() = Some(Services { directory, weather });
}

pub fn get_runtime() -> Option<tokio::runtime::Handle> {
    RUNTIME.get().map(|r| r.handle().clone())
}

/// Get the directory source and runtime for use by CityTableModels
pub fn get_directory_service() -> Option<(Arc<dyn CitySource>, tokio::runtime::Handle)> {
    let directory = SERVICES.read().as_ref()?.directory.clone();
    Some((directory, get_runtime()?))
}

/// Get the weather source and runtime for use by WeatherModels
pub fn get_weather_service() -> Option<(Arc<dyn WeatherSource>, tokio::runtime::Handle)> {
    let weather = SERVICES.read().as_ref()?.weather.clone();
    Some((weather, get_runtime()?))
}

/// Run `future` to completion on the shared runtime.
///
/// For one-shot CLI commands; never call from inside the runtime.
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = get_or_init_runtime()?;
    Ok(runtime.block_on(future))
}

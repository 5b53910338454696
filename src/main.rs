//! cityscope — browse cities and their current weather from the terminal.
//!
//!   $ cityscope                       interactive shell at /
//!   $ cityscope shell /weather/Oslo   shell opened on a weather page
//!   $ cityscope list --search lon --sort country --pages 2
//!   $ cityscope suggest ber
//!   $ cityscope weather "San José"
mod args;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cityscope_core::{AppError, Config, WeatherError};
use cityscope_engine::{CityListEngine, CitySource};
use cityscope_ui::{bridge, Route, Shell};
use cityscope_weather::WeatherSource;

use crate::args::{CliArgs, Commands};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    cityscope_core::init(if args.verbose { "debug" } else { "info" })?;

    let (config, _validation) =
        Config::load_validated(args.config.as_deref()).map_err(AppError::from)?;
    bridge::initialize_services(&config)?;

    match args.command.unwrap_or(Commands::Shell {
        route: "/".to_string(),
    }) {
        Commands::Shell { route } => {
            let stdin = io::stdin();
            let mut shell = Shell::new(config.ui.clone(), io::stdout());
            shell.run(Route::parse(&route), stdin.lock())?;
        }
        Commands::List {
            search,
            country,
            timezone,
            sort,
            pages,
        } => {
            let source = directory()?;
            let mut engine = CityListEngine::new(source);
            let loaded = bridge::block_on(engine.load_pages(pages))?;
            tracing::debug!("Loaded {} page(s)", loaded);

            let state = engine.state_mut();
            state.set_search_term(search);
            state.set_country(country);
            state.set_timezone(timezone);
            for key in sort {
                state.request_sort(key);
            }

            let mut out = io::stdout().lock();
            for city in engine.view() {
                writeln!(out, "{}\t{}\t{}", city.name, city.country, city.timezone)?;
            }
            if engine.state().is_exhausted() {
                writeln!(out, "No more cities to load.")?;
            }
        }
        Commands::Suggest { query } => {
            let source = directory()?;
            let mut engine = CityListEngine::new(source);
            let names: Vec<String> = bridge::block_on(engine.suggestions(&query))?
                .iter()
                .map(|c| c.name.clone())
                .collect();

            let mut out = io::stdout().lock();
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        Commands::Weather { city } => {
            let (source, _) = bridge::get_weather_service().context("Weather service unavailable")?;
            match bridge::block_on(source.current(&city))? {
                Ok(snapshot) => {
                    let kind = snapshot.condition.kind();
                    println!("{} {} ({})", kind.glyph(), city, snapshot.condition.description);
                    println!("Temperature: {:.1} °C", snapshot.temperature);
                    println!("Humidity:    {:.0} %", snapshot.humidity);
                    println!("Wind speed:  {:.1} m/s", snapshot.wind_speed);
                    println!("Pressure:    {:.0} hPa", snapshot.pressure);
                }
                Err(e) => {
                    tracing::debug!("Weather lookup failed: {}", e);
                    let err = AppError::from(WeatherError::CityUnavailable(city));
                    bail!("{}", err.user_message());
                }
            }
        }
    }

    Ok(())
}

fn directory() -> Result<Arc<dyn CitySource>> {
    bridge::get_directory_service()
        .map(|(source, _)| source)
        .context("Directory service unavailable")
}


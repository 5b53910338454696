//! Line-oriented terminal shell: routes between the city table and the
//! weather view and redraws the screen after every command.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use cityscope_core::UiConfig;
use cityscope_directory::CitySource;
use cityscope_engine::SortKey;
use cityscope_weather::WeatherSource;
use tokio::runtime::Handle;

use crate::models::{CityTableModel, WeatherModel, WeatherViewState};
use crate::router::Route;

const TITLE: &str = "Cityscope";
const RULE_WIDTH: usize = 78;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

const HELP: &str = "\
Commands:
  search [TEXT]       filter by name (empty clears) and show suggestions
  country [NAME]      only show NAME (empty clears)
  timezone [ZONE]     only show ZONE (empty clears)
  countries           list countries seen so far
  timezones           list timezones seen so far
  sort name|country|timezone
                      click a column header
  down [N] | up [N]   scroll N rows (default one screen)
  bottom              scroll to the end, loading more cities
  open ROW            show weather for the city in ROW
  go PATH             navigate to PATH (e.g. / or /weather/Paris)
  back                return to the previous screen
  help | quit";

type TableFactory = Box<dyn Fn() -> CityTableModel>;

pub struct Shell<W: Write> {
    out: W,
    ui: UiConfig,
    route: Route,
    history: Vec<Route>,
    table: Option<CityTableModel>,
    weather: WeatherModel,
    make_table: TableFactory,
}

impl<W: Write> Shell<W> {
    /// Shell backed by the services published in [`crate::bridge`].
    pub fn new(ui: UiConfig, out: W) -> Self {
        let rows = ui.rows_per_screen;
        Self::build(
            ui,
            out,
            Box::new(move || CityTableModel::new(rows)),
            WeatherModel::new(),
        )
    }

    pub fn with_services(
        ui: UiConfig,
        out: W,
        directory: Arc<dyn CitySource>,
        weather: Arc<dyn WeatherSource>,
        runtime: Handle,
    ) -> Self {
        let rows = ui.rows_per_screen;
        let table_runtime = runtime.clone();
        Self::build(
            ui,
            out,
            Box::new(move || {
                CityTableModel::with_services(directory.clone(), table_runtime.clone(), rows)
            }),
            WeatherModel::with_services(weather, runtime),
        )
    }

    fn build(ui: UiConfig, out: W, make_table: TableFactory, weather: WeatherModel) -> Self {
        Self {
            out,
            ui,
            route: Route::CityList,
            history: Vec::new(),
            table: None,
            weather,
            make_table,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Enter `start`, then process commands from `input` until `quit` or EOF.
    pub fn run<R: BufRead>(&mut self, start: Route, input: R) -> Result<()> {
        tracing::info!("Shell starting at {}", start);
        self.enter(start);
        self.settle();
        self.render()?;

        for line in input.lines() {
            let line = line?;
            if !self.handle(&line)? {
                break;
            }
            self.settle();
            self.render()?;
        }

        tracing::info!("Shell exiting");
        Ok(())
    }

    /// Returns false when the shell should exit.
    fn handle(&mut self, line: &str) -> Result<bool> {
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "quit" | "exit" | "q" => return Ok(false),
            "help" | "?" => writeln!(self.out, "{}", HELP)?,
            "go" => self.navigate(Route::parse(arg)),
            "back" => {
                if let Some(previous) = self.history.pop() {
                    self.enter(previous);
                }
            }
            "open" => self.open_row(arg)?,
            "search" | "country" | "timezone" | "countries" | "timezones" | "sort" | "down"
            | "up" | "bottom" => self.table_command(command, arg)?,
            other => writeln!(self.out, "Unknown command '{}'. Type 'help'.", other)?,
        }
        Ok(true)
    }

    fn table_command(&mut self, command: &str, arg: &str) -> Result<()> {
        let page = i64::from(self.ui.rows_per_screen.max(1));
        let Some(table) = self.table.as_mut() else {
            writeln!(self.out, "'{}' only works on the city list (go /)", command)?;
            return Ok(());
        };

        match command {
            // The search term is used verbatim, spaces included
            "search" => table.type_search(arg),
            "country" => table.select_country(arg.trim()),
            "timezone" => table.select_timezone(arg.trim()),
            "countries" => {
                let facets = table.facets();
                writeln!(self.out, "Countries: {}", facets.countries.join(", "))?;
            }
            "timezones" => {
                let facets = table.facets();
                writeln!(self.out, "Timezones: {}", facets.timezones.join(", "))?;
            }
            "sort" => match arg.parse::<SortKey>() {
                Ok(key) => table.click_header(key),
                Err(e) => writeln!(self.out, "{}", e)?,
            },
            "down" => table.scroll_by(scroll_amount(arg, page)),
            "up" => table.scroll_by(scroll_amount(arg, page).saturating_neg()),
            "bottom" => table.scroll_to_bottom(),
            _ => {}
        }
        Ok(())
    }

    fn open_row(&mut self, arg: &str) -> Result<()> {
        let route = self.table.as_ref().and_then(|table| {
            let row: usize = arg.trim().parse().ok()?;
            table.row_route(row.checked_sub(1)?)
        });

        match route {
            Some(route) => self.navigate(route),
            None => writeln!(self.out, "No row '{}' on this screen", arg.trim())?,
        }
        Ok(())
    }

    fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.route, Route::CityList);
        self.history.push(previous);
        self.enter(route);
    }

    fn enter(&mut self, route: Route) {
        tracing::debug!("Entering {}", route);
        match &route {
            Route::CityList => {
                // Fresh model every time: pagination restarts from page 1
                let mut table = (self.make_table)();
                table.mount();
                self.table = Some(table);
            }
            Route::Weather { city } => {
                self.table = None;
                self.weather.navigate(city);
            }
            Route::NotFound(path) => {
                tracing::warn!("No route for {}", path);
                self.table = None;
            }
        }
        self.route = route;
    }

    /// Wait for in-flight fetches, up to the configured timeout.
    fn settle(&mut self) {
        let deadline = Instant::now() + Duration::from_millis(self.ui.settle_timeout_ms);
        loop {
            self.weather.poll_channel();
            let mut busy = self.weather.is_busy();
            if let Some(table) = self.table.as_mut() {
                table.poll_channel();
                busy |= table.is_busy();
            }
            if !busy {
                return;
            }
            if Instant::now() >= deadline {
                tracing::debug!("Redrawing with fetches still in flight");
                return;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn render(&mut self) -> Result<()> {
        self.render_header()?;
        match self.route.clone() {
            Route::CityList => self.render_table()?,
            Route::Weather { city } => self.render_weather(&city)?,
            Route::NotFound(path) => writeln!(self.out, "Page not found: {}", path)?,
        }
        self.render_footer()?;
        self.out.flush()?;
        Ok(())
    }

    fn render_header(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, " {}  {}", TITLE, self.route)?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    fn render_footer(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.out, " Type 'help' for commands, 'quit' to exit.")?;
        write!(self.out, "> ")?;
        Ok(())
    }

    fn render_table(&mut self) -> Result<()> {
        let Some(table) = self.table.as_ref() else {
            return Ok(());
        };
        let criteria = table.state().criteria();

        writeln!(
            self.out,
            " Search: \"{}\"   Country: {}   Timezone: {}",
            criteria.search_term,
            or_any(&criteria.country),
            or_any(&criteria.timezone)
        )?;
        if !table.suggestions().is_empty() {
            let names: Vec<&str> = table.suggestions().iter().map(|c| c.name.as_str()).collect();
            writeln!(self.out, " Suggestions: {}", names.join(", "))?;
        }
        if let Some(message) = table.error_message() {
            writeln!(self.out, " Error: {}", message)?;
        }
        writeln!(self.out)?;

        writeln!(
            self.out,
            " {:>5}  {:<30} {:<26} {}",
            "#",
            table.column_header(SortKey::Name),
            table.column_header(SortKey::Country),
            table.column_header(SortKey::Timezone)
        )?;

        let (range, rows) = table.visible_rows();
        for (offset, city) in rows.iter().enumerate() {
            writeln!(
                self.out,
                " {:>5}  {:<30} {:<26} {}",
                range.start + offset + 1,
                city.name,
                city.country,
                city.timezone
            )?;
        }

        let total = table.rows().len();
        if total == 0 {
            writeln!(self.out, " (no cities)")?;
        } else {
            writeln!(
                self.out,
                " Rows {}-{} of {}",
                range.start + 1,
                range.start + rows.len(),
                total
            )?;
        }
        if let Some(status) = table.footer_text() {
            writeln!(self.out, " {}", status)?;
        }
        Ok(())
    }

    fn render_weather(&mut self, city: &str) -> Result<()> {
        writeln!(self.out, " Weather in {}", city)?;
        writeln!(self.out)?;
        match self.weather.state() {
            WeatherViewState::Idle | WeatherViewState::Loading => {
                writeln!(self.out, " Loading...")?
            }
            WeatherViewState::Error(message) => writeln!(self.out, " {}", message)?,
            WeatherViewState::Data(snapshot) => {
                let kind = snapshot.condition.kind();
                writeln!(
                    self.out,
                    " {} {}  {}",
                    kind.glyph(),
                    kind.icon_name(),
                    snapshot.condition.description
                )?;
                writeln!(self.out, " Temperature: {:.1} °C", snapshot.temperature)?;
                writeln!(self.out, " Humidity:    {:.0} %", snapshot.humidity)?;
                writeln!(self.out, " Wind speed:  {:.1} m/s", snapshot.wind_speed)?;
                writeln!(self.out, " Pressure:    {:.0} hPa", snapshot.pressure)?;
                writeln!(
                    self.out,
                    " Updated:     {}",
                    snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
                )?;
            }
        }
        writeln!(self.out)?;
        writeln!(self.out, " (back) Back to City List")?;
        Ok(())
    }
}

fn or_any(value: &str) -> &str {
    if value.is_empty() {
        "any"
    } else {
        value
    }
}

fn scroll_amount(arg: &str, default: i64) -> i64 {
    arg.trim().parse().unwrap_or(default)
}

use std::error::Error;

use iced::{Size, Task};
use school_admin::app::App;
use school_admin::config::Config;
use school_admin::source::DataSource;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("school_admin=info")))
        .init();

    let config = Config::from_env();
    let source = match DataSource::from_config(&config) {
        Ok(source) => source,
        Err(err) => {
            error!(%err, "configured data source unavailable, falling back to the in-memory mock");
            DataSource::mock()?
        }
    };

    iced::application("School Admin", App::update, App::view)
        .theme(|app: &App| app.theme.clone())
        .window_size(Size::new(1400.0, 800.0))
        .run_with(move || (App::new(config, source), Task::none()))?;
    Ok(())
}

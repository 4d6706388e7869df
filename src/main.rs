//! xform - print the matrices of a configured transform pipeline
//!
//! Reads `config/default.toml`, `config/user.toml` and `XFORM_*` variables,
//! then prints the model, projection and combined matrices followed by the
//! normalized device coordinates of every configured point.

use xform::{AppConfig, Pipeline};

fn main() {
    // Load configuration before logging so the configured level applies
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting xform");

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("model:{}", pipeline.model);
    println!("projection:{}", pipeline.projection);
    println!("combined:{}", pipeline.combined());

    if config.transform.points.is_empty() {
        log::info!("No points configured");
        return;
    }

    println!("points:");
    for point in &config.transform.points {
        match pipeline.project(*point) {
            Some(ndc) => println!(
                "\t({} {} {}) -> ({} {} {})",
                point.x, point.y, point.z, ndc.x, ndc.y, ndc.z
            ),
            None => println!("\t({} {} {}) -> on eye plane", point.x, point.y, point.z),
        }
    }
}

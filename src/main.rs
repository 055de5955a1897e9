use clap::error::ErrorKind;
use clap::Parser;
use panos_tagger::config::{env_file, tags};
use panos_tagger::core::{query, report};
use panos_tagger::utils::{
    logger::{self, LogFormat},
    validation::Validate,
};
use panos_tagger::{CliConfig, FleetDispatcher, Settings, TaggerError};
use std::path::Path;

/// Exit status when no device in the fleet could be reached.
const EXIT_ALL_UNREACHABLE: i32 = 4;

fn print_usage_and_exit() -> ! {
    let program = std::env::args()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "panos-tagger".to_string());
    println!("usage: {} <filename>", program);
    std::process::exit(1);
}

/// 啟動階段的錯誤一律中止，不處理任何設備
fn exit_on_startup_error<T>(result: Result<T, TaggerError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(
                "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}

#[tokio::main]
async fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => print_usage_and_exit(),
    };

    logger::init_logger(LogFormat::from_flag(config.json_logs), config.verbose);

    tracing::info!("Starting panos-tagger");
    tracing::debug!("CLI config: {:?}", config);

    exit_on_startup_error(config.validate());

    let settings = exit_on_startup_error(match &config.config {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    });
    exit_on_startup_error(settings.validate());

    let env_path = exit_on_startup_error(match &config.env_file {
        Some(path) => Ok(path.clone()),
        None => env_file::default_env_path(),
    });
    let env = exit_on_startup_error(env_file::load_config(&env_path));
    let tag_set = exit_on_startup_error(tags::load_tag_list(&config.tags_file));

    tracing::info!(
        "📁 {} tags for {} devices",
        tag_set.len(),
        env.devices.len()
    );

    if config.dry_run {
        for device in &env.devices {
            for tag in tag_set.iter() {
                println!(
                    "{} -> {}",
                    device,
                    query::set_tag_query(&settings.tags.xpath, tag)
                );
            }
            println!(
                "{} -> {}",
                device,
                query::commit_query(&settings.commit.description)
            );
        }
        tracing::info!("Dry run complete, no device contacted");
        return;
    }

    let devices = env.devices;
    let dispatcher =
        exit_on_startup_error(FleetDispatcher::connect(env.credential, tag_set, &settings));
    let fleet_report = dispatcher.run(&devices).await;

    for result in &fleet_report.devices {
        println!("{}", report::summary_line(result));
    }

    if let Some(path) = &config.report {
        match report::write_json(path, &fleet_report) {
            Ok(()) => println!("📁 Report saved to: {}", path.display()),
            Err(e) => {
                tracing::error!("❌ Failed to write report: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
            }
        }
    }

    if fleet_report.all_unreachable() {
        eprintln!("❌ No device could be reached");
        std::process::exit(EXIT_ALL_UNREACHABLE);
    }
}
